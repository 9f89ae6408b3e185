use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    catalog::model::ProductCatalog,
    foundation::error::{StoryError, StoryResult},
};

/// Page document: catalog, pricing, scrub settings and notice copy.
///
/// Every field has a default reproducing the stock page, so `{}` is a valid document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Products in carousel order.
    pub catalog: ProductCatalog,
    /// Symbol prefixing every displayed price.
    pub currency_symbol: String,
    /// CSS brightness factor applied to the accent color on navigation arrows.
    pub arrow_brightness: f64,
    /// Frame-sequence settings.
    pub story: StoryConfig,
    /// User-facing copy for cart feedback.
    pub notices: NoticeConfig,
}

/// Where one product's frames live, relative to the frames root.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSetSource {
    /// Catalog key of the animated product.
    pub product: String,
    /// Folder holding the numbered frames.
    pub folder: PathBuf,
}

/// Frame-sequence settings shared by the loader, the scrubber and the engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoryConfig {
    /// Frames per product.
    pub frame_count: usize,
    /// Frame shown at scroll offset zero.
    pub start_frame: usize,
    /// Scroll distance, as a fraction of window height, that spans the scrub.
    pub scroll_span: f64,
    /// File name prefix before the frame number.
    pub file_prefix: String,
    /// File extension without the dot.
    pub extension: String,
    /// Zero-padded width of the 1-based frame number.
    pub digits: usize,
    /// Animated products in preload order.
    pub frame_sets: Vec<FrameSetSource>,
}

/// Copy shown for cart interactions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoticeConfig {
    /// Shown after a successful checkout.
    pub checkout_confirmed: String,
    /// Shown when checking out (or viewing) an empty cart.
    pub empty_cart: String,
    /// Temporary label on an add button after a successful add.
    pub added_label: String,
    /// How long the add button keeps `added_label`.
    pub added_feedback_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            catalog: ProductCatalog::default(),
            currency_symbol: "₹".to_string(),
            arrow_brightness: 0.8,
            story: StoryConfig::default(),
            notices: NoticeConfig::default(),
        }
    }
}

impl Default for StoryConfig {
    fn default() -> Self {
        let source = |product: &str, folder: &str| FrameSetSource {
            product: product.to_string(),
            folder: PathBuf::from(folder),
        };
        Self {
            frame_count: 192,
            start_frame: 50,
            scroll_span: 0.2,
            file_prefix: "frame-".to_string(),
            extension: "jpg".to_string(),
            digits: 3,
            frame_sets: vec![
                source("honey", "ezgif-2fae6b36993927b6-jpg"),
                source("saffron", "moon2222"),
                source("shilajit", "moon333"),
            ],
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            checkout_confirmed: "Thank you for your order! This is a demo.".to_string(),
            empty_cart: "Your cart is empty.".to_string(),
            added_label: "Added!".to_string(),
            added_feedback_ms: 1500,
        }
    }
}

impl PageConfig {
    /// Read, parse and validate a JSON page document.
    pub fn from_path(path: &Path) -> StoryResult<Self> {
        let f = File::open(path).with_context(|| format!("open page config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| StoryError::serde(format!("parse '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON page document held in memory.
    pub fn from_json_str(json: &str) -> StoryResult<Self> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| StoryError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> StoryResult<()> {
        if self.currency_symbol.is_empty() {
            return Err(StoryError::validation("currency_symbol must not be empty"));
        }
        if !self.arrow_brightness.is_finite() || self.arrow_brightness < 0.0 {
            return Err(StoryError::validation(
                "arrow_brightness must be a finite value >= 0",
            ));
        }
        self.story.validate()?;

        for (i, set) in self.story.frame_sets.iter().enumerate() {
            if self.catalog.index_of(&set.product).is_none() {
                return Err(StoryError::validation(format!(
                    "frame set references unknown product '{}'",
                    set.product
                )));
            }
            if self.story.frame_sets[..i]
                .iter()
                .any(|other| other.product == set.product)
            {
                return Err(StoryError::validation(format!(
                    "duplicate frame set for product '{}'",
                    set.product
                )));
            }
        }
        Ok(())
    }

    /// True when `key` has a frame sequence (the animated subset).
    pub fn is_animated(&self, key: &str) -> bool {
        self.story.frame_sets.iter().any(|s| s.product == key)
    }
}

impl StoryConfig {
    /// Check frame-count and naming settings.
    pub fn validate(&self) -> StoryResult<()> {
        if self.frame_count == 0 {
            return Err(StoryError::validation("story.frame_count must be > 0"));
        }
        if self.start_frame >= self.frame_count {
            return Err(StoryError::validation(
                "story.start_frame must be < story.frame_count",
            ));
        }
        if !self.scroll_span.is_finite() || self.scroll_span <= 0.0 {
            return Err(StoryError::validation("story.scroll_span must be > 0"));
        }
        if self.digits == 0 {
            return Err(StoryError::validation("story.digits must be > 0"));
        }
        Ok(())
    }

    /// Folder configured for `product`, if it is animated.
    pub fn folder_for(&self, product: &str) -> Option<&Path> {
        self.frame_sets
            .iter()
            .find(|s| s.product == product)
            .map(|s| s.folder.as_path())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;

use std::path::{Path, PathBuf};

use crate::{
    config::StoryConfig,
    foundation::error::{StoryError, StoryResult},
    story::decode::PreparedFrame,
};

/// File naming for numbered frames: `{prefix}{NNN}.{extension}`, 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameNaming {
    /// Text before the frame number.
    pub prefix: String,
    /// Extension without the dot.
    pub extension: String,
    /// Zero-padded width of the frame number.
    pub digits: usize,
}

impl FrameNaming {
    pub fn from_config(cfg: &StoryConfig) -> Self {
        Self {
            prefix: cfg.file_prefix.clone(),
            extension: cfg.extension.clone(),
            digits: cfg.digits,
        }
    }

    /// File name for the 0-based slot `index` (slot 0 is `…001`).
    pub fn file_name(&self, index: usize) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            index + 1,
            self.extension,
            width = self.digits
        )
    }

    /// `folder/file_name(index)`.
    pub fn path_in(&self, folder: &Path, index: usize) -> PathBuf {
        folder.join(self.file_name(index))
    }
}

/// Outcome reported by a loader for one frame.
#[derive(Clone, Debug)]
pub enum FrameOutcome {
    Loaded(PreparedFrame),
    Failed(String),
}

/// Completion message for one requested frame.
#[derive(Clone, Debug)]
pub struct LoadEvent {
    /// Product the frame belongs to.
    pub product: String,
    /// 0-based slot in the frame set.
    pub index: usize,
    pub outcome: FrameOutcome,
}

#[derive(Clone, Debug, Default)]
pub enum FrameSlot {
    #[default]
    Pending,
    Loaded(PreparedFrame),
    /// Recorded so a stalled set can be diagnosed; it still blocks readiness.
    Failed(String),
}

impl FrameSlot {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Observable lifecycle of one product's frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FrameSetState {
    /// Preload was never requested.
    NotStarted,
    /// Some frames are still pending.
    Loading { loaded: usize, total: usize },
    /// Every frame decoded.
    Ready,
    /// At least one frame failed; the set can never become ready.
    Failed {
        loaded: usize,
        failed: usize,
        total: usize,
    },
}

/// Ordered frames for one product.
#[derive(Clone, Debug)]
pub struct FrameSet {
    slots: Vec<FrameSlot>,
    loaded: usize,
    failed: usize,
}

impl FrameSet {
    /// `count` pending slots.
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![FrameSlot::Pending; count],
            loaded: 0,
            failed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// True only when the set has `expected` slots and every one of them is loaded.
    pub fn is_ready(&self, expected: usize) -> bool {
        self.slots.len() == expected && self.slots.iter().all(FrameSlot::is_loaded)
    }

    pub fn state(&self) -> FrameSetState {
        let total = self.slots.len();
        if self.failed > 0 {
            FrameSetState::Failed {
                loaded: self.loaded,
                failed: self.failed,
                total,
            }
        } else if self.loaded == total {
            FrameSetState::Ready
        } else {
            FrameSetState::Loading {
                loaded: self.loaded,
                total,
            }
        }
    }

    pub fn slot(&self, index: usize) -> Option<&FrameSlot> {
        self.slots.get(index)
    }

    /// Decoded frame at `index`, if it has loaded.
    pub fn frame(&self, index: usize) -> Option<&PreparedFrame> {
        match self.slots.get(index) {
            Some(FrameSlot::Loaded(frame)) => Some(frame),
            _ => None,
        }
    }

    /// Apply a loader outcome to a pending slot. Returns `false` for duplicate
    /// completions, which are ignored.
    pub fn record(&mut self, index: usize, outcome: FrameOutcome) -> StoryResult<bool> {
        let total = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            StoryError::asset(format!("frame index {index} is outside a set of {total}"))
        })?;
        if !matches!(slot, FrameSlot::Pending) {
            return Ok(false);
        }
        match outcome {
            FrameOutcome::Loaded(frame) => {
                *slot = FrameSlot::Loaded(frame);
                self.loaded += 1;
            }
            FrameOutcome::Failed(reason) => {
                *slot = FrameSlot::Failed(reason);
                self.failed += 1;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/story/frames.rs"]
mod tests;

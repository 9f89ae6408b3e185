//! Plain view models handed to a [`crate::Presenter`]. Nothing in here knows about markup.

use crate::foundation::geometry::Rgb8;

/// Name of the enter animation replayed on hero text.
pub const ENTER_ANIMATION: &str = "slideUpFade";

/// A CSS-style animation the presenter must (re)start.
///
/// `epoch` increases on every selection, so a presenter that tracks it restarts the
/// animation even when the same product is selected twice in a row.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AnimationCue {
    /// Keyframes name.
    pub name: &'static str,
    pub duration_ms: u64,
    /// Start delay after the cue is applied.
    pub delay_ms: u64,
    /// Selection counter the cue belongs to.
    pub epoch: u64,
}

/// Hero headline block.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct HeroView {
    /// Main headline.
    pub title: String,
    /// Line under the headline.
    pub subtitle: String,
    /// Enter animation for the headline.
    pub title_cue: AnimationCue,
    /// Enter animation for the subtitle, slightly delayed.
    pub subtitle_cue: AnimationCue,
}

/// Detail panel for the selected product.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DetailView {
    /// Panel heading.
    pub title: String,
    /// Body copy.
    pub description: String,
    /// Displayed price string.
    pub price: String,
    /// Detail card lines in display order.
    pub details: Vec<String>,
    /// Section heading color (the product accent).
    pub heading_color: Rgb8,
}

/// One product pill in the selector row.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PillView {
    /// Product key the pill selects.
    pub key: String,
    /// True for the selected product only.
    pub active: bool,
}

/// Accent color for the prev/next arrows with the brightness filter applied.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ArrowStyle {
    /// Product accent color.
    pub accent: Rgb8,
    /// Brightness factor applied on top of `accent`.
    pub brightness: f64,
    /// `accent` after the brightness filter.
    pub effective: Rgb8,
}

/// What occupies the hero visual slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualRegion {
    /// The frame surface is shown and scrubs this product's frames.
    Story { product: String },
    /// Static circular badge labeled with the product key.
    Placeholder { label: String, badge: Rgb8 },
}

/// Everything that changes when a product is selected.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ProductView {
    /// Selected product key.
    pub key: String,
    /// Page-wide theme token.
    pub theme: String,
    pub hero: HeroView,
    pub detail: DetailView,
    /// Pills in catalog order.
    pub pills: Vec<PillView>,
    pub arrows: ArrowStyle,
    pub visual: VisualRegion,
}

impl ProductView {
    /// Keys of pills marked active. Exactly one for a well-formed view.
    pub fn active_pills(&self) -> impl Iterator<Item = &str> {
        self.pills
            .iter()
            .filter(|p| p.active)
            .map(|p| p.key.as_str())
    }
}

/// One rendered cart line.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CartRow {
    /// Position in the cart; the row's remove action is bound to it.
    pub index: usize,
    pub title: String,
    /// Price with the currency symbol, e.g. `₹850`.
    pub price_label: String,
}

/// Cart overlay contents.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CartView {
    /// Text of the cart toggle control, e.g. `Cart (2)`.
    pub toggle_label: String,
    /// Number of items.
    pub count: usize,
    /// Items in cart order.
    pub rows: Vec<CartRow>,
    /// Sum of item prices.
    pub total: u64,
    /// `total` with the currency symbol.
    pub total_label: String,
    /// Present only when the cart is empty.
    pub empty_message: Option<String>,
}

/// One-shot feedback the presenter surfaces to the user.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Swap the add button label for `label`, then revert after `revert_after_ms`.
    ItemAdded {
        title: String,
        label: String,
        revert_after_ms: u64,
    },
    CheckoutConfirmed { message: String },
    CartEmpty { message: String },
}

use crate::view::model::{CartView, Notice, ProductView};

/// Sink for rendered view models. Implementations own the actual page handles.
pub trait Presenter {
    /// Apply a product selection: theme, hero, detail, pills, arrows, visual slot.
    fn show_product(&mut self, view: &ProductView);

    /// Replace the cart contents, counter and total.
    fn show_cart(&mut self, view: &CartView);

    /// Show or hide the cart overlay.
    fn set_cart_visible(&mut self, visible: bool);

    /// Surface transient feedback.
    fn notify(&mut self, notice: &Notice);
}

/// Presenter that keeps the latest view models in memory.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct RecordingPresenter {
    /// Last product view shown.
    pub product: Option<ProductView>,
    /// Last cart view shown.
    pub cart: Option<CartView>,
    pub cart_visible: bool,
    /// Every notice, oldest first.
    pub notices: Vec<Notice>,
    /// Number of `show_product` calls.
    pub product_renders: usize,
    /// Number of `show_cart` calls.
    pub cart_renders: usize,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl Presenter for RecordingPresenter {
    fn show_product(&mut self, view: &ProductView) {
        self.product = Some(view.clone());
        self.product_renders += 1;
    }

    fn show_cart(&mut self, view: &CartView) {
        self.cart = Some(view.clone());
        self.cart_renders += 1;
    }

    fn set_cart_visible(&mut self, visible: bool) {
        self.cart_visible = visible;
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

use crate::{
    cart::{
        model::{Cart, CartItem},
        price::{format_price, parse_price},
    },
    catalog::model::{Product, ProductCatalog},
    config::{NoticeConfig, PageConfig},
    foundation::error::StoryResult,
    view::{
        model::{
            AnimationCue, ArrowStyle, CartRow, CartView, DetailView, ENTER_ANIMATION, HeroView,
            Notice, PillView, ProductView, VisualRegion,
        },
        presenter::Presenter,
    },
};

const ENTER_DURATION_MS: u64 = 600;
const SUBTITLE_DELAY_MS: u64 = 100;

/// Receiver of "this product is now on screen" for the animated subset.
///
/// Implemented by [`crate::StoryEngine`]; the controller never owns the engine.
pub trait ProductFocus {
    fn focus_product(&mut self, key: &str) -> StoryResult<()>;
}

/// Focus sink for pages without a frame surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFocus;

impl ProductFocus for NoFocus {
    fn focus_product(&mut self, _key: &str) -> StoryResult<()> {
        Ok(())
    }
}

/// Where a click on the cart overlay landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayTarget {
    /// The dimmed area around the cart panel.
    Backdrop,
    /// Anywhere inside the cart panel.
    Content,
}

/// Result of a checkout attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart held `items` worth `total`; it is now empty and closed.
    Confirmed { items: Vec<CartItem>, total: u64 },
    /// Nothing to check out; state unchanged.
    EmptyCart,
}

/// Owns the selected product, the cart and the cart overlay state, and pushes view
/// models to its presenter after every change.
#[derive(Debug)]
pub struct ViewController<P: Presenter> {
    catalog: ProductCatalog,
    animated: Vec<String>,
    currency_symbol: String,
    arrow_brightness: f64,
    notices: NoticeConfig,
    presenter: P,
    cart: Cart,
    current: usize,
    cart_visible: bool,
    enter_epoch: u64,
}

impl<P: Presenter> ViewController<P> {
    /// Build a controller over a validated config. Nothing is rendered until the
    /// first selection.
    pub fn new(config: &PageConfig, presenter: P) -> Self {
        Self {
            catalog: config.catalog.clone(),
            animated: config
                .story
                .frame_sets
                .iter()
                .map(|s| s.product.clone())
                .collect(),
            currency_symbol: config.currency_symbol.clone(),
            arrow_brightness: config.arrow_brightness,
            notices: config.notices.clone(),
            presenter,
            cart: Cart::new(),
            current: 0,
            cart_visible: false,
            enter_epoch: 0,
        }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_product(&self) -> Option<&Product> {
        self.catalog.at(self.current)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn is_cart_visible(&self) -> bool {
        self.cart_visible
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// True when `key` scrubs a frame sequence instead of showing a placeholder.
    pub fn is_animated(&self, key: &str) -> bool {
        self.animated.iter().any(|k| k == key)
    }

    /// Select `key`, re-render the product regions and, for animated products,
    /// hand focus to the frame engine.
    ///
    /// Unknown keys are rejected and leave every piece of state untouched.
    #[tracing::instrument(skip(self, focus))]
    pub fn select_product(&mut self, key: &str, focus: &mut dyn ProductFocus) -> StoryResult<()> {
        let index = match self.catalog.index_of(key) {
            Some(i) => i,
            None => {
                tracing::warn!(key, "rejected selection of unknown product");
                return Err(crate::StoryError::unknown_product(key));
            }
        };
        self.select_index(index, focus)
    }

    /// Advance to the next product, wrapping to the first.
    pub fn next(&mut self, focus: &mut dyn ProductFocus) -> StoryResult<()> {
        let index = self.catalog.next_index(self.current);
        self.select_index(index, focus)
    }

    /// Step back to the previous product, wrapping to the last.
    pub fn prev(&mut self, focus: &mut dyn ProductFocus) -> StoryResult<()> {
        let index = self.catalog.prev_index(self.current);
        self.select_index(index, focus)
    }

    fn select_index(&mut self, index: usize, focus: &mut dyn ProductFocus) -> StoryResult<()> {
        self.current = index;
        self.enter_epoch += 1;

        let view = self.product_view(index)?;
        tracing::debug!(key = %view.key, epoch = self.enter_epoch, "product selected");
        self.presenter.show_product(&view);

        if let VisualRegion::Story { product } = &view.visual {
            focus.focus_product(product)?;
        }
        Ok(())
    }

    fn product_view(&self, index: usize) -> StoryResult<ProductView> {
        let product = self
            .catalog
            .at(index)
            .ok_or_else(|| crate::StoryError::validation("selected index is out of range"))?;

        let cue = |delay_ms| AnimationCue {
            name: ENTER_ANIMATION,
            duration_ms: ENTER_DURATION_MS,
            delay_ms,
            epoch: self.enter_epoch,
        };

        let visual = if self.is_animated(&product.key) {
            VisualRegion::Story {
                product: product.key.clone(),
            }
        } else {
            VisualRegion::Placeholder {
                label: product.key.clone(),
                badge: product.color,
            }
        };

        Ok(ProductView {
            key: product.key.clone(),
            theme: product.theme.clone(),
            hero: HeroView {
                title: product.title.clone(),
                subtitle: product.subtitle.clone(),
                title_cue: cue(0),
                subtitle_cue: cue(SUBTITLE_DELAY_MS),
            },
            detail: DetailView {
                title: product.title.clone(),
                description: product.description.clone(),
                price: product.price.clone(),
                details: product.details.clone(),
                heading_color: product.color,
            },
            pills: self
                .catalog
                .keys()
                .map(|k| PillView {
                    key: k.to_string(),
                    active: k == product.key,
                })
                .collect(),
            arrows: ArrowStyle {
                accent: product.color,
                brightness: self.arrow_brightness,
                effective: product.color.brightness(self.arrow_brightness),
            },
            visual,
        })
    }

    /// Add an item from a product card: `displayed_price` is the card's price text.
    ///
    /// A price that does not parse is returned as an error and nothing is added.
    pub fn add_to_cart(&mut self, title: &str, displayed_price: &str) -> StoryResult<()> {
        let price = parse_price(displayed_price, &self.currency_symbol).inspect_err(|e| {
            tracing::warn!(title, displayed_price, error = %e, "rejected add to cart");
        })?;
        self.add_item(CartItem {
            title: title.to_string(),
            price,
        });
        Ok(())
    }

    /// Add the product currently shown in the detail panel.
    pub fn add_displayed_product(&mut self) -> StoryResult<()> {
        let (title, price) = {
            let product = self
                .current_product()
                .ok_or_else(|| crate::StoryError::validation("no product is displayed"))?;
            (product.title.clone(), product.price.clone())
        };
        self.add_to_cart(&title, &price)
    }

    /// Append an already-priced item and re-render the cart.
    pub fn add_item(&mut self, item: CartItem) {
        tracing::debug!(title = %item.title, price = item.price, "cart add");
        let notice = Notice::ItemAdded {
            title: item.title.clone(),
            label: self.notices.added_label.clone(),
            revert_after_ms: self.notices.added_feedback_ms,
        };
        self.cart.push(item);
        self.render_cart();
        self.presenter.notify(&notice);
    }

    /// Remove the row at `index`. Out-of-range indices are ignored; returns whether
    /// anything was removed.
    pub fn remove_from_cart(&mut self, index: usize) -> bool {
        match self.cart.remove(index) {
            Some(item) => {
                tracing::debug!(index, title = %item.title, "cart remove");
                self.render_cart();
                true
            }
            None => {
                tracing::debug!(index, len = self.cart.len(), "ignored out-of-range cart removal");
                false
            }
        }
    }

    /// Current cart as a view model.
    pub fn cart_view(&self) -> CartView {
        let count = self.cart.len();
        let total = self.cart.total();
        CartView {
            toggle_label: format!("Cart ({count})"),
            count,
            rows: self
                .cart
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| CartRow {
                    index,
                    title: item.title.clone(),
                    price_label: format_price(item.price, &self.currency_symbol),
                })
                .collect(),
            total,
            total_label: format_price(total, &self.currency_symbol),
            empty_message: self
                .cart
                .is_empty()
                .then(|| self.notices.empty_cart.clone()),
        }
    }

    /// Push the current cart to the presenter.
    pub fn render_cart(&mut self) {
        let view = self.cart_view();
        self.presenter.show_cart(&view);
    }

    /// Confirm and clear a non-empty cart, then close the overlay. An empty cart only
    /// produces a notice.
    pub fn checkout(&mut self) -> CheckoutOutcome {
        if self.cart.is_empty() {
            self.presenter.notify(&Notice::CartEmpty {
                message: self.notices.empty_cart.clone(),
            });
            return CheckoutOutcome::EmptyCart;
        }

        let total = self.cart.total();
        let items = self.cart.items().to_vec();
        tracing::info!(items = items.len(), total, "checkout");

        self.presenter.notify(&Notice::CheckoutConfirmed {
            message: self.notices.checkout_confirmed.clone(),
        });
        self.cart.clear();
        self.render_cart();
        self.set_cart_visible(false);
        CheckoutOutcome::Confirmed { items, total }
    }

    /// Flip the cart overlay; returns the new visibility.
    pub fn toggle_cart_visibility(&mut self) -> bool {
        let visible = !self.cart_visible;
        self.set_cart_visible(visible);
        visible
    }

    /// Clicking the backdrop closes the overlay; clicks inside the panel are ignored.
    pub fn on_overlay_click(&mut self, target: OverlayTarget) {
        if target == OverlayTarget::Backdrop && self.cart_visible {
            self.set_cart_visible(false);
        }
    }

    fn set_cart_visible(&mut self, visible: bool) {
        self.cart_visible = visible;
        self.presenter.set_cart_visible(visible);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/controller.rs"]
mod tests;

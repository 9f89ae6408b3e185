use super::*;
use crate::{StoryError, view::presenter::RecordingPresenter};

#[derive(Default)]
struct FocusLog(Vec<String>);

impl ProductFocus for FocusLog {
    fn focus_product(&mut self, key: &str) -> StoryResult<()> {
        self.0.push(key.to_string());
        Ok(())
    }
}

fn controller() -> ViewController<RecordingPresenter> {
    ViewController::new(&PageConfig::default(), RecordingPresenter::new())
}

fn controller_with_static_mango() -> ViewController<RecordingPresenter> {
    let mut cfg = PageConfig::default();
    let mut products: Vec<Product> = cfg.catalog.products().to_vec();
    products.push(Product {
        key: "mango".to_string(),
        title: "Sun Drop.".to_string(),
        subtitle: "Alphonso season.".to_string(),
        theme: "mango".to_string(),
        color: crate::Rgb8::new(0xFF, 0xA0, 0x00),
        description: "Ripe.".to_string(),
        price: "₹600".to_string(),
        details: vec![],
    });
    cfg.catalog = ProductCatalog::new(products).unwrap();
    ViewController::new(&cfg, RecordingPresenter::new())
}

#[test]
fn selecting_each_product_marks_exactly_one_matching_pill() {
    let mut c = controller();
    let keys: Vec<String> = c.catalog().keys().map(str::to_string).collect();
    for key in &keys {
        c.select_product(key, &mut NoFocus).unwrap();
        let view = c.presenter().product.as_ref().unwrap();
        let active: Vec<&str> = view.active_pills().collect();
        assert_eq!(active, [key.as_str()]);
        assert_eq!(view.theme, *key);
        assert_eq!(view.pills.len(), keys.len());
    }
}

#[test]
fn selection_renders_hero_detail_and_arrows() {
    let mut c = controller();
    c.select_product("honey", &mut NoFocus).unwrap();
    let view = c.presenter().product.clone().unwrap();

    assert_eq!(view.hero.title, "Liquid Gold.");
    assert_eq!(view.hero.subtitle_cue.delay_ms, 100);
    assert_eq!(view.hero.title_cue.duration_ms, 600);
    assert_eq!(view.detail.price, "₹1500");
    assert_eq!(view.detail.details, ["Top Grade Sidr", "100% Organic"]);
    assert_eq!(view.arrows.accent, crate::Rgb8::new(0xFF, 0xB3, 0x47));
    assert_eq!(view.arrows.effective, crate::Rgb8::new(204, 143, 57));
    assert_eq!(view.detail.heading_color, view.arrows.accent);
}

#[test]
fn reselecting_same_product_retriggers_enter_animation() {
    let mut c = controller();
    c.select_product("saffron", &mut NoFocus).unwrap();
    let first = c.presenter().product.as_ref().unwrap().hero.title_cue.epoch;
    c.select_product("saffron", &mut NoFocus).unwrap();
    let second = c.presenter().product.as_ref().unwrap().hero.title_cue.epoch;
    assert!(second > first);
    assert_eq!(c.presenter().product_renders, 2);
}

#[test]
fn unknown_key_is_rejected_without_side_effects() {
    let mut c = controller();
    c.select_product("honey", &mut NoFocus).unwrap();
    let renders = c.presenter().product_renders;

    let mut focus = FocusLog::default();
    let err = c.select_product("mango", &mut focus).unwrap_err();
    assert!(matches!(err, StoryError::UnknownProduct(_)));
    assert_eq!(c.current_index(), 1);
    assert_eq!(c.presenter().product_renders, renders);
    assert!(focus.0.is_empty());
}

#[test]
fn animated_products_hand_focus_to_engine() {
    let mut c = controller_with_static_mango();
    let mut focus = FocusLog::default();
    c.select_product("shilajit", &mut focus).unwrap();
    c.select_product("mango", &mut focus).unwrap();
    assert_eq!(focus.0, ["shilajit"]);

    let view = c.presenter().product.as_ref().unwrap();
    assert_eq!(
        view.visual,
        VisualRegion::Placeholder {
            label: "mango".to_string(),
            badge: crate::Rgb8::new(0xFF, 0xA0, 0x00),
        }
    );
}

#[test]
fn next_and_prev_wrap_and_invert_each_other() {
    let mut c = controller();
    let len = c.catalog().len();
    for start in 0..len {
        let key = c.catalog().at(start).unwrap().key.clone();
        c.select_product(&key, &mut NoFocus).unwrap();
        c.next(&mut NoFocus).unwrap();
        c.prev(&mut NoFocus).unwrap();
        assert_eq!(c.current_index(), start);
        c.prev(&mut NoFocus).unwrap();
        c.next(&mut NoFocus).unwrap();
        assert_eq!(c.current_index(), start);
    }

    c.select_product("shilajit", &mut NoFocus).unwrap();
    c.next(&mut NoFocus).unwrap();
    assert_eq!(c.current_product().unwrap().key, "saffron");
    c.prev(&mut NoFocus).unwrap();
    c.prev(&mut NoFocus).unwrap();
    assert_eq!(c.current_product().unwrap().key, "honey");
}

#[test]
fn cart_view_tracks_items_and_total() {
    let mut c = controller();
    c.render_cart();
    let empty = c.presenter().cart.clone().unwrap();
    assert_eq!(empty.toggle_label, "Cart (0)");
    assert_eq!(empty.total_label, "₹0");
    assert_eq!(empty.empty_message.as_deref(), Some("Your cart is empty."));

    c.add_to_cart("Red Jewel.", "₹850").unwrap();
    c.add_to_cart("Liquid Gold.", "₹1500").unwrap();
    let view = c.presenter().cart.clone().unwrap();
    assert_eq!(view.toggle_label, "Cart (2)");
    assert_eq!(view.total, 2350);
    assert_eq!(view.total_label, "₹2350");
    assert_eq!(view.rows[1].price_label, "₹1500");
    assert_eq!(view.rows[1].index, 1);
    assert!(view.empty_message.is_none());
    assert_eq!(
        view.total,
        c.cart().items().iter().map(|i| i.price).sum::<u64>()
    );
}

#[test]
fn add_then_remove_restores_total() {
    let mut c = controller();
    c.add_to_cart("Red Jewel.", "₹850").unwrap();
    let before = c.cart().total();
    c.add_to_cart("Mountain Strength.", "₹1999").unwrap();
    assert!(c.remove_from_cart(1));
    assert_eq!(c.cart().total(), before);
    assert_eq!(c.presenter().cart.as_ref().unwrap().total, before);
}

#[test]
fn out_of_range_removal_is_noop() {
    let mut c = controller();
    c.add_to_cart("Red Jewel.", "₹850").unwrap();
    let renders = c.presenter().cart_renders;
    assert!(!c.remove_from_cart(3));
    assert_eq!(c.cart().len(), 1);
    assert_eq!(c.presenter().cart_renders, renders);
}

// Malformed displayed prices used to turn the total into NaN; they are now
// refused up front and the cart stays as it was.
#[test]
fn malformed_price_is_rejected_and_cart_untouched() {
    let mut c = controller();
    c.add_to_cart("Red Jewel.", "₹850").unwrap();
    let err = c.add_to_cart("Imported", "$40").unwrap_err();
    assert!(matches!(err, StoryError::Price(_)));
    assert_eq!(c.cart().len(), 1);
    assert_eq!(c.presenter().cart.as_ref().unwrap().total_label, "₹850");
}

#[test]
fn add_displayed_product_uses_detail_panel() {
    let mut c = controller();
    c.select_product("shilajit", &mut NoFocus).unwrap();
    c.add_displayed_product().unwrap();
    assert_eq!(
        c.cart().items(),
        [CartItem {
            title: "Mountain Strength.".to_string(),
            price: 1999
        }]
    );
    assert!(matches!(
        c.presenter().last_notice(),
        Some(Notice::ItemAdded { label, revert_after_ms: 1500, .. }) if label == "Added!"
    ));
}

#[test]
fn checkout_non_empty_clears_and_closes() {
    let mut c = controller();
    c.add_to_cart("Red Jewel.", "₹850").unwrap();
    c.toggle_cart_visibility();
    assert!(c.is_cart_visible());

    let outcome = c.checkout();
    assert_eq!(
        outcome,
        CheckoutOutcome::Confirmed {
            items: vec![CartItem {
                title: "Red Jewel.".to_string(),
                price: 850
            }],
            total: 850
        }
    );
    assert!(c.cart().is_empty());
    assert!(!c.is_cart_visible());
    assert!(!c.presenter().cart_visible);
    assert_eq!(c.presenter().cart.as_ref().unwrap().total_label, "₹0");
    assert!(matches!(
        c.presenter().last_notice(),
        Some(Notice::CheckoutConfirmed { .. })
    ));
}

#[test]
fn checkout_empty_only_notifies() {
    let mut c = controller();
    c.toggle_cart_visibility();
    let renders = c.presenter().cart_renders;
    assert_eq!(c.checkout(), CheckoutOutcome::EmptyCart);
    assert!(c.is_cart_visible());
    assert_eq!(c.presenter().cart_renders, renders);
    assert_eq!(
        c.presenter().last_notice(),
        Some(&Notice::CartEmpty {
            message: "Your cart is empty.".to_string()
        })
    );
}

#[test]
fn overlay_backdrop_closes_but_content_does_not() {
    let mut c = controller();
    assert!(c.toggle_cart_visibility());
    c.on_overlay_click(OverlayTarget::Content);
    assert!(c.is_cart_visible());
    c.on_overlay_click(OverlayTarget::Backdrop);
    assert!(!c.is_cart_visible());
    assert!(c.toggle_cart_visibility());
    assert!(!c.toggle_cart_visibility());
}

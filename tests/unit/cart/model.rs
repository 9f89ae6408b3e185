use super::*;

fn item(title: &str, price: u64) -> CartItem {
    CartItem {
        title: title.to_string(),
        price,
    }
}

#[test]
fn total_is_sum_of_prices() {
    let mut cart = Cart::new();
    assert_eq!(cart.total(), 0);
    cart.push(item("Red Jewel.", 850));
    cart.push(item("Liquid Gold.", 1500));
    cart.push(item("Red Jewel.", 850));
    assert_eq!(cart.len(), 3);
    assert_eq!(cart.total(), 3200);
}

#[test]
fn add_then_remove_restores_total() {
    let mut cart = Cart::new();
    cart.push(item("Liquid Gold.", 1500));
    let before = cart.total();

    cart.push(item("Mountain Strength.", 1999));
    let removed = cart.remove(cart.len() - 1).unwrap();
    assert_eq!(removed.price, 1999);
    assert_eq!(cart.total(), before);
}

#[test]
fn remove_keeps_order_of_remaining_items() {
    let mut cart = Cart::new();
    cart.push(item("a", 1));
    cart.push(item("b", 2));
    cart.push(item("c", 3));
    cart.remove(1);
    let titles: Vec<&str> = cart.items().iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["a", "c"]);
}

#[test]
fn out_of_range_remove_is_noop() {
    let mut cart = Cart::new();
    cart.push(item("a", 1));
    assert!(cart.remove(1).is_none());
    assert!(cart.remove(usize::MAX).is_none());
    assert_eq!(cart.len(), 1);
}

#[test]
fn clear_empties() {
    let mut cart = Cart::new();
    cart.push(item("a", 1));
    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.total(), 0);
}

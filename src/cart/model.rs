/// One line in the cart.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CartItem {
    /// Product title as displayed when it was added.
    pub title: String,
    /// Price in whole currency units.
    pub price: u64,
}

/// In-memory cart. Items keep insertion order until removed; nothing is persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item at the end.
    pub fn push(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Remove the item at `index`; out-of-range indices leave the cart untouched.
    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in display order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the cart holds nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all item prices.
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.price))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cart/model.rs"]
mod tests;

use crate::foundation::{
    error::{StoryError, StoryResult},
    geometry::Rgb8,
};

/// One product SKU as shown on the page. Immutable once the catalog is built.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    /// Stable key (`"saffron"`), also used for pills and frame sets.
    pub key: String,
    /// Hero/detail headline.
    pub title: String,
    /// Hero subtitle.
    pub subtitle: String,
    /// Page-wide theme token applied while the product is selected.
    pub theme: String,
    /// Accent color for headings and navigation arrows.
    pub color: Rgb8,
    /// Detail panel body copy.
    pub description: String,
    /// Displayed price string, currency symbol included (`"₹850"`).
    pub price: String,
    /// Detail card lines, rendered one per line.
    #[serde(default)]
    pub details: Vec<String>,
}

/// Ordered product list; order drives pills and next/prev wraparound.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct ProductCatalog {
    pub(super) products: Vec<Product>,
}

impl ProductCatalog {
    /// Build a catalog, rejecting empty lists and duplicate keys.
    pub fn new(products: Vec<Product>) -> StoryResult<Self> {
        if products.is_empty() {
            return Err(StoryError::validation("catalog must contain at least one product"));
        }
        for (i, p) in products.iter().enumerate() {
            if p.key.trim().is_empty() {
                return Err(StoryError::validation(format!(
                    "product at position {i} has an empty key"
                )));
            }
            if products[..i].iter().any(|q| q.key == p.key) {
                return Err(StoryError::validation(format!(
                    "duplicate product key '{}'",
                    p.key
                )));
            }
        }
        Ok(Self { products })
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Always false for a constructed catalog; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(|p| p.key.as_str())
    }

    /// Position of `key`, if present.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.products.iter().position(|p| p.key == key)
    }

    /// Product at `index`.
    pub fn at(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    /// Product by key, or [`StoryError::UnknownProduct`].
    pub fn get(&self, key: &str) -> StoryResult<&Product> {
        self.products
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| StoryError::unknown_product(key))
    }

    /// Index after `index`, wrapping to the front.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.products.len()
    }

    /// Index before `index`, wrapping to the back.
    pub fn prev_index(&self, index: usize) -> usize {
        let len = self.products.len();
        (index % len + len - 1) % len
    }
}

impl TryFrom<Vec<Product>> for ProductCatalog {
    type Error = StoryError;

    fn try_from(value: Vec<Product>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductCatalog> for Vec<Product> {
    fn from(value: ProductCatalog) -> Self {
        value.products
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;

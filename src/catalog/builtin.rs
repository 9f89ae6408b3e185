use crate::{
    catalog::model::{Product, ProductCatalog},
    foundation::geometry::Rgb8,
};

fn product(
    key: &str,
    title: &str,
    subtitle: &str,
    color: Rgb8,
    description: &str,
    price: &str,
    details: &[&str],
) -> Product {
    Product {
        key: key.to_string(),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        theme: key.to_string(),
        color,
        description: description.to_string(),
        price: price.to_string(),
        details: details.iter().map(|d| d.to_string()).collect(),
    }
}

/// Products shipped with the page when no catalog is configured.
pub fn builtin_products() -> Vec<Product> {
    vec![
        product(
            "saffron",
            "Red Jewel.",
            "The world's most precious spice.",
            Rgb8::new(0xE5, 0x39, 0x35),
            "Hand-picked from the autumn fields of Pampore. Each strand is a testament to \
             patience and purity, bringing vibrant color and aroma.",
            "₹850",
            &["Mongra A++", "Deep Red Stigmas"],
        ),
        product(
            "honey",
            "Liquid Gold.",
            "Vitamin-packed purity from the Sidr valleys.",
            Rgb8::new(0xFF, 0xB3, 0x47),
            "Our Sidr Honey is harvested from the sacred Lote trees of Yemen. Known for potent \
             antimicrobial properties and rich, caramel-like taste.",
            "₹1500",
            &["Top Grade Sidr", "100% Organic"],
        ),
        product(
            "shilajit",
            "Mountain Strength.",
            "Pure Himalayan Resin.",
            Rgb8::new(0x1A, 0x1A, 0x1A),
            "Sourced from high-altitude rocks of the Himalayas. Rich in fulvic acid and trace \
             minerals, boosting energy, immunity, and focus naturally.",
            "₹1999",
            &["Gold Grade Resin", "High Potency"],
        ),
    ]
}

/// The built-in catalog.
pub fn builtin_catalog() -> ProductCatalog {
    ProductCatalog {
        products: builtin_products(),
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        builtin_catalog()
    }
}

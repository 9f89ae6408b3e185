use std::collections::BTreeMap;

use crate::view::{
    model::{AnimationCue, CartView, Notice, ProductView, VisualRegion},
    presenter::Presenter,
};

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn cue_style(cue: &AnimationCue) -> String {
    let secs = |ms: u64| format!("{}s", ms as f64 / 1000.0);
    if cue.delay_ms == 0 {
        format!("animation: {} {} forwards", cue.name, secs(cue.duration_ms))
    } else {
        format!(
            "animation: {} {} {} forwards",
            cue.name,
            secs(cue.duration_ms),
            secs(cue.delay_ms)
        )
    }
}

/// Presenter that templates view models into per-element HTML fragments.
///
/// Keys are element ids (`hero-title`) or `id@attribute` pairs (`body@data-theme`).
/// Cart rows carry a `data-remove-index` attribute that the host binds to
/// [`crate::PageEvent::RemoveFromCart`] when it mounts the fragment.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct MarkupPresenter {
    elements: BTreeMap<String, String>,
    notices: Vec<String>,
}

impl MarkupPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment for `key`, if rendered.
    pub fn element(&self, key: &str) -> Option<&str> {
        self.elements.get(key).map(String::as_str)
    }

    /// All rendered fragments.
    pub fn elements(&self) -> &BTreeMap<String, String> {
        &self.elements
    }

    /// Notice messages in the order they were raised.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.elements.insert(key.into(), value.into());
    }
}

impl Presenter for MarkupPresenter {
    fn show_product(&mut self, view: &ProductView) {
        self.set("body@data-theme", escape_html(&view.theme));

        self.set("hero-title", escape_html(&view.hero.title));
        self.set("hero-title@style", cue_style(&view.hero.title_cue));
        self.set("hero-title@data-enter", view.hero.title_cue.epoch.to_string());
        self.set("hero-subtitle", escape_html(&view.hero.subtitle));
        self.set("hero-subtitle@style", cue_style(&view.hero.subtitle_cue));
        self.set(
            "hero-subtitle@data-enter",
            view.hero.subtitle_cue.epoch.to_string(),
        );

        self.set("detail-title", escape_html(&view.detail.title));
        self.set("detail-desc", escape_html(&view.detail.description));
        self.set("detail-price", escape_html(&view.detail.price));
        let details: Vec<String> = view.detail.details.iter().map(|d| escape_html(d)).collect();
        self.set("detail-card-content", details.join("<br>"));
        self.set(
            "section-heading@style",
            format!("color: {}", view.detail.heading_color),
        );

        for pill in &view.pills {
            let class = if pill.active {
                "pill-btn active"
            } else {
                "pill-btn"
            };
            self.set(format!("pill-{}@class", pill.key), class);
        }

        self.set(
            "nav-arrow@style",
            format!(
                "background-color: {}; filter: brightness({})",
                view.arrows.accent, view.arrows.brightness
            ),
        );

        match &view.visual {
            VisualRegion::Story { product } => {
                self.set("story-frame-canvas@style", "display: block");
                self.set("story-frame-canvas@data-product", escape_html(product));
                self.set("hero-visual-container@style", "display: none");
                self.set("hero-image", "");
            }
            VisualRegion::Placeholder { label, badge } => {
                self.set("story-frame-canvas@style", "display: none");
                self.set("hero-visual-container@style", "display: block");
                self.set(
                    "hero-image",
                    format!(
                        "<div class=\"placeholder-badge\" style=\"background: {badge}; border-radius: 50%\">{}</div>",
                        escape_html(&label.to_uppercase())
                    ),
                );
            }
        }
    }

    fn show_cart(&mut self, view: &CartView) {
        self.set("cart-btn", escape_html(&view.toggle_label));
        self.set("cart-total", escape_html(&view.total_label));

        let items = match &view.empty_message {
            Some(msg) => format!("<p class=\"empty-msg\">{}</p>", escape_html(msg)),
            None => view
                .rows
                .iter()
                .map(|row| {
                    format!(
                        "<div class=\"cart-item\"><div><h4>{}</h4><small>{}</small></div>\
                         <button class=\"remove-item\" data-remove-index=\"{}\">&times;</button></div>",
                        escape_html(&row.title),
                        escape_html(&row.price_label),
                        row.index
                    )
                })
                .collect::<String>(),
        };
        self.set("cart-items", items);
    }

    fn set_cart_visible(&mut self, visible: bool) {
        self.set("cart-modal@class", if visible { "" } else { "hidden" });
    }

    fn notify(&mut self, notice: &Notice) {
        let msg = match notice {
            Notice::ItemAdded { title, label, .. } => format!("{label} {title}"),
            Notice::CheckoutConfirmed { message } | Notice::CartEmpty { message } => {
                message.clone()
            }
        };
        self.notices.push(msg);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/markup.rs"]
mod tests;

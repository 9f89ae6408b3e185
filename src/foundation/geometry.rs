use std::fmt;

use crate::foundation::error::{StoryError, StoryResult};

pub use kurbo::Rect;

/// Width/height pair in CSS pixels (or source pixels for images).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Build a size from raw extents.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `width / height`, or `None` for degenerate sizes.
    pub fn aspect(self) -> Option<f64> {
        if self.is_drawable() {
            Some(self.width / self.height)
        } else {
            None
        }
    }

    /// True when both extents are finite and strictly positive.
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Destination rectangle that scales `image` to completely cover `target`.
///
/// Aspect ratio is preserved and the overflow is split evenly on the cropped axis:
/// a relatively wider image fills the height and is centered horizontally, otherwise
/// it fills the width and is centered vertically. Returns `None` when either size
/// is degenerate.
pub fn cover_fit(image: Size, target: Size) -> Option<Rect> {
    let image_aspect = image.aspect()?;
    let target_aspect = target.aspect()?;

    let (draw_w, draw_h, offset_x, offset_y) = if image_aspect > target_aspect {
        let draw_h = target.height;
        let draw_w = draw_h * image_aspect;
        (draw_w, draw_h, (target.width - draw_w) / 2.0, 0.0)
    } else {
        let draw_w = target.width;
        let draw_h = draw_w / image_aspect;
        (draw_w, draw_h, 0.0, (target.height - draw_h) / 2.0)
    };

    Some(Rect::new(
        offset_x,
        offset_y,
        offset_x + draw_w,
        offset_y + draw_h,
    ))
}

/// Opaque sRGB color parsed from `#RRGGBB` (or `#RGB`) notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB`.
    pub fn parse_hex(s: &str) -> StoryResult<Self> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| StoryError::validation(format!("color '{s}' must start with '#'")))?;
        if !digits.is_ascii() {
            return Err(StoryError::validation(format!("color '{s}' is not hex")));
        }

        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16)
                .map_err(|_| StoryError::validation(format!("color '{s}' is not hex")))
        };

        match digits.len() {
            6 => Ok(Self {
                r: channel(&digits[0..2])?,
                g: channel(&digits[2..4])?,
                b: channel(&digits[4..6])?,
            }),
            3 => {
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self {
                    r: r * 17,
                    g: g * 17,
                    b: b * 17,
                })
            }
            _ => Err(StoryError::validation(format!(
                "color '{s}' must have 3 or 6 hex digits"
            ))),
        }
    }

    /// Apply a CSS `brightness(factor)` filter: each channel scaled, rounded and clamped.
    pub fn brightness(self, factor: f64) -> Self {
        let factor = if factor.is_finite() {
            factor.max(0.0)
        } else {
            1.0
        };
        let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    /// Channels as an opaque straight-alpha RGBA quadruple.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = StoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;

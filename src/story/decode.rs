use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    error::{StoryError, StoryResult},
    geometry::Size,
};

/// Decoded frame held as a premultiplied `vello_cpu` pixmap, cheap to clone.
///
/// The pixmap is built once when the frame is decoded; drawing only shares it.
#[derive(Clone)]
pub struct PreparedFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for PreparedFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PartialEq for PreparedFrame {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.rgba8_premul() == other.rgba8_premul()
    }
}

impl PreparedFrame {
    /// Wrap row-major premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: &[u8]) -> StoryResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| StoryError::asset(format!("frame width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| StoryError::asset(format!("frame height {height} exceeds u16")))?;
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(StoryError::asset("frame byte length mismatch with width*height*4"));
        }

        let mut may_have_opacities = false;
        let pixels = rgba8_premul
            .chunks_exact(4)
            .map(|px| {
                may_have_opacities |= px[3] != 255;
                vello_cpu::peniko::color::PremulRgba8 {
                    r: px[0],
                    g: px[1],
                    b: px[2],
                    a: px[3],
                }
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                pixels,
                w,
                h,
                may_have_opacities,
            )),
        })
    }

    /// Frame filled with a single straight-alpha color.
    pub fn solid(width: u16, height: u16, rgba: [u8; 4]) -> Self {
        let mut px = rgba;
        premultiply_rgba8_in_place(&mut px);
        let count = usize::from(width) * usize::from(height);
        let opaque = px[3] == 255;
        let pixel = vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        };
        Self {
            width: u32::from(width),
            height: u32::from(height),
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                vec![pixel; count],
                width,
                height,
                !opaque,
            )),
        }
    }

    /// Natural size of the frame.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Pixel bytes in row-major premultiplied RGBA8.
    pub fn rgba8_premul(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Image paint sharing the decoded pixmap.
    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Decode an encoded image (JPEG, PNG, ...) into a [`PreparedFrame`].
pub fn decode_frame(bytes: &[u8]) -> StoryResult<PreparedFrame> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedFrame::from_premul_rgba8(width, height, &rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Undo premultiplication in place, for writers that expect straight alpha.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/story/decode.rs"]
mod tests;

use crate::{
    foundation::{
        error::{StoryError, StoryResult},
        geometry::{Rect, Size},
    },
    story::decode::{PreparedFrame, unpremultiply_rgba8_in_place},
};

/// Readback of a surface's backing store.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Same pixels with straight (non-premultiplied) alpha.
    pub fn into_straight_alpha(mut self) -> Self {
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }
}

/// 2D raster target for frame blits.
///
/// Coordinates passed to [`FrameSurface::draw_frame`] are in CSS pixels; the surface
/// applies its device pixel ratio when rasterizing.
pub trait FrameSurface {
    /// Resize the backing store to `css_size * device_pixel_ratio` and reset the
    /// scale transform.
    fn resize(&mut self, css_size: Size, device_pixel_ratio: f64) -> StoryResult<()>;

    /// Displayed size in CSS pixels.
    fn css_size(&self) -> Size;

    /// Clear to transparent.
    fn clear(&mut self);

    /// Draw `frame` stretched into `dest` (CSS pixels); parts outside the surface are cropped.
    fn draw_frame(&mut self, frame: &PreparedFrame, dest: Rect) -> StoryResult<()>;
}

/// CPU surface backed by a `vello_cpu` pixmap.
pub struct CpuSurface {
    css_size: Size,
    device_pixel_ratio: f64,
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("css_size", &self.css_size)
            .field("device_pixel_ratio", &self.device_pixel_ratio)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Default for CpuSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSurface {
    /// Zero-sized surface; call [`FrameSurface::resize`] before drawing.
    pub fn new() -> Self {
        Self {
            css_size: Size::new(0.0, 0.0),
            device_pixel_ratio: 1.0,
            width: 0,
            height: 0,
            pixmap: vello_cpu::Pixmap::new(0, 0),
        }
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Backing store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    /// Copy out the premultiplied backing pixels.
    pub fn readback_rgba8(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

impl FrameSurface for CpuSurface {
    fn resize(&mut self, css_size: Size, device_pixel_ratio: f64) -> StoryResult<()> {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let to_device = |css: f64, what: &str| -> StoryResult<u16> {
            let px = (css.max(0.0) * dpr).round();
            if !px.is_finite() || px > f64::from(u16::MAX) {
                return Err(StoryError::render(format!("surface {what} exceeds u16")));
            }
            Ok(px as u16)
        };

        let width = to_device(css_size.width, "width")?;
        let height = to_device(css_size.height, "height")?;

        self.width = width;
        self.height = height;
        self.css_size = css_size;
        self.device_pixel_ratio = dpr;
        self.pixmap = vello_cpu::Pixmap::new(width, height);
        Ok(())
    }

    fn css_size(&self) -> Size {
        self.css_size
    }

    fn clear(&mut self) {
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&[0, 0, 0, 0]);
        }
    }

    fn draw_frame(&mut self, frame: &PreparedFrame, dest: Rect) -> StoryResult<()> {
        if self.width == 0 || self.height == 0 || frame.width == 0 || frame.height == 0 {
            return Ok(());
        }

        let paint = frame.paint();

        let fw = f64::from(frame.width);
        let fh = f64::from(frame.height);
        let transform = kurbo::Affine::scale(self.device_pixel_ratio)
            * kurbo::Affine::translate((dest.x0, dest.y0))
            * kurbo::Affine::scale_non_uniform(dest.width() / fw, dest.height() / fh);

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::new(transform.as_coeffs()));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, fw, fh));
        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/story/surface.rs"]
mod tests;

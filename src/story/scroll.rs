use crate::config::StoryConfig;

/// Maps a vertical scroll offset onto a frame index.
///
/// The scrub starts at `start_frame` at offset zero and reaches the last frame once
/// the page has scrolled `span * window_height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollScrub {
    /// Frame shown at scroll offset zero.
    pub start_frame: usize,
    /// Frames in the sequence; the scrub never passes `frame_count - 1`.
    pub frame_count: usize,
    /// Scroll distance covering the scrub, as a fraction of window height.
    pub span: f64,
}

impl ScrollScrub {
    pub fn from_config(cfg: &StoryConfig) -> Self {
        Self {
            start_frame: cfg.start_frame,
            frame_count: cfg.frame_count,
            span: cfg.scroll_span,
        }
    }

    /// Scroll distance covering the whole scrub.
    pub fn max_scroll(&self, window_height: f64) -> f64 {
        self.span * window_height
    }

    /// Frame for `scroll_top`, always within `[start_frame, frame_count)`.
    pub fn frame_for(&self, scroll_top: f64, window_height: f64) -> usize {
        let max_scroll = self.max_scroll(window_height);
        let fraction = if max_scroll.is_finite() && max_scroll > 0.0 && !scroll_top.is_nan() {
            (scroll_top / max_scroll).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let range = self.frame_count.saturating_sub(self.start_frame);
        let index = self.start_frame + (fraction * range as f64).floor() as usize;
        index.min(self.frame_count.saturating_sub(1))
    }
}

/// Coalesces scroll events into at most one redraw per display refresh.
///
/// `on_scroll` only asks for a tick when none is outstanding; the tick then consumes
/// whatever offset was reported last.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameTicker {
    ticking: bool,
    latest: Option<f64>,
}

impl FrameTicker {
    /// Record an offset. Returns `true` when the caller must request an animation frame.
    pub fn on_scroll(&mut self, scroll_top: f64) -> bool {
        self.latest = Some(scroll_top);
        if self.ticking {
            false
        } else {
            self.ticking = true;
            true
        }
    }

    /// Consume the pending offset at the animation-frame callback.
    pub fn on_tick(&mut self) -> Option<f64> {
        self.ticking = false;
        self.latest.take()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }
}

#[cfg(test)]
#[path = "../../tests/unit/story/scroll.rs"]
mod tests;

use std::{
    collections::BTreeMap,
    path::Path,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    time::{Duration, Instant},
};

use crate::{
    config::StoryConfig,
    foundation::{
        error::{StoryError, StoryResult},
        geometry::{Size, cover_fit},
    },
    story::{
        frames::{FrameNaming, FrameOutcome, FrameSet, FrameSetState, LoadEvent},
        loader::{FrameLoader, FrameRequest},
        scroll::{FrameTicker, ScrollScrub},
        surface::FrameSurface,
    },
    view::controller::ProductFocus,
};

/// Layout facts the engine needs from the host window.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Displayed width of the frame surface, CSS pixels.
    pub width: f64,
    /// Displayed height of the frame surface, CSS pixels.
    pub height: f64,
    /// Height of the browser window; drives the scroll span.
    pub window_height: f64,
    /// Device pixels per CSS pixel.
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, window_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            window_height,
            device_pixel_ratio,
        }
    }

    fn surface_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Scroll-scrubbed frame player.
///
/// Frames for every animated product are requested up front through a
/// [`FrameLoader`]; completions arrive on a channel and are applied only when the
/// owner calls [`StoryEngine::pump`], so all state changes happen on the owner's
/// thread. The active product's frames are drawn only once the whole set has loaded.
pub struct StoryEngine<L: FrameLoader, S: FrameSurface> {
    config: StoryConfig,
    naming: FrameNaming,
    scrub: ScrollScrub,
    loader: L,
    surface: S,
    sets: BTreeMap<String, FrameSet>,
    active: String,
    current_frame: usize,
    ready: bool,
    viewport: Viewport,
    ticker: FrameTicker,
    events_tx: Sender<LoadEvent>,
    events_rx: Receiver<LoadEvent>,
    outstanding: usize,
    draws: u64,
}

impl<L: FrameLoader, S: FrameSurface> std::fmt::Debug for StoryEngine<L, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryEngine")
            .field("active", &self.active)
            .field("current_frame", &self.current_frame)
            .field("ready", &self.ready)
            .field("viewport", &self.viewport)
            .field("outstanding", &self.outstanding)
            .finish()
    }
}

impl<L: FrameLoader, S: FrameSurface> StoryEngine<L, S> {
    /// Engine with no frames requested yet. The first configured frame set starts
    /// out active.
    pub fn new(config: StoryConfig, loader: L, surface: S) -> StoryResult<Self> {
        config.validate()?;
        let (events_tx, events_rx) = mpsc::channel();
        Ok(Self {
            naming: FrameNaming::from_config(&config),
            scrub: ScrollScrub::from_config(&config),
            active: config
                .frame_sets
                .first()
                .map(|s| s.product.clone())
                .unwrap_or_default(),
            current_frame: config.start_frame,
            config,
            loader,
            surface,
            sets: BTreeMap::new(),
            ready: false,
            viewport: Viewport::new(0.0, 0.0, 0.0, 1.0),
            ticker: FrameTicker::default(),
            events_tx,
            events_rx,
            outstanding: 0,
            draws: 0,
        })
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    pub fn active_product(&self) -> &str {
        &self.active
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// True when the active product's whole frame set has loaded.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    /// Requests issued but not yet applied.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Number of frames actually blitted so far.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    pub fn state(&self, product: &str) -> FrameSetState {
        self.sets
            .get(product)
            .map_or(FrameSetState::NotStarted, FrameSet::state)
    }

    pub fn frame_set(&self, product: &str) -> Option<&FrameSet> {
        self.sets.get(product)
    }

    /// Request every frame of `product` from `folder`. A product that was already
    /// preloaded is left alone.
    #[tracing::instrument(skip(self))]
    pub fn preload(&mut self, product: &str, folder: &Path) {
        if self.sets.contains_key(product) {
            tracing::debug!(product, "frames already requested");
            return;
        }
        tracing::info!(product, frames = self.config.frame_count, "loading frames");

        self.sets
            .insert(product.to_string(), FrameSet::new(self.config.frame_count));
        for index in 0..self.config.frame_count {
            let request = FrameRequest {
                product: product.to_string(),
                index,
                path: self.naming.path_in(folder, index),
            };
            self.outstanding += 1;
            self.loader.request(request, self.events_tx.clone());
        }
    }

    /// Preload every configured frame set in configuration order.
    pub fn preload_all(&mut self) {
        let sources: Vec<_> = self.config.frame_sets.clone();
        for source in &sources {
            self.preload(&source.product, &source.folder);
        }
    }

    /// Apply one loader completion.
    pub fn on_frame_event(&mut self, event: LoadEvent) -> StoryResult<()> {
        self.outstanding = self.outstanding.saturating_sub(1);

        let Some(set) = self.sets.get_mut(&event.product) else {
            tracing::warn!(product = %event.product, "frame event for a product that was never preloaded");
            return Ok(());
        };

        if let FrameOutcome::Failed(reason) = &event.outcome {
            tracing::warn!(
                product = %event.product,
                frame = event.index,
                %reason,
                "frame failed to load; set will not become ready"
            );
        }

        let changed = set.record(event.index, event.outcome)?;
        if !changed || !set.is_ready(self.config.frame_count) {
            return Ok(());
        }

        tracing::info!(product = %event.product, "frames loaded");
        if self.active == event.product {
            self.ready = true;
            self.draw_frame(self.current_frame)?;
        }
        Ok(())
    }

    /// Apply every completion that has arrived so far without blocking.
    pub fn pump(&mut self) -> StoryResult<usize> {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.on_frame_event(event)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Block until every issued request has completed or `timeout` elapses.
    /// Returns `false` on timeout.
    pub fn pump_until_idle(&mut self, timeout: Duration) -> StoryResult<bool> {
        let deadline = Instant::now() + timeout;
        while self.outstanding > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events_rx.recv_timeout(remaining) {
                Ok(event) => self.on_frame_event(event)?,
                Err(RecvTimeoutError::Timeout) => return Ok(false),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(StoryError::asset("frame event channel closed"));
                }
            }
        }
        Ok(true)
    }

    /// Make `product` the current frame set and redraw if it is fully loaded.
    #[tracing::instrument(skip(self))]
    pub fn set_active_product(&mut self, product: &str) -> StoryResult<()> {
        let known = self.sets.contains_key(product)
            || self.config.frame_sets.iter().any(|s| s.product == product);
        if !known {
            return Err(StoryError::unknown_product(product));
        }

        self.active = product.to_string();
        self.ready = self
            .sets
            .get(product)
            .is_some_and(|set| set.is_ready(self.config.frame_count));
        tracing::debug!(product, ready = self.ready, "active frame set changed");

        if self.ready {
            self.draw_frame(self.current_frame)?;
        }
        Ok(())
    }

    /// Resize the surface to the viewport (times its pixel ratio) and redraw.
    pub fn resize(&mut self, viewport: Viewport) -> StoryResult<()> {
        self.surface
            .resize(viewport.surface_size(), viewport.device_pixel_ratio)?;
        self.viewport = viewport;
        if self.ready {
            self.draw_frame(self.current_frame)?;
        }
        Ok(())
    }

    /// Cover-fit frame `index` of the active product onto the surface.
    ///
    /// Returns `false` without touching the surface when the set is not ready or
    /// `index` is out of range.
    pub fn draw_frame(&mut self, index: usize) -> StoryResult<bool> {
        if !self.ready || index >= self.config.frame_count {
            return Ok(false);
        }
        let Some(frame) = self
            .sets
            .get(&self.active)
            .and_then(|set| set.frame(index))
            .cloned()
        else {
            return Ok(false);
        };
        let Some(dest) = cover_fit(frame.size(), self.surface.css_size()) else {
            tracing::debug!(index, "surface has no area; draw skipped");
            return Ok(false);
        };

        self.surface.clear();
        self.surface.draw_frame(&frame, dest)?;
        self.draws += 1;
        Ok(true)
    }

    /// Record a scroll offset. Returns `true` when the host must schedule an
    /// animation frame (at most one is outstanding at a time).
    pub fn on_scroll(&mut self, scroll_top: f64) -> bool {
        self.ticker.on_scroll(scroll_top)
    }

    /// Animation-frame callback: map the latest scroll offset to a frame and redraw if
    /// it changed. Returns the new frame index when it changed.
    pub fn on_animation_frame(&mut self) -> StoryResult<Option<usize>> {
        let Some(scroll_top) = self.ticker.on_tick() else {
            return Ok(None);
        };
        let index = self
            .scrub
            .frame_for(scroll_top, self.viewport.window_height);
        if index == self.current_frame {
            return Ok(None);
        }
        self.current_frame = index;
        self.draw_frame(index)?;
        Ok(Some(index))
    }
}

impl<L: FrameLoader, S: FrameSurface> ProductFocus for StoryEngine<L, S> {
    fn focus_product(&mut self, key: &str) -> StoryResult<()> {
        self.set_active_product(key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/story/engine.rs"]
mod tests;

use crate::{
    config::PageConfig,
    foundation::error::StoryResult,
    story::{
        engine::{StoryEngine, Viewport},
        loader::FrameLoader,
        surface::FrameSurface,
    },
    view::{
        controller::{CheckoutOutcome, OverlayTarget, ViewController},
        presenter::Presenter,
    },
};

/// Host-side input, one variant per listener the page binds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PageEvent {
    PillClicked { key: String },
    NextClicked,
    PrevClicked,
    /// Add button on a product card, with the card's title and price text.
    AddToCart { title: String, price: String },
    /// Purchase button on the detail panel.
    AddDisplayed,
    RemoveFromCart { index: usize },
    Checkout,
    ToggleCart,
    OverlayClicked { target: OverlayTarget },
    Scroll { top: f64 },
    AnimationFrame,
    Resize { viewport: Viewport },
    /// Apply frame-load completions that arrived since the last pump.
    Pump,
}

/// What the host should do after an event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Schedule an [`PageEvent::AnimationFrame`] for the next display refresh.
    pub request_animation_frame: bool,
    pub checkout: Option<CheckoutOutcome>,
}

/// The whole landing page: view controller plus frame engine, wired explicitly.
#[derive(Debug)]
pub struct LandingPage<P: Presenter, L: FrameLoader, S: FrameSurface> {
    controller: ViewController<P>,
    engine: StoryEngine<L, S>,
}

impl<P: Presenter, L: FrameLoader, S: FrameSurface> LandingPage<P, L, S> {
    /// Validate `config`, size the surface, start every preload, then show the first
    /// product and the empty cart.
    pub fn new(
        config: &PageConfig,
        presenter: P,
        loader: L,
        surface: S,
        viewport: Viewport,
    ) -> StoryResult<Self> {
        config.validate()?;
        let mut engine = StoryEngine::new(config.story.clone(), loader, surface)?;
        engine.resize(viewport)?;
        engine.preload_all();

        let mut controller = ViewController::new(config, presenter);
        let first = config
            .catalog
            .at(0)
            .map(|p| p.key.clone())
            .unwrap_or_default();
        controller.select_product(&first, &mut engine)?;
        controller.render_cart();

        tracing::debug!(first = %first, "landing page initialized");
        Ok(Self { controller, engine })
    }

    pub fn controller(&self) -> &ViewController<P> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewController<P> {
        &mut self.controller
    }

    pub fn engine(&self) -> &StoryEngine<L, S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut StoryEngine<L, S> {
        &mut self.engine
    }

    pub fn presenter(&self) -> &P {
        self.controller.presenter()
    }

    pub fn into_parts(self) -> (ViewController<P>, StoryEngine<L, S>) {
        (self.controller, self.engine)
    }

    pub fn select_product(&mut self, key: &str) -> StoryResult<()> {
        self.controller.select_product(key, &mut self.engine)
    }

    pub fn next(&mut self) -> StoryResult<()> {
        self.controller.next(&mut self.engine)
    }

    pub fn prev(&mut self) -> StoryResult<()> {
        self.controller.prev(&mut self.engine)
    }

    /// Route one host event to the controller or the engine.
    pub fn dispatch(&mut self, event: PageEvent) -> StoryResult<Dispatch> {
        let mut out = Dispatch::default();
        match event {
            PageEvent::PillClicked { key } => self.select_product(&key)?,
            PageEvent::NextClicked => self.next()?,
            PageEvent::PrevClicked => self.prev()?,
            PageEvent::AddToCart { title, price } => {
                self.controller.add_to_cart(&title, &price)?
            }
            PageEvent::AddDisplayed => self.controller.add_displayed_product()?,
            PageEvent::RemoveFromCart { index } => {
                self.controller.remove_from_cart(index);
            }
            PageEvent::Checkout => out.checkout = Some(self.controller.checkout()),
            PageEvent::ToggleCart => {
                self.controller.toggle_cart_visibility();
            }
            PageEvent::OverlayClicked { target } => self.controller.on_overlay_click(target),
            PageEvent::Scroll { top } => {
                out.request_animation_frame = self.engine.on_scroll(top);
            }
            PageEvent::AnimationFrame => {
                self.engine.on_animation_frame()?;
            }
            PageEvent::Resize { viewport } => self.engine.resize(viewport)?,
            PageEvent::Pump => {
                self.engine.pump()?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../tests/unit/page/page.rs"]
mod tests;

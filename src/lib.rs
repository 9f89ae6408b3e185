//! Storyfront is a headless engine for a small product landing page.
//!
//! Two cooperating parts:
//!
//! 1. **View controller** ([`ViewController`]): owns the product catalog, the
//!    selected product and an in-memory cart, and pushes view models to a
//!    [`Presenter`] after every change.
//! 2. **Story engine** ([`StoryEngine`]): preloads numbered still frames per product
//!    through a [`FrameLoader`] and cover-fits the frame picked by the scroll offset
//!    onto a [`FrameSurface`], imitating a scrubbed video.
//!
//! [`LandingPage`] wires the two together; the controller tells the engine which
//! frame set is active through [`ProductFocus`] and nothing else is shared.
//!
//! All mutation happens on the caller's thread. Frame decoding runs on a rayon pool
//! inside [`FsFrameLoader`], but completions are only applied when the owner calls
//! [`StoryEngine::pump`].
#![forbid(unsafe_code)]

mod cart;
mod catalog;
mod config;
mod foundation;
mod page;
mod story;
mod view;

pub use cart::model::{Cart, CartItem};
pub use cart::price::{format_price, parse_price};
pub use catalog::builtin::{builtin_catalog, builtin_products};
pub use catalog::model::{Product, ProductCatalog};
pub use config::{FrameSetSource, NoticeConfig, PageConfig, StoryConfig};
pub use foundation::error::{StoryError, StoryResult};
pub use foundation::geometry::{Rect, Rgb8, Size, cover_fit};
pub use page::{Dispatch, LandingPage, PageEvent};
pub use story::decode::{PreparedFrame, decode_frame};
pub use story::engine::{StoryEngine, Viewport};
pub use story::frames::{
    FrameNaming, FrameOutcome, FrameSet, FrameSetState, FrameSlot, LoadEvent,
};
pub use story::loader::{FrameLoader, FrameRequest, FsFrameLoader, ManualLoader};
pub use story::scroll::{FrameTicker, ScrollScrub};
pub use story::surface::{CpuSurface, FrameRGBA, FrameSurface};
pub use view::controller::{CheckoutOutcome, NoFocus, OverlayTarget, ProductFocus, ViewController};
pub use view::markup::{MarkupPresenter, escape_html};
pub use view::model::{
    AnimationCue, ArrowStyle, CartRow, CartView, DetailView, ENTER_ANIMATION, HeroView, Notice,
    PillView, ProductView, VisualRegion,
};
pub use view::presenter::{Presenter, RecordingPresenter};

use super::*;
use crate::{
    foundation::geometry::Rect,
    story::{decode::PreparedFrame, loader::ManualLoader},
};

#[derive(Debug, Default)]
struct RecordingSurface {
    size: Option<Size>,
    dpr: f64,
    clears: usize,
    draws: Vec<(u32, u32, Rect)>,
}

impl FrameSurface for RecordingSurface {
    fn resize(&mut self, css_size: Size, device_pixel_ratio: f64) -> StoryResult<()> {
        self.size = Some(css_size);
        self.dpr = device_pixel_ratio;
        Ok(())
    }

    fn css_size(&self) -> Size {
        self.size.unwrap_or(Size::new(0.0, 0.0))
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw_frame(&mut self, frame: &PreparedFrame, dest: Rect) -> StoryResult<()> {
        self.draws.push((frame.width, frame.height, dest));
        Ok(())
    }
}

type TestEngine = StoryEngine<ManualLoader, RecordingSurface>;

fn engine() -> TestEngine {
    let mut e = StoryEngine::new(
        StoryConfig::default(),
        ManualLoader::default(),
        RecordingSurface::default(),
    )
    .unwrap();
    e.resize(Viewport::new(400.0, 300.0, 1000.0, 1.0)).unwrap();
    e
}

/// Frame `index` is `index+1` pixels wide so draws can be traced back to slots.
fn loaded(product: &str, index: usize) -> LoadEvent {
    LoadEvent {
        product: product.to_string(),
        index,
        outcome: FrameOutcome::Loaded(PreparedFrame::solid(
            (index + 1) as u16 * 2,
            (index + 1) as u16,
            [9, 9, 9, 255],
        )),
    }
}

fn load_all(e: &mut TestEngine, product: &str, skip: Option<usize>) {
    for i in 0..192 {
        if Some(i) == skip {
            continue;
        }
        e.on_frame_event(loaded(product, i)).unwrap();
    }
}

#[test]
fn preload_requests_every_numbered_frame_once() {
    let mut e = engine();
    e.preload("saffron", Path::new("moon2222"));
    e.preload("saffron", Path::new("moon2222"));

    let reqs = &e.loader().requests;
    assert_eq!(reqs.len(), 192);
    assert_eq!(reqs[0].path, Path::new("moon2222").join("frame-001.jpg"));
    assert_eq!(reqs[191].path, Path::new("moon2222").join("frame-192.jpg"));
    assert_eq!(e.outstanding(), 192);
    assert_eq!(
        e.state("saffron"),
        FrameSetState::Loading {
            loaded: 0,
            total: 192
        }
    );
    assert_eq!(e.state("honey"), FrameSetState::NotStarted);
}

#[test]
fn preload_all_follows_configured_order() {
    let mut e = engine();
    e.preload_all();
    let reqs = &e.loader().requests;
    assert_eq!(reqs.len(), 3 * 192);
    assert_eq!(reqs[0].product, "honey");
    assert_eq!(reqs[192].product, "saffron");
    assert_eq!(reqs[384].product, "shilajit");
}

#[test]
fn active_set_draws_only_once_complete() {
    let mut e = engine();
    e.preload("saffron", Path::new("moon2222"));
    e.set_active_product("saffron").unwrap();

    load_all(&mut e, "saffron", Some(191));
    assert!(!e.is_ready());
    assert!(e.surface().draws.is_empty());
    assert!(!e.draw_frame(50).unwrap());

    e.on_frame_event(loaded("saffron", 191)).unwrap();
    assert!(e.is_ready());
    assert_eq!(e.state("saffron"), FrameSetState::Ready);
    // Becoming ready draws the current (start) frame immediately.
    let (w, h, _) = e.surface().draws.last().copied().unwrap();
    assert_eq!((w, h), (102, 51));
    assert_eq!(e.outstanding(), 0);
}

// A frame that never reports back keeps the set pending forever; there is no
// timeout or retry.
#[test]
fn a_single_pending_frame_blocks_readiness_indefinitely() {
    let mut e = engine();
    e.preload("honey", Path::new("h"));
    e.set_active_product("honey").unwrap();
    load_all(&mut e, "honey", Some(0));
    assert!(!e.is_ready());
    assert_eq!(e.outstanding(), 1);
    assert_eq!(e.pump().unwrap(), 0);
    assert!(!e.pump_until_idle(Duration::from_millis(10)).unwrap());
    assert!(!e.is_ready());
}

#[test]
fn failed_frame_is_recorded_and_blocks_readiness() {
    let mut e = engine();
    e.preload("honey", Path::new("h"));
    e.set_active_product("honey").unwrap();
    load_all(&mut e, "honey", Some(7));
    e.on_frame_event(LoadEvent {
        product: "honey".to_string(),
        index: 7,
        outcome: FrameOutcome::Failed("missing".into()),
    })
    .unwrap();
    assert!(!e.is_ready());
    assert_eq!(
        e.state("honey"),
        FrameSetState::Failed {
            loaded: 191,
            failed: 1,
            total: 192
        }
    );
    assert!(e.surface().draws.is_empty());
}

#[test]
fn background_set_completion_does_not_draw_until_selected() {
    let mut e = engine();
    e.preload("saffron", Path::new("s"));
    e.preload("honey", Path::new("h"));
    e.set_active_product("saffron").unwrap();

    load_all(&mut e, "honey", None);
    assert!(!e.is_ready());
    assert!(e.surface().draws.is_empty());

    e.set_active_product("honey").unwrap();
    assert!(e.is_ready());
    assert_eq!(e.surface().draws.len(), 1);

    e.set_active_product("saffron").unwrap();
    assert!(!e.is_ready());
}

#[test]
fn unknown_product_cannot_become_active() {
    let mut e = engine();
    let err = e.set_active_product("mango").unwrap_err();
    assert!(matches!(err, StoryError::UnknownProduct(_)));
    // Configured but not yet preloaded is allowed, just not ready.
    e.set_active_product("shilajit").unwrap();
    assert!(!e.is_ready());
}

#[test]
fn draw_uses_cover_fit_in_css_pixels() {
    let mut e = engine();
    e.preload("saffron", Path::new("s"));
    e.set_active_product("saffron").unwrap();
    for i in 0..192 {
        e.on_frame_event(LoadEvent {
            product: "saffron".to_string(),
            index: i,
            outcome: FrameOutcome::Loaded(PreparedFrame::solid(800, 400, [1, 1, 1, 255])),
        })
        .unwrap();
    }
    let (_, _, dest) = e.surface().draws.last().copied().unwrap();
    assert_eq!(dest.height(), 300.0);
    assert_eq!(dest.width(), 600.0);
    assert_eq!(dest.x0, -100.0);
    assert_eq!(dest.y0, 0.0);
}

#[test]
fn draw_frame_rejects_out_of_range_indices() {
    let mut e = engine();
    e.preload("saffron", Path::new("s"));
    e.set_active_product("saffron").unwrap();
    load_all(&mut e, "saffron", None);
    let before = e.draw_count();
    assert!(!e.draw_frame(192).unwrap());
    assert!(e.draw_frame(0).unwrap());
    assert!(e.draw_frame(191).unwrap());
    assert_eq!(e.draw_count(), before + 2);
}

#[test]
fn scroll_ticks_redraw_only_on_frame_change() {
    let mut e = engine();
    e.preload("saffron", Path::new("s"));
    e.set_active_product("saffron").unwrap();
    load_all(&mut e, "saffron", None);
    let base = e.draw_count();

    assert!(e.on_scroll(40.0));
    assert!(!e.on_scroll(100.0));
    assert_eq!(e.on_animation_frame().unwrap(), Some(121));
    assert_eq!(e.current_frame(), 121);
    assert_eq!(e.draw_count(), base + 1);
    let (w, _, _) = e.surface().draws.last().copied().unwrap();
    assert_eq!(w, 122 * 2);

    // Same offset again: no redraw.
    assert!(e.on_scroll(100.0));
    assert_eq!(e.on_animation_frame().unwrap(), None);
    assert_eq!(e.draw_count(), base + 1);

    // No scroll since the last tick: nothing to do.
    assert_eq!(e.on_animation_frame().unwrap(), None);

    e.on_scroll(10_000.0);
    assert_eq!(e.on_animation_frame().unwrap(), Some(191));
}

#[test]
fn scroll_before_ready_tracks_frame_without_drawing() {
    let mut e = engine();
    e.preload("saffron", Path::new("s"));
    e.set_active_product("saffron").unwrap();
    e.on_scroll(200.0);
    assert_eq!(e.on_animation_frame().unwrap(), Some(191));
    assert!(e.surface().draws.is_empty());

    load_all(&mut e, "saffron", None);
    let (w, _, _) = e.surface().draws.last().copied().unwrap();
    assert_eq!(w, 192 * 2);
}

#[test]
fn resize_updates_surface_and_redraws_when_ready() {
    let mut e = engine();
    assert_eq!(e.surface().dpr, 1.0);
    e.preload("saffron", Path::new("s"));
    e.set_active_product("saffron").unwrap();
    load_all(&mut e, "saffron", None);
    let draws = e.surface().draws.len();

    e.resize(Viewport::new(200.0, 100.0, 800.0, 2.0)).unwrap();
    assert_eq!(e.surface().size, Some(Size::new(200.0, 100.0)));
    assert_eq!(e.surface().dpr, 2.0);
    assert_eq!(e.viewport().window_height, 800.0);
    assert_eq!(e.surface().draws.len(), draws + 1);
}

#[test]
fn events_for_unknown_products_are_ignored() {
    let mut e = engine();
    e.on_frame_event(loaded("mango", 0)).unwrap();
    assert_eq!(e.state("mango"), FrameSetState::NotStarted);
}

#[test]
fn pump_applies_channel_events() {
    let mut e = engine();
    e.preload("saffron", Path::new("s"));
    e.set_active_product("saffron").unwrap();
    let tx = e.events_tx.clone();
    for i in 0..192 {
        tx.send(loaded("saffron", i)).unwrap();
    }
    assert_eq!(e.pump().unwrap(), 192);
    assert!(e.is_ready());
    assert!(e.pump_until_idle(Duration::from_millis(1)).unwrap());
}

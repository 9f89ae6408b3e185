use super::*;

fn frame() -> PreparedFrame {
    PreparedFrame::solid(2, 1, [1, 2, 3, 255])
}

#[test]
fn naming_is_one_based_and_zero_padded() {
    let naming = FrameNaming::from_config(&StoryConfig::default());
    assert_eq!(naming.file_name(0), "frame-001.jpg");
    assert_eq!(naming.file_name(191), "frame-192.jpg");
    assert_eq!(
        naming.path_in(Path::new("moon2222"), 9),
        Path::new("moon2222").join("frame-010.jpg")
    );

    let wide = FrameNaming {
        prefix: "ezgif-frame-".to_string(),
        extension: "png".to_string(),
        digits: 4,
    };
    assert_eq!(wide.file_name(41), "ezgif-frame-0042.png");
}

#[test]
fn ready_only_after_every_frame_loads() {
    let mut set = FrameSet::new(192);
    assert_eq!(
        set.state(),
        FrameSetState::Loading {
            loaded: 0,
            total: 192
        }
    );

    for i in 0..191 {
        assert!(set.record(i, FrameOutcome::Loaded(frame())).unwrap());
    }
    assert!(!set.is_ready(192));
    assert_eq!(set.loaded_count(), 191);

    set.record(191, FrameOutcome::Loaded(frame())).unwrap();
    assert!(set.is_ready(192));
    assert_eq!(set.state(), FrameSetState::Ready);
}

#[test]
fn readiness_requires_expected_length() {
    let mut set = FrameSet::new(2);
    set.record(0, FrameOutcome::Loaded(frame())).unwrap();
    set.record(1, FrameOutcome::Loaded(frame())).unwrap();
    assert!(set.is_ready(2));
    assert!(!set.is_ready(3));
}

#[test]
fn duplicate_completions_do_not_double_count() {
    let mut set = FrameSet::new(2);
    assert!(set.record(0, FrameOutcome::Loaded(frame())).unwrap());
    assert!(!set.record(0, FrameOutcome::Loaded(frame())).unwrap());
    assert!(!set.record(0, FrameOutcome::Failed("late".into())).unwrap());
    assert_eq!(set.loaded_count(), 1);
    assert!(set.record(5, FrameOutcome::Loaded(frame())).is_err());
}

#[test]
fn one_failed_frame_blocks_readiness_for_good() {
    let mut set = FrameSet::new(3);
    set.record(0, FrameOutcome::Loaded(frame())).unwrap();
    set.record(1, FrameOutcome::Failed("404".into())).unwrap();
    set.record(2, FrameOutcome::Loaded(frame())).unwrap();
    assert!(!set.is_ready(3));
    assert_eq!(
        set.state(),
        FrameSetState::Failed {
            loaded: 2,
            failed: 1,
            total: 3
        }
    );
    assert!(set.frame(1).is_none());
    assert!(matches!(set.slot(1), Some(FrameSlot::Failed(r)) if r == "404"));
}

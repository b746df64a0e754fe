use super::*;

#[test]
fn every_curve_is_clamped_and_anchored() {
    for ease in [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
    ] {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
        assert_eq!(ease.apply(-1.0), 0.0);
        assert_eq!(ease.apply(2.0), 1.0);
    }
}

#[test]
fn out_cubic_front_loads_progress() {
    assert!(Ease::OutCubic.apply(0.25) > 0.25);
    assert!(Ease::InCubic.apply(0.25) < 0.25);
}

#[test]
fn in_out_is_symmetric_around_the_midpoint() {
    let e = Ease::InOutCubic;
    assert!((e.apply(0.5) - 0.5).abs() < 1e-9);
    assert!((e.apply(0.3) + e.apply(0.7) - 1.0).abs() < 1e-9);
}

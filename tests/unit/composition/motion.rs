use super::*;

const ALL: [Ease; 6] = [
    Ease::Linear,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::OutBack,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
        assert_eq!(ease.apply(7.0), 1.0, "{ease:?}");
    }
}

#[test]
fn out_back_overshoots_before_settling() {
    let peak = (1..100)
        .map(|i| Ease::OutBack.apply(f64::from(i) / 100.0))
        .fold(0.0_f64, f64::max);
    assert!(peak > 1.0);
}

#[test]
fn motion_settles_at_end() {
    let m = Motion::slide(Vec2::new(0.0, 60.0), 2.0, Ease::OutCubic).delayed(0.5);
    assert_eq!(m.end_secs(), 2.5);

    let (offset, opacity) = m.sample(0.0);
    assert_eq!(offset, Vec2::new(0.0, 60.0));
    assert_eq!(opacity, 1.0);

    let (offset, _) = m.sample(2.5);
    assert_eq!(offset, Vec2::ZERO);
    let (offset, _) = m.sample(10.0);
    assert_eq!(offset, Vec2::ZERO);
}

#[test]
fn fade_interpolates_opacity() {
    let m = Motion::fade(0.0, 4.0);
    assert_eq!(m.sample(0.0).1, 0.0);
    assert!((m.sample(2.0).1 - 0.5).abs() < 1e-12);
    assert_eq!(m.sample(4.0).1, 1.0);
}

#[test]
fn zero_duration_jumps_at_start() {
    let m = Motion::fade(0.0, 0.0).delayed(1.0);
    assert_eq!(m.progress(0.5), 0.0);
    assert_eq!(m.progress(1.0), 1.0);
}

#[test]
fn validate_rejects_negative_timing() {
    assert!(Motion::fade(0.0, -1.0).validate().is_err());
    assert!(Motion::fade(0.0, 1.0).delayed(f64::NAN).validate().is_err());
    assert!(Motion::fade(0.2, 1.0).validate().is_ok());
}

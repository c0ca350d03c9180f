use super::*;

#[test]
fn progress_rejects_out_of_range_requests() {
    assert!(Progress::new(0.0).is_ok());
    assert!(Progress::new(1.0).is_ok());
    assert!(Progress::new(-0.01).is_err());
    assert!(Progress::new(1.5).is_err());
    assert!(Progress::new(f64::NAN).is_err());
}

#[test]
fn progress_clamps_internal_values() {
    assert_eq!(Progress::clamped(-3.0), Progress::ZERO);
    assert_eq!(Progress::clamped(1.0000001), Progress::FULL);
    assert_eq!(Progress::clamped(f64::NAN), Progress::ZERO);
    assert!(Progress::clamped(1.0).is_full());
}

#[test]
fn contrasting_picks_readable_outline() {
    assert_eq!(Rgba8::rgb(255, 255, 0).contrasting(), Rgba8::BLACK);
    assert_eq!(Rgba8::rgb(0, 0, 128).contrasting(), Rgba8::WHITE);
}

#[test]
fn premul_scales_channels_by_alpha() {
    assert_eq!(Rgba8::rgba(255, 128, 0, 128).to_premul_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::TRANSPARENT.to_premul_array(), [0, 0, 0, 0]);
}

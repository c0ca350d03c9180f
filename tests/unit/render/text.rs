use super::*;

fn fixture_font() -> Arc<Vec<u8>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/fonts/DejaVuSans-Bold.ttf");
    Arc::new(std::fs::read(path).unwrap())
}

#[test]
fn registers_family_from_font_bytes() {
    let engine = TextLayoutEngine::new(fixture_font()).unwrap();
    assert!(engine.family_name.contains("DejaVu"));
}

#[test]
fn rejects_bytes_that_are_not_a_font() {
    let err = TextLayoutEngine::new(Arc::new(vec![0u8; 64]));
    assert!(matches!(err, Err(ChartError::Validation(_))));
}

#[test]
fn single_line_layout_grows_with_text_and_size() {
    let mut engine = TextLayoutEngine::new(fixture_font()).unwrap();
    let brush = TextBrushRgba8::from(Rgba8::WHITE);

    let short = engine.layout_line("Fun", 14.0, brush).unwrap();
    let long = engine.layout_line("Food — 1234.56", 14.0, brush).unwrap();
    let big = engine.layout_line("Fun", 28.0, brush).unwrap();

    assert_eq!(short.lines().count(), 1);
    assert_eq!(long.lines().count(), 1);
    assert!(short.width() > 0.0);
    assert!(long.width() > short.width());
    assert!(big.height() > short.height());
}

#[test]
fn rejects_non_positive_text_size() {
    let mut engine = TextLayoutEngine::new(fixture_font()).unwrap();
    let brush = TextBrushRgba8::default();
    assert!(engine.layout_line("x", 0.0, brush).is_err());
    assert!(engine.layout_line("x", f32::NAN, brush).is_err());
}

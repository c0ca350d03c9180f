use super::*;
use crate::data::color::{ColorDef, PLACEHOLDER_COLOR};
use crate::data::dataset::ChartDataset;
use crate::data::record::AggregateRecord;
use crate::foundation::core::Progress;
use crate::layout::frame::compose_frame;
use crate::layout::label::PercentLabels;

fn food_fun() -> ChartDataset {
    ChartDataset::from_records([
        AggregateRecord::new("Food", "#FF0000", 300),
        AggregateRecord::new("Fun", "#00FF00", 700),
    ])
}

fn render(ds: &ChartDataset, p: f64, style: ChartStyle) -> FrameRGBA {
    let mut backend = CpuChartBackend::new(style).unwrap();
    let frame = compose_frame(ds, &PercentLabels::new(ds), Progress::clamped(p));
    backend.render_frame(&frame).unwrap()
}

/// Pixel at clock angle `deg` (clockwise from 12 o'clock) and normalized radius `r`.
fn sample_polar(f: &FrameRGBA, deg: f64, r: f64) -> [u8; 4] {
    let g = ChartGeometry::for_size(f.width);
    let theta = (90.0 - deg).to_radians();
    let p = g.to_pixels(r * theta.cos(), r * theta.sin());
    f.pixel(p.x as u32, p.y as u32).unwrap()
}

fn assert_px_near(got: [u8; 4], want: [u8; 4]) {
    for (g, w) in got.iter().zip(want) {
        assert!(g.abs_diff(w) <= 2, "got {got:?}, want {want:?}");
    }
}

#[test]
fn full_frame_paints_wedges_by_share() {
    let f = render(&food_fun(), 1.0, ChartStyle::default());
    assert_eq!((f.width, f.height), (400, 400));
    assert!(f.premultiplied);
    assert_px_near(sample_polar(&f, 54.0, 0.5), [255, 0, 0, 255]);
    assert_px_near(sample_polar(&f, 234.0, 0.5), [0, 255, 0, 255]);
    // Corner is outside the circle and the legend band.
    assert_eq!(f.pixel(2, 2), Some([0, 0, 0, 0]));
}

#[test]
fn half_frame_leaves_unrevealed_sector_transparent() {
    let f = render(&food_fun(), 0.5, ChartStyle::default());
    // Food 0..54deg, Fun 54..180deg, remainder 180..360deg.
    assert_px_near(sample_polar(&f, 27.0, 0.5), [255, 0, 0, 255]);
    assert_px_near(sample_polar(&f, 120.0, 0.5), [0, 255, 0, 255]);
    assert_eq!(sample_polar(&f, 270.0, 0.5), [0, 0, 0, 0]);
}

#[test]
fn zero_progress_frame_is_blank() {
    let f = render(&food_fun(), 0.0, ChartStyle::default());
    assert_eq!(sample_polar(&f, 90.0, 0.5), [0, 0, 0, 0]);
    assert_eq!(sample_polar(&f, 270.0, 0.5), [0, 0, 0, 0]);
}

#[test]
fn empty_dataset_draws_neutral_disc_without_legend() {
    let f = render(&ChartDataset::empty(), 0.3, ChartStyle::default());
    let c = PLACEHOLDER_COLOR;
    for deg in [10.0, 100.0, 200.0, 300.0] {
        assert_px_near(sample_polar(&f, deg, 0.6), [c.r, c.g, c.b, 255]);
    }
    let g = ChartGeometry::for_size(f.width);
    let slot = legend_slot(&g, 13.0, 1, 0);
    assert_eq!(
        f.pixel((slot.x + slot.swatch * 0.5) as u32, slot.y as u32),
        Some([0, 0, 0, 0])
    );
}

#[test]
fn legend_swatches_follow_dataset_order() {
    let style = ChartStyle::default();
    let f = render(&food_fun(), 1.0, style.clone());
    let g = ChartGeometry::for_size(f.width);
    for (i, want) in [[255, 0, 0, 255], [0, 255, 0, 255]].into_iter().enumerate() {
        let slot = legend_slot(&g, f64::from(style.legend_size_px), 2, i);
        let px = f
            .pixel((slot.x + slot.swatch * 0.5) as u32, slot.y as u32)
            .unwrap();
        assert_px_near(px, want);
    }
}

#[test]
fn legend_wraps_into_columns_when_band_is_full() {
    let g = ChartGeometry::for_size(200);
    let first = legend_slot(&g, 13.0, 40, 0);
    let last = legend_slot(&g, 13.0, 40, 39);
    assert!(last.x > first.x);
    assert!(last.y <= g.legend_bottom);
}

#[test]
fn background_fills_the_square() {
    let style = ChartStyle {
        size_px: 64,
        background: Some(ColorDef(Rgba8::rgb(10, 20, 30))),
        ..ChartStyle::default()
    };
    let f = render(&food_fun(), 1.0, style);
    assert_eq!((f.width, f.height), (64, 64));
    assert_px_near(f.pixel(0, 0).unwrap(), [10, 20, 30, 255]);
}

#[test]
fn wedge_path_for_full_sweep_is_a_closed_disc() {
    let g = ChartGeometry::for_size(100);
    let w = WedgeGeometry {
        start_angle_deg: 0.0,
        end_angle_deg: 360.0,
        color: PLACEHOLDER_COLOR,
        kind: crate::layout::sector::WedgeKind::Placeholder,
    };
    let bbox = wedge_path(&g, &w).bounding_box();
    assert!((bbox.width() - 2.0 * g.radius).abs() < 0.5);
    assert!((bbox.height() - 2.0 * g.radius).abs() < 0.5);
}

fn fixture_font() -> std::sync::Arc<Vec<u8>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/fonts/DejaVuSans-Bold.ttf");
    std::sync::Arc::new(std::fs::read(path).unwrap())
}

fn text_style() -> ChartStyle {
    ChartStyle {
        font_bytes: Some(fixture_font()),
        label_size_px: 32.0,
        legend_size_px: 20.0,
        outline_px: 4.0,
        ..ChartStyle::default()
    }
}

/// Pixels of the `half_w` x `half_h` box around `center`.
fn pixels_around(f: &FrameRGBA, center: Point, half_w: f64, half_h: f64) -> Vec<[u8; 4]> {
    let mut out = Vec::new();
    let (x0, x1) = ((center.x - half_w) as u32, (center.x + half_w) as u32);
    let (y0, y1) = ((center.y - half_h) as u32, (center.y + half_h) as u32);
    for y in y0..=y1 {
        for x in x0..=x1 {
            if let Some(px) = f.pixel(x, y) {
                out.push(px);
            }
        }
    }
    out
}

fn near(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

#[test]
fn labels_are_filled_and_outlined_over_the_wedge() {
    let ds = food_fun();
    let style = text_style();
    let frame = compose_frame(&ds, &PercentLabels::new(&ds), Progress::FULL);
    let food = &frame.labels[0];
    assert_eq!(food.text, "Food");

    let mut backend = CpuChartBackend::new(style.clone()).unwrap();
    let with_text = backend.render_frame(&frame).unwrap();
    let plain = render(&ds, 1.0, ChartStyle::default());

    let g = ChartGeometry::for_size(with_text.width);
    let (nx, ny) = food.name_pos();
    let at = g.to_pixels(nx, ny);
    let text_px = pixels_around(&with_text, at, 40.0, 16.0);
    let plain_px = pixels_around(&plain, at, 40.0, 16.0);

    assert_ne!(text_px, plain_px);
    // White fill gets the contrasting black outline.
    assert_eq!(style.outline_for(style.label_color.0), Rgba8::BLACK);
    assert!(text_px.iter().any(|&px| near(px, [255, 255, 255, 255])));
    assert!(text_px.iter().any(|&px| near(px, [0, 0, 0, 255])));

    let (px, py) = food.percent_pos();
    let pct_px = pixels_around(&with_text, g.to_pixels(px, py), 40.0, 16.0);
    assert!(pct_px.iter().any(|&px| near(px, [255, 255, 255, 255])));
}

#[test]
fn explicit_outline_color_overrides_contrast() {
    let ds = food_fun();
    let blue = Rgba8::rgb(0, 0, 255);
    let style = ChartStyle {
        outline_color: Some(ColorDef(blue)),
        ..text_style()
    };
    let frame = compose_frame(&ds, &PercentLabels::new(&ds), Progress::FULL);
    let f = CpuChartBackend::new(style).unwrap().render_frame(&frame).unwrap();

    let g = ChartGeometry::for_size(f.width);
    let (nx, ny) = frame.labels[0].name_pos();
    let text_px = pixels_around(&f, g.to_pixels(nx, ny), 40.0, 16.0);
    assert!(text_px.iter().any(|&px| near(px, [0, 0, 255, 255])));
    assert!(!text_px.iter().any(|&px| near(px, [0, 0, 0, 255])));
}

#[test]
fn legend_rows_draw_text_beside_the_swatch() {
    let ds = food_fun();
    let style = text_style();
    let f = render(&ds, 1.0, style.clone());
    let g = ChartGeometry::for_size(f.width);
    let slot = legend_slot(&g, f64::from(style.legend_size_px), 2, 0);

    // Black legend text right of the swatch; without a font the row stays empty.
    let text_at = Point::new(slot.x + slot.swatch + LEGEND_SWATCH_GAP_PX + 40.0, slot.y);
    let row = pixels_around(&f, text_at, 36.0, 6.0);
    assert!(row.iter().any(|&px| near(px, [0, 0, 0, 255])));

    let bare = render(&ds, 1.0, ChartStyle::default());
    let bare_slot = legend_slot(&g, f64::from(ChartStyle::default().legend_size_px), 2, 0);
    let bare_at = Point::new(
        bare_slot.x + bare_slot.swatch + LEGEND_SWATCH_GAP_PX + 40.0,
        bare_slot.y,
    );
    assert!(pixels_around(&bare, bare_at, 36.0, 6.0).iter().all(|px| px[3] == 0));
}

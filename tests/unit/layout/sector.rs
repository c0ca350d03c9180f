use super::*;
use crate::data::record::AggregateRecord;

fn food_fun() -> ChartDataset {
    ChartDataset::from_records([
        AggregateRecord::new("Food", "#FF0000", 300),
        AggregateRecord::new("Fun", "#00FF00", 700),
    ])
}

fn real_sweep_sum(wedges: &[WedgeGeometry]) -> f64 {
    wedges
        .iter()
        .filter(|w| w.kind != WedgeKind::Remainder)
        .map(WedgeGeometry::sweep_deg)
        .sum()
}

#[test]
fn full_progress_splits_circle_by_share() {
    let wedges = layout_sectors(&food_fun(), Progress::FULL);
    assert_eq!(wedges.len(), 3);
    assert!((wedges[0].sweep_deg() - 108.0).abs() < 1e-9);
    assert!((wedges[1].sweep_deg() - 252.0).abs() < 1e-9);
    assert_eq!(wedges[2].kind, WedgeKind::Remainder);
    assert_eq!(wedges[2].sweep_deg(), 0.0);
    assert!(!wedges[2].is_visible());
    assert!((real_sweep_sum(&wedges) - 360.0).abs() < 1e-9);
}

#[test]
fn full_progress_sums_to_circle_for_uneven_shares() {
    let ds = ChartDataset::from_records(
        (1..=17).map(|i| AggregateRecord::new(format!("c{i}"), "#123456", i * 37 + 1)),
    );
    let wedges = layout_sectors(&ds, Progress::FULL);
    assert!((real_sweep_sum(&wedges) - 360.0).abs() < 1e-9);
}

#[test]
fn wedges_are_contiguous_from_top_clockwise() {
    for p in [0.0, 0.25, 0.5, 1.0] {
        let wedges = layout_sectors(&food_fun(), Progress::clamped(p));
        assert_eq!(wedges[0].start_angle_deg, START_ANGLE_DEG);
        for pair in wedges.windows(2) {
            assert_eq!(pair[0].end_angle_deg, pair[1].start_angle_deg);
            assert!(pair[0].sweep_deg() >= 0.0);
        }
        let total: f64 = wedges.iter().map(WedgeGeometry::sweep_deg).sum();
        assert!((total - 360.0).abs() < 1e-6, "p={p} total={total}");
    }
}

#[test]
fn zero_progress_only_has_remainder_sweep() {
    let wedges = layout_sectors(&food_fun(), Progress::ZERO);
    assert_eq!(wedges[0].sweep_deg(), 0.0);
    assert_eq!(wedges[1].sweep_deg(), 0.0);
    assert_eq!(wedges[2].sweep_deg(), 360.0);
    assert!(wedges[2].color.is_transparent());
}

#[test]
fn wedges_never_shrink_as_progress_grows() {
    let ds = ChartDataset::from_records([
        AggregateRecord::new("Tiny", "#FF0000", 1),
        AggregateRecord::new("Huge", "#00FF00", 10_000_000),
    ]);
    let mut prev = layout_sectors(&ds, Progress::ZERO);
    for step in 1..=20 {
        let next = layout_sectors(&ds, Progress::clamped(f64::from(step) / 20.0));
        assert_eq!(prev.len(), next.len());
        for (a, b) in prev.iter().zip(&next) {
            assert_eq!(a.kind, b.kind);
            if a.kind != WedgeKind::Remainder {
                assert!(b.sweep_deg() >= a.sweep_deg());
            }
        }
        prev = next;
    }
    let total: f64 = prev.iter().map(WedgeGeometry::sweep_deg).sum();
    assert!((total - 360.0).abs() < 1e-9, "total={total}");
    assert_eq!(prev[2].sweep_deg(), 0.0);
}

#[test]
fn thin_slice_is_floored_while_revealing() {
    let ds = ChartDataset::from_records([
        AggregateRecord::new("Tiny", "#FF0000", 1),
        AggregateRecord::new("Big", "#00FF00", 99_999),
    ]);
    let early = layout_sectors(&ds, Progress::clamped(0.01));
    assert!((early[0].sweep_deg() - SWEEP_FLOOR * 360.0).abs() < 1e-12);

    let done = layout_sectors(&ds, Progress::FULL);
    assert!((done[0].sweep_deg() - ds.fraction(0) * 360.0).abs() < 1e-12);
}

#[test]
fn floor_never_exceeds_a_share_smaller_than_itself() {
    let ds = ChartDataset::from_records([
        AggregateRecord::new("Tiny", "#FF0000", 1),
        AggregateRecord::new("Huge", "#00FF00", 100_000_000),
    ]);
    let share = ds.fraction(0) * 360.0;
    for p in [0.01, 0.5, 1.0] {
        let wedges = layout_sectors(&ds, Progress::clamped(p));
        assert!(wedges[0].sweep_deg() > 0.0);
        assert!(wedges[0].sweep_deg() <= share + 1e-15);
    }
}

#[test]
fn single_category_reveals_against_shrinking_remainder() {
    let ds = ChartDataset::from_records([AggregateRecord::new("Only", "#336699", 42)]);
    let half = layout_sectors(&ds, Progress::clamped(0.5));
    assert_eq!(half.len(), 2);
    assert!((half[0].sweep_deg() - 180.0).abs() < 1e-9);
    assert!((half[1].sweep_deg() - 180.0).abs() < 1e-9);

    let done = layout_sectors(&ds, Progress::FULL);
    assert!((done[0].sweep_deg() - 360.0).abs() < 1e-9);
    assert_eq!(done[1].sweep_deg(), 0.0);
}

#[test]
fn empty_and_all_zero_datasets_share_the_placeholder() {
    let empty = ChartDataset::empty();
    let zeros = ChartDataset::from_records([
        AggregateRecord::new("A", "#111111", 0),
        AggregateRecord::new("B", "#222222", 0),
    ]);
    for p in [0.0, 0.3, 1.0] {
        let a = layout_sectors(&empty, Progress::clamped(p));
        let b = layout_sectors(&zeros, Progress::clamped(p));
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].kind, WedgeKind::Placeholder);
        assert_eq!(a[0].color, PLACEHOLDER_COLOR);
        assert_eq!(a[0].sweep_deg(), 360.0);
    }
}

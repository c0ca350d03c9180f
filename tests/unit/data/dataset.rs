use super::*;
use crate::data::color::FALLBACK_COLOR;
use crate::foundation::core::Rgba8;

#[test]
fn drops_non_positive_totals_and_keeps_order() {
    let ds = ChartDataset::from_records([
        AggregateRecord::new("Salary", "#00FF00", 5000),
        AggregateRecord::new("Refund", "#0000FF", 0),
        AggregateRecord::new("Loan", "#FF00FF", -200),
        AggregateRecord::new("Gift", "#FFFF00", 1000),
    ]);
    let labels: Vec<&str> = ds.entries().iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["Salary", "Gift"]);
    assert_eq!(ds.grand_total(), 6000);
    assert_eq!(ds.get(1).unwrap().color, Rgba8::rgb(255, 255, 0));
}

#[test]
fn empty_sentinel_iff_zero_total() {
    let empty = ChartDataset::from_records(Vec::new());
    let all_zero = ChartDataset::from_records([
        AggregateRecord::new("A", "#111111", 0),
        AggregateRecord::new("B", "#222222", 0),
    ]);
    let negative = ChartDataset::from_records([AggregateRecord::new("Food", "#FF0000", -500)]);
    for ds in [&empty, &all_zero, &negative] {
        assert!(ds.is_empty());
        assert_eq!(ds.grand_total(), 0);
        assert_eq!(ds, &ChartDataset::empty());
    }
}

#[test]
fn fractions_sum_to_one() {
    let ds = ChartDataset::from_records([
        AggregateRecord::new("Food", "#FF0000", 300),
        AggregateRecord::new("Fun", "#00FF00", 700),
    ]);
    assert!((ds.fraction(0) - 0.3).abs() < 1e-12);
    assert!((ds.fraction(1) - 0.7).abs() < 1e-12);
    assert_eq!(ds.fraction(2), 0.0);
    let sum: f64 = ds.fractions().map(|(_, f)| f).sum();
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn grand_total_does_not_overflow() {
    let ds = ChartDataset::from_records([
        AggregateRecord::new("A", "#111111", i64::MAX),
        AggregateRecord::new("B", "#222222", i64::MAX),
    ]);
    assert_eq!(ds.grand_total(), 2 * i128::from(i64::MAX));
    assert!((ds.fraction(0) - 0.5).abs() < 1e-12);
}

#[test]
fn malformed_color_does_not_drop_the_category() {
    let ds = ChartDataset::from_records([AggregateRecord::uncolored("Misc", 42)]);
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.entries()[0].color, FALLBACK_COLOR);
}

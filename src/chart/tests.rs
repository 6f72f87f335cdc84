#![allow(clippy::unwrap_used)]

use std::f64::consts::{PI, TAU};

use rust_decimal_macros::dec;

use super::bar::ChartFrame;
use super::scale::{BandScale, LinearScale};
use super::*;
use crate::analytics::{Bucket, CategoryTotal, TimeBucketTotal};

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn keys(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("2024-01-{i:02}")).collect()
}

// ── Band scale ────────────────────────────────────────────────

#[test]
fn test_band_scale_equal_non_overlapping_bands() {
    for n in 1..=12 {
        let scale = BandScale::new(keys(n), (0.0, 600.0), 0.1);
        let bands = scale.bands();
        assert_eq!(bands.len(), n);

        let width = bands[0].width;
        assert!(bands.iter().all(|b| approx(b.width, width)));
        assert!(approx(width, 600.0 / n as f64 * 0.9));

        for pair in bands.windows(2) {
            assert!(pair[0].start + pair[0].width <= pair[1].start + EPS);
        }
        let total: f64 = bands.iter().map(|b| b.width).sum();
        assert!(total <= 600.0 + EPS);
        assert!(bands[0].start >= 0.0);
        assert!(bands[n - 1].start + width <= 600.0 + EPS);
    }
}

#[test]
fn test_band_scale_positions() {
    let scale = BandScale::new(keys(4), (0.0, 600.0), 0.1);
    assert!(approx(scale.step(), 150.0));
    assert!(approx(scale.bandwidth(), 135.0));
    let bands = scale.bands();
    assert!(approx(bands[0].start, 7.5));
    assert!(approx(bands[2].start, 307.5));
}

#[test]
fn test_band_scale_keeps_caller_order() {
    let given = vec!["2024-03".to_string(), "2024-01".into(), "2024-02".into()];
    let scale = BandScale::new(given.clone(), (40.0, 570.0), 0.1);
    let bands = scale.bands();
    let keys: Vec<String> = bands.iter().map(|b| b.key.clone()).collect();
    assert_eq!(keys, given);
    assert_eq!(bands[0].key, "2024-03");
    assert!(bands[0].start < bands[1].start);
}

#[test]
fn test_band_scale_empty() {
    let scale = BandScale::new(Vec::new(), (0.0, 600.0), 0.1);
    assert_eq!(scale.bandwidth(), 0.0);
    assert!(scale.bands().is_empty());
}

#[test]
fn test_band_scale_padding_clamped() {
    let scale = BandScale::new(keys(2), (0.0, 100.0), 1.5);
    assert!(scale.bandwidth() > 0.0);
    assert!(scale.bandwidth() < 1e-3);

    let scale = BandScale::new(keys(2), (0.0, 100.0), -0.5);
    assert!(approx(scale.bandwidth(), 50.0));
}

// ── Linear scale ──────────────────────────────────────────────

#[test]
fn test_linear_scale_inverted_range() {
    let y = LinearScale::new((0.0, 100.0), (380.0, 20.0));
    assert!(approx(y.scale(0.0), 380.0));
    assert!(approx(y.scale(100.0), 20.0));
    assert!(approx(y.scale(50.0), 200.0));
}

#[test]
fn test_linear_scale_zero_domain_maps_to_range_start() {
    let y = LinearScale::from_max([0.0, 0.0, 0.0], (380.0, 20.0));
    assert_eq!(y.domain(), (0.0, 0.0));
    assert_eq!(y.scale(0.0), 380.0);
    assert_eq!(y.scale(10.0), 380.0);
    assert!(y.scale(5.0).is_finite());
}

#[test]
fn test_linear_scale_from_max_ignores_negatives_and_nan() {
    let y = LinearScale::from_max([-50.0, f64::NAN, 80.0], (0.0, 100.0));
    assert_eq!(y.domain(), (0.0, 80.0));
}

#[test]
fn test_linear_scale_nice() {
    let y = LinearScale::from_max([87.0], (360.0, 20.0)).nice(5);
    assert_eq!(y.domain(), (0.0, 100.0));
    assert!(approx(y.scale(100.0), 20.0));

    let y = LinearScale::from_max([1234.0], (0.0, 1.0)).nice(5);
    assert_eq!(y.domain(), (0.0, 1400.0));
}

#[test]
fn test_linear_scale_nice_zero_domain_unchanged() {
    let y = LinearScale::from_max([0.0], (0.0, 1.0)).nice(5);
    assert_eq!(y.domain(), (0.0, 0.0));
}

#[test]
fn test_linear_scale_ticks() {
    let y = LinearScale::new((0.0, 100.0), (0.0, 1.0));
    assert_eq!(y.ticks(5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    assert_eq!(LinearScale::new((0.0, 0.0), (0.0, 1.0)).ticks(5), vec![0.0]);
}

// ── Bar layout ────────────────────────────────────────────────

fn bucket(key: &str, total: rust_decimal::Decimal) -> TimeBucketTotal {
    TimeBucketTotal {
        key: key.into(),
        total,
    }
}

#[test]
fn test_bar_layout_monthly_geometry() {
    let series = vec![bucket("2024-01", dec!(100)), bucket("2024-02", dec!(50))];
    let layout = BarChartLayout::build(&series, Bucket::Monthly);

    assert_eq!(layout.frame, ChartFrame::for_bucket(Bucket::Monthly));
    assert!(approx(layout.baseline, 360.0));
    assert_eq!(layout.bars.len(), 2);

    let first = &layout.bars[0];
    assert_eq!(first.key, "2024-01");
    assert!(approx(first.y, 20.0));
    assert!(approx(first.height, 340.0));

    let second = &layout.bars[1];
    assert!(approx(second.y, 190.0));
    assert!(approx(second.height, 170.0));
    assert!(approx(first.width, second.width));
    assert!(first.x + first.width <= second.x);
    assert!(first.x >= 40.0);
    assert!(second.x + second.width <= 570.0 + EPS);
}

#[test]
fn test_bar_layout_all_zero_values() {
    let series = vec![bucket("2024-01-01", dec!(0)), bucket("2024-01-02", dec!(0))];
    let layout = BarChartLayout::build(&series, Bucket::Daily);
    assert!(layout.bars.iter().all(|b| b.height == 0.0 && b.y.is_finite()));
    assert_eq!(layout.max_value(), 0.0);
}

#[test]
fn test_bar_layout_negative_value_is_empty_bar() {
    let series = vec![
        ("a".to_string(), 40.0),
        ("b".to_string(), -10.0),
    ];
    let frame = ChartFrame::for_bucket(Bucket::Monthly);
    let layout = BarChartLayout::with_frame(&series, frame, 1);
    assert_eq!(layout.bars[1].height, 0.0);
    assert!(approx(layout.bars[1].y, layout.baseline));
}

#[test]
fn test_bar_layout_daily_label_stride() {
    let series: Vec<TimeBucketTotal> = keys(7).into_iter().map(|k| bucket(&k, dec!(5))).collect();
    let layout = BarChartLayout::build(&series, Bucket::Daily);
    let labeled: Vec<&str> = layout.labeled_bars().map(|b| b.key.as_str()).collect();
    assert_eq!(labeled, ["2024-01-01", "2024-01-04", "2024-01-07"]);
}

#[test]
fn test_bar_layout_ticks_inside_plot() {
    let series = vec![bucket("2024-01", dec!(87))];
    let layout = BarChartLayout::build(&series, Bucket::Monthly);
    let values: Vec<f64> = layout.y_ticks.iter().map(|t| t.value).collect();
    assert_eq!(values, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    for tick in &layout.y_ticks {
        assert!(tick.position <= layout.baseline + EPS);
        assert!(tick.position >= layout.frame.margin.top - EPS);
    }
}

#[test]
fn test_bar_layout_empty_series() {
    let layout = BarChartLayout::build(&[], Bucket::Daily);
    assert!(layout.bars.is_empty());
    assert_eq!(layout.labeled_bars().count(), 0);
}

// ── Pie layout ────────────────────────────────────────────────

fn entries(items: &[(&str, f64)]) -> Vec<(String, f64)> {
    items.iter().map(|(c, v)| (c.to_string(), *v)).collect()
}

#[test]
fn test_pie_two_equal_halves() {
    let slices = pie_layout(&entries(&[("Food", 50.0), ("Rent", 50.0)]), 150.0);
    assert_eq!(slices.len(), 2);

    assert!(approx(slices[0].start_angle, 0.0));
    assert!(approx(slices[0].span(), PI));
    assert!(approx(slices[1].start_angle, slices[0].end_angle));
    assert!(approx(slices[1].span(), PI));
    assert!(approx(slices[1].end_angle, TAU));
    assert!(approx(slices[0].share_percent, 50.0));
}

#[test]
fn test_pie_centroids_at_half_radius() {
    let slices = pie_layout(&entries(&[("Food", 50.0), ("Rent", 50.0)]), 150.0);
    // first half spans 12 to 6 o'clock clockwise, so its centroid sits at 3 o'clock
    let (x, y) = slices[0].centroid;
    assert!(approx(x, 75.0));
    assert!(approx(y, 0.0));
    let (x, y) = slices[1].centroid;
    assert!(approx(x, -75.0));
    assert!(y.abs() < 1e-6);
}

#[test]
fn test_pie_zero_entry_is_zero_width() {
    let slices = pie_layout(&entries(&[("Gifts", 0.0), ("Food", 10.0)]), 100.0);
    assert!(approx(slices[0].span(), 0.0));
    assert!(approx(slices[1].span(), TAU));
    assert_eq!(slices[0].share_percent, 0.0);
}

#[test]
fn test_pie_all_zero_total() {
    let slices = pie_layout(&entries(&[("A", 0.0), ("B", 0.0)]), 100.0);
    assert!(slices.iter().all(|s| s.start_angle == 0.0 && s.end_angle == 0.0));
    assert!(slices.iter().all(|s| s.centroid.0.is_finite() && s.centroid.1.is_finite()));
}

#[test]
fn test_pie_empty() {
    assert!(pie_layout(&[], 100.0).is_empty());
    assert!(legend(&[]).is_empty());
}

#[test]
fn test_pie_share_percent_one_decimal() {
    let slices = pie_layout(&entries(&[("A", 1.0), ("B", 2.0)]), 100.0);
    assert!(approx(slices[0].share_percent, 33.3));
    assert!(approx(slices[1].share_percent, 66.7));
}

#[test]
fn test_legend_distinct_in_input_order() {
    let input = entries(&[("Rent", 1.0), ("Food", 2.0), ("Rent", 3.0)]);
    let legend = legend(&input);
    let names: Vec<&str> = legend.iter().map(|l| l.category.as_str()).collect();
    assert_eq!(names, ["Rent", "Food"]);

    let slices = pie_layout(&input, 100.0);
    let colors: Vec<usize> = slices.iter().map(|s| s.color_index).collect();
    assert_eq!(colors, [0, 1, 0]);
}

#[test]
fn test_series_from_totals() {
    let totals = vec![CategoryTotal {
        category: "Zeta".into(),
        total: dec!(12.5),
    }];
    assert_eq!(series_from_totals(&totals), vec![("Zeta".to_string(), 12.5)]);
}

#[test]
fn test_arc_point_top_and_right() {
    let (x, y) = arc_point(0.0, 10.0);
    assert!(x.abs() < 1e-9);
    assert!(approx(y, -10.0));
    let (x, y) = arc_point(PI / 2.0, 10.0);
    assert!(approx(x, 10.0));
    assert!(y.abs() < 1e-9);
}

#[test]
fn test_layout_is_idempotent() {
    let input = entries(&[("Food", 20.0), ("Rent", 80.0)]);
    assert_eq!(pie_layout(&input, 120.0), pie_layout(&input, 120.0));
    let scale = BandScale::new(keys(3), (0.0, 300.0), 0.1);
    assert_eq!(scale.bands(), scale.bands());
}

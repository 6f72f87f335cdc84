//! Pie sectors and legend.
//!
//! Angles are radians, starting at 12 o'clock and running clockwise.
//! Points are relative to the pie center in y-down coordinates.

use std::f64::consts::{FRAC_PI_2, TAU};

use rust_decimal::prelude::ToPrimitive;

use crate::analytics::CategoryTotal;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PieSlice {
    pub(crate) category: String,
    pub(crate) value: f64,
    pub(crate) start_angle: f64,
    pub(crate) end_angle: f64,
    /// Share of the whole, in percent with one decimal.
    pub(crate) share_percent: f64,
    /// Label anchor: mid angle at half the radius.
    pub(crate) centroid: (f64, f64),
    pub(crate) color_index: usize,
}

impl PieSlice {
    pub(crate) fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub(crate) fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LegendEntry {
    pub(crate) category: String,
    pub(crate) color_index: usize,
}

/// Point at `angle` and `radius` from the center.
pub(crate) fn arc_point(angle: f64, radius: f64) -> (f64, f64) {
    let a = angle - FRAC_PI_2;
    (a.cos() * radius, a.sin() * radius)
}

pub(crate) fn series_from_totals(totals: &[CategoryTotal]) -> Vec<(String, f64)> {
    totals
        .iter()
        .map(|t| (t.category.clone(), t.total.to_f64().unwrap_or(0.0)))
        .collect()
}

/// Color slot per distinct category, assigned in first-seen order.
fn color_slots(entries: &[(String, f64)]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for (category, _) in entries {
        if !seen.contains(&category.as_str()) {
            seen.push(category.as_str());
        }
    }
    seen
}

/// Lay out sectors in input order, each proportional to its share of the
/// positive total. Zero or negative values get zero-width sectors, and an
/// all-zero input yields all sectors collapsed at angle 0.
pub(crate) fn pie_layout(entries: &[(String, f64)], radius: f64) -> Vec<PieSlice> {
    let sum: f64 = entries.iter().map(|(_, v)| v.max(0.0)).sum();
    let slots = color_slots(entries);

    let mut angle = 0.0;
    entries
        .iter()
        .map(|(category, value)| {
            let weight = if sum > 0.0 { value.max(0.0) / sum } else { 0.0 };
            let start = angle;
            let end = start + weight * TAU;
            angle = end;

            let centroid = arc_point((start + end) / 2.0, radius / 2.0);
            PieSlice {
                category: category.clone(),
                value: *value,
                start_angle: start,
                end_angle: end,
                share_percent: (weight * 1000.0).round() / 10.0,
                centroid,
                color_index: slots.iter().position(|s| *s == category.as_str()).unwrap_or(0),
            }
        })
        .collect()
}

/// One entry per distinct category, in pie input order.
pub(crate) fn legend(entries: &[(String, f64)]) -> Vec<LegendEntry> {
    color_slots(entries)
        .into_iter()
        .enumerate()
        .map(|(color_index, category)| LegendEntry {
            category: category.to_string(),
            color_index,
        })
        .collect()
}

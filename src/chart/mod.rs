//! Chart layout: pure geometry for bar and pie charts.
//!
//! Nothing here knows about a drawing surface. Renderers take these
//! descriptors and map the abstract coordinates onto their own canvas.

mod bar;
mod pie;
mod scale;

pub(crate) use bar::BarChartLayout;
pub(crate) use pie::{arc_point, legend, pie_layout, series_from_totals, PieSlice};

#[cfg(test)]
mod tests;

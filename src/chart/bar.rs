use rust_decimal::prelude::ToPrimitive;

use super::scale::{BandScale, LinearScale};
use crate::analytics::{Bucket, TimeBucketTotal};

const BAND_PADDING: f64 = 0.1;
const Y_TICK_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Margin {
    pub(crate) top: f64,
    pub(crate) right: f64,
    pub(crate) bottom: f64,
    pub(crate) left: f64,
}

/// Drawing area in abstract y-down units. Renderers scale it to their surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ChartFrame {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) margin: Margin,
}

impl ChartFrame {
    pub(crate) fn for_bucket(bucket: Bucket) -> Self {
        // daily keys are longer and need a deeper bottom margin
        let bottom = match bucket {
            Bucket::Daily => 60.0,
            Bucket::Monthly => 40.0,
        };
        Self {
            width: 600.0,
            height: 400.0,
            margin: Margin {
                top: 20.0,
                right: 30.0,
                bottom,
                left: 40.0,
            },
        }
    }

    pub(crate) fn x_range(&self) -> (f64, f64) {
        (self.margin.left, self.width - self.margin.right)
    }

    /// Bottom to top, so larger values sit higher.
    pub(crate) fn y_range(&self) -> (f64, f64) {
        (self.height - self.margin.bottom, self.margin.top)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BarGeometry {
    pub(crate) key: String,
    pub(crate) value: f64,
    pub(crate) x: f64,
    /// Top edge (y-down).
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AxisTick {
    pub(crate) value: f64,
    pub(crate) position: f64,
}

/// Geometry for a temporal bar chart.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BarChartLayout {
    pub(crate) frame: ChartFrame,
    pub(crate) bars: Vec<BarGeometry>,
    pub(crate) y_ticks: Vec<AxisTick>,
    /// y position of the zero line.
    pub(crate) baseline: f64,
    /// Top of the value axis after rounding to nice ticks.
    pub(crate) y_max: f64,
    /// Label every n-th bar on the x axis.
    pub(crate) label_stride: usize,
}

impl BarChartLayout {
    pub(crate) fn build(series: &[TimeBucketTotal], bucket: Bucket) -> Self {
        let stride = match bucket {
            Bucket::Daily => 3,
            Bucket::Monthly => 1,
        };
        let points: Vec<(String, f64)> = series
            .iter()
            .map(|t| (t.key.clone(), t.total.to_f64().unwrap_or(0.0)))
            .collect();
        Self::with_frame(&points, ChartFrame::for_bucket(bucket), stride)
    }

    /// Bars in series order. Negative values are drawn as empty bars at the baseline.
    pub(crate) fn with_frame(series: &[(String, f64)], frame: ChartFrame, label_stride: usize) -> Self {
        let x = BandScale::new(
            series.iter().map(|(k, _)| k.clone()).collect(),
            frame.x_range(),
            BAND_PADDING,
        );
        let y = LinearScale::from_max(series.iter().map(|(_, v)| *v), frame.y_range())
            .nice(Y_TICK_COUNT);
        let baseline = y.scale(0.0);

        let bars = x
            .bands()
            .into_iter()
            .zip(series)
            .map(|(band, (_, value))| {
                let top = y.scale(*value).min(baseline);
                BarGeometry {
                    key: band.key,
                    value: *value,
                    x: band.start,
                    y: top,
                    width: band.width,
                    height: baseline - top,
                }
            })
            .collect();

        let y_ticks = y
            .ticks(Y_TICK_COUNT)
            .into_iter()
            .map(|value| AxisTick {
                value,
                position: y.scale(value),
            })
            .collect();

        Self {
            frame,
            bars,
            y_ticks,
            baseline,
            y_max: y.domain().1,
            label_stride: label_stride.max(1),
        }
    }

    pub(crate) fn labeled_bars(&self) -> impl Iterator<Item = &BarGeometry> {
        self.bars.iter().step_by(self.label_stride)
    }

    pub(crate) fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }
}

//! Band and linear scales mapping data onto a pixel range.

/// One band of a [`BandScale`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Band {
    pub(crate) key: String,
    /// Leading edge of the band.
    pub(crate) start: f64,
    pub(crate) width: f64,
}

/// Maps discrete keys onto evenly spaced, equally wide bands.
///
/// The range is split into one step per key; each band takes `1 - padding`
/// of its step and is centered in it. Keys stay in the order given.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BandScale {
    keys: Vec<String>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    /// `padding` is clamped to `[0, 1)`.
    pub(crate) fn new(keys: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let padding = if padding.is_finite() {
            padding.clamp(0.0, 0.999_999)
        } else {
            0.0
        };
        Self {
            keys,
            range,
            padding,
        }
    }

    /// Distance between the starts of consecutive bands. Zero with no keys.
    pub(crate) fn step(&self) -> f64 {
        if self.keys.is_empty() {
            return 0.0;
        }
        (self.range.1 - self.range.0) / self.keys.len() as f64
    }

    pub(crate) fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Leading edge of the band at `index`.
    fn start_at(&self, index: usize) -> f64 {
        let step = self.step();
        self.range.0 + index as f64 * step + step * self.padding / 2.0
    }

    pub(crate) fn bands(&self) -> Vec<Band> {
        let width = self.bandwidth();
        self.keys
            .iter()
            .enumerate()
            .map(|(i, key)| Band {
                key: key.clone(),
                start: self.start_at(i),
                width,
            })
            .collect()
    }
}

/// Maps `[domain.0, domain.1]` linearly onto `range`. The range may be inverted
/// (e.g. `[bottom, top]` in y-down screen space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub(crate) fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain `[0, max(values)]`. Negative or non-finite values do not extend it.
    pub(crate) fn from_max<I>(values: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let max = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        Self::new((0.0, max), range)
    }

    pub(crate) fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Pixel position for `value`. A zero-length domain maps everything to the range start.
    pub(crate) fn scale(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 || !span.is_finite() {
            return self.range.0;
        }
        let t = (value - self.domain.0) / span;
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Extend the domain end outward to a round tick boundary.
    pub(crate) fn nice(self, count: usize) -> Self {
        let (start, stop) = self.domain;
        let step = tick_increment(start, stop, count);
        if step <= 0.0 {
            return self;
        }
        let nice_start = (start / step).floor() * step;
        let nice_stop = (stop / step).ceil() * step;
        Self::new((nice_start, nice_stop), self.range)
    }

    /// Roughly `count` round values spanning the domain, for axis labels.
    pub(crate) fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = self.domain;
        let step = tick_increment(start, stop, count);
        if step <= 0.0 {
            return vec![start];
        }
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Step of 1, 2 or 5 times a power of ten giving about `count` intervals.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 || !start.is_finite() || !stop.is_finite() || stop <= start {
        return 0.0;
    }
    let raw = (stop - start) / count as f64;
    let power = raw.log10().floor();
    let base = 10_f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50_f64.sqrt() {
        10.0
    } else if error >= 10_f64.sqrt() {
        5.0
    } else if error >= 2_f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

use alloc::vec::Vec;

/// `sqrt(50)`, `sqrt(10)`, `sqrt(2)`: thresholds for picking a 10/5/2/1 tick factor.
const E10: f64 = 7.0710678118654755;
const E5: f64 = 3.1622776601683795;
const E2: f64 = 1.4142135623730951;

/// A continuous scale mapping a numeric domain linearly onto a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    pub fn set_domain(&mut self, domain: (f64, f64)) {
        self.domain = domain;
    }

    pub fn set_range(&mut self, range: (f32, f32)) {
        self.range = range;
    }

    /// Maps a domain value to the range. A collapsed domain maps everything to the range midpoint.
    pub fn apply(&self, value: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) * 0.5;
        }
        let t = (value - d0) / span;
        r0 + (r1 - r0) * t as f32
    }

    /// Widens the domain outward to round tick values for roughly `count` ticks.
    ///
    /// A collapsed domain `[a, a]` is first widened to `[a, a + 1]` so that downstream
    /// geometry stays finite.
    pub fn nice(&mut self, count: usize) {
        let (d0, d1) = self.domain;
        let reversed = d1 < d0;
        let (mut start, mut stop) = if reversed { (d1, d0) } else { (d0, d1) };
        if !(stop > start) {
            stop = start + 1.0;
        }

        let mut prestep: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if prestep == Some(step) {
                break;
            }
            if step > 0.0 {
                start = libm::floor(start / step) * step;
                stop = libm::ceil(stop / step) * step;
            } else if step < 0.0 {
                start = libm::ceil(start * step) / step;
                stop = libm::floor(stop * step) / step;
            } else {
                break;
            }
            prestep = Some(step);
        }

        self.domain = if reversed {
            (stop, start)
        } else {
            (start, stop)
        };
    }

    /// Roughly `count` round values spanning the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        ticks(d0, d1, count)
    }

    /// The distance between consecutive values of [`LinearScale::ticks`].
    pub fn tick_step(&self, count: usize) -> f64 {
        let (d0, d1) = self.domain;
        let inc = tick_increment(d0.min(d1), d0.max(d1), count);
        if inc < 0.0 { -1.0 / inc } else { inc }
    }
}

/// A scale dividing a pixel range into `count` evenly spaced bands.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BandScale {
    count: usize,
    range: (f32, f32),
    padding_inner: f32,
    padding_outer: f32,
    align: f32,
    start: f32,
    step: f32,
    bandwidth: f32,
    reversed: bool,
}

impl BandScale {
    pub fn new(count: usize, range: (f32, f32)) -> Self {
        let mut s = Self {
            count,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
            reversed: false,
        };
        s.rescale();
        s
    }

    /// Sets inner and outer padding, as a fraction of the step.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.padding_outer = padding.max(0.0);
        self.rescale();
        self
    }

    pub fn with_align(mut self, align: f32) -> Self {
        self.align = align.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    /// Sets the domain to `0..count`.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.rescale();
    }

    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Start of band `index`, or `None` outside the domain.
    pub fn position(&self, index: usize) -> Option<f32> {
        if index >= self.count {
            return None;
        }
        let slot = if self.reversed {
            self.count - 1 - index
        } else {
            index
        };
        Some(self.start + self.step * slot as f32)
    }

    fn rescale(&mut self) {
        let n = self.count as f32;
        let (r0, r1) = self.range;
        self.reversed = r1 < r0;
        let (start, stop) = if self.reversed { (r1, r0) } else { (r0, r1) };
        let step =
            (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.step = step;
        self.start = start + (stop - start - step * (n - self.padding_inner)) * self.align;
        self.bandwidth = step * (1.0 - self.padding_inner);
    }
}

/// Returns `(i1, i2, inc)`; see [`ticks`].
fn tick_params(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = libm::floor(libm::log10(step));
    let error = step / libm::pow(10.0, power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let pos = libm::pow(10.0, -power) / factor;
        i1 = libm::round(start * pos);
        i2 = libm::round(stop * pos);
        if i1 / pos < start {
            i1 += 1.0;
        }
        if i2 / pos > stop {
            i2 -= 1.0;
        }
        inc = -pos;
    } else {
        let pos = libm::pow(10.0, power) * factor;
        i1 = libm::round(start / pos);
        i2 = libm::round(stop / pos);
        if i1 * pos < start {
            i1 += 1.0;
        }
        if i2 * pos > stop {
            i2 -= 1.0;
        }
        inc = pos;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_params(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// The tick step for `[start, stop]`; negative values encode `1 / step` for sub-unit steps.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_params(start, stop, count as f64).2
}

/// Round values (multiples of 1, 2 or 5 times a power of ten) covering `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return alloc::vec![start];
    }
    let reversed = stop < start;
    let (lo, hi) = if reversed { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_params(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reversed {
        out.reverse();
    }
    out
}

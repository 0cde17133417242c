/// Timing of a single transition: how long to wait, how long to run, and the easing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    pub delay_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Timing {
    pub const fn new(duration_ms: u64, easing: Easing) -> Self {
        Self {
            delay_ms: 0,
            duration_ms,
            easing,
        }
    }

    /// Jump straight to the target (transitions disabled).
    pub const fn immediate() -> Self {
        Self::new(0, Easing::Linear)
    }

    pub const fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Milliseconds from scheduling until the transition completes.
    pub fn total_ms(&self) -> u64 {
        self.delay_ms.saturating_add(self.duration_ms)
    }
}

/// A scalar tween sampled by the adapter's clock.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_ms: u64,
    pub delay_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start_ms: u64, timing: Timing) -> Self {
        Self {
            from,
            to,
            start_ms,
            delay_ms: timing.delay_ms,
            duration_ms: timing.duration_ms,
            easing: timing.easing,
        }
    }

    /// A tween that holds `value` forever.
    pub fn still(value: f32) -> Self {
        Self::new(value, value, 0, Timing::immediate())
    }

    pub fn end_ms(&self) -> u64 {
        self.start_ms
            .saturating_add(self.delay_ms)
            .saturating_add(self.duration_ms)
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms >= self.end_ms()
    }

    pub fn sample(&self, now_ms: u64) -> f32 {
        let begin = self.start_ms.saturating_add(self.delay_ms);
        if now_ms < begin {
            return self.from;
        }
        if self.duration_ms == 0 || now_ms >= self.end_ms() {
            return self.to;
        }
        let elapsed = now_ms - begin;
        let t = (elapsed as f32 / self.duration_ms as f32).clamp(0.0, 1.0);
        let eased = self.easing.sample(t);
        self.from + (self.to - self.from) * eased
    }

    /// Restarts from the current sampled value towards `new_to`.
    pub fn retarget(&mut self, now_ms: u64, new_to: f32, timing: Timing) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, new_to, now_ms, timing);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    /// Symmetric cubic; the default for chart transitions.
    CubicInOut,
    /// CSS `ease`.
    Ease,
    /// Material "standard" curve, `cubic-bezier(0.4, 0.0, 0.2, 1)`.
    Standard,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::Standard => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

/// Solves the CSS timing curve for progress `x` and returns its `y`.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let curve_x = |t: f32| ((ax * t + bx) * t + cx) * t;
    let slope_x = |t: f32| (3.0 * ax * t + 2.0 * bx) * t + cx;

    // Newton first; fall back to bisection when the slope flattens out.
    let mut t = x;
    for _ in 0..8 {
        let err = curve_x(t) - x;
        if libm::fabsf(err) < 1e-6 {
            return ((ay * t + by) * t + cy) * t;
        }
        let d = slope_x(t);
        if libm::fabsf(d) < 1e-6 {
            break;
        }
        t -= err / d;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    t = x;
    for _ in 0..32 {
        let v = curve_x(t);
        if libm::fabsf(v - x) < 1e-6 {
            break;
        }
        if v < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    ((ay * t + by) * t + cy) * t
}

/// A value that is either at rest or moving along a [`Tween`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animated {
    tween: Tween,
}

impl Animated {
    pub fn new(value: f32) -> Self {
        Self {
            tween: Tween::still(value),
        }
    }

    pub fn value_at(&self, now_ms: u64) -> f32 {
        self.tween.sample(now_ms)
    }

    /// The value this animation settles on.
    pub fn target(&self) -> f32 {
        self.tween.to
    }

    pub fn tween(&self) -> &Tween {
        &self.tween
    }

    pub fn is_settled(&self, now_ms: u64) -> bool {
        self.tween.is_done(now_ms)
    }

    /// Jumps to `value`, dropping any running tween.
    pub fn set(&mut self, value: f32) {
        self.tween = Tween::still(value);
    }

    /// Animates from wherever the value is at `now_ms` towards `to`.
    pub fn animate_to(&mut self, now_ms: u64, to: f32, timing: Timing) {
        self.tween.retarget(now_ms, to, timing);
    }
}

impl Default for Animated {
    fn default() -> Self {
        Self::new(0.0)
    }
}

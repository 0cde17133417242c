use datajoin::{Animated, BandScale, KeyedList, LinearScale, Timing};

use crate::leaving::{Leaving, sweep};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum AxisOrient {
    /// Ticks run along x below the drawing area.
    Bottom,
    /// Ticks run along y left of the drawing area.
    Left,
}

/// One tick mark as it should be drawn at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct TickView<'a> {
    pub label: &'a str,
    /// Offset along the axis, in pixels from the drawing area origin.
    pub position: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug)]
struct Tick {
    position: Animated,
    opacity: Animated,
}

/// A headless axis: tick marks keyed by label, animated between updates.
#[derive(Clone, Debug)]
pub struct Axis {
    orient: AxisOrient,
    ticks: KeyedList<String, Tick>,
    leaving: Vec<Leaving<String, Tick>>,
}

impl Axis {
    pub fn new(orient: AxisOrient) -> Self {
        Self {
            orient,
            ticks: KeyedList::new(),
            leaving: Vec::new(),
        }
    }

    pub fn orient(&self) -> AxisOrient {
        self.orient
    }

    /// Labels of the current ticks, in axis order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.ticks.keys().map(String::as_str)
    }

    /// Moves the axis to a new set of `(label, position)` ticks.
    ///
    /// Surviving ticks slide, new ticks fade in at their position, removed ticks fade out.
    pub fn update(&mut self, ticks: Vec<(String, f32)>, now_ms: u64, timing: Timing) {
        let leaving = &mut self.leaving;
        self.ticks.join(
            ticks,
            |_, (label, _)| label.clone(),
            |_, _, (_, pos)| {
                let mut opacity = Animated::new(0.0);
                opacity.animate_to(now_ms, 1.0, timing);
                Tick {
                    position: Animated::new(pos),
                    opacity,
                }
            },
            |_, _, (_, pos), tick| {
                tick.position.animate_to(now_ms, pos, timing);
                tick.opacity.animate_to(now_ms, 1.0, timing);
            },
            |label, mut tick| {
                tick.opacity.animate_to(now_ms, 0.0, timing);
                leaving.push(Leaving {
                    key: label,
                    element: tick,
                    remove_at_ms: now_ms.saturating_add(timing.total_ms()),
                });
            },
        );
    }

    pub fn tick(&mut self, now_ms: u64) -> usize {
        sweep(&mut self.leaving, now_ms)
    }

    pub fn is_animating(&self, now_ms: u64) -> bool {
        !self.leaving.is_empty()
            || self
                .ticks
                .iter()
                .any(|(_, t)| !t.position.is_settled(now_ms) || !t.opacity.is_settled(now_ms))
    }

    pub fn for_each_tick(&self, now_ms: u64, mut f: impl FnMut(TickView<'_>)) {
        let rendered = self.ticks.iter().map(|(k, t)| (k, t));
        let leaving = self.leaving.iter().map(|l| (&l.key, &l.element));
        for (label, tick) in rendered.chain(leaving) {
            f(TickView {
                label,
                position: tick.position.value_at(now_ms),
                opacity: tick.opacity.value_at(now_ms),
            });
        }
    }
}

/// Band-axis ticks: `#1..#n` at each band's centre.
pub fn band_ticks(scale: &BandScale) -> Vec<(String, f32)> {
    let half = scale.bandwidth() / 2.0;
    (0..scale.count())
        .filter_map(|i| {
            let start = scale.position(i)?;
            Some((format!("#{}", i + 1), start + half))
        })
        .collect()
}

/// Linear-axis ticks: about `count` round values, formatted at the tick step's precision.
pub fn linear_ticks(scale: &LinearScale, count: usize) -> Vec<(String, f32)> {
    let step = scale.tick_step(count);
    scale
        .ticks(count)
        .into_iter()
        .map(|v| (format_tick(v, step), scale.apply(v)))
        .collect()
}

/// Formats `value` with just enough decimals to tell ticks `step` apart, grouping thousands.
pub fn format_tick(value: f64, step: f64) -> String {
    let precision = if step.is_finite() && step > 0.0 && step < 1.0 {
        (-step.log10()).ceil().max(0.0) as usize
    } else {
        0
    };
    let text = format!("{:.*}", precision, value);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0" reads badly on an axis.
    let is_zero = grouped.chars().all(|c| c == '0')
        && frac_part.is_none_or(|f| f.chars().all(|c| c == '0'));
    let sign = if is_zero { "" } else { sign };

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

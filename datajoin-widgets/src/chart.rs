use datajoin::{Animated, BandScale, Easing, KeyedList, LinearScale, Margin, Rect, Timing};

use crate::axis::{Axis, AxisOrient, TickView, band_ticks, linear_ticks};
use crate::leaving::{Leaving, reclaim, sweep};

/// Canvas size and margins of the chart. The bars live in the inner area.
#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ChartLayout {
    pub width: f32,
    pub height: f32,
    pub margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 560.0,
            height: 360.0,
            margin: Margin {
                top: 20.0,
                right: 20.0,
                bottom: 40.0,
                left: 48.0,
            },
        }
    }
}

impl ChartLayout {
    pub fn inner_width(&self) -> f32 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f32 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }
}

/// Configuration for [`BarChart`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct BarChartOptions {
    pub layout: ChartLayout,
    /// Band padding, as a fraction of the band step.
    pub padding: f32,
    pub duration_ms: u64,
    /// Extra delay per bar index for the staggered reveal.
    pub stagger_ms: u64,
    pub easing: Easing,
    pub corner_radius: f32,
    /// Approximate number of value-axis ticks; also drives "nice" rounding.
    pub tick_count: usize,
}

impl Default for BarChartOptions {
    fn default() -> Self {
        Self {
            layout: ChartLayout::default(),
            padding: 0.15,
            duration_ms: 800,
            stagger_ms: 60,
            easing: Easing::CubicInOut,
            corner_radius: 4.0,
            tick_count: 10,
        }
    }
}

impl BarChartOptions {
    pub fn with_layout(mut self, layout: ChartLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_stagger_ms(mut self, stagger_ms: u64) -> Self {
        self.stagger_ms = stagger_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }
}

#[derive(Clone, Debug)]
struct Bar {
    value: f64,
    x: Animated,
    width: Animated,
    y: Animated,
    height: Animated,
}

impl Bar {
    fn rect_at(&self, now_ms: u64) -> Rect {
        Rect::new(
            self.x.value_at(now_ms),
            self.y.value_at(now_ms),
            self.width.value_at(now_ms),
            self.height.value_at(now_ms),
        )
    }

    fn is_settled(&self, now_ms: u64) -> bool {
        self.x.is_settled(now_ms)
            && self.width.is_settled(now_ms)
            && self.y.is_settled(now_ms)
            && self.height.is_settled(now_ms)
    }
}

/// A bar as it should be drawn at one instant, in inner-area coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct BarView {
    pub index: usize,
    pub value: f64,
    pub rect: Rect,
    pub corner_radius: f32,
    /// `true` while the bar shrinks away after its index left the dataset.
    pub exiting: bool,
}

/// An animated bar chart keyed by position.
///
/// The chart does not hold any UI objects. Adapters drive it by calling:
/// - `update(values, now_ms)` when the dataset changes
/// - `tick(now_ms)` each frame, to retire finished exits
/// - `for_each_bar` / `for_each_x_tick` / `for_each_y_tick` to draw
#[derive(Clone, Debug)]
pub struct BarChart {
    options: BarChartOptions,
    x: BandScale,
    y: LinearScale,
    x_axis: Axis,
    y_axis: Axis,
    bars: KeyedList<usize, Bar>,
    exiting: Vec<Leaving<usize, Bar>>,
}

impl BarChart {
    pub fn new(options: BarChartOptions) -> Self {
        let layout = options.layout;
        Self {
            x: BandScale::new(0, (0.0, layout.inner_width())).with_padding(options.padding),
            y: LinearScale::new((0.0, 0.0), (layout.inner_height(), 0.0)),
            x_axis: Axis::new(AxisOrient::Bottom),
            y_axis: Axis::new(AxisOrient::Left),
            bars: KeyedList::new(),
            exiting: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &BarChartOptions {
        &self.options
    }

    pub fn x_scale(&self) -> &BandScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    /// Rebinds the chart to `values`.
    ///
    /// An empty dataset is drawn as a single zero bar so both scale domains stay defined.
    /// Non-finite values are drawn as zero. Negative values are drawn as zero-height bars on the
    /// baseline. A bar whose index comes back while it is still shrinking away is rebound and
    /// grows again from its current height.
    pub fn update(&mut self, values: &[f64], now_ms: u64) {
        let data: Vec<f64> = if values.is_empty() {
            vec![0.0]
        } else {
            values
                .iter()
                .map(|v| if v.is_finite() { *v } else { 0.0 })
                .collect()
        };
        vdebug!(count = data.len(), now_ms, "BarChart::update");

        let max = data.iter().copied().fold(0.0f64, f64::max);
        self.x.set_count(data.len());
        self.y.set_domain((0.0, max));
        self.y.nice(self.options.tick_count);

        let timing = Timing::new(self.options.duration_ms, self.options.easing);
        self.x_axis.update(band_ticks(&self.x), now_ms, timing);
        self.y_axis
            .update(linear_ticks(&self.y, self.options.tick_count), now_ms, timing);

        let baseline = self.options.layout.inner_height();
        let count = data.len();
        let reclaimed = reclaim(&mut self.exiting, &mut self.bars, now_ms, |&i| i < count);
        if reclaimed > 0 {
            vtrace!(reclaimed, now_ms, "BarChart::update: rebound exiting bars");
        }
        let x = self.x;
        let exiting = &mut self.exiting;
        self.bars.join(
            data,
            |i, _| i,
            |i, _, value| Bar {
                value,
                x: Animated::new(x.position(i).unwrap_or(0.0)),
                width: Animated::new(x.bandwidth()),
                y: Animated::new(baseline),
                height: Animated::new(0.0),
            },
            |_, _, value, bar| bar.value = value,
            |i, mut bar| {
                bar.y.animate_to(now_ms, baseline, timing);
                bar.height.animate_to(now_ms, 0.0, timing);
                exiting.push(Leaving {
                    key: i,
                    element: bar,
                    remove_at_ms: now_ms.saturating_add(timing.total_ms()),
                });
            },
        );

        let y = self.y;
        let stagger = self.options.stagger_ms;
        for (&i, bar) in self.bars.iter_mut() {
            let timing = timing.with_delay(stagger.saturating_mul(i as u64));
            let top = y.apply(bar.value).min(baseline);
            bar.x.animate_to(now_ms, x.position(i).unwrap_or(0.0), timing);
            bar.width.animate_to(now_ms, x.bandwidth(), timing);
            bar.y.animate_to(now_ms, top, timing);
            bar.height.animate_to(now_ms, baseline - top, timing);
        }
    }

    /// Retires finished exits. Returns `true` while anything is still moving.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let removed = sweep(&mut self.exiting, now_ms);
        if removed > 0 {
            vtrace!(removed, now_ms, "BarChart::tick");
        }
        self.x_axis.tick(now_ms);
        self.y_axis.tick(now_ms);
        self.is_animating(now_ms)
    }

    pub fn is_animating(&self, now_ms: u64) -> bool {
        !self.exiting.is_empty()
            || self.bars.iter().any(|(_, b)| !b.is_settled(now_ms))
            || self.x_axis.is_animating(now_ms)
            || self.y_axis.is_animating(now_ms)
    }

    /// Keys (indexes) of the bars bound to the current dataset.
    pub fn bar_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.bars.keys().copied()
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// Visits every drawn bar: bound bars in data order, then exiting ones.
    pub fn for_each_bar(&self, now_ms: u64, mut f: impl FnMut(BarView)) {
        let radius = self.options.corner_radius;
        for (&index, bar) in self.bars.iter() {
            f(BarView {
                index,
                value: bar.value,
                rect: bar.rect_at(now_ms),
                corner_radius: radius,
                exiting: false,
            });
        }
        for l in &self.exiting {
            f(BarView {
                index: l.key,
                value: l.element.value,
                rect: l.element.rect_at(now_ms),
                corner_radius: radius,
                exiting: true,
            });
        }
    }

    pub fn collect_bars(&self, now_ms: u64, out: &mut Vec<BarView>) {
        out.clear();
        self.for_each_bar(now_ms, |b| out.push(b));
    }

    pub fn for_each_x_tick(&self, now_ms: u64, f: impl FnMut(TickView<'_>)) {
        self.x_axis.for_each_tick(now_ms, f);
    }

    pub fn for_each_y_tick(&self, now_ms: u64, f: impl FnMut(TickView<'_>)) {
        self.y_axis.for_each_tick(now_ms, f);
    }
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new(BarChartOptions::default())
    }
}

use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::{Participant, workshop_roster};
use crate::chart::BarChart;
use crate::flip_list::FlipList;
use crate::remote_list::RemoteList;
use crate::source::DatasetSource;

/// Values the bar chart starts with.
pub const INITIAL_VALUES: [f64; 6] = [12.0, 36.0, 28.0, 52.0, 14.0, 48.0];

/// A user control on the page. Each activation triggers exactly one widget update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    RandomizeData,
    ShuffleParticipants,
    LoadRemote,
}

impl Control {
    pub const ALL: [Control; 3] = [
        Control::RandomizeData,
        Control::ShuffleParticipants,
        Control::LoadRemote,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Control::RandomizeData => "Randomize data",
            Control::ShuffleParticipants => "Shuffle participants",
            Control::LoadRemote => "Load Kaggle sample",
        }
    }
}

/// Heading, hint line and control of one page section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Section<'a> {
    pub heading: &'static str,
    pub hint: &'a str,
    pub control: Control,
}

/// The three demo widgets wired to their controls.
pub struct Page<S, G> {
    chart: BarChart,
    values: Vec<f64>,
    participants: Vec<Participant>,
    flip: FlipList<Participant>,
    remote: RemoteList<S>,
    rng: G,
}

impl<S: DatasetSource, G: Rng> Page<S, G> {
    /// Builds the page and renders the initial chart and roster at `now_ms`.
    pub fn new(remote: RemoteList<S>, rng: G, now_ms: u64) -> Self {
        let values = INITIAL_VALUES.to_vec();
        let participants = workshop_roster();
        let mut chart = BarChart::default();
        chart.update(&values, now_ms);
        let mut flip = FlipList::default();
        flip.update(participants.iter().cloned(), now_ms);
        Self {
            chart,
            values,
            participants,
            flip,
            remote,
            rng,
        }
    }

    pub fn chart(&self) -> &BarChart {
        &self.chart
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn flip_list(&self) -> &FlipList<Participant> {
        &self.flip
    }

    pub fn remote(&self) -> &RemoteList<S> {
        &self.remote
    }

    pub fn sections(&self) -> [Section<'_>; 3] {
        [
            Section {
                heading: "Animated bar chart",
                hint: "Click the button to randomize values and watch the transitions.",
                control: Control::RandomizeData,
            },
            Section {
                heading: "DOM binding example",
                hint: "This list is data-bound. Click shuffle to see the DOM update.",
                control: Control::ShuffleParticipants,
            },
            Section {
                heading: "Remote Kaggle dataset",
                hint: self.remote.status_message(),
                control: Control::LoadRemote,
            },
        ]
    }

    pub async fn activate(&mut self, control: Control, now_ms: u64) {
        vdebug!(control = control.label(), now_ms, "Page::activate");
        match control {
            Control::RandomizeData => {
                let rng = &mut self.rng;
                for v in &mut self.values {
                    *v = (10.0 + rng.random::<f64>() * 55.0).round();
                }
                self.chart.update(&self.values, now_ms);
            }
            Control::ShuffleParticipants => {
                self.participants.shuffle(&mut self.rng);
                self.flip.update(self.participants.iter().cloned(), now_ms);
            }
            Control::LoadRemote => {
                self.remote.load().await;
            }
        }
    }

    /// Animation frame for every widget. Returns `true` while anything is still moving.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let chart = self.chart.tick(now_ms);
        let flip = self.flip.tick(now_ms);
        let remote = self.remote.tick(now_ms);
        chart || flip || remote
    }
}

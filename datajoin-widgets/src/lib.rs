//! Headless widgets built on the `datajoin` crate.
//!
//! Every widget owns its state and geometry but never any UI object. An adapter feeds it
//! data and a millisecond clock, then draws the snapshots it hands out:
//!
//! - [`BarChart`]: bars keyed by position, with animated band/linear axes
//! - [`FlipList`]: a card grid keyed by record identity that animates reorders with FLIP
//! - [`RemoteList`]: cards loaded from a remote CSV, with a single-flight `load`
//!
//! [`Page`] wires the three together behind their controls.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod axis;
mod books;
mod card;
mod chart;
mod error;
mod flip_list;
mod leaving;
mod page;
mod remote_list;
mod source;


pub use axis::{Axis, AxisOrient, TickView, band_ticks, format_tick, linear_ticks};
pub use books::{Book, decode_books, top_books};
pub use card::{Card, CardRecord, CardView, GridLayout, Participant, workshop_roster};
pub use chart::{BarChart, BarChartOptions, BarView, ChartLayout};
pub use error::LoadError;
pub use flip_list::{FlipList, FlipListOptions};
pub use page::{Control, INITIAL_VALUES, Page, Section};
pub use remote_list::{
    Clock, LoadOutcome, LoadStatus, RemoteList, RemoteListOptions, StatusMessages,
};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{DatasetSource, GOODBOOKS_URL};

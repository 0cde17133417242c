//! A headless keyed data-join engine.
//!
//! For ready-made widgets (bar chart, FLIP card list, remote card list), see the
//! `datajoin-widgets` crate.
//!
//! This crate holds the pieces every data-bound view needs: keyed reconciliation of rendered
//! elements against a new dataset (enter / update / exit), continuous and band scales with
//! "nice" tick rounding, time-sampled tweens, and FLIP bookkeeping for animating reorders.
//!
//! It is UI-agnostic. A rendering layer is expected to provide:
//! - the datasets and a key function
//! - a clock (`now_ms`) for sampling animations
//! - layout measurements when using FLIP
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

pub mod flip;
mod join;
mod key;
mod scale;
mod tween;
mod types;

#[cfg(test)]
mod tests;

pub use flip::{FlipPhase, Inversion, PositionSnapshot};
pub use join::{Entering, Exiting, Join, JoinStats, KeyedList, Persisting, reconcile};
pub use key::{JoinKey, KeyMap};
pub use scale::{BandScale, LinearScale, tick_increment, ticks};
pub use tween::{Animated, Easing, Timing, Tween};
pub use types::{Margin, Offset, Rect};

//! First-Last-Invert-Play bookkeeping.
//!
//! A FLIP update runs as a fixed sequence: measure every element ("first"), mutate the
//! container, flush layout and measure again ("last"), then start each element from the
//! inverted offset and let it animate back to rest ("play"). The stages are separate types so
//! that measuring "last" before the mutation, or inverting before the layout flush, does not
//! compile.

use alloc::vec::Vec;

use crate::key::{JoinKey, KeyMap};
use crate::{Offset, Rect};

/// Where a rendered element is in its FLIP cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlipPhase {
    MeasuredBefore,
    Mutated,
    MeasuredAfter,
    TransformApplied,
    /// At rest, or animating back to rest.
    #[default]
    TransformCleared,
}

/// Bounding boxes keyed by element identity, valid for a single update.
#[derive(Clone, Debug)]
pub struct PositionSnapshot<K> {
    boxes: KeyMap<K, Rect>,
}

impl<K: JoinKey> PositionSnapshot<K> {
    pub fn capture(boxes: impl IntoIterator<Item = (K, Rect)>) -> Self {
        Self {
            boxes: boxes.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &K) -> Option<Rect> {
        self.boxes.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// The starting point of an element's play animation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inversion {
    pub offset: Offset,
    pub opacity: f32,
    /// `true` when the element had no "first" box.
    pub entering: bool,
}

impl Inversion {
    pub fn between(first: Option<Rect>, last: Rect, enter_offset: Offset) -> Self {
        match first {
            Some(first) => Self {
                offset: Offset::between(first, last),
                opacity: 1.0,
                entering: false,
            },
            None => Self {
                offset: enter_offset,
                opacity: 0.0,
                entering: true,
            },
        }
    }
}

/// Stage 1: boxes measured before the container is touched.
#[derive(Clone, Debug)]
pub struct First<K> {
    first: PositionSnapshot<K>,
}

impl<K: JoinKey> First<K> {
    pub fn capture(boxes: impl IntoIterator<Item = (K, Rect)>) -> Self {
        let first = PositionSnapshot::capture(boxes);
        vtrace!(measured = first.len(), "flip: first");
        Self { first }
    }

    pub fn snapshot(&self) -> &PositionSnapshot<K> {
        &self.first
    }

    /// Runs the container mutation. Its result is passed through.
    pub fn mutate<R>(self, mutation: impl FnOnce() -> R) -> (Mutated<K>, R) {
        let out = mutation();
        (Mutated { first: self.first }, out)
    }
}

/// Stage 2: the container reflects the new data but layout has not been read back yet.
#[derive(Clone, Debug)]
pub struct Mutated<K> {
    first: PositionSnapshot<K>,
}

impl<K: JoinKey> Mutated<K> {
    /// The synchronization point: `flush` must lay the container out and report the boxes of
    /// every element that is still rendered.
    pub fn flush<I>(self, flush: impl FnOnce() -> I) -> Measured<K>
    where
        I: IntoIterator<Item = (K, Rect)>,
    {
        let order: Vec<(K, Rect)> = flush().into_iter().collect();
        vtrace!(measured = order.len(), "flip: last");
        Measured {
            first: self.first,
            last: order,
        }
    }
}

/// Stage 3: both snapshots are available.
#[derive(Clone, Debug)]
pub struct Measured<K> {
    first: PositionSnapshot<K>,
    last: Vec<(K, Rect)>,
}

impl<K: JoinKey> Measured<K> {
    pub fn first(&self) -> &PositionSnapshot<K> {
        &self.first
    }

    /// The "last" boxes in render order.
    pub fn last(&self) -> &[(K, Rect)] {
        &self.last
    }

    /// Inverts every rendered element, in render order.
    ///
    /// Elements without a "first" box start at `enter_offset` and fully transparent.
    pub fn invert(self, enter_offset: Offset) -> Vec<(K, Inversion)> {
        let Measured { first, last } = self;
        last.into_iter()
            .map(|(key, last)| {
                let inv = Inversion::between(first.get(&key), last, enter_offset);
                (key, inv)
            })
            .collect()
    }
}

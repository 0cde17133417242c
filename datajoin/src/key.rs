#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Key → value map used by the reconciler and position snapshots.
#[cfg(feature = "std")]
pub type KeyMap<K, V> = HashMap<K, V>;
/// Key → value map used by the reconciler and position snapshots.
#[cfg(not(feature = "std"))]
pub type KeyMap<K, V> = BTreeMap<K, V>;

/// Bound for item keys.
///
/// With `std` keys are hashed; without it they are ordered.
#[cfg(feature = "std")]
pub trait JoinKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> JoinKey for K {}

/// Bound for item keys.
///
/// With `std` keys are hashed; without it they are ordered.
#[cfg(not(feature = "std"))]
pub trait JoinKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> JoinKey for K {}

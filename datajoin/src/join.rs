use alloc::vec::Vec;
use core::fmt;
use core::iter::Peekable;

use crate::key::{JoinKey, KeyMap};

/// A new datum whose key had no rendered element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entering<K, T> {
    /// Position in the new dataset.
    pub index: usize,
    pub key: K,
    pub item: T,
}

/// A new datum matched to the element previously rendered under the same key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Persisting<K, T, E> {
    /// Position in the new dataset.
    pub index: usize,
    pub key: K,
    pub item: T,
    pub element: E,
}

/// A rendered element whose key is absent from the new dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exiting<K, E> {
    pub key: K,
    pub element: E,
}

/// The result of a keyed reconciliation pass.
///
/// `entering` and `persisting` are each sorted by `index`; together they cover
/// `0..new_len` exactly once. `exiting` keeps the order the elements were rendered in.
#[derive(Clone, PartialEq, Eq)]
pub struct Join<K, T, E> {
    pub entering: Vec<Entering<K, T>>,
    pub persisting: Vec<Persisting<K, T, E>>,
    pub exiting: Vec<Exiting<K, E>>,
}

impl<K: fmt::Debug, T, E> fmt::Debug for Join<K, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Join")
            .field(
                "entering",
                &self.entering.iter().map(|e| &e.key).collect::<Vec<_>>(),
            )
            .field(
                "persisting",
                &self.persisting.iter().map(|p| &p.key).collect::<Vec<_>>(),
            )
            .field(
                "exiting",
                &self.exiting.iter().map(|x| &x.key).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Partitions `new_items` against the `old` rendered elements by key.
///
/// `key_of(index, &item)` must be pure. Keys are expected to be unique within `new_items`;
/// when they are not, the first occurrence claims the old element and later ones enter.
/// Duplicate keys among `old` send every occurrence but the first to `exiting`.
///
/// This function has no side effects; rendering is up to the caller (see [`Join::apply`]).
pub fn reconcile<K, T, E>(
    old: impl IntoIterator<Item = (K, E)>,
    new_items: impl IntoIterator<Item = T>,
    mut key_of: impl FnMut(usize, &T) -> K,
) -> Join<K, T, E>
where
    K: JoinKey,
{
    let mut slots: Vec<Option<(K, E)>> = Vec::new();
    let mut by_key: KeyMap<K, usize> = KeyMap::new();
    for (key, element) in old {
        if by_key.contains_key(&key) {
            vwarn!("reconcile: duplicate key among rendered elements");
        } else {
            by_key.insert(key.clone(), slots.len());
        }
        slots.push(Some((key, element)));
    }

    let mut seen: KeyMap<K, ()> = KeyMap::new();
    let mut entering = Vec::new();
    let mut persisting = Vec::new();
    for (index, item) in new_items.into_iter().enumerate() {
        let key = key_of(index, &item);
        if seen.insert(key.clone(), ()).is_some() {
            vwarn!(index, "reconcile: duplicate key in new data");
        }
        let claimed = by_key
            .remove(&key)
            .and_then(|slot| slots.get_mut(slot))
            .and_then(Option::take);
        match claimed {
            Some((key, element)) => persisting.push(Persisting {
                index,
                key,
                item,
                element,
            }),
            None => entering.push(Entering { index, key, item }),
        }
    }

    let exiting: Vec<_> = slots
        .into_iter()
        .flatten()
        .map(|(key, element)| Exiting { key, element })
        .collect();

    vtrace!(
        entering = entering.len(),
        persisting = persisting.len(),
        exiting = exiting.len(),
        "reconcile"
    );

    Join {
        entering,
        persisting,
        exiting,
    }
}

impl<K, T, E> Join<K, T, E> {
    pub fn len(&self) -> usize {
        self.entering.len() + self.persisting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.persisting.is_empty()
    }

    /// Renders the join through the three callbacks and returns the merged elements in
    /// new-data order.
    ///
    /// - `on_enter(index, &key, item)` creates the element for a new key.
    /// - `on_update(index, &key, item, &mut element)` refreshes a surviving element.
    /// - `on_exit(key, element)` receives every element that left the dataset.
    ///
    /// Exiting elements are handed over first, then entering and persisting ones in data order.
    pub fn apply(
        self,
        mut on_enter: impl FnMut(usize, &K, T) -> E,
        mut on_update: impl FnMut(usize, &K, T, &mut E),
        mut on_exit: impl FnMut(K, E),
    ) -> Vec<(K, E)> {
        let Join {
            entering,
            persisting,
            exiting,
        } = self;

        for Exiting { key, element } in exiting {
            on_exit(key, element);
        }

        let mut merged = Vec::with_capacity(entering.len() + persisting.len());
        let mut entering = entering.into_iter().peekable();
        let mut persisting = persisting.into_iter().peekable();
        loop {
            match next_in_order(&mut entering, &mut persisting) {
                Some(Next::Enter(Entering { index, key, item })) => {
                    let element = on_enter(index, &key, item);
                    merged.push((key, element));
                }
                Some(Next::Update(Persisting {
                    index,
                    key,
                    item,
                    mut element,
                })) => {
                    on_update(index, &key, item, &mut element);
                    merged.push((key, element));
                }
                None => break,
            }
        }
        merged
    }
}

enum Next<K, T, E> {
    Enter(Entering<K, T>),
    Update(Persisting<K, T, E>),
}

fn next_in_order<K, T, E>(
    entering: &mut Peekable<impl Iterator<Item = Entering<K, T>>>,
    persisting: &mut Peekable<impl Iterator<Item = Persisting<K, T, E>>>,
) -> Option<Next<K, T, E>> {
    let enter_first = match (entering.peek(), persisting.peek()) {
        (Some(e), Some(p)) => e.index < p.index,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => return None,
    };
    if enter_first {
        entering.next().map(Next::Enter)
    } else {
        persisting.next().map(Next::Update)
    }
}

/// Counts reported by [`KeyedList::join`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoinStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// An ordered container of rendered elements, each bound to one key.
///
/// This is the "live container" a widget owns: it is reconciled in place against every new
/// dataset and iterates in data order.
#[derive(Clone, Debug)]
pub struct KeyedList<K, E> {
    items: Vec<(K, E)>,
    positions: KeyMap<K, usize>,
}

impl<K: JoinKey, E> Default for KeyedList<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: JoinKey, E> KeyedList<K, E> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: KeyMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &E)> {
        self.items.iter().map(|(k, e)| (k, e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut E)> {
        self.items.iter_mut().map(|(k, e)| (&*k, e))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.items.iter().map(|(k, _)| k)
    }

    pub fn position(&self, key: &K) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn get(&self, key: &K) -> Option<&E> {
        let i = self.position(key)?;
        self.items.get(i).map(|(_, e)| e)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut E> {
        let i = self.position(key)?;
        self.items.get_mut(i).map(|(_, e)| e)
    }

    /// Binds `element` to `key`. An element already bound to `key` is replaced and returned;
    /// otherwise the element is appended.
    pub fn insert(&mut self, key: K, element: E) -> Option<E> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(core::mem::replace(slot, element));
        }
        self.positions.insert(key.clone(), self.items.len());
        self.items.push((key, element));
        None
    }

    /// Reconciles the container against `new_items` and renders the result in place.
    ///
    /// See [`reconcile`] and [`Join::apply`] for the callback contract.
    pub fn join<T>(
        &mut self,
        new_items: impl IntoIterator<Item = T>,
        key_of: impl FnMut(usize, &T) -> K,
        on_enter: impl FnMut(usize, &K, T) -> E,
        on_update: impl FnMut(usize, &K, T, &mut E),
        on_exit: impl FnMut(K, E),
    ) -> JoinStats {
        let old = core::mem::take(&mut self.items);
        let join = reconcile(old, new_items, key_of);
        let stats = JoinStats {
            entered: join.entering.len(),
            updated: join.persisting.len(),
            exited: join.exiting.len(),
        };
        self.items = join.apply(on_enter, on_update, on_exit);
        self.reindex();
        vdebug!(
            entered = stats.entered,
            updated = stats.updated,
            exited = stats.exited,
            "KeyedList::join"
        );
        stats
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (i, (k, _)) in self.items.iter().enumerate() {
            // First occurrence wins, matching `reconcile`.
            if !self.positions.contains_key(k) {
                self.positions.insert(k.clone(), i);
            }
        }
    }
}

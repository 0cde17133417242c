use datajoin::{JoinKey, KeyedList};

/// An element detached from the data but still animating out.
#[derive(Clone, Debug)]
pub(crate) struct Leaving<K, E> {
    pub key: K,
    pub element: E,
    pub remove_at_ms: u64,
}

/// Drops every element whose exit finished at or before `now_ms`. Returns how many were removed.
pub(crate) fn sweep<K, E>(leaving: &mut Vec<Leaving<K, E>>, now_ms: u64) -> usize {
    let before = leaving.len();
    leaving.retain(|l| l.remove_at_ms > now_ms);
    before - leaving.len()
}

/// Moves leaving elements whose key is `wanted` back into `list`, cancelling their exit.
///
/// Expired exits are swept first. The next join then rebinds each reclaimed element instead of
/// entering a second one under the same key. Returns how many were reclaimed.
pub(crate) fn reclaim<K: JoinKey, E>(
    leaving: &mut Vec<Leaving<K, E>>,
    list: &mut KeyedList<K, E>,
    now_ms: u64,
    mut wanted: impl FnMut(&K) -> bool,
) -> usize {
    sweep(leaving, now_ms);
    let mut reclaimed = 0;
    let mut kept = Vec::with_capacity(leaving.len());
    for l in leaving.drain(..) {
        if list.position(&l.key).is_none() && wanted(&l.key) {
            list.insert(l.key, l.element);
            reclaimed += 1;
        } else {
            kept.push(l);
        }
    }
    *leaving = kept;
    reclaimed
}

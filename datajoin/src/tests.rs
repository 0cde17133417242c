use crate::flip::First;
use crate::*;

use alloc::vec;
use alloc::vec::Vec;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.gen_range_usize(0, i + 1);
            items.swap(i, j);
        }
    }
}

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-3, "expected {b}, got {a}");
}

fn keys_of<K: Clone, T, E>(join: &Join<K, T, E>) -> (Vec<K>, Vec<K>, Vec<K>) {
    (
        join.entering.iter().map(|e| e.key.clone()).collect(),
        join.persisting.iter().map(|p| p.key.clone()).collect(),
        join.exiting.iter().map(|x| x.key.clone()).collect(),
    )
}

#[test]
fn reconcile_partitions_by_key() {
    let old = vec![("a", 1), ("b", 2), ("c", 3)];
    let join = reconcile(old, ["c", "d", "a"], |_, s| *s);

    let (entering, persisting, exiting) = keys_of(&join);
    assert_eq!(entering, vec!["d"]);
    assert_eq!(persisting, vec!["c", "a"]);
    assert_eq!(exiting, vec!["b"]);

    // Persisting items carry the element previously rendered for their key.
    assert_eq!(join.persisting[0].element, 3);
    assert_eq!(join.persisting[1].element, 1);
    assert_eq!(join.entering[0].index, 1);
}

#[test]
fn reconcile_of_empty_old_enters_everything() {
    let join = reconcile(Vec::<(u32, ())>::new(), [5u32, 6, 7], |_, v| *v);
    assert_eq!(join.entering.len(), 3);
    assert!(join.persisting.is_empty());
    assert!(join.exiting.is_empty());
}

#[test]
fn reconcile_to_empty_exits_everything_in_render_order() {
    let join = reconcile(vec![(2, 'x'), (0, 'y'), (1, 'z')], Vec::<u8>::new(), |i, _| i);
    assert!(join.is_empty());
    let (_, _, exiting) = keys_of(&join);
    assert_eq!(exiting, vec![2, 0, 1]);
}

#[test]
fn reconcile_index_keys_track_positions() {
    // Keyed by index, a shorter dataset keeps the prefix and exits the tail.
    let old: Vec<(usize, f64)> = (0..5).map(|i| (i, i as f64)).collect();
    let join = reconcile(old, [9.0, 8.0], |i, _| i);
    let (entering, persisting, exiting) = keys_of(&join);
    assert!(entering.is_empty());
    assert_eq!(persisting, vec![0, 1]);
    assert_eq!(exiting, vec![2, 3, 4]);
}

#[test]
fn reconcile_duplicate_new_key_enters_second_occurrence() {
    let join = reconcile(vec![("a", 0)], ["a", "a"], |_, s| *s);
    assert_eq!(join.persisting.len(), 1);
    assert_eq!(join.persisting[0].index, 0);
    assert_eq!(join.entering.len(), 1);
    assert_eq!(join.entering[0].index, 1);
    assert!(join.exiting.is_empty());
}

#[test]
fn reconcile_duplicate_old_key_exits_the_twin() {
    let join = reconcile(vec![("a", 0), ("a", 1)], ["a"], |_, s| *s);
    assert_eq!(join.persisting[0].element, 0);
    assert_eq!(join.exiting.len(), 1);
    assert_eq!(join.exiting[0].element, 1);
}

#[test]
fn reconcile_set_laws_hold_for_random_inputs() {
    let mut rng = Lcg::new(7);
    for _ in 0..200 {
        let mut universe: Vec<u64> = (0..40).collect();
        rng.shuffle(&mut universe);
        let old_len = rng.gen_range_usize(0, 20);
        let old: Vec<u64> = universe[..old_len].to_vec();

        rng.shuffle(&mut universe);
        let new_len = rng.gen_range_usize(0, 20);
        let new: Vec<u64> = universe[..new_len].to_vec();

        let join = reconcile(
            old.iter().map(|k| (*k, ())),
            new.iter().copied(),
            |_, k| *k,
        );
        let (entering, persisting, exiting) = keys_of(&join);

        let o: BTreeSet<u64> = old.iter().copied().collect();
        let n: BTreeSet<u64> = new.iter().copied().collect();
        let ent: BTreeSet<u64> = entering.iter().copied().collect();
        let per: BTreeSet<u64> = persisting.iter().copied().collect();
        let ex: BTreeSet<u64> = exiting.iter().copied().collect();

        assert_eq!(ent.union(&per).copied().collect::<BTreeSet<_>>(), n);
        assert_eq!(per.union(&ex).copied().collect::<BTreeSet<_>>(), o);
        assert!(ent.is_disjoint(&ex));
        assert!(ent.is_disjoint(&per));

        // Entering + persisting, merged by index, replay the new order.
        let merged = join.apply(|_, _, _| (), |_, _, _, _| {}, |_, _| {});
        let merged_keys: Vec<u64> = merged.iter().map(|(k, _)| *k).collect();
        assert_eq!(merged_keys, new);
    }
}

#[test]
fn apply_runs_each_callback_once_per_item() {
    let join = reconcile(vec![(1, 10), (2, 20)], [2, 3], |_, k| *k);
    let mut entered = Vec::new();
    let mut updated = Vec::new();
    let mut exited = Vec::new();
    let merged = join.apply(
        |i, k, _| {
            entered.push((i, *k));
            *k * 100
        },
        |i, k, _, e| {
            updated.push((i, *k));
            *e += 1;
        },
        |k, e| exited.push((k, e)),
    );
    assert_eq!(entered, vec![(1, 3)]);
    assert_eq!(updated, vec![(0, 2)]);
    assert_eq!(exited, vec![(1, 10)]);
    assert_eq!(merged, vec![(2, 21), (3, 300)]);
}

#[test]
fn keyed_list_join_reuses_elements_and_follows_data_order() {
    let mut list: KeyedList<&str, Vec<u32>> = KeyedList::new();
    let stats = list.join(
        [("a", 1), ("b", 2)],
        |_, (k, _)| *k,
        |_, _, (_, v)| vec![v],
        |_, _, (_, v), e| e.push(v),
        |_, _| {},
    );
    assert_eq!(
        stats,
        JoinStats {
            entered: 2,
            updated: 0,
            exited: 0
        }
    );

    let mut gone = Vec::new();
    let stats = list.join(
        [("b", 3), ("c", 4)],
        |_, (k, _)| *k,
        |_, _, (_, v)| vec![v],
        |_, _, (_, v), e| e.push(v),
        |k, _| gone.push(k),
    );
    assert_eq!(
        stats,
        JoinStats {
            entered: 1,
            updated: 1,
            exited: 1
        }
    );
    assert_eq!(gone, vec!["a"]);
    assert_eq!(list.keys().copied().collect::<Vec<_>>(), vec!["b", "c"]);
    assert_eq!(list.get(&"b"), Some(&vec![2, 3]));
    assert_eq!(list.position(&"c"), Some(1));
    assert!(list.get(&"a").is_none());
}

#[test]
fn keyed_list_insert_appends_or_replaces() {
    let mut list: KeyedList<&str, u32> = KeyedList::new();
    list.join([("a", 1)], |_, (k, _)| *k, |_, _, (_, v)| v, |_, _, _, _| {}, |_, _| {});

    assert_eq!(list.insert("b", 2), None);
    assert_eq!(list.position(&"b"), Some(1));
    assert_eq!(list.insert("a", 10), Some(1));
    assert_eq!(list.get(&"a"), Some(&10));
    assert_eq!(list.len(), 2);

    // An inserted element is reused by the next join like any other.
    let stats = list.join(
        [("b", 20), ("a", 30)],
        |_, (k, _)| *k,
        |_, _, (_, v)| v,
        |_, _, (_, v), e| *e += v,
        |_, _| {},
    );
    assert_eq!(stats.updated, 2);
    assert_eq!(list.keys().copied().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(list.get(&"b"), Some(&22));
}

#[test]
fn nice_rounds_upper_bound_to_tick_step() {
    let mut y = LinearScale::new((0.0, 52.0), (300.0, 0.0));
    y.nice(10);
    assert_eq!(y.domain(), (0.0, 55.0));
    assert_eq!(y.tick_step(10), 5.0);
}

#[test]
fn nice_widens_collapsed_domain() {
    let mut y = LinearScale::new((0.0, 0.0), (300.0, 0.0));
    y.nice(10);
    let (lo, hi) = y.domain();
    assert_eq!(lo, 0.0);
    assert!(hi > 0.0 && hi.is_finite());
    assert_close(y.apply(0.0), 300.0);
}

#[test]
fn nice_keeps_already_round_domain() {
    let mut y = LinearScale::new((0.0, 60.0), (0.0, 1.0));
    y.nice(10);
    assert_eq!(y.domain(), (0.0, 60.0));

    let mut small = LinearScale::new((0.0, 0.93), (0.0, 1.0));
    small.nice(10);
    assert!((small.domain().1 - 1.0).abs() < 1e-12);
}

#[test]
fn linear_scale_maps_inverted_range() {
    let y = LinearScale::new((0.0, 60.0), (300.0, 0.0));
    assert_close(y.apply(0.0), 300.0);
    assert_close(y.apply(60.0), 0.0);
    assert_close(y.apply(30.0), 150.0);
}

#[test]
fn ticks_cover_domain_with_round_values() {
    let t = ticks(0.0, 55.0, 10);
    assert_eq!(t.len(), 12);
    assert_eq!(t.first(), Some(&0.0));
    assert_eq!(t.last(), Some(&55.0));
    assert!(t.windows(2).all(|w| (w[1] - w[0] - 5.0).abs() < 1e-9));

    let t = ticks(0.0, 1.0, 10);
    assert_eq!(t.len(), 11);
    assert!((t[3] - 0.3).abs() < 1e-12);

    assert_eq!(ticks(3.0, 3.0, 10), vec![3.0]);
    assert!(ticks(0.0, 1.0, 0).is_empty());

    let rev = ticks(10.0, 0.0, 5);
    assert_eq!(rev.first(), Some(&10.0));
    assert_eq!(rev.last(), Some(&0.0));
}

#[test]
fn band_scale_spaces_bands_with_padding() {
    let x = BandScale::new(6, (0.0, 492.0)).with_padding(0.15);
    assert_close(x.step(), 80.0);
    assert_close(x.bandwidth(), 68.0);
    assert_close(x.position(0).unwrap(), 12.0);
    assert_close(x.position(5).unwrap(), 412.0);
    assert!(x.position(6).is_none());

    // Outer padding is symmetric.
    let last_end = x.position(5).unwrap() + x.bandwidth();
    assert_close(492.0 - last_end, x.position(0).unwrap());
}

#[test]
fn band_scale_with_single_band_is_centered() {
    let mut x = BandScale::new(6, (0.0, 100.0)).with_padding(0.15);
    x.set_count(1);
    let start = x.position(0).unwrap();
    assert_close(start + x.bandwidth() / 2.0, 50.0);
}

#[test]
fn tween_waits_for_delay_then_eases_to_target() {
    let tw = Tween::new(
        0.0,
        100.0,
        1_000,
        Timing::new(800, Easing::CubicInOut).with_delay(120),
    );
    assert_eq!(tw.sample(1_000), 0.0);
    assert_eq!(tw.sample(1_119), 0.0);
    assert_close(tw.sample(1_120 + 400), 50.0);
    assert_eq!(tw.sample(1_920), 100.0);
    assert!(!tw.is_done(1_919));
    assert!(tw.is_done(1_920));
}

#[test]
fn immediate_timing_jumps() {
    let tw = Tween::new(3.0, 7.0, 50, Timing::immediate());
    assert_eq!(tw.sample(50), 7.0);
    assert!(tw.is_done(50));
}

#[test]
fn animated_retarget_continues_from_current_value() {
    let mut a = Animated::new(0.0);
    a.animate_to(0, 100.0, Timing::new(100, Easing::Linear));
    assert_close(a.value_at(50), 50.0);

    a.animate_to(50, 0.0, Timing::new(100, Easing::Linear));
    assert_close(a.value_at(50), 50.0);
    assert_close(a.value_at(100), 25.0);
    assert_eq!(a.target(), 0.0);
    assert!(a.is_settled(150));
}

#[test]
fn easing_curves_hit_endpoints_and_are_monotonic() {
    for easing in [
        Easing::Linear,
        Easing::CubicInOut,
        Easing::Ease,
        Easing::Standard,
        Easing::CubicBezier(0.1, 0.7, 1.0, 0.1),
    ] {
        assert_close(easing.sample(0.0), 0.0);
        assert_close(easing.sample(1.0), 1.0);
        if !matches!(easing, Easing::CubicBezier(..)) {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = easing.sample(i as f32 / 100.0);
                assert!(v + 1e-4 >= prev, "{easing:?} not monotonic at {i}");
                prev = v;
            }
        }
    }
    assert_close(Easing::Ease.sample(0.5), 0.8024);
}

#[test]
fn flip_inverts_moved_and_entering_elements() {
    let first = First::capture([
        ("a", Rect::new(0.0, 0.0, 10.0, 10.0)),
        ("b", Rect::new(20.0, 0.0, 10.0, 10.0)),
    ]);
    let (mutated, ()) = first.mutate(|| {});
    let measured = mutated.flush(|| {
        [
            ("b", Rect::new(0.0, 0.0, 10.0, 10.0)),
            ("a", Rect::new(20.0, 0.0, 10.0, 10.0)),
            ("c", Rect::new(0.0, 30.0, 10.0, 10.0)),
        ]
    });
    assert_eq!(measured.first().len(), 2);
    let inv = measured.invert(Offset::new(0.0, 20.0));

    assert_eq!(inv[0].0, "b");
    assert_eq!(inv[0].1.offset, Offset::new(20.0, 0.0));
    assert_eq!(inv[0].1.opacity, 1.0);
    assert_eq!(inv[1].1.offset, Offset::new(-20.0, 0.0));
    assert_eq!(
        inv[2].1,
        Inversion {
            offset: Offset::new(0.0, 20.0),
            opacity: 0.0,
            entering: true,
        }
    );
}

#[test]
fn flip_of_unmoved_element_is_identity() {
    let r = Rect::new(5.0, 5.0, 1.0, 1.0);
    let inv = Inversion::between(Some(r), r, Offset::new(0.0, 20.0));
    assert!(inv.offset.is_zero());
    assert!(!inv.entering);
}

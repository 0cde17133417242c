use datajoin::flip::First;
use datajoin::{Animated, Easing, FlipPhase, KeyMap, KeyedList, Offset, Rect, Timing};

use crate::card::{Card, CardRecord, CardView, GridLayout};
use crate::leaving::{Leaving, reclaim, sweep};

/// Configuration for [`FlipList`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct FlipListOptions {
    pub grid: GridLayout,
    /// Starting translation of newly entered cards.
    pub enter_offset: Offset,
    /// Translation a removed card slides to while fading out.
    pub exit_offset: Offset,
    pub exit: Timing,
    /// Transition of the transform back to rest.
    pub move_timing: Timing,
    /// Transition of the opacity back to 1.
    pub fade_timing: Timing,
}

impl Default for FlipListOptions {
    fn default() -> Self {
        Self {
            grid: GridLayout::default(),
            enter_offset: Offset::new(0.0, 20.0),
            exit_offset: Offset::new(0.0, -20.0),
            exit: Timing::new(200, Easing::Ease),
            move_timing: Timing::new(450, Easing::Standard),
            fade_timing: Timing::new(300, Easing::Ease),
        }
    }
}

impl FlipListOptions {
    pub fn with_grid(mut self, grid: GridLayout) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_enter_offset(mut self, offset: Offset) -> Self {
        self.enter_offset = offset;
        self
    }

    pub fn with_exit(mut self, offset: Offset, timing: Timing) -> Self {
        self.exit_offset = offset;
        self.exit = timing;
        self
    }

    pub fn with_move_timing(mut self, timing: Timing) -> Self {
        self.move_timing = timing;
        self
    }

    pub fn with_fade_timing(mut self, timing: Timing) -> Self {
        self.fade_timing = timing;
        self
    }
}

#[derive(Clone, Debug)]
struct FlipCard {
    card: Card,
    slot: Rect,
    dx: Animated,
    dy: Animated,
    opacity: Animated,
    phase: FlipPhase,
}

impl FlipCard {
    fn entering(card: Card) -> Self {
        Self {
            card,
            slot: Rect::default(),
            dx: Animated::new(0.0),
            dy: Animated::new(0.0),
            opacity: Animated::new(0.0),
            phase: FlipPhase::Mutated,
        }
    }

    fn transform_at(&self, now_ms: u64) -> Offset {
        Offset::new(self.dx.value_at(now_ms), self.dy.value_at(now_ms))
    }

    fn bounding_box(&self, now_ms: u64) -> Rect {
        self.slot.translated(self.transform_at(now_ms))
    }

    fn is_settled(&self, now_ms: u64) -> bool {
        self.dx.is_settled(now_ms) && self.dy.is_settled(now_ms) && self.opacity.is_settled(now_ms)
    }

    fn view<'a, K>(&'a self, key: &'a K, now_ms: u64, leaving: bool) -> CardView<'a, K> {
        CardView {
            key,
            card: &self.card,
            slot: self.slot,
            transform: self.transform_at(now_ms),
            opacity: self.opacity.value_at(now_ms),
            leaving,
        }
    }
}

/// A card grid that animates reorders with FLIP.
///
/// Each `update` measures every card, reconciles, lays the grid out again, and starts every
/// card from its old on-screen position. The next `tick` (the adapter's animation frame)
/// releases the cards so they glide to their new slots.
#[derive(Clone, Debug)]
pub struct FlipList<R: CardRecord> {
    options: FlipListOptions,
    cards: KeyedList<R::Key, FlipCard>,
    leaving: Vec<Leaving<R::Key, FlipCard>>,
    pending_play: bool,
}

impl<R: CardRecord> FlipList<R> {
    pub fn new(options: FlipListOptions) -> Self {
        Self {
            options,
            cards: KeyedList::new(),
            leaving: Vec::new(),
            pending_play: false,
        }
    }

    pub fn options(&self) -> &FlipListOptions {
        &self.options
    }

    /// Reconciles the cards against `items` and inverts every card onto its old box.
    ///
    /// A card still fading out whose key comes back is rebound and starts from where it is
    /// drawn, at its current opacity.
    pub fn update(&mut self, items: impl IntoIterator<Item = R>, now_ms: u64) {
        let items: Vec<R> = items.into_iter().collect();
        let wanted: KeyMap<R::Key, ()> = items.iter().map(|r| (r.key(), ())).collect();
        reclaim(&mut self.leaving, &mut self.cards, now_ms, |k| {
            wanted.contains_key(k)
        });

        // First.
        let first = First::capture(
            self.cards
                .iter()
                .map(|(k, c)| (k.clone(), c.bounding_box(now_ms))),
        );
        for (_, card) in self.cards.iter_mut() {
            card.phase = FlipPhase::MeasuredBefore;
        }

        // Mutate.
        let exit_offset = self.options.exit_offset;
        let exit = self.options.exit;
        let cards = &mut self.cards;
        let leaving = &mut self.leaving;
        let (mutated, _stats) = first.mutate(|| {
            cards.join(
                items,
                |_, r| r.key(),
                |_, _, r| FlipCard::entering(r.card()),
                |_, _, r, c| {
                    c.card = r.card();
                    c.phase = FlipPhase::Mutated;
                },
                |key, mut c| {
                    c.dx.animate_to(now_ms, exit_offset.dx, exit);
                    c.dy.animate_to(now_ms, exit_offset.dy, exit);
                    c.opacity.animate_to(now_ms, 0.0, exit);
                    leaving.push(Leaving {
                        key,
                        element: c,
                        remove_at_ms: now_ms.saturating_add(exit.total_ms()),
                    });
                },
            )
        });
        vdebug!(
            entered = _stats.entered,
            updated = _stats.updated,
            exited = _stats.exited,
            now_ms,
            "FlipList::update"
        );

        // Last: lay the grid out before reading any box back. Boxes come back in render
        // order, so they are paired positionally; a duplicate key still gets its own slot.
        let grid = self.options.grid;
        let measured = mutated.flush(|| grid.flush(self.cards.keys().cloned()));
        for ((_, card), (_, slot)) in self.cards.iter_mut().zip(measured.last()) {
            card.slot = *slot;
            card.phase = FlipPhase::MeasuredAfter;
        }

        // Invert, with transitions disabled.
        let inversions = measured.invert(self.options.enter_offset);
        for ((_, card), (_, inv)) in self.cards.iter_mut().zip(inversions) {
            let opacity = if inv.entering {
                inv.opacity
            } else {
                card.opacity.value_at(now_ms)
            };
            card.dx.set(inv.offset.dx);
            card.dy.set(inv.offset.dy);
            card.opacity.set(opacity);
            card.phase = FlipPhase::TransformApplied;
        }
        self.pending_play = true;
    }

    /// Animation frame: plays a pending FLIP and retires finished exits.
    ///
    /// Returns `true` while anything is still moving.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if std::mem::take(&mut self.pending_play) {
            let move_timing = self.options.move_timing;
            let fade_timing = self.options.fade_timing;
            for (_, card) in self.cards.iter_mut() {
                if card.phase != FlipPhase::TransformApplied {
                    continue;
                }
                card.dx.animate_to(now_ms, 0.0, move_timing);
                card.dy.animate_to(now_ms, 0.0, move_timing);
                card.opacity.animate_to(now_ms, 1.0, fade_timing);
                card.phase = FlipPhase::TransformCleared;
            }
        }
        let removed = sweep(&mut self.leaving, now_ms);
        if removed > 0 {
            vtrace!(removed, now_ms, "FlipList::tick");
        }
        self.is_animating(now_ms)
    }

    pub fn is_animating(&self, now_ms: u64) -> bool {
        self.pending_play
            || !self.leaving.is_empty()
            || self.cards.iter().any(|(_, c)| !c.is_settled(now_ms))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Keys of the cards bound to the current dataset, in render order.
    pub fn keys(&self) -> impl Iterator<Item = &R::Key> {
        self.cards.keys()
    }

    pub fn phase(&self, key: &R::Key) -> Option<FlipPhase> {
        self.cards.get(key).map(|c| c.phase)
    }

    /// Visits every drawn card: bound cards in render order, then leaving ones.
    pub fn for_each_card(&self, now_ms: u64, mut f: impl FnMut(CardView<'_, R::Key>)) {
        for (key, card) in self.cards.iter() {
            f(card.view(key, now_ms, false));
        }
        for l in &self.leaving {
            f(l.element.view(&l.key, now_ms, true));
        }
    }
}

impl<R: CardRecord> Default for FlipList<R> {
    fn default() -> Self {
        Self::new(FlipListOptions::default())
    }
}

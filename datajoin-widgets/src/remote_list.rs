use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::Instant;

use datajoin::{Animated, Easing, KeyedList, Offset, Rect, Timing};

use crate::books::{Book, decode_books, top_books};
use crate::card::{Card, CardRecord, CardView, GridLayout};
use crate::error::LoadError;
use crate::leaving::{Leaving, reclaim, sweep};
use crate::source::DatasetSource;

/// Milliseconds on the adapter's animation clock.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// What a call to [`RemoteList::load`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The dataset was fetched and `shown` cards are bound.
    Loaded { shown: usize },
    /// Fetching or decoding failed; the previous cards are untouched.
    Failed,
    /// Another load was already in flight.
    Skipped,
}

/// User-facing status lines.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StatusMessages {
    pub idle: String,
    pub loading: String,
    pub ready: String,
    pub failed: String,
}

impl Default for StatusMessages {
    fn default() -> Self {
        Self {
            idle: "Load a small sample from the Goodbooks-10k Kaggle dataset (top-rated titles)."
                .to_owned(),
            loading: "Loading dataset from Kaggle...".to_owned(),
            ready: "Top-rated books from Goodbooks-10k (click to reload).".to_owned(),
            failed: "Failed to load Kaggle data. Please try again.".to_owned(),
        }
    }
}

/// Configuration for [`RemoteList`].
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RemoteListOptions {
    pub top_n: usize,
    pub grid: GridLayout,
    pub timing: Timing,
    /// Translation of a card before it enters and after it exits.
    pub slide: Offset,
    pub messages: StatusMessages,
}

impl Default for RemoteListOptions {
    fn default() -> Self {
        Self {
            top_n: 6,
            grid: GridLayout::default(),
            timing: Timing::new(600, Easing::CubicInOut),
            slide: Offset::new(0.0, 12.0),
            messages: StatusMessages::default(),
        }
    }
}

impl RemoteListOptions {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_grid(mut self, grid: GridLayout) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_messages(mut self, messages: StatusMessages) -> Self {
        self.messages = messages;
        self
    }
}

#[derive(Clone, Debug)]
struct FadeCard {
    card: Card,
    slot: Rect,
    dy: Animated,
    opacity: Animated,
}

impl FadeCard {
    fn view<'a>(&'a self, key: &'a u64, now_ms: u64, leaving: bool) -> CardView<'a, u64> {
        CardView {
            key,
            card: &self.card,
            slot: self.slot,
            transform: Offset::new(0.0, self.dy.value_at(now_ms)),
            opacity: self.opacity.value_at(now_ms),
            leaving,
        }
    }
}

/// Releases the in-flight flag on every exit path. A load dropped mid-fetch also puts the
/// status back to what it was before the load started.
struct InFlight<'a> {
    flag: &'a Cell<bool>,
    status: &'a Cell<LoadStatus>,
    previous: LoadStatus,
}

impl<'a> InFlight<'a> {
    fn engage(flag: &'a Cell<bool>, status: &'a Cell<LoadStatus>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        let previous = status.replace(LoadStatus::Loading);
        Some(Self {
            flag,
            status,
            previous,
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
        if self.status.get() == LoadStatus::Loading {
            self.status.set(self.previous);
        }
    }
}

/// A card list fed from a remote CSV: fetch, keep the most-rated books, fade cards in and out.
///
/// All methods take `&self` so an adapter can keep one instance behind a shared handle on a
/// single-threaded event loop; at most one load runs at a time.
pub struct RemoteList<S> {
    source: S,
    options: RemoteListOptions,
    clock: Clock,
    in_flight: Cell<bool>,
    status: Cell<LoadStatus>,
    fetches: Cell<u64>,
    books: RefCell<Vec<Book>>,
    cards: RefCell<KeyedList<u64, FadeCard>>,
    leaving: RefCell<Vec<Leaving<u64, FadeCard>>>,
}

impl<S: DatasetSource> RemoteList<S> {
    pub fn new(source: S, options: RemoteListOptions) -> Self {
        let epoch = Instant::now();
        Self {
            source,
            options,
            clock: Arc::new(move || epoch.elapsed().as_millis() as u64),
            in_flight: Cell::new(false),
            status: Cell::new(LoadStatus::Idle),
            fetches: Cell::new(0),
            books: RefCell::new(Vec::new()),
            cards: RefCell::new(KeyedList::new()),
            leaving: RefCell::new(Vec::new()),
        }
    }

    /// Uses `clock` for the start time of transitions scheduled by `load`.
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn options(&self) -> &RemoteListOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn status(&self) -> LoadStatus {
        self.status.get()
    }

    pub fn status_message(&self) -> &str {
        let m = &self.options.messages;
        match self.status.get() {
            LoadStatus::Idle => &m.idle,
            LoadStatus::Loading => &m.loading,
            LoadStatus::Ready => &m.ready,
            LoadStatus::Failed => &m.failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.get()
    }

    /// How many times the source has been asked for data.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.get()
    }

    /// The books currently shown.
    pub fn books(&self) -> Vec<Book> {
        self.books.borrow().clone()
    }

    /// Fetches, filters and renders the dataset.
    ///
    /// Never fails: errors are logged and reported through [`RemoteList::status`]. A call made
    /// while another load is in flight returns [`LoadOutcome::Skipped`] without fetching. Every
    /// completed call refetches; nothing is served from the previous result.
    pub async fn load(&self) -> LoadOutcome {
        let Some(_in_flight) = InFlight::engage(&self.in_flight, &self.status) else {
            vwarn!("RemoteList::load: already in flight, skipped");
            return LoadOutcome::Skipped;
        };

        match self.fetch_top().await {
            Ok(books) => {
                let shown = books.len();
                let now_ms = (self.clock)();
                self.render(&books, now_ms);
                *self.books.borrow_mut() = books;
                self.status.set(LoadStatus::Ready);
                vdebug!(shown, now_ms, "RemoteList::load: ready");
                LoadOutcome::Loaded { shown }
            }
            Err(_err) => {
                verror!(error = %_err, "Failed to load remote dataset");
                self.status.set(LoadStatus::Failed);
                LoadOutcome::Failed
            }
        }
    }

    async fn fetch_top(&self) -> Result<Vec<Book>, LoadError> {
        self.fetches.set(self.fetches.get() + 1);
        let text = self.source.fetch().await?;
        let books = decode_books(&text)?;
        Ok(top_books(books, self.options.top_n))
    }

    fn render(&self, books: &[Book], now_ms: u64) {
        let timing = self.options.timing;
        let slide = self.options.slide.dy;
        let mut cards = self.cards.borrow_mut();
        let mut leaving = self.leaving.borrow_mut();
        reclaim(&mut leaving, &mut cards, now_ms, |id| {
            books.iter().any(|b| b.book_id == *id)
        });
        cards.join(
            books.iter(),
            |_, b| b.key(),
            |_, _, b| FadeCard {
                card: b.card(),
                slot: Rect::default(),
                dy: Animated::new(slide),
                opacity: Animated::new(0.0),
            },
            |_, _, b, c| c.card = b.card(),
            |key, mut c| {
                c.dy.animate_to(now_ms, slide, timing);
                c.opacity.animate_to(now_ms, 0.0, timing);
                leaving.push(Leaving {
                    key,
                    element: c,
                    remove_at_ms: now_ms.saturating_add(timing.total_ms()),
                });
            },
        );

        let grid = self.options.grid;
        for (i, (_, c)) in cards.iter_mut().enumerate() {
            c.slot = grid.slot(i);
            c.dy.animate_to(now_ms, 0.0, timing);
            c.opacity.animate_to(now_ms, 1.0, timing);
        }
    }

    /// Retires finished exits. Returns `true` while anything is still moving.
    pub fn tick(&self, now_ms: u64) -> bool {
        sweep(&mut self.leaving.borrow_mut(), now_ms);
        self.is_animating(now_ms)
    }

    pub fn is_animating(&self, now_ms: u64) -> bool {
        !self.leaving.borrow().is_empty()
            || self
                .cards
                .borrow()
                .iter()
                .any(|(_, c)| !c.dy.is_settled(now_ms) || !c.opacity.is_settled(now_ms))
    }

    /// Ids of the bound cards, in render order.
    pub fn keys(&self) -> Vec<u64> {
        self.cards.borrow().keys().copied().collect()
    }

    /// Visits every drawn card: bound cards in render order, then leaving ones.
    pub fn for_each_card(&self, now_ms: u64, mut f: impl FnMut(CardView<'_, u64>)) {
        let cards = self.cards.borrow();
        let leaving = self.leaving.borrow();
        for (key, card) in cards.iter() {
            f(card.view(key, now_ms, false));
        }
        for l in leaving.iter() {
            f(l.element.view(&l.key, now_ms, true));
        }
    }
}

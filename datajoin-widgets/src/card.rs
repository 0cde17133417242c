use datajoin::{JoinKey, Offset, Rect};

/// Display content of one card.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Card {
    pub title: String,
    pub body: String,
    pub badge: String,
}

/// A record that can be rendered as a keyed card.
pub trait CardRecord {
    type Key: JoinKey;

    /// Stable identity used to match cards across updates.
    fn key(&self) -> Self::Key;

    fn card(&self) -> Card;
}

/// A workshop participant, keyed by name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Participant {
    pub name: String,
    pub focus: String,
    pub level: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, focus: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            focus: focus.into(),
            level: level.into(),
        }
    }
}

impl CardRecord for Participant {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn card(&self) -> Card {
        Card {
            title: self.name.clone(),
            body: self.focus.clone(),
            badge: self.level.clone(),
        }
    }
}

/// The static workshop roster shown by the demo page.
pub fn workshop_roster() -> Vec<Participant> {
    vec![
        Participant::new("Aija", "Storytelling with maps", "Beginner"),
        Participant::new("Laura", "Data cleaning", "Intermediate"),
        Participant::new("Marta", "Accessibility", "Advanced"),
        Participant::new("Signe", "Color theory", "Beginner"),
    ]
}

/// A fixed-column card grid, filled row by row.
#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GridLayout {
    pub columns: usize,
    pub card_width: f32,
    pub card_height: f32,
    pub gap: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 2,
            card_width: 220.0,
            card_height: 120.0,
            gap: 16.0,
        }
    }
}

impl GridLayout {
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_card_size(mut self, width: f32, height: f32) -> Self {
        self.card_width = width;
        self.card_height = height;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// The box of the card at render position `index`.
    pub fn slot(&self, index: usize) -> Rect {
        let columns = self.columns.max(1);
        let col = index % columns;
        let row = index / columns;
        Rect::new(
            col as f32 * (self.card_width + self.gap),
            row as f32 * (self.card_height + self.gap),
            self.card_width,
            self.card_height,
        )
    }

    /// Lays out `keys` in order and reports each one's box.
    pub fn flush<K>(&self, keys: impl IntoIterator<Item = K>) -> Vec<(K, Rect)> {
        keys.into_iter()
            .enumerate()
            .map(|(i, k)| (k, self.slot(i)))
            .collect()
    }
}

/// A card as it should be drawn at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardView<'a, K> {
    pub key: &'a K,
    pub card: &'a Card,
    /// Layout box, before `transform`.
    pub slot: Rect,
    pub transform: Offset,
    pub opacity: f32,
    /// `true` while the card animates out after leaving the dataset.
    pub leaving: bool,
}

impl<K> CardView<'_, K> {
    /// The on-screen box (layout box plus transform).
    pub fn bounding_box(&self) -> Rect {
        self.slot.translated(self.transform)
    }
}

//! Goodbooks-10k records: CSV decoding and top-N selection.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::card::{Card, CardRecord};
use crate::error::LoadError;

/// One book, reduced to the columns the card list shows.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Book {
    pub book_id: u64,
    pub title: String,
    /// Slash-separated author list, as published.
    pub authors: Option<String>,
    /// `NaN` when the column is missing or unparsable.
    pub average_rating: f64,
    /// Zero when the column is missing or unparsable.
    pub ratings_count: f64,
}

impl Book {
    /// The first listed author, or `"Unknown"`.
    pub fn primary_author(&self) -> &str {
        self.authors
            .as_deref()
            .and_then(|a| a.split('/').next())
            .filter(|a| !a.is_empty())
            .unwrap_or("Unknown")
    }
}

impl CardRecord for Book {
    type Key = u64;

    fn key(&self) -> u64 {
        self.book_id
    }

    fn card(&self) -> Card {
        Card {
            title: self.title.clone(),
            body: format!("by {}", self.primary_author()),
            badge: format!("{:.1} ★", self.average_rating),
        }
    }
}

/// Raw CSV row. Unparsable cells decode as `None` instead of failing the whole file.
#[derive(Debug, Deserialize)]
struct BookRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    book_id: Option<u64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    title: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    authors: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    average_rating: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    ratings_count: Option<f64>,
}

/// Decodes a headed CSV document into books. Rows without a usable `book_id` are skipped.
pub fn decode_books(text: &str) -> Result<Vec<Book>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut books = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<BookRow>() {
        let row = row?;
        let Some(book_id) = row.book_id else {
            skipped += 1;
            continue;
        };
        books.push(Book {
            book_id,
            title: row.title.unwrap_or_default(),
            authors: row.authors,
            average_rating: row.average_rating.unwrap_or(f64::NAN),
            ratings_count: row
                .ratings_count
                .filter(|c| c.is_finite())
                .unwrap_or(0.0),
        });
    }
    if skipped > 0 {
        vdebug!(skipped, "decode_books: rows without book_id");
    }
    Ok(books)
}

/// Keeps books with a finite rating, most-rated first, truncated to `n`.
///
/// The sort is stable: books with equal counts keep their input order.
pub fn top_books(books: Vec<Book>, n: usize) -> Vec<Book> {
    let mut rated: Vec<Book> = books
        .into_iter()
        .filter(|b| b.average_rating.is_finite())
        .collect();
    rated.sort_by(|a, b| {
        b.ratings_count
            .partial_cmp(&a.ratings_count)
            .unwrap_or(Ordering::Equal)
    });
    rated.truncate(n);
    rated
}

//! Error types for remote loading.

/// Errors that can occur while fetching or decoding a remote dataset.
///
/// These never escape [`crate::RemoteList::load`]; they are logged and turned into a status
/// message. Sources and decoders return them so callers can inspect failures directly.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Transport error during the request.
    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The body is not valid CSV for the expected columns.
    #[error("CSV decode error: {0}")]
    Csv(#[from] csv::Error),

    /// Failure reported by a custom [`crate::DatasetSource`].
    #[error("Source error: {0}")]
    Source(String),
}

impl LoadError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }
}

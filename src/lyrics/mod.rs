//! Lyrics lookup against third-party providers.

pub mod genius;

pub use genius::GeniusClient;

use thiserror::Error;

/// Errors that can occur when querying a lyrics provider.
///
/// "Not found" is not an error, providers return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unauthorized, check the provider access token")]
    Unauthorized,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LyricsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LyricsError::Timeout
        } else if e.is_decode() {
            LyricsError::InvalidResponse(e.to_string())
        } else {
            LyricsError::Connection(e.to_string())
        }
    }
}

/// A source of song lyrics, looked up by title and artist name.
pub trait LyricsProvider: Send + Sync {
    /// Provider name, used in logs.
    fn name(&self) -> &'static str;

    /// Full lyrics text of the song, `None` when the provider has no match.
    fn find_lyrics(&self, title: &str, artist: &str) -> Result<Option<String>, LyricsError>;
}

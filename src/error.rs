//! Error types for tadpoles-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error variants (config, catalog, playlist, filesystem)
//! - A dedicated authentication variant, since expired dashboard cookies are
//!   the most common failure mode and deserve a distinct diagnosis
//! - Transient/permanent classification for embedders that wrap the library
//!   in their own scheduling policy

use thiserror::Error;

/// Result type alias for tadpoles-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tadpoles-dl
///
/// Any error surfacing from an archive run aborts that run; none of these
/// variants is produced for the expected skip conditions (existing file,
/// disabled playlist handling, unknown media type), which are reported as
/// [`FetchOutcome`](crate::types::FetchOutcome) values instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "archive.year_from")
        key: Option<String>,
    },

    /// Network error (transport-level failure talking to the remote service)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote service rejected our credentials (HTTP 401/403)
    ///
    /// Almost always means the session cookie has expired and must be
    /// refreshed from a logged-in browser session.
    #[error("authentication rejected with HTTP {status}: check cookie and account id")]
    Auth {
        /// The HTTP status code the service answered with
        status: u16,
    },

    /// The event listing contained a field we could not interpret
    #[error("invalid event payload: {0}")]
    InvalidEvent(String),

    /// A playlist document could not be parsed
    #[error("invalid playlist: {0}")]
    InvalidPlaylist(String),

    /// A playlist referenced itself, directly or through intermediates
    #[error("playlist cycle detected at {locator}")]
    PlaylistCycle {
        /// The locator that was encountered a second time
        locator: String,
    },

    /// Playlist nesting exceeded the supported depth
    #[error("playlist nesting deeper than {depth} levels at {locator}")]
    PlaylistNesting {
        /// The locator at which the limit was hit
        locator: String,
        /// The depth limit that was exceeded
        depth: usize,
    },

    /// A locator could not be parsed or resolved into an absolute URL
    #[error("invalid locator: {0}")]
    InvalidLocator(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is likely transient (worth retrying by a caller)
    ///
    /// The library itself never retries; a run aborts on the first error.
    /// This classification lets embedders decide which aborted runs are worth
    /// relaunching: connection resets and timeouts usually are, an expired
    /// cookie or a malformed playlist never is.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(e) => e.is_timeout() || e.is_connect(),
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::Interrupted
            ),
            Error::Config { .. }
            | Error::Auth { .. }
            | Error::InvalidEvent(_)
            | Error::InvalidPlaylist(_)
            | Error::PlaylistCycle { .. }
            | Error::PlaylistNesting { .. }
            | Error::InvalidLocator(_)
            | Error::Serialization(_)
            | Error::Other(_) => false,
        }
    }
}

//! Error types for chromedriver-dl
//!
//! Every failure in the pipeline is fatal: nothing is retried or recovered
//! internally. Each variant maps to one stage of the resolve-and-fetch run so
//! the process boundary can report which stage gave up.

use thiserror::Error;

/// Result type alias for chromedriver-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for chromedriver-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Probing the browser executable for its version failed
    #[error("failed to probe browser version: {message}")]
    VersionProbe {
        /// What went wrong spawning or querying the executable
        message: String,
    },

    /// The probed text did not contain a four-component dotted version
    #[error("could not parse browser version from {raw:?}")]
    VersionParse {
        /// The raw version text that failed to parse
        raw: String,
    },

    /// Resolving the release identifier from the remote index failed
    #[error("release lookup failed: {message}")]
    ReleaseLookup {
        /// Transport error or unexpected response detail
        message: String,
    },

    /// No archive in the release listing matched the platform tag
    #[error("no driver archive found for platform {platform:?}")]
    DriverNotFound {
        /// The platform tag that matched nothing
        platform: String,
    },

    /// Fetching the archive failed
    #[error("failed to download {url}: {message}")]
    Download {
        /// The archive URL that could not be fetched
        url: String,
        /// Transport error or HTTP status detail
        message: String,
    },

    /// The downloaded payload is not a valid zip, or extraction failed
    #[error("archive error: {message}")]
    Archive {
        /// Zip format or extraction failure detail
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

//! Configuration for a resolve-and-fetch run
//!
//! All defaults are resolved once when the [`Config`] is built (host platform
//! tag, current working directory), never read ambiently mid-run.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Root URL of the remote index hosting release metadata and driver archives
pub const DEFAULT_STORAGE_URL: &str = "https://chromedriver.storage.googleapis.com";

/// Network timeout applied to every request (default: 30s)
///
/// The upstream index publishes no SLA; this is a conservative default so a
/// stalled connection cannot hang the run indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Inputs for one pipeline run
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the Chrome executable to query for its version
    pub chrome_executable: PathBuf,

    /// Substring matched against candidate archive filenames
    pub platform: String,

    /// Destination directory for the extracted driver
    pub output_dir: PathBuf,

    /// Storage base URL (overridable, mainly for tests)
    pub storage_url: String,

    /// Timeout applied to each network request
    pub request_timeout: Duration,
}

impl Config {
    /// Build a config, filling unset values from the host environment
    ///
    /// `platform` falls back to [`default_platform_tag`] and `output_dir` to
    /// the current working directory. The storage URL is validated up front
    /// and stored without a trailing slash.
    pub fn new(
        chrome_executable: PathBuf,
        platform: Option<String>,
        output_dir: Option<PathBuf>,
        storage_url: Option<String>,
    ) -> Result<Self> {
        let output_dir = match output_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        let storage_url = storage_url.unwrap_or_else(|| DEFAULT_STORAGE_URL.to_string());
        let storage_url = storage_url.trim_end_matches('/').to_string();
        url::Url::parse(&storage_url).map_err(|e| Error::ReleaseLookup {
            message: format!("invalid storage URL {storage_url:?}: {e}"),
        })?;

        Ok(Self {
            chrome_executable,
            platform: platform.unwrap_or_else(|| default_platform_tag().to_string()),
            output_dir,
            storage_url,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        })
    }

    /// Build the HTTP client shared by the resolver and fetcher
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;
        Ok(client)
    }
}

/// Platform tag for the host, following the index's archive naming
///
/// The index names archives like `chromedriver_linux64.zip`; the tag only has
/// to be a substring of the wanted filename.
pub fn default_platform_tag() -> &'static str {
    if cfg!(target_os = "windows") {
        "win32"
    } else if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        "mac_arm64"
    } else if cfg!(target_os = "macos") {
        "mac64"
    } else {
        "linux64"
    }
}

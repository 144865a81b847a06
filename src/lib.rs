//! # chromedriver-dl
//!
//! Download the ChromeDriver build matching a locally installed Chrome.
//!
//! The whole crate is one stateless resolve-and-fetch pipeline, run strictly
//! in sequence:
//!
//! 1. [`probe`] — ask the browser executable for its version
//! 2. [`resolver`] — turn that version into a concrete archive URL via the
//!    remote storage index
//! 3. [`fetcher`] — download the archive and extract it into the output
//!    directory
//!
//! Every failure is fatal; a run either fully succeeds or exits with an
//! error. Nothing persists between runs.
//!
//! ```no_run
//! use chromedriver_dl::{run, Config};
//!
//! #[tokio::main]
//! async fn main() -> chromedriver_dl::error::Result<()> {
//!     let config = Config::new("/usr/bin/google-chrome".into(), None, None, None)?;
//!     run(&config).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Run configuration
pub mod config;
/// Error types
pub mod error;
/// Archive download and extraction
pub mod fetcher;
/// Browser version probing
pub mod probe;
/// Release resolution against the remote storage index
pub mod resolver;

pub use config::Config;
pub use error::{Error, Result};

use tracing::info;

/// Execute the full resolve-and-fetch pipeline for `config`
///
/// Probes the browser, resolves the matching driver release, downloads it and
/// extracts it into `config.output_dir`. Returns the extracted file paths.
pub async fn run(config: &Config) -> Result<Vec<std::path::PathBuf>> {
    let client = config.http_client()?;

    let raw_version = probe::chrome_version(&config.chrome_executable).await?;
    let url = resolver::resolve_download_url(
        &client,
        &config.storage_url,
        &raw_version,
        &config.platform,
    )
    .await?;
    let extracted = fetcher::download_and_extract(&client, &url, &config.output_dir).await?;

    info!(
        output_dir = %config.output_dir.display(),
        file_count = extracted.len(),
        "driver installed"
    );
    Ok(extracted)
}

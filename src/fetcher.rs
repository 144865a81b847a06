//! Archive download and extraction
//!
//! Downloads the resolved driver archive into a scoped temporary file and
//! unpacks it into the output directory. The temporary file is owned by a
//! [`tempfile::NamedTempFile`], so it is deleted when the extraction scope
//! ends, on success and on every failure path alike.

use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::task::spawn_blocking;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Download the archive at `url` and extract it into `dest`
///
/// Redirects are followed. Existing files under `dest` are overwritten;
/// missing directories (including `dest` itself) are created. Returns the
/// extracted file paths.
pub async fn download_and_extract(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<Vec<PathBuf>> {
    download_and_extract_in(client, url, dest, &std::env::temp_dir()).await
}

async fn download_and_extract_in(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    temp_dir: &Path,
) -> Result<Vec<PathBuf>> {
    debug!(%url, dest = %dest.display(), "downloading driver archive");

    let response = client.get(url).send().await.map_err(|e| Error::Download {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if !response.status().is_success() {
        return Err(Error::Download {
            url: url.to_string(),
            message: format!("server returned {}", response.status()),
        });
    }

    let payload = response.bytes().await.map_err(|e| Error::Download {
        url: url.to_string(),
        message: format!("reading response body failed: {e}"),
    })?;

    debug!(bytes = payload.len(), "archive downloaded");

    let dest = dest.to_path_buf();
    let temp_dir = temp_dir.to_path_buf();
    let dest_in_task = dest.clone();
    let extracted = spawn_blocking(move || {
        // The temp file lives exactly as long as this closure; dropping it
        // deletes it whether extraction succeeded or not.
        let mut temp = tempfile::NamedTempFile::new_in(&temp_dir)?;
        temp.write_all(&payload)?;
        temp.flush()?;
        extract_zip(temp.path(), &dest_in_task)
    })
    .await
    .map_err(|e| Error::Archive {
        message: format!("extraction task panicked: {e}"),
    })??;

    info!(
        dest = %dest.display(),
        extracted_count = extracted.len(),
        "driver archive extracted"
    );
    Ok(extracted)
}

/// Extract every entry of the zip at `archive_path` into `dest`
fn extract_zip(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dest)?;

    let file = std::fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| Error::Archive {
        message: format!("failed to read zip archive: {e}"),
    })?;

    let mut extracted = Vec::new();

    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| Error::Archive {
            message: format!("failed to read zip entry {i}: {e}"),
        })?;

        if let Some(path) = extract_entry(entry, dest)? {
            extracted.push(path);
        }
    }

    Ok(extracted)
}

/// Extract a single zip entry, creating directories as needed
///
/// Returns `None` for directory entries and entries whose internal path would
/// escape `dest` (those are skipped, matching how hostile archive paths are
/// handled elsewhere in the ecosystem).
fn extract_entry(mut entry: zip::read::ZipFile, dest: &Path) -> Result<Option<PathBuf>> {
    let entry_path = match entry.enclosed_name() {
        Some(path) => dest.join(path),
        None => {
            warn!(name = entry.name(), "skipping entry with unsafe path");
            return Ok(None);
        }
    };

    if entry.is_dir() {
        std::fs::create_dir_all(&entry_path)?;
        return Ok(None);
    }

    if let Some(parent) = entry_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut outfile = std::fs::File::create(&entry_path)?;
    std::io::copy(&mut entry, &mut outfile).map_err(|e| Error::Archive {
        message: format!("failed to extract {}: {e}", entry_path.display()),
    })?;

    debug!(path = %entry_path.display(), "extracted entry");
    Ok(Some(entry_path))
}

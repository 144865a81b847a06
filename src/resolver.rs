//! Release resolution against the remote storage index
//!
//! Turns the probed version text into a concrete archive URL in three steps:
//! extract the `major.minor.patch` triple, ask the index for the latest
//! release with that prefix, then scan the release's file listing for the
//! archive matching the platform tag.

use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Extract the `major.minor.patch` triple from raw browser version text
///
/// Matches the first occurrence of a three-component dotted version that is
/// immediately followed by a dot and a fourth numeric component; the fourth
/// component (the build number) is discarded.
pub fn parse_version_triple(raw: &str) -> Result<String> {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = VERSION_RE.get_or_init(|| {
        Regex::new(r"(\d+\.\d+\.\d+)\.\d+").unwrap_or_else(|e| unreachable!("bad regex: {e}"))
    });

    let triple = re
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::VersionParse {
            raw: raw.to_string(),
        })?;

    debug!(%triple, "parsed browser version");
    Ok(triple)
}

/// Resolve the full download URL for the driver matching `raw_version`
///
/// `raw_version` is the unparsed probe output; `platform` is matched as a
/// substring against candidate archive keys. Network failures and non-2xx
/// responses are fatal.
pub async fn resolve_download_url(
    client: &reqwest::Client,
    storage_url: &str,
    raw_version: &str,
    platform: &str,
) -> Result<String> {
    let triple = parse_version_triple(raw_version)?;
    let release = fetch_latest_release(client, storage_url, &triple).await?;
    let keys = fetch_listing_keys(client, storage_url, &release).await?;
    let key = pick_driver_key(&keys, platform)?;

    let url = format!("{storage_url}/{key}");
    info!(%release, %key, "resolved driver download URL");
    Ok(url)
}

/// Query the latest release identifier for a version-prefix
///
/// `GET {storage_url}/LATEST_RELEASE_{triple}` returns the identifier as a
/// bare plain-text token; surrounding whitespace is trimmed.
async fn fetch_latest_release(
    client: &reqwest::Client,
    storage_url: &str,
    triple: &str,
) -> Result<String> {
    let url = format!("{storage_url}/LATEST_RELEASE_{triple}");
    debug!(%url, "looking up latest release");

    let response = client.get(&url).send().await.map_err(|e| Error::ReleaseLookup {
        message: format!("request to {url} failed: {e}"),
    })?;

    if !response.status().is_success() {
        return Err(Error::ReleaseLookup {
            message: format!("{url} returned {}", response.status()),
        });
    }

    let release = response
        .text()
        .await
        .map_err(|e| Error::ReleaseLookup {
            message: format!("reading release identifier from {url} failed: {e}"),
        })?
        .trim()
        .to_string();

    if release.is_empty() {
        return Err(Error::ReleaseLookup {
            message: format!("{url} returned an empty release identifier"),
        });
    }

    debug!(%release, "resolved latest release");
    Ok(release)
}

/// List all storage keys under the `{release}/` prefix
///
/// The index answers with an S3-style XML listing; the text of each `<Key>`
/// element names one archive file.
async fn fetch_listing_keys(
    client: &reqwest::Client,
    storage_url: &str,
    release: &str,
) -> Result<Vec<String>> {
    let url = format!("{storage_url}/?delimiter=/&prefix={release}/");
    debug!(%url, "listing release files");

    let response = client.get(&url).send().await.map_err(|e| Error::ReleaseLookup {
        message: format!("request to {url} failed: {e}"),
    })?;

    if !response.status().is_success() {
        return Err(Error::ReleaseLookup {
            message: format!("{url} returned {}", response.status()),
        });
    }

    let body = response.text().await.map_err(|e| Error::ReleaseLookup {
        message: format!("reading listing from {url} failed: {e}"),
    })?;

    let keys = parse_listing_keys(&body)?;
    debug!(key_count = keys.len(), "parsed release listing");
    Ok(keys)
}

/// Pull the `<Key>` text values out of a listing document
fn parse_listing_keys(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut keys = Vec::new();
    let mut in_key = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"Key" => in_key = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"Key" => in_key = false,
            Ok(Event::Text(e)) if in_key => {
                let key = e.unescape().map_err(|e| Error::ReleaseLookup {
                    message: format!("invalid listing XML: {e}"),
                })?;
                keys.push(key.into_owned());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::ReleaseLookup {
                    message: format!("invalid listing XML: {e}"),
                });
            }
        }
    }

    Ok(keys)
}

/// Pick the archive key matching the platform tag
///
/// Collects every key containing `platform` as a substring and picks the
/// lexicographically last one, so the result does not depend on the order the
/// server happened to return the listing in.
fn pick_driver_key(keys: &[String], platform: &str) -> Result<String> {
    let picked = keys
        .iter()
        .filter(|key| key.contains(platform))
        .max()
        .cloned()
        .ok_or_else(|| Error::DriverNotFound {
            platform: platform.to_string(),
        })?;

    debug!(key = %picked, "matched driver archive");
    Ok(picked)
}

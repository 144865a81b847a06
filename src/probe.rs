//! Browser version probing
//!
//! Asks the locally installed browser what version it is. On Windows the
//! executable's file metadata carries the version, so PowerShell reads the
//! ProductVersion field instead of running the browser. Everywhere else the
//! executable itself is run with `--version`.
//!
//! No parsing happens here; the raw text goes to the resolver unmodified.

use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Probe the browser at `executable` for its raw version text
///
/// Fatal on any spawn failure or non-zero exit status; there is no fallback
/// probe. The returned text usually looks like `"Google Chrome 114.0.5735.90\n"`.
pub async fn chrome_version(executable: &Path) -> Result<String> {
    let output = version_command(executable)
        .output()
        .await
        .map_err(|e| Error::VersionProbe {
            message: format!("failed to run version query for {}: {e}", executable.display()),
        })?;

    if !output.status.success() {
        return Err(Error::VersionProbe {
            message: format!(
                "version query for {} exited with {}: {}",
                executable.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let raw = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!(executable = %executable.display(), raw = raw.trim(), "probed browser version");
    Ok(raw)
}

/// Build the platform-appropriate version query command
///
/// The target path is never interpolated into a shell string: on Windows it
/// reaches PowerShell through an environment variable, elsewhere it is the
/// program argument itself.
fn version_command(executable: &Path) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("powershell");
        command
            .args([
                "-NoProfile",
                "-Command",
                "(Get-Item -LiteralPath $env:CHROMEDRIVER_DL_EXE).VersionInfo.ProductVersion",
            ])
            .env("CHROMEDRIVER_DL_EXE", executable);
        command
    } else {
        let mut command = Command::new(executable);
        command.arg("--version");
        command
    }
}

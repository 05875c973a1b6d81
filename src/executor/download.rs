//! Source archive retrieval.
//!
//! Used by the build-from-source install strategy: fetch the archive over
//! HTTP(S), verify its checksum when one is declared, and unpack it with
//! the host `tar` through the command runner.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::error::{Result, VappkitError};
use crate::executor::CommandRunner;

/// Archive fetch timeout. Source tarballs for the managed helpers are
/// small; anything slower than this indicates a dead mirror.
const FETCH_TIMEOUT: Duration = Duration::from_secs(300);

fn download_error(url: &str, message: impl ToString) -> VappkitError {
    VappkitError::DownloadFailed {
        url: url.to_string(),
        message: message.to_string(),
    }
}

/// Fetch `url` into `dest_dir`, returning the path of the written archive.
///
/// When `sha256` is given, the archive digest must match or the download
/// is rejected without being written.
pub fn fetch_archive(url: &str, dest_dir: &Path, sha256: Option<&str>) -> Result<PathBuf> {
    tracing::info!("Downloading {}", url);

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("vappkit/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| download_error(url, e))?;

    let response = client.get(url).send().map_err(|e| download_error(url, e))?;
    if !response.status().is_success() {
        return Err(download_error(
            url,
            format!("server returned {}", response.status()),
        ));
    }
    let bytes = response.bytes().map_err(|e| download_error(url, e))?;

    if let Some(expected) = sha256 {
        let digest = hex::encode(Sha256::digest(&bytes));
        if !digest.eq_ignore_ascii_case(expected) {
            return Err(download_error(
                url,
                format!("checksum mismatch: expected {}, got {}", expected, digest),
            ));
        }
    }

    let file_name = url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("archive.tar.gz");
    std::fs::create_dir_all(dest_dir)?;
    let archive = dest_dir.join(file_name);
    std::fs::write(&archive, &bytes)?;

    tracing::info!("Saved {} ({} bytes)", archive.display(), bytes.len());
    Ok(archive)
}

/// Unpack an archive into `dest_dir` using the host `tar`.
pub fn unpack_archive(archive: &Path, dest_dir: &Path, runner: &dyn CommandRunner) -> Result<()> {
    let argv = vec![
        "tar".to_string(),
        "xf".to_string(),
        archive.display().to_string(),
        "-C".to_string(),
        dest_dir.display().to_string(),
    ];
    runner.run(&argv, false, None)?;
    Ok(())
}

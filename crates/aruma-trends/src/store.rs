//! Snapshot persistence: one timestamped file per run plus `latest.json`.

use std::path::{Path, PathBuf};

use aruma_core::TrendsSnapshot;

use crate::error::StoreError;

/// File name of the copy overwritten on every run.
pub const LATEST_FILE_NAME: &str = "latest.json";

/// Where a snapshot was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    /// `trends_YYYYMMDD_HHMMSS.json`
    pub timestamped: PathBuf,
    /// `latest.json`
    pub latest: PathBuf,
}

/// Writes `snapshot` to `dir`, creating the directory if needed.
///
/// Both files receive the same bytes: pretty-printed UTF-8 JSON with
/// non-ASCII text left unescaped. Each file is replaced atomically, but the
/// pair is not: a failure on `latest.json` leaves the timestamped file behind.
///
/// # Errors
///
/// Returns [`StoreError::CreateDir`] or [`StoreError::Write`] on I/O failure
/// and [`StoreError::Json`] if serialization fails.
pub fn write_snapshot(dir: &Path, snapshot: &TrendsSnapshot) -> Result<SnapshotPaths, StoreError> {
    std::fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let bytes = serde_json::to_vec_pretty(snapshot)?;

    let paths = SnapshotPaths {
        timestamped: dir.join(format!("{}.json", snapshot.file_stem())),
        latest: dir.join(LATEST_FILE_NAME),
    };
    write_atomic(&paths.timestamped, &bytes)?;
    write_atomic(&paths.latest, &bytes)?;

    tracing::debug!(
        timestamped = %paths.timestamped.display(),
        bytes = bytes.len(),
        "snapshot written"
    );
    Ok(paths)
}

/// Reads a snapshot previously written by [`write_snapshot`].
///
/// # Errors
///
/// Returns [`StoreError::Read`] if the file cannot be read and
/// [`StoreError::Json`] if it is not a snapshot.
pub fn read_snapshot(path: &Path) -> Result<TrendsSnapshot, StoreError> {
    let bytes = std::fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Writes to a `.json.tmp` sibling, then renames it over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes).map_err(|source| StoreError::Write {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

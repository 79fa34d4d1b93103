//! Whole-file JSON read and write helpers.

use crate::error::{Result, RoadmapError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

/// Read a file to a string, mapping a missing file to [`RoadmapError::NotFound`].
pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, e: std::io::Error) -> RoadmapError {
    match e.kind() {
        ErrorKind::NotFound => RoadmapError::NotFound {
            path: path.to_path_buf(),
        },
        _ => RoadmapError::Io(e),
    }
}

/// Parse a file as untyped JSON.
pub(crate) fn read_value(path: &Path) -> Result<serde_json::Value> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| RoadmapError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a file into `T`.
///
/// Malformed JSON is [`RoadmapError::InvalidJson`]; well-formed JSON of the
/// wrong shape is [`RoadmapError::InvalidDocument`].
pub(crate) fn read_typed<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| {
        if source.is_data() {
            RoadmapError::InvalidDocument {
                path: path.to_path_buf(),
                source,
            }
        } else {
            RoadmapError::InvalidJson {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Replace the file with pretty-printed JSON and a trailing newline.
pub(crate) fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)
        .map_err(|e| RoadmapError::Serialization(e.to_string()))?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

/// Current modification time of a file (fresh stat).
pub(crate) fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

/// Stat `path`, then read it with `read`.
///
/// The stamp is taken before the read. A write landing mid-read leaves the
/// stamp older than the file, so the next freshness check misses.
pub(crate) fn read_stamped<T>(
    path: &Path,
    read: impl FnOnce(&Path) -> Result<T>,
) -> Result<(T, SystemTime)> {
    let modified = modified_time(path).map_err(|e| io_error(path, e))?;
    let value = read(path)?;
    Ok((value, modified))
}

//! JSON I/O helpers for the demo binaries.
//!
//! - `load_segments`: read a segment list from `[[[x,y],[x,y]], ...]`.
//! - `write_json_file`: pretty-print a serializable value to disk.

use crate::segments::Segment;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn load_segments(path: &Path) -> Result<Vec<Segment>, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read segments {}: {e}", path.display()))?;
    let raw: Vec<[[f32; 2]; 2]> = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse segments {}: {e}", path.display()))?;
    Ok(raw.into_iter().map(|[a, b]| Segment::new(a, b)).collect())
}

pub fn write_json_file<T: Serialize>(value: &T, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize {}: {e}", path.display()))?;
    fs::write(path, text).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

//! Channel list loading

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::{Result, SyncError};

/// Read channel ids from a newline-delimited file.
///
/// Lines are trimmed; blank lines and `#` comments are ignored, and repeated
/// ids keep their first position. A missing file is an empty list, not an
/// error.
pub fn load_channel_ids(path: &Path) -> Result<Vec<String>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Channel list not found, nothing to sync");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(SyncError::ChannelList {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    let ids = parse_channel_ids(&contents);

    if ids.is_empty() {
        warn!(path = %path.display(), "Channel list is empty, nothing to sync");
    } else {
        info!(path = %path.display(), channels = ids.len(), "Loaded channel list");
    }

    Ok(ids)
}

fn parse_channel_ids(contents: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

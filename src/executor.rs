//! Applies a validated rename plan to the filesystem.

use std::fs;

use tracing::{error, info};

use crate::models::{RenameOutcome, RenamePair};

/// Run every pair in order, one `fs::rename` each. A failure is recorded
/// on its own outcome and never stops the remaining pairs.
pub fn execute_renames(pairs: Vec<RenamePair>) -> Vec<RenameOutcome> {
    pairs
        .into_iter()
        .map(|pair| {
            let error = match fs::rename(&pair.from, &pair.to) {
                Ok(()) => {
                    info!(from = %pair.from.display(), to = %pair.to.display(), "renamed");
                    None
                }
                Err(err) => {
                    error!(from = %pair.from.display(), %err, "rename failed");
                    Some(err.to_string())
                }
            };
            RenameOutcome { pair, error }
        })
        .collect()
}

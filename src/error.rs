use thiserror::Error;

use crate::models::MediaType;

/// Structurally invalid operations against a session. Validation runs
/// before mutation, so a returned error never leaves the session in a
/// partially-updated state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session already locked to {0}")]
    MediaTypeConflict(MediaType),

    #[error("no file at index {0}")]
    UnknownFile(usize),

    #[error("year {year} outside valid range {min}-{max}")]
    YearOutOfRange { year: u16, min: u16, max: u16 },

    #[error("session has files that are not ready")]
    NotReady,
}

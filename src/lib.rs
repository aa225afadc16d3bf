//! Media filename normalization engine with a terminal front end.
//!
//! The engine ([`session::SessionState`] and the modules under it) is pure
//! over its inputs: callers hand it paths and directory listings, it hands
//! back classified records and a rename plan. Only [`listing`] and
//! [`executor`] touch the filesystem.

pub mod analyzer;
pub mod config;
pub mod conflict;
pub mod error;
pub mod executor;
pub mod extract;
pub mod listing;
pub mod models;
pub mod normalize;
pub mod session;
pub mod synth;
pub mod tui;

pub use analyzer::FileAnalyzer;
pub use config::{EngineConfig, Settings};
pub use error::SessionError;
pub use models::{
    EpisodeTag, FailureReason, FileStatus, MediaType, ProcessableFile, RenameOutcome, RenamePair,
};
pub use session::{SessionState, StatusCounts};

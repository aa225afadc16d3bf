use std::fmt;
use std::path::{Path, PathBuf};

/// Media kind locked for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Movie,
    Series,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Series => write!(f, "series"),
        }
    }
}

/// Season/episode pair. Always rendered with two-digit padding regardless
/// of how wide the source digits were (`3x9` becomes `S03E09`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeTag {
    pub season: u32,
    pub episode: u32,
}

impl fmt::Display for EpisodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02}", self.season, self.episode)
    }
}

/// Per-file classification. Exactly one applies at any instant; `Duplicate`
/// is derived from the current session contents and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Ready,
    NeedsYear,
    Invalid,
    AlreadyNormalized,
    Duplicate,
}

/// Why a file is `Invalid` or `Duplicate`. Rendered for the presentation
/// layer; the status taxonomy itself stays closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    UnsupportedFormat,
    NoEpisodePattern,
    NotCanonical,
    DuplicateName,
    TargetExistsOnDisk,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureReason::UnsupportedFormat => "unsupported format",
            FailureReason::NoEpisodePattern => "no episode pattern found",
            FailureReason::NotCanonical => "does not match canonical form",
            FailureReason::DuplicateName => "duplicate proposed name",
            FailureReason::TargetExistsOnDisk => "target exists on disk",
        };
        write!(f, "{text}")
    }
}

/// One file in a session: the original name, the fields extracted from it,
/// and the current proposal. Owned by `SessionState`; mutated only through
/// the analyzer or the edit pathway.
#[derive(Debug, Clone)]
pub struct ProcessableFile {
    pub original_path: PathBuf,
    pub original_name: String,
    pub media_type: MediaType,
    /// Cleaned title component, kept so the proposal can be re-synthesized
    /// deterministically (shared-year back-fill, series propagation).
    pub title: String,
    pub extracted_year: Option<u16>,
    pub episode_tag: Option<EpisodeTag>,
    /// Descriptive tokens after noise filtering. For series these are the
    /// episode-title tokens.
    pub extras: Vec<String>,
    pub proposed_name: String,
    pub status: FileStatus,
    pub reason: Option<FailureReason>,
    pub user_edited: bool,
}

impl ProcessableFile {
    pub fn directory(&self) -> &Path {
        self.original_path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn proposed_path(&self) -> PathBuf {
        self.directory().join(&self.proposed_name)
    }

    /// True when this record blocks `apply`.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self.status,
            FileStatus::Invalid | FileStatus::NeedsYear | FileStatus::Duplicate
        )
    }
}

/// One entry of the validated rename plan handed to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePair {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Per-pair executor result, reported back to the session so completed
/// items leave the list and failures stay `Ready` for retry.
#[derive(Debug, Clone)]
pub struct RenameOutcome {
    pub pair: RenamePair,
    pub error: Option<String>,
}

impl RenameOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

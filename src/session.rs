//! The owned session aggregate: one media-type batch from add through apply.
//!
//! Every mutating operation validates first, mutates second, and finishes
//! with a full conflict re-run, so callers always observe a consistent
//! status set.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::analyzer::FileAnalyzer;
use crate::config::EngineConfig;
use crate::conflict;
use crate::error::SessionError;
use crate::models::{
    EpisodeTag, FailureReason, FileStatus, MediaType, ProcessableFile, RenameOutcome, RenamePair,
};
use crate::normalize;
use crate::synth;

/// Per-status tallies for the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub ready: usize,
    pub needs_year: usize,
    pub invalid: usize,
    pub already_normalized: usize,
    pub duplicate: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.ready + self.needs_year + self.invalid + self.already_normalized + self.duplicate
    }
}

pub struct SessionState {
    analyzer: FileAnalyzer,
    media_type: Option<MediaType>,
    files: Vec<ProcessableFile>,
    shared_year: Option<u16>,
    /// Case-insensitive `path_key`s of files currently on disk, for
    /// collision checks. Supplied by the external lister.
    on_disk: HashSet<String>,
}

impl SessionState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            analyzer: FileAnalyzer::new(config),
            media_type: None,
            files: Vec::new(),
            shared_year: None,
            on_disk: HashSet::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.analyzer.config()
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.media_type
    }

    pub fn shared_year(&self) -> Option<u16> {
        self.shared_year
    }

    pub fn files(&self) -> &[ProcessableFile] {
        &self.files
    }

    pub fn file(&self, index: usize) -> Option<&ProcessableFile> {
        self.files.get(index)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Append a batch. The media type locks on the first call; a second
    /// batch of a different type is rejected with the session untouched.
    /// Input order is the only defined order.
    pub fn add_files(
        &mut self,
        paths: &[PathBuf],
        requested: MediaType,
        existing_on_disk: &[PathBuf],
    ) -> Result<(), SessionError> {
        if let Some(locked) = self.media_type {
            if locked != requested {
                return Err(SessionError::MediaTypeConflict(locked));
            }
        }
        self.media_type = Some(requested);

        for path in existing_on_disk {
            if let (Some(dir), Some(name)) = (path.parent(), path.file_name()) {
                self.on_disk
                    .insert(conflict::path_key(dir, &name.to_string_lossy()));
            }
        }

        let shared_year = self.effective_shared_year(requested);
        for path in paths {
            let file = self.analyzer.analyze(path, requested, shared_year);
            self.files.push(file);
        }
        self.resolve();
        info!(count = paths.len(), media_type = %requested, "files added");
        Ok(())
    }

    fn effective_shared_year(&self, media_type: MediaType) -> Option<u16> {
        match media_type {
            MediaType::Series => self.shared_year,
            MediaType::Movie => None,
        }
    }

    /// Replace one record's proposal with a user-edited name and revalidate
    /// the whole session.
    pub fn edit(&mut self, index: usize, new_name: &str) -> Result<(), SessionError> {
        let file = self
            .files
            .get_mut(index)
            .ok_or(SessionError::UnknownFile(index))?;
        self.analyzer.reanalyze_edited(file, new_name);
        debug!(index, status = ?self.files[index].status, "record edited");
        self.resolve();
        Ok(())
    }

    /// Back-fill every `NeedsYear` series record with `year`. Returns how
    /// many records were updated.
    pub fn set_shared_year(&mut self, year: u16) -> Result<usize, SessionError> {
        let config = self.config();
        if !config.year_in_range(year) {
            return Err(SessionError::YearOutOfRange {
                year,
                min: config.min_year,
                max: config.max_year,
            });
        }
        self.shared_year = Some(year);

        let mut updated = 0;
        for index in 0..self.files.len() {
            let file = &self.files[index];
            if file.status != FileStatus::NeedsYear || file.media_type != MediaType::Series {
                continue;
            }
            let path = file.original_path.clone();
            self.files[index] = self.analyzer.analyze(&path, MediaType::Series, Some(year));
            updated += 1;
        }
        self.resolve();
        info!(year, updated, "shared year applied");
        Ok(updated)
    }

    /// Drop one record. An emptied session resets completely, unlocking
    /// the media type.
    pub fn remove(&mut self, index: usize) -> Result<ProcessableFile, SessionError> {
        if index >= self.files.len() {
            return Err(SessionError::UnknownFile(index));
        }
        let removed = self.files.remove(index);
        if self.files.is_empty() {
            self.start_over();
        } else {
            self.resolve();
        }
        Ok(removed)
    }

    /// Series only: push the edited record's title, year, and season onto
    /// every other editable episode, preserving each episode's own number
    /// and trailing title. Returns the indices that changed.
    pub fn propagate_edit(&mut self, source: usize) -> Result<Vec<usize>, SessionError> {
        let src = self
            .files
            .get(source)
            .ok_or(SessionError::UnknownFile(source))?;
        if self.media_type != Some(MediaType::Series) {
            return Ok(Vec::new());
        }
        let Some(parts) =
            normalize::parse_canonical(&src.proposed_name, MediaType::Series, self.config())
        else {
            return Ok(Vec::new());
        };
        let season = parts.episode_tag.map(|tag| tag.season);

        let mut modified = Vec::new();
        for index in 0..self.files.len() {
            if index == source {
                continue;
            }
            let file = &mut self.files[index];
            if file.status == FileStatus::AlreadyNormalized {
                continue;
            }
            if file.reason == Some(FailureReason::UnsupportedFormat) {
                continue;
            }
            let Some(tag) = file.episode_tag else {
                continue;
            };
            let Some((_, ext)) = normalize::split_extension(&file.original_name) else {
                continue;
            };

            let tag = EpisodeTag {
                season: season.unwrap_or(tag.season),
                episode: tag.episode,
            };
            file.title = parts.title.clone();
            file.extracted_year = Some(parts.year);
            file.episode_tag = Some(tag);
            file.proposed_name =
                synth::build_series_name(&file.title, parts.year, tag, &file.extras, &ext);
            file.status = FileStatus::Ready;
            file.reason = None;
            modified.push(index);
        }

        if !modified.is_empty() {
            self.resolve();
            info!(source, updated = modified.len(), "series edit propagated");
        }
        Ok(modified)
    }

    /// True iff nothing blocks the rename plan.
    pub fn can_apply(&self) -> bool {
        self.files.iter().all(|file| !file.is_blocking())
    }

    /// The validated plan: one pair per `Ready` record, in session order.
    /// `AlreadyNormalized` records need no filesystem operation.
    pub fn apply(&self) -> Result<Vec<RenamePair>, SessionError> {
        if !self.can_apply() {
            return Err(SessionError::NotReady);
        }
        Ok(self
            .files
            .iter()
            .filter(|file| file.status == FileStatus::Ready)
            .map(|file| RenamePair {
                from: file.original_path.clone(),
                to: file.proposed_path(),
            })
            .collect())
    }

    /// Record per-pair executor results: renamed files leave the session,
    /// failures stay `Ready` for retry. The on-disk snapshot follows the
    /// renames so retries see the new names.
    pub fn mark_applied(&mut self, outcomes: &[RenameOutcome]) {
        let renamed: HashSet<&Path> = outcomes
            .iter()
            .filter(|o| o.succeeded())
            .map(|o| o.pair.from.as_path())
            .collect();
        if renamed.is_empty() {
            return;
        }

        self.files
            .retain(|file| !renamed.contains(file.original_path.as_path()));
        for outcome in outcomes.iter().filter(|o| o.succeeded()) {
            if let (Some(dir), Some(name)) = (outcome.pair.from.parent(), outcome.pair.from.file_name())
            {
                self.on_disk
                    .remove(&conflict::path_key(dir, &name.to_string_lossy()));
            }
            if let (Some(dir), Some(name)) = (outcome.pair.to.parent(), outcome.pair.to.file_name())
            {
                self.on_disk
                    .insert(conflict::path_key(dir, &name.to_string_lossy()));
            }
        }

        if self.files.is_empty() {
            self.start_over();
        } else {
            self.resolve();
        }
        info!(renamed = renamed.len(), remaining = self.files.len(), "apply recorded");
    }

    /// Discard everything and unlock the media type.
    pub fn start_over(&mut self) {
        self.media_type = None;
        self.files.clear();
        self.shared_year = None;
        self.on_disk.clear();
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for file in &self.files {
            match file.status {
                FileStatus::Ready => counts.ready += 1,
                FileStatus::NeedsYear => counts.needs_year += 1,
                FileStatus::Invalid => counts.invalid += 1,
                FileStatus::AlreadyNormalized => counts.already_normalized += 1,
                FileStatus::Duplicate => counts.duplicate += 1,
            }
        }
        counts
    }

    fn resolve(&mut self) {
        conflict::resolve(&mut self.files, &self.on_disk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionState {
        SessionState::new(EngineConfig::with_year_bounds(1895, 2024))
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|n| PathBuf::from("/library").join(n))
            .collect()
    }

    #[test]
    fn media_type_locks_on_first_add() {
        let mut session = session();
        session
            .add_files(&paths(&["Movie.2020.mkv"]), MediaType::Movie, &[])
            .unwrap();

        let err = session
            .add_files(&paths(&["show.s01e01.mkv"]), MediaType::Series, &[])
            .unwrap_err();
        assert_eq!(err, SessionError::MediaTypeConflict(MediaType::Movie));
        // Rejected operation left the session unchanged.
        assert_eq!(session.len(), 1);
        assert_eq!(session.media_type(), Some(MediaType::Movie));
    }

    #[test]
    fn edit_unknown_index_is_rejected() {
        let mut session = session();
        assert_eq!(
            session.edit(3, "Movie (2020).mkv").unwrap_err(),
            SessionError::UnknownFile(3)
        );
    }

    #[test]
    fn shared_year_is_validated_before_mutation() {
        let mut session = session();
        session
            .add_files(&paths(&["show.s01e01.mkv"]), MediaType::Series, &[])
            .unwrap();

        let err = session.set_shared_year(1894).unwrap_err();
        assert!(matches!(err, SessionError::YearOutOfRange { year: 1894, .. }));
        assert_eq!(session.shared_year(), None);
        assert_eq!(session.files()[0].status, FileStatus::NeedsYear);

        let updated = session.set_shared_year(2008).unwrap();
        assert_eq!(updated, 1);
        assert_eq!(session.files()[0].status, FileStatus::Ready);
        assert_eq!(
            session.files()[0].proposed_name,
            "show (2008) - S01E01.mkv"
        );
    }

    #[test]
    fn apply_requires_every_record_unblocked() {
        let mut session = session();
        session
            .add_files(
                &paths(&["Movie.2020.mkv", "unparsable.txt"]),
                MediaType::Movie,
                &[],
            )
            .unwrap();
        assert!(!session.can_apply());
        assert_eq!(session.apply().unwrap_err(), SessionError::NotReady);

        session.remove(1).unwrap();
        assert!(session.can_apply());
        let plan = session.apply().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].to, PathBuf::from("/library/Movie (2020).mkv"));
    }

    #[test]
    fn already_normalized_records_are_excluded_from_the_plan() {
        let mut session = session();
        session
            .add_files(
                &paths(&["Heat (1995).mkv", "Movie.2020.mkv"]),
                MediaType::Movie,
                &[],
            )
            .unwrap();
        let plan = session.apply().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].from, PathBuf::from("/library/Movie.2020.mkv"));
    }

    #[test]
    fn edit_resolves_duplicates_for_both_records() {
        let mut session = session();
        session
            .add_files(
                &paths(&["Movie.2020.mkv", "Movie (2020).mkv"]),
                MediaType::Movie,
                &[],
            )
            .unwrap();
        assert_eq!(session.files()[0].status, FileStatus::Duplicate);
        assert_eq!(session.files()[1].status, FileStatus::Duplicate);

        session.edit(0, "Movie Directors Cut (2020).mkv").unwrap();
        assert_eq!(session.files()[0].status, FileStatus::Ready);
        assert_eq!(session.files()[1].status, FileStatus::AlreadyNormalized);
    }

    #[test]
    fn removing_the_last_file_resets_the_session() {
        let mut session = session();
        session
            .add_files(&paths(&["Movie.2020.mkv"]), MediaType::Movie, &[])
            .unwrap();
        session.remove(0).unwrap();
        assert!(session.is_empty());
        assert_eq!(session.media_type(), None);

        // Unlocked again: a series batch is accepted now.
        session
            .add_files(&paths(&["show.s01e01.mkv"]), MediaType::Series, &[])
            .unwrap();
        assert_eq!(session.media_type(), Some(MediaType::Series));
    }

    #[test]
    fn propagation_rewrites_siblings_but_keeps_episode_numbers() {
        let mut session = session();
        session
            .add_files(
                &paths(&[
                    "show.s01e01.pilot.mkv",
                    "show.s01e02.cat.mkv",
                    "show.s01e03.mkv",
                ]),
                MediaType::Series,
                &[],
            )
            .unwrap();
        session.edit(0, "Better Show (2009) - S02E01 - Pilot.mkv").unwrap();

        let modified = session.propagate_edit(0).unwrap();
        assert_eq!(modified, vec![1, 2]);
        assert_eq!(
            session.files()[1].proposed_name,
            "Better Show (2009) - S02E02 - cat.mkv"
        );
        assert_eq!(
            session.files()[2].proposed_name,
            "Better Show (2009) - S02E03.mkv"
        );
        assert_eq!(session.files()[1].status, FileStatus::Ready);
    }

    #[test]
    fn mark_applied_keeps_failed_pairs_for_retry() {
        let mut session = session();
        session
            .add_files(
                &paths(&["Movie.2020.mkv", "Other.2021.mkv"]),
                MediaType::Movie,
                &[],
            )
            .unwrap();
        let plan = session.apply().unwrap();
        let outcomes = vec![
            RenameOutcome { pair: plan[0].clone(), error: None },
            RenameOutcome {
                pair: plan[1].clone(),
                error: Some("permission denied".to_string()),
            },
        ];
        session.mark_applied(&outcomes);
        assert_eq!(session.len(), 1);
        assert_eq!(session.files()[0].original_name, "Other.2021.mkv");
        assert_eq!(session.files()[0].status, FileStatus::Ready);
    }

    #[test]
    fn status_counts_reflect_the_session() {
        let mut session = session();
        session
            .add_files(
                &paths(&["Movie.2020.mkv", "Heat (1995).mkv", "bad.txt"]),
                MediaType::Movie,
                &[],
            )
            .unwrap();
        let counts = session.status_counts();
        assert_eq!(counts.ready, 1);
        assert_eq!(counts.already_normalized, 1);
        assert_eq!(counts.invalid, 1);
        assert_eq!(counts.total(), 3);
    }
}

//! Per-file pipeline: extension gate, normalization check, extraction,
//! synthesis, classification.

use std::path::Path;

use tracing::debug;

use crate::config::EngineConfig;
use crate::extract::{self, Span};
use crate::models::{FailureReason, FileStatus, MediaType, ProcessableFile};
use crate::normalize;
use crate::synth;

pub struct FileAnalyzer {
    config: EngineConfig,
}

impl FileAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify one file and produce its initial proposal. `shared_year`
    /// applies to series records lacking an explicit year.
    pub fn analyze(
        &self,
        path: &Path,
        media_type: MediaType,
        shared_year: Option<u16>,
    ) -> ProcessableFile {
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut file = ProcessableFile {
            original_path: path.to_path_buf(),
            original_name: original_name.clone(),
            media_type,
            title: String::new(),
            extracted_year: None,
            episode_tag: None,
            extras: Vec::new(),
            proposed_name: original_name.clone(),
            status: FileStatus::Invalid,
            reason: None,
            user_edited: false,
        };

        // Step 1: the extension gate runs before any parsing.
        let Some((stem, ext)) = normalize::split_extension(&original_name) else {
            file.reason = Some(FailureReason::UnsupportedFormat);
            return file;
        };
        if !self.config.is_video_extension(ext.trim_start_matches('.')) {
            file.reason = Some(FailureReason::UnsupportedFormat);
            return file;
        }

        // Step 2: a name already in canonical form needs no further parsing.
        if let Some(parts) = normalize::parse_canonical(&original_name, media_type, &self.config) {
            file.title = parts.title;
            file.extracted_year = Some(parts.year);
            file.episode_tag = parts.episode_tag;
            file.extras = parts.trailing;
            file.status = FileStatus::AlreadyNormalized;
            return file;
        }

        let year = extract::extract_year(stem, &self.config);
        match media_type {
            MediaType::Movie => self.classify_movie(&mut file, stem, &ext, year),
            MediaType::Series => self.classify_series(&mut file, stem, &ext, year, shared_year),
        }
        debug!(name = %file.original_name, status = ?file.status, "analyzed");
        file
    }

    fn classify_movie(
        &self,
        file: &mut ProcessableFile,
        stem: &str,
        ext: &str,
        year: Option<(u16, Span)>,
    ) {
        // A year run that would leave an empty title ("2012.mkv") is the
        // title itself, not the year.
        let year = year.filter(|(_, span)| !synth::clean_component(&stem[..span.start]).is_empty());

        match year {
            Some((year, span)) => {
                file.extracted_year = Some(year);
                file.title = stem[..span.start].to_string();
                file.extras = extract::extract_extras(stem, &[span], &self.config);
                file.proposed_name = synth::build_movie_name(&file.title, year, &file.extras, ext);
                file.status = FileStatus::Ready;
            }
            None => {
                file.title = stem.to_string();
                file.status = FileStatus::NeedsYear;
            }
        }
    }

    fn classify_series(
        &self,
        file: &mut ProcessableFile,
        stem: &str,
        ext: &str,
        year: Option<(u16, Span)>,
        shared_year: Option<u16>,
    ) {
        // Episode numbering cannot be guessed: no pattern is a hard failure.
        let Some((tag, episode_span)) = extract::extract_episode(stem) else {
            file.status = FileStatus::Invalid;
            file.reason = Some(FailureReason::NoEpisodePattern);
            return;
        };
        file.episode_tag = Some(tag);

        let year = year
            .filter(|(_, span)| span.start < episode_span.start)
            .filter(|(_, span)| !synth::clean_component(&stem[..span.start]).is_empty());

        let (title_end, consumed) = match year {
            Some((year, year_span)) => {
                file.extracted_year = Some(year);
                (year_span.start, vec![year_span, episode_span])
            }
            None => (episode_span.start, vec![episode_span]),
        };
        file.title = stem[..title_end].to_string();
        file.extras = extract::extract_extras(stem, &consumed, &self.config);

        match file.extracted_year.or(shared_year) {
            Some(year) => {
                file.proposed_name =
                    synth::build_series_name(&file.title, year, tag, &file.extras, ext);
                file.status = FileStatus::Ready;
            }
            None => {
                file.status = FileStatus::NeedsYear;
            }
        }
    }

    /// Edit re-entry: the edited string replaces extraction but must still
    /// satisfy the canonical grammar, and is reclassified like any other
    /// record afterwards.
    pub fn reanalyze_edited(&self, file: &mut ProcessableFile, new_name: &str) {
        let new_name = new_name.trim();
        file.user_edited = true;
        file.proposed_name = new_name.to_string();
        file.reason = None;

        let supported = normalize::split_extension(new_name)
            .map(|(_, ext)| self.config.is_video_extension(ext.trim_start_matches('.')))
            .unwrap_or(false);
        if !supported {
            file.status = FileStatus::Invalid;
            file.reason = Some(FailureReason::UnsupportedFormat);
            return;
        }

        match normalize::parse_canonical(new_name, file.media_type, &self.config) {
            Some(parts) => {
                file.title = parts.title;
                file.extracted_year = Some(parts.year);
                file.episode_tag = parts.episode_tag;
                file.extras = parts.trailing;
                file.status = if new_name == file.original_name {
                    FileStatus::AlreadyNormalized
                } else {
                    FileStatus::Ready
                };
            }
            None => {
                file.status = FileStatus::Invalid;
                file.reason = Some(FailureReason::NotCanonical);
            }
        }
    }
}

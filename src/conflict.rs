//! Session-wide duplicate and collision detection.
//!
//! Always a full re-run over every record: one edit can create or dissolve
//! several duplicate pairs at once, and re-deriving everything keeps the
//! displayed status set internally consistent after any mutation.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::models::{FailureReason, FileStatus, ProcessableFile};

/// Case-insensitive key for a name inside a directory.
pub fn path_key(dir: &Path, name: &str) -> String {
    format!(
        "{}/{}",
        dir.to_string_lossy().to_lowercase(),
        name.to_lowercase()
    )
}

fn target_key(file: &ProcessableFile) -> String {
    path_key(file.directory(), &file.proposed_name)
}

/// Recompute `Duplicate` marks for the whole session. `existing_on_disk`
/// holds `path_key`s of files currently present on disk.
pub fn resolve(files: &mut [ProcessableFile], existing_on_disk: &HashSet<String>) {
    // Duplicate is derived, never sticky: undo earlier marks first. The
    // inverse of assignment is exact: a proposal equal to the original name
    // was AlreadyNormalized, anything else was Ready.
    for file in files.iter_mut() {
        if file.status == FileStatus::Duplicate {
            file.status = if file.proposed_name == file.original_name {
                FileStatus::AlreadyNormalized
            } else {
                FileStatus::Ready
            };
            file.reason = None;
        }
    }

    // Group by (directory, case-insensitive proposed name). Symmetric:
    // every member of an oversized group is flagged, there is no first-wins.
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, file) in files.iter().enumerate() {
        if matches!(file.status, FileStatus::Invalid | FileStatus::NeedsYear) {
            continue;
        }
        groups.entry(target_key(file)).or_default().push(idx);
    }
    for indices in groups.values() {
        if indices.len() > 1 {
            for &idx in indices {
                files[idx].status = FileStatus::Duplicate;
                files[idx].reason = Some(FailureReason::DuplicateName);
            }
        }
    }

    // Independently, a proposal may collide with a different file already
    // on disk. Same status, distinguishing reason.
    for file in files.iter_mut() {
        if file.status != FileStatus::Ready {
            continue;
        }
        if file.proposed_name.eq_ignore_ascii_case(&file.original_name) {
            continue;
        }
        if existing_on_disk.contains(&target_key(file)) {
            file.status = FileStatus::Duplicate;
            file.reason = Some(FailureReason::TargetExistsOnDisk);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::FileAnalyzer;
    use crate::config::EngineConfig;
    use crate::models::MediaType;
    use std::path::PathBuf;

    fn analyzed(names: &[&str]) -> Vec<ProcessableFile> {
        let analyzer = FileAnalyzer::new(EngineConfig::with_year_bounds(1895, 2024));
        names
            .iter()
            .map(|n| analyzer.analyze(&PathBuf::from("/library").join(n), MediaType::Movie, None))
            .collect()
    }

    #[test]
    fn duplicate_marks_are_symmetric() {
        let mut files = analyzed(&["Movie.2020.mkv", "Movie (2020).mkv"]);
        resolve(&mut files, &HashSet::new());
        assert_eq!(files[0].status, FileStatus::Duplicate);
        assert_eq!(files[1].status, FileStatus::Duplicate);
        assert_eq!(files[0].reason, Some(FailureReason::DuplicateName));
    }

    #[test]
    fn duplicate_marks_are_recomputed_not_cached() {
        let mut files = analyzed(&["Movie.2020.mkv", "Movie (2020).mkv"]);
        resolve(&mut files, &HashSet::new());

        // Diverge one proposal; both records must recover their own status.
        files[0].proposed_name = "Other Movie (2020).mkv".to_string();
        resolve(&mut files, &HashSet::new());
        assert_eq!(files[0].status, FileStatus::Ready);
        assert_eq!(files[1].status, FileStatus::AlreadyNormalized);
        assert_eq!(files[1].reason, None);
    }

    #[test]
    fn grouping_is_case_insensitive() {
        let mut files = analyzed(&["Movie.2020.mkv", "MOVIE.2020.avi"]);
        // Same stem, different extensions: proposals differ, no duplicate.
        resolve(&mut files, &HashSet::new());
        assert_eq!(files[0].status, FileStatus::Ready);

        let mut files = analyzed(&["Movie.2020.mkv", "MOVIE.2020.mkv"]);
        resolve(&mut files, &HashSet::new());
        assert_eq!(files[0].status, FileStatus::Duplicate);
        assert_eq!(files[1].status, FileStatus::Duplicate);
    }

    #[test]
    fn collision_with_existing_file_on_disk() {
        let mut files = analyzed(&["Movie.2020.mkv"]);
        let mut on_disk = HashSet::new();
        on_disk.insert(path_key(Path::new("/library"), "Movie (2020).mkv"));
        resolve(&mut files, &on_disk);
        assert_eq!(files[0].status, FileStatus::Duplicate);
        assert_eq!(files[0].reason, Some(FailureReason::TargetExistsOnDisk));
    }

    #[test]
    fn own_name_on_disk_is_not_a_collision() {
        let mut files = analyzed(&["Movie (2020).mkv"]);
        let mut on_disk = HashSet::new();
        on_disk.insert(path_key(Path::new("/library"), "Movie (2020).mkv"));
        resolve(&mut files, &on_disk);
        assert_eq!(files[0].status, FileStatus::AlreadyNormalized);
    }

    #[test]
    fn blocked_records_do_not_join_groups() {
        let mut files = analyzed(&["Movie.2020.mkv", "Movie.2020.txt"]);
        resolve(&mut files, &HashSet::new());
        // The invalid record keeps its status and shields no one.
        assert_eq!(files[0].status, FileStatus::Ready);
        assert_eq!(files[1].status, FileStatus::Invalid);
    }
}

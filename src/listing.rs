//! Directory enumeration for the presentation layer. The engine itself
//! never touches the filesystem; these helpers feed it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::EngineConfig;

/// Non-recursive scan for files with a supported video extension,
/// sorted by name for a stable session order.
pub fn scan_folder_for_videos(dir: &Path, config: &EngineConfig) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut videos = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| config.is_video_extension(e))
            .unwrap_or(false);
        if supported {
            videos.push(path);
        }
    }
    videos.sort();
    Ok(videos)
}

/// Every plain file in `dir`, regardless of extension. Collision checks
/// need the full directory contents, not just the videos.
pub fn list_existing(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("media-rename-listing-{label}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn scan_filters_and_sorts() {
        let dir = temp_dir("scan");
        for name in ["b.mkv", "a.MP4", "notes.txt", "c.avi"] {
            File::create(dir.join(name)).unwrap();
        }
        fs::create_dir(dir.join("sub.mkv")).unwrap();

        let config = EngineConfig::new();
        let found = scan_folder_for_videos(&dir, &config).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.MP4", "b.mkv", "c.avi"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn list_existing_includes_non_videos() {
        let dir = temp_dir("existing");
        File::create(dir.join("movie.mkv")).unwrap();
        File::create(dir.join("notes.txt")).unwrap();

        let found = list_existing(&dir).unwrap();
        assert_eq!(found.len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let config = EngineConfig::new();
        assert!(scan_folder_for_videos(Path::new("/nonexistent/surely"), &config).is_err());
    }
}

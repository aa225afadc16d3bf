//! Full flow against a real directory: scan, classify, apply, rename.

use std::fs::{self, File};
use std::path::PathBuf;

use media_rename::config::EngineConfig;
use media_rename::executor;
use media_rename::listing;
use media_rename::models::{FileStatus, MediaType};
use media_rename::session::SessionState;

fn setup(label: &str, names: &[&str]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("media-rename-flow-{label}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    for name in names {
        File::create(dir.join(name)).unwrap();
    }
    dir
}

fn names_in(dir: &PathBuf) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn movie_directory_is_renamed_in_place() {
    let dir = setup(
        "movies",
        &["The.Matrix.1999.1080p.BluRay.mkv", "Heat (1995).mkv"],
    );
    let config = EngineConfig::with_year_bounds(1895, 2024);

    let videos = listing::scan_folder_for_videos(&dir, &config).unwrap();
    let existing = listing::list_existing(&dir).unwrap();

    let mut session = SessionState::new(config);
    session
        .add_files(&videos, MediaType::Movie, &existing)
        .unwrap();
    assert!(session.can_apply());

    let outcomes = executor::execute_renames(session.apply().unwrap());
    assert!(outcomes.iter().all(|o| o.succeeded()));
    session.mark_applied(&outcomes);

    // The already canonical file was never part of the plan and remains.
    assert_eq!(session.len(), 1);
    assert_eq!(session.files()[0].status, FileStatus::AlreadyNormalized);
    assert_eq!(
        names_in(&dir),
        vec![
            "Heat (1995).mkv".to_string(),
            "The Matrix (1999) - 1080p BluRay.mkv".to_string(),
        ]
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn collision_with_a_disk_file_is_caught_before_renaming() {
    let dir = setup("collide", &["Movie.2020.mkv", "Movie (2020).mkv"]);
    let config = EngineConfig::with_year_bounds(1895, 2024);

    let videos = listing::scan_folder_for_videos(&dir, &config).unwrap();
    let existing = listing::list_existing(&dir).unwrap();

    let mut session = SessionState::new(config);
    session
        .add_files(&videos, MediaType::Movie, &existing)
        .unwrap();
    // Both end up Duplicate through the in-session group; apply is blocked
    // so nothing on disk can be clobbered.
    assert!(!session.can_apply());
    assert_eq!(
        names_in(&dir),
        vec!["Movie (2020).mkv".to_string(), "Movie.2020.mkv".to_string()]
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn series_flow_with_shared_year() {
    let dir = setup(
        "series",
        &["show.s01e01.pilot.mkv", "show.s01e02.mkv", "notes.txt"],
    );
    let config = EngineConfig::with_year_bounds(1895, 2024);

    let videos = listing::scan_folder_for_videos(&dir, &config).unwrap();
    assert_eq!(videos.len(), 2);
    let existing = listing::list_existing(&dir).unwrap();

    let mut session = SessionState::new(config);
    session
        .add_files(&videos, MediaType::Series, &existing)
        .unwrap();
    session.set_shared_year(2008).unwrap();

    let outcomes = executor::execute_renames(session.apply().unwrap());
    session.mark_applied(&outcomes);
    assert!(session.is_empty());
    assert_eq!(
        names_in(&dir),
        vec![
            "notes.txt".to_string(),
            "show (2008) - S01E01 - pilot.mkv".to_string(),
            "show (2008) - S01E02.mkv".to_string(),
        ]
    );

    fs::remove_dir_all(&dir).unwrap();
}

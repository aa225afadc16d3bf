use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Extensions the engine accepts. Checked before any parsing happens.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg",
];

/// Codec and release-group tokens dropped from extras. Resolution and
/// source tags (1080p, BluRay) are kept: they carry information worth
/// having in the final name.
pub const NOISE_TOKENS: &[&str] = &[
    "x264", "x265", "h264", "h265", "hevc", "avc", "xvid", "divx", "10bit", "aac", "ac3", "dts",
    "yify", "yts", "rarbg", "eztv", "ettv", "tgx", "1337x", "proper", "repack", "internal",
];

/// First commercial film exhibition.
pub const MIN_VALID_YEAR: u16 = 1895;

/// Residual punctuation stripped from the edges of extracted components,
/// e.g. the parentheses left behind once a year has been cut out.
pub(crate) const ARTIFACT_CHARS: &[char] = &['(', ')', '[', ']', '<', '>', ','];

/// Immutable engine configuration, passed in at construction. Alternate
/// year bounds make classification deterministic under test.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub min_year: u16,
    pub max_year: u16,
    pub video_extensions: Vec<String>,
    pub noise_tokens: Vec<String>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::with_year_bounds(MIN_VALID_YEAR, current_year())
    }

    pub fn with_year_bounds(min_year: u16, max_year: u16) -> Self {
        Self {
            min_year,
            max_year,
            video_extensions: VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            noise_tokens: NOISE_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn year_in_range(&self, year: u16) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    /// `ext` without the leading dot, any case.
    pub fn is_video_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.video_extensions.iter().any(|e| *e == ext)
    }

    pub fn is_noise_token(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.noise_tokens.iter().any(|t| *t == token)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub fn current_year() -> u16 {
    chrono::Local::now().year() as u16
}

/// Persisted user settings. Corrupt or missing files fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub last_movie_directory: String,
    #[serde(default)]
    pub last_series_directory: String,
}

impl Settings {
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

pub fn settings_path() -> PathBuf {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(base).join("media-rename").join("settings.json");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("media-rename")
            .join("settings.json");
    }
    PathBuf::from("settings.json")
}

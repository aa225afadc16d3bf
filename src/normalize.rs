//! Canonical-grammar validation.
//!
//! Anchored full-stem matches only: trailing text, wrong digit width, or a
//! non-parenthesized year all fail. For any fields the synthesizer accepts,
//! `is_normalized(build_*_name(..)) == true`.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::EngineConfig;
use crate::models::{EpisodeTag, MediaType};

// "Title (YYYY)" or "Title (YYYY) - Extras"
static MOVIE_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>[^()]+?) \((?P<year>\d{4})\)(?: - (?P<rest>.+))?$").unwrap()
});

// "Title (YYYY) - S##E##" or "Title (YYYY) - S##E## - Episode Title"
static SERIES_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<title>[^()]+?) \((?P<year>\d{4})\) - S(?P<season>\d{2})E(?P<episode>\d{2})(?: - (?P<rest>.+))?$",
    )
    .unwrap()
});

/// Components recovered from a name that already satisfies the canonical
/// grammar. Used by the edit and propagation paths to refresh the
/// authoritative fields without re-running extraction heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalParts {
    pub title: String,
    pub year: u16,
    pub episode_tag: Option<EpisodeTag>,
    pub trailing: Vec<String>,
    pub extension: String,
}

/// Split `name` into stem and lowercased extension (leading dot kept).
pub fn split_extension(name: &str) -> Option<(&str, String)> {
    let idx = name.rfind('.')?;
    if idx == 0 || idx + 1 == name.len() {
        return None;
    }
    Some((&name[..idx], name[idx..].to_lowercase()))
}

pub fn parse_canonical(
    name: &str,
    media_type: MediaType,
    config: &EngineConfig,
) -> Option<CanonicalParts> {
    let (stem, extension) = split_extension(name)?;
    if !config.is_video_extension(extension.trim_start_matches('.')) {
        return None;
    }

    let caps = match media_type {
        MediaType::Movie => MOVIE_STEM.captures(stem)?,
        MediaType::Series => SERIES_STEM.captures(stem)?,
    };

    let year: u16 = caps["year"].parse().ok()?;
    if !config.year_in_range(year) {
        return None;
    }

    let episode_tag = match media_type {
        MediaType::Movie => None,
        MediaType::Series => Some(EpisodeTag {
            season: caps["season"].parse().unwrap(),
            episode: caps["episode"].parse().unwrap(),
        }),
    };

    let trailing = caps
        .name("rest")
        .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    Some(CanonicalParts {
        title: caps["title"].to_string(),
        year,
        episode_tag,
        trailing,
        extension,
    })
}

pub fn is_normalized(name: &str, media_type: MediaType, config: &EngineConfig) -> bool {
    parse_canonical(name, media_type, config).is_some()
}

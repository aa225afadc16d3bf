//! Canonical filename construction.
//!
//! The synthesizer is a formatter, not a capitalizer: separators collapse
//! to single spaces but the caller's casing is left alone.

use crate::config::ARTIFACT_CHARS;
use crate::models::EpisodeTag;

/// Collapse `.`/`_`/whitespace runs to single spaces, trim, and strip
/// residual artifacts (stray parentheses and dashes left behind by
/// year/episode extraction) from the edges.
pub fn clean_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch == '.' || ch == '_' || ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out.trim_matches(|c: char| c == ' ' || c == '-' || ARTIFACT_CHARS.contains(&c))
        .to_string()
}

/// `"{Title} ({Year})[ - {Extras}]{ext}"`. `extension` keeps its leading dot.
pub fn build_movie_name(title: &str, year: u16, extras: &[String], extension: &str) -> String {
    let title = clean_component(title);
    let mut name = format!("{title} ({year})");
    if !extras.is_empty() {
        name.push_str(" - ");
        name.push_str(&extras.join(" "));
    }
    name.push_str(extension);
    name
}

/// `"{Show Title} ({Year}) - S##E##[ - {Episode Title}]{ext}"`.
pub fn build_series_name(
    title: &str,
    year: u16,
    tag: EpisodeTag,
    episode_title: &[String],
    extension: &str,
) -> String {
    let title = clean_component(title);
    let mut name = format!("{title} ({year}) - {tag}");
    if !episode_title.is_empty() {
        name.push_str(" - ");
        name.push_str(&episode_title.join(" "));
    }
    name.push_str(extension);
    name
}

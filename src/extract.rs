//! Stateless pattern extraction: year, season/episode, leftover extras.
//!
//! No match is never an error here; absence feeds classification.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{ARTIFACT_CHARS, EngineConfig};
use crate::models::EpisodeTag;

/// Byte range consumed by a year or episode match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

static EPISODE_SE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)S(\d{1,2})E(\d{1,2})").unwrap());

static EPISODE_X: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2})x(\d{1,2})").unwrap());

fn digit_at(raw: &str, idx: usize) -> bool {
    idx < raw.len() && raw.as_bytes()[idx].is_ascii_digit()
}

/// Season/episode extraction. `S##E##` is tried first and wins outright:
/// when it matches anywhere, the `##x##` form is not consulted at all.
/// Digit boundaries keep resolutions like `1920x1080` from matching.
pub fn extract_episode(raw: &str) -> Option<(EpisodeTag, Span)> {
    for caps in EPISODE_SE.captures_iter(raw) {
        let whole = caps.get(0).unwrap();
        if digit_at(raw, whole.end()) {
            continue;
        }
        let tag = EpisodeTag {
            season: caps[1].parse().unwrap(),
            episode: caps[2].parse().unwrap(),
        };
        let span = Span {
            start: whole.start(),
            len: whole.len(),
        };
        return Some((tag, span));
    }

    for caps in EPISODE_X.captures_iter(raw) {
        let whole = caps.get(0).unwrap();
        if whole.start() > 0 && digit_at(raw, whole.start() - 1) {
            continue;
        }
        if digit_at(raw, whole.end()) {
            continue;
        }
        let tag = EpisodeTag {
            season: caps[1].parse().unwrap(),
            episode: caps[2].parse().unwrap(),
        };
        let span = Span {
            start: whole.start(),
            len: whole.len(),
        };
        return Some((tag, span));
    }

    None
}

/// Year extraction: 4-digit runs bounded by non-digits, valid only inside
/// the configured range. Among valid candidates the rightmost one starting
/// before the episode marker wins; runs at or after the marker are never
/// the year (release tags put resolution and season markers after it).
/// This priority rule is a documented policy choice, pinned by tests.
pub fn extract_year(raw: &str, config: &EngineConfig) -> Option<(u16, Span)> {
    let marker = extract_episode(raw).map(|(_, span)| span.start);

    let mut best = None;
    for (start, run) in digit_runs(raw) {
        if run.len() != 4 {
            continue;
        }
        let Ok(year) = run.parse::<u16>() else {
            continue;
        };
        if !config.year_in_range(year) {
            continue;
        }
        if let Some(marker) = marker {
            if start >= marker {
                continue;
            }
        }
        // Left-to-right scan: a later hit replaces an earlier one.
        best = Some((year, Span { start, len: 4 }));
    }
    best
}

fn digit_runs(raw: &str) -> Vec<(usize, &str)> {
    let bytes = raw.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            runs.push((start, &raw[start..i]));
        } else {
            i += 1;
        }
    }
    runs
}

/// Collect descriptive tokens around the consumed spans: everything after
/// the first span, spans excluded, noise tokens dropped, left-to-right
/// order kept, case-insensitively de-duplicated. The region before the
/// first span is the title and is not an extra.
pub fn extract_extras(raw: &str, consumed: &[Span], config: &EngineConfig) -> Vec<String> {
    let Some(first) = consumed.iter().map(|s| s.start).min() else {
        return Vec::new();
    };

    // Consumed spans cover ASCII matches, so blanking bytes is UTF-8 safe.
    let mut masked = raw.as_bytes().to_vec();
    for span in consumed {
        for byte in masked
            .iter_mut()
            .take(span.end().min(raw.len()))
            .skip(span.start)
        {
            *byte = b' ';
        }
    }
    let tail = String::from_utf8_lossy(&masked[first..]).into_owned();

    let mut seen: Vec<String> = Vec::new();
    let mut extras = Vec::new();
    for token in tail.split([' ', '.', '_', '-']) {
        let token = token.trim_matches(ARTIFACT_CHARS);
        if token.is_empty() || config.is_noise_token(token) {
            continue;
        }
        let key = token.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        extras.push(token.to_string());
    }
    extras
}

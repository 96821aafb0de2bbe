// src/routing/path.rs
// Output path derivation: a directory suffix from the audio date plus a
// composed filename. Never fails; pathological subjects fall back to a slug
// of the source filename.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::routing::types::{DirectoryStructure, FilenameComponent, RouteDecision, RoutingContext};

/// Leading boilerplate stripped from a transcript's first sentence before it
/// can become a filename subject. Longest alternatives first.
static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(this is a note about|note about|meeting notes:?|regarding|re:)\s*")
        .unwrap()
});

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// Subjects shorter than this read as noise and longer ones as run-on
/// transcription; both bounds are exclusive.
const SUBJECT_MIN_CHARS: usize = 3;
const SUBJECT_MAX_CHARS: usize = 50;
const SUBJECT_SLUG_CAP: usize = 40;

/// Derive the concrete file path for a decision: expanded destination root,
/// date-derived directory suffix, composed filename.
pub fn build_output_path(decision: &RouteDecision, context: &RoutingContext) -> PathBuf {
    let mut path = expand_home(&decision.destination.path);
    let date = context.audio_date;

    // Month and day are deliberately unpadded in directory names.
    match decision.destination.structure {
        DirectoryStructure::None => {}
        DirectoryStructure::Year => {
            path.push(date.year().to_string());
        }
        DirectoryStructure::Month => {
            path.push(date.year().to_string());
            path.push(date.month().to_string());
        }
        DirectoryStructure::Day => {
            path.push(date.year().to_string());
            path.push(date.month().to_string());
            path.push(date.day().to_string());
        }
    }

    path.push(build_filename(decision, context));
    path
}

fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

fn build_filename(decision: &RouteDecision, context: &RoutingContext) -> String {
    let date = context.audio_date;
    let structure = decision.destination.structure;

    let mut parts: Vec<String> = Vec::new();
    for component in &decision.destination.filename_options {
        match component {
            FilenameComponent::Date => {
                if let Some(part) = date_part(structure, date) {
                    parts.push(part);
                }
            }
            FilenameComponent::Time => {
                parts.push(format!("{:02}{:02}", date.hour(), date.minute()));
            }
            FilenameComponent::Subject => {
                parts.push(subject_slug(&context.transcript_text, &context.source_file));
            }
        }
    }

    let joined = parts.join("-");
    let mut name = DASH_RUNS
        .replace_all(&joined, "-")
        .trim_matches('-')
        .to_string();
    if name.is_empty() {
        // Every selected component came up empty (e.g. date absorbed by a
        // day structure); fall back so the result is never just ".md".
        name = source_file_slug(&context.source_file);
    }
    format!("{name}.md")
}

/// The date component avoids repeating whatever the directory structure
/// already encodes.
fn date_part(structure: DirectoryStructure, date: DateTime<Utc>) -> Option<String> {
    match structure {
        DirectoryStructure::Day => None,
        DirectoryStructure::Month => Some(format!("{:02}", date.day())),
        DirectoryStructure::Year => Some(format!("{:02}-{:02}", date.month(), date.day())),
        DirectoryStructure::None => Some(format!(
            "{:02}{:02}{:02}",
            date.year() % 100,
            date.month(),
            date.day()
        )),
    }
}

/// First sentence of the transcript, boilerplate-stripped and slugified.
/// Sentences implausibly short or long for a filename give way to the
/// source filename instead.
fn subject_slug(transcript: &str, source_file: &str) -> String {
    let first_sentence = transcript.split(['.', '!', '?']).next().unwrap_or("");
    let cleaned = BOILERPLATE.replace(first_sentence.trim(), "");
    let cleaned = cleaned.trim();

    let length = cleaned.chars().count();
    if length > SUBJECT_MIN_CHARS && length < SUBJECT_MAX_CHARS {
        slugify(cleaned, Some(SUBJECT_SLUG_CAP))
    } else {
        source_file_slug(source_file)
    }
}

fn source_file_slug(source_file: &str) -> String {
    let stem = Path::new(source_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    slugify(&stem, None)
}

fn slugify(text: &str, cap: Option<usize>) -> String {
    let lowered = text.to_lowercase();
    let slug = NON_ALNUM.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    let slug = match cap {
        Some(max) => slug.chars().take(max).collect::<String>(),
        None => slug.to_string(),
    };
    // Truncation can strand a trailing dash.
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::types::RouteDestination;
    use chrono::TimeZone;

    fn decision(path: &str, structure: DirectoryStructure, options: Vec<FilenameComponent>) -> RouteDecision {
        RouteDecision {
            project_id: Some("atlas".to_string()),
            destination: RouteDestination {
                path: path.to_string(),
                structure,
                filename_options: options,
                create_directories: None,
            },
            confidence: 0.9,
            signals: vec![],
            reasoning: String::new(),
            auto_tags: None,
            alternate_matches: None,
        }
    }

    fn context(text: &str, source: &str, date: DateTime<Utc>) -> RoutingContext {
        RoutingContext {
            transcript_text: text.to_string(),
            audio_date: date,
            source_file: source.to_string(),
            hash: None,
            detected_people: None,
            detected_companies: None,
        }
    }

    fn date(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_compact_date_under_flat_structure() {
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::None, vec![FilenameComponent::Date]),
            &context("whatever", "rec.m4a", date(2026, 1, 5, 9, 0)),
        );
        assert_eq!(out, PathBuf::from("/tmp/notes/260105.md"));
    }

    #[test]
    fn test_date_and_time_filename() {
        let out = build_output_path(
            &decision(
                "/tmp/notes",
                DirectoryStructure::None,
                vec![FilenameComponent::Date, FilenameComponent::Time],
            ),
            &context("whatever", "rec.m4a", date(2026, 1, 1, 12, 0)),
        );
        assert_eq!(out, PathBuf::from("/tmp/notes/260101-1200.md"));
    }

    #[test]
    fn test_month_structure_directories_unpadded() {
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::Month, vec![FilenameComponent::Date]),
            &context("whatever", "rec.m4a", date(2026, 3, 15, 8, 30)),
        );
        // Directory month unpadded, filename day zero-padded.
        assert_eq!(out, PathBuf::from("/tmp/notes/2026/3/15.md"));
    }

    #[test]
    fn test_year_structure_date_part() {
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::Year, vec![FilenameComponent::Date]),
            &context("whatever", "rec.m4a", date(2026, 3, 5, 8, 30)),
        );
        assert_eq!(out, PathBuf::from("/tmp/notes/2026/03-05.md"));
    }

    #[test]
    fn test_day_structure_absorbs_date() {
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::Day, vec![FilenameComponent::Date]),
            &context("whatever", "voice_memo_12.m4a", date(2026, 3, 15, 8, 30)),
        );
        // No date component survives; the filename falls back to the source
        // slug rather than degrading to ".md".
        assert_eq!(out, PathBuf::from("/tmp/notes/2026/3/15/voice-memo-12.md"));
    }

    #[test]
    fn test_home_expansion_leaves_no_tilde() {
        let out = build_output_path(
            &decision("~/notes", DirectoryStructure::None, vec![FilenameComponent::Date]),
            &context("whatever", "rec.m4a", date(2026, 1, 5, 9, 0)),
        );
        let rendered = out.to_string_lossy();
        assert!(!rendered.contains('~'), "unexpanded path: {rendered}");
        if let Some(home) = dirs::home_dir() {
            assert!(out.starts_with(home));
        }
    }

    #[test]
    fn test_subject_from_first_sentence() {
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::None, vec![FilenameComponent::Subject]),
            &context(
                "This is a note about the quarterly budget review. It went long.",
                "rec.m4a",
                date(2026, 1, 5, 9, 0),
            ),
        );
        assert_eq!(out, PathBuf::from("/tmp/notes/the-quarterly-budget-review.md"));
    }

    #[test]
    fn test_subject_strips_meeting_notes_prefix() {
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::None, vec![FilenameComponent::Subject]),
            &context("Meeting notes: roadmap sync! Lots to do.", "rec.m4a", date(2026, 1, 5, 9, 0)),
        );
        assert_eq!(out, PathBuf::from("/tmp/notes/roadmap-sync.md"));
    }

    #[test]
    fn test_short_subject_falls_back_to_source_file() {
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::None, vec![FilenameComponent::Subject]),
            &context("Hi. Just testing the recorder.", "Recording_001.m4a", date(2026, 1, 5, 9, 0)),
        );
        assert_eq!(out, PathBuf::from("/tmp/notes/recording-001.md"));
    }

    #[test]
    fn test_long_subject_falls_back_to_source_file() {
        let rambling = "so today I want to talk through everything that happened during the offsite and more";
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::None, vec![FilenameComponent::Subject]),
            &context(rambling, "memo.wav", date(2026, 1, 5, 9, 0)),
        );
        assert_eq!(out, PathBuf::from("/tmp/notes/memo.md"));
    }

    #[test]
    fn test_subject_slug_capped_at_forty_chars() {
        // 45 chars of sentence, inside the (3, 50) window.
        let text = "planning the warehouse migration for next qtr";
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::None, vec![FilenameComponent::Subject]),
            &context(text, "rec.m4a", date(2026, 1, 5, 9, 0)),
        );
        let name = out.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        assert!(name.chars().count() <= 40, "slug too long: {name}");
        assert!(name.starts_with("planning-the-warehouse"));
        assert!(!name.ends_with('-'));
    }

    #[test]
    fn test_empty_transcript_and_bare_extension_source() {
        let out = build_output_path(
            &decision("/tmp/notes", DirectoryStructure::None, vec![FilenameComponent::Subject]),
            &context("", ".m4a", date(2026, 1, 5, 9, 0)),
        );
        // Best effort: the dot-file stem still slugs to something usable.
        assert_eq!(out, PathBuf::from("/tmp/notes/m4a.md"));
    }
}

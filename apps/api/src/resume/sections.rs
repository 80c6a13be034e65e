//! Section extraction: fixed regular expressions over the raw resume text.
//!
//! Skills and Experience capture the block after the first matching header,
//! up to the next blank line or end of text. Later headers are ignored unless
//! `SectionOptions::match_all_occurrences` is set.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::{Field, Record};

lazy_static! {
    static ref SKILLS_PATTERN: Regex =
        Regex::new(r"(?is)(?:Skills|Technical Skills)[:\n](.*?)(?:\n\n|$)").unwrap();

    static ref EXPERIENCE_PATTERN: Regex = Regex::new(
        r"(?is)(?:Experience|Work Experience|Employment History)[:\n](.*?)(?:\n\n|$)"
    )
    .unwrap();

    static ref EDUCATION_PATTERN: Regex = Regex::new(
        r"(?i)(?:B\.?Tech|B\.?Sc|M\.?Sc|MBA|M\.?Tech|Bachelor|Master|Ph\.?D)[^\n]*"
    )
    .unwrap();

    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap();

    static ref PHONE_PATTERN: Regex = Regex::new(r"(?:\+?\d{1,3}[\s-]?)?\d{10}\b").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SectionOptions {
    /// Capture every Skills/Experience block instead of only the first one.
    pub match_all_occurrences: bool,
}

/// Fields are inserted in a fixed order: Skills, Education, Experience, Email,
/// Phone. Fields that do not match are left out.
pub fn extract_sections(text: &str, options: &SectionOptions) -> Record {
    let mut record = Record::new();

    if let Some(skills) = capture_blocks(&SKILLS_PATTERN, text, ", ", options) {
        record.insert(Field::Skills, skills);
    }

    let education = education_lines(text);
    if !education.is_empty() {
        record.insert(Field::Education, education);
    }

    if let Some(experience) = capture_blocks(&EXPERIENCE_PATTERN, text, " ", options) {
        record.insert(Field::Experience, experience);
    }

    if let Some(m) = EMAIL_PATTERN.find(text) {
        record.insert(Field::Email, m.as_str());
    }

    if let Some(phone) = find_phone(text) {
        record.insert(Field::Phone, phone);
    }

    record
}

/// Header-anchored block capture. Each block is trimmed, then its internal
/// newlines are replaced by `separator`. Multiple blocks (only with
/// `match_all_occurrences`) are joined by the same separator.
fn capture_blocks(
    pattern: &Regex,
    text: &str,
    separator: &str,
    options: &SectionOptions,
) -> Option<String> {
    let blocks: Vec<String> = pattern
        .captures_iter(text)
        .take(if options.match_all_occurrences {
            usize::MAX
        } else {
            1
        })
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().replace('\n', separator))
        .collect();

    if blocks.is_empty() {
        return None;
    }
    Some(
        blocks
            .into_iter()
            .filter(|b| !b.is_empty())
            .collect::<Vec<_>>()
            .join(separator),
    )
}

/// Degree lines, trimmed and deduplicated in first-seen order.
fn education_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for m in EDUCATION_PATTERN.find_iter(text) {
        let line = m.as_str().trim();
        if !lines.iter().any(|l| l == line) {
            lines.push(line.to_string());
        }
    }
    lines
}

/// Spaces and tabs are stripped before matching, so a number split by spaces
/// (`98765 43210`) still matches. Adjacent digit runs on one line can fuse as
/// a result. Line breaks are kept and still end a number.
fn find_phone(text: &str) -> Option<String> {
    let compact: String = text.chars().filter(|c| *c != ' ' && *c != '\t').collect();
    PHONE_PATTERN.find(&compact).map(|m| m.as_str().to_string())
}

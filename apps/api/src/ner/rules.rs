//! Rule-based tagger. Deterministic, no model download.
//!
//! - DATE: `Jan 2020`, `January 2020`, `06/2019`, bare years, and ranges of
//!   those ending in another date or `Present`/`Current`/`Now`.
//! - ORG: capitalized phrases ending in an organization suffix (`Acme Corp`,
//!   `Stanford University`) and `<...> University/Institute/College of <...>`.
//! - PERSON: a standalone line of 2–4 name-shaped words that is not a section
//!   header, job title or organization.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::{EntityLabel, EntitySpan, EntityTagger, TaggerError};

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

const ORG_SUFFIXES: &str = r"(?:Inc|Ltd|LLC|LLP|Corp|Corporation|Company|Co|University|College|Institute|Academy|Technologies|Solutions|Labs|Laboratories|Bank|Group|Limited|Pvt|Consulting|Partners|Foundation)";

lazy_static! {
    static ref DATE_PATTERN: Regex = {
        let point = format!(
            r"(?:{month}\.?[ \t]+\d{{4}}|\d{{1,2}}/\d{{4}}|(?:19|20)\d{{2}})",
            month = MONTH
        );
        Regex::new(&format!(
            r"(?i)\b{point}(?:[ \t]*(?:-|–|—|to)[ \t]*(?:{point}|present|current|now))?\b",
            point = point
        ))
        .unwrap()
    };

    static ref ORG_PATTERN: Regex = Regex::new(&format!(
        r"\b(?:(?:[A-Z][\w&'-]*[ \t]+){{0,3}}(?:University|Institute|College|School)[ \t]+of(?:[ \t]+[A-Z][\w&'-]*){{1,4}}|(?:[A-Z][\w&.'-]*[ \t]+){{1,4}}{suffixes}\b\.?)",
        suffixes = ORG_SUFFIXES
    ))
    .unwrap();

    static ref NAME_WORD: Regex =
        Regex::new(r"^(?:[A-Z][a-z]*(?:[-'][A-Z][a-z]+)?|[A-Z]\.)$").unwrap();
}

/// Words that rule a line out as a personal name.
const NOT_NAME_WORDS: &[&str] = &[
    // section headers
    "resume",
    "curriculum",
    "vitae",
    "cv",
    "skills",
    "technical",
    "education",
    "experience",
    "work",
    "employment",
    "history",
    "summary",
    "profile",
    "objective",
    "projects",
    "contact",
    "certifications",
    "achievements",
    "languages",
    "interests",
    "references",
    "hobbies",
    "about",
    "personal",
    "details",
    "professional",
    // job titles and fields
    "engineer",
    "developer",
    "manager",
    "analyst",
    "intern",
    "designer",
    "consultant",
    "scientist",
    "architect",
    "lead",
    "senior",
    "junior",
    "director",
    "officer",
    "specialist",
    "administrator",
    "associate",
    "assistant",
    "student",
    "software",
    "computer",
    "science",
    "engineering",
    "data",
];

pub struct RuleTagger;

#[async_trait]
impl EntityTagger for RuleTagger {
    async fn tag(&self, text: &str) -> Result<Vec<EntitySpan>, TaggerError> {
        Ok(tag_text(text))
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

/// Tags `text`, returning non-overlapping spans ordered by start offset.
pub fn tag_text(text: &str) -> Vec<EntitySpan> {
    let mut spans: Vec<EntitySpan> = Vec::new();

    for m in DATE_PATTERN.find_iter(text) {
        spans.push(span(m.as_str(), EntityLabel::Date, m.start()));
    }
    for m in ORG_PATTERN.find_iter(text) {
        spans.push(span(m.as_str(), EntityLabel::Org, m.start()));
    }
    spans.extend(person_lines(text));

    // Earliest first; for equal starts the longer span wins.
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut result: Vec<EntitySpan> = Vec::with_capacity(spans.len());
    for s in spans {
        if result.last().map_or(true, |prev| s.start >= prev.end) {
            result.push(s);
        }
    }
    result
}

fn span(text: &str, label: EntityLabel, start: usize) -> EntitySpan {
    EntitySpan {
        text: text.to_string(),
        label,
        start,
        end: start + text.len(),
    }
}

fn person_lines(text: &str) -> Vec<EntitySpan> {
    let mut found = Vec::new();
    let mut offset = 0;

    for line in text.split('\n') {
        let line_start = offset;
        offset += line.len() + 1;

        let trimmed = line.trim();
        if looks_like_name(trimmed) {
            let lead = line.len() - line.trim_start().len();
            found.push(span(trimmed, EntityLabel::Person, line_start + lead));
        }
    }
    found
}

fn looks_like_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    if !words.iter().all(|w| NAME_WORD.is_match(w)) {
        return false;
    }
    if words
        .iter()
        .any(|w| NOT_NAME_WORDS.contains(&w.to_lowercase().as_str()))
    {
        return false;
    }
    !ORG_PATTERN.is_match(line) && !DATE_PATTERN.is_match(line)
}

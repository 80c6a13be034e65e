use crate::models::record::{Field, Record};
use crate::ner::{EntityLabel, EntitySpan, EntityTagger, TaggerError};

/// Lines that head a resume but are never the candidate's name.
const RESERVED_HEADINGS: &[&str] = &["resume", "cv", "curriculum vitae"];

/// How many non-empty lines the name fallback looks at.
const NAME_FALLBACK_LINES: usize = 5;

/// Runs the tagger over `text` and builds the entity record.
pub async fn extract_entities(
    text: &str,
    tagger: &dyn EntityTagger,
) -> Result<Record, TaggerError> {
    let spans = tagger.tag(text).await?;
    Ok(entities_from_spans(text, &spans))
}

/// Builds `{Name?, Organizations, Dates}` from tagged spans.
///
/// Name is the first PERSON span; without one, the first of the opening five
/// non-empty lines that is not a reserved heading. Organizations and Dates are
/// always present, deduplicated in first-seen order.
pub fn entities_from_spans(text: &str, spans: &[EntitySpan]) -> Record {
    let mut name: Option<&str> = None;
    let mut organizations: Vec<String> = Vec::new();
    let mut dates: Vec<String> = Vec::new();

    for span in spans {
        match span.label {
            EntityLabel::Person if name.is_none() => name = Some(span.text.as_str()),
            EntityLabel::Org => push_unique(&mut organizations, &span.text),
            EntityLabel::Date => push_unique(&mut dates, &span.text),
            _ => {}
        }
    }

    let name = name.map(str::to_string).or_else(|| fallback_name(text));

    let mut record = Record::new();
    if let Some(name) = name {
        record.insert(Field::Name, name);
    }
    record.insert(Field::Organizations, organizations);
    record.insert(Field::Dates, dates);
    record
}

fn fallback_name(text: &str) -> Option<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(NAME_FALLBACK_LINES)
        .find(|line| !RESERVED_HEADINGS.contains(&line.to_lowercase().as_str()))
        .map(str::to_string)
}

fn push_unique(items: &mut Vec<String>, value: &str) {
    if !items.iter().any(|i| i == value) {
        items.push(value.to_string());
    }
}

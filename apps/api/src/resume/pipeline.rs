use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::{TextExtractor, TextSource};
use crate::models::document::Document;
use crate::models::record::Record;
use crate::ner::EntityTagger;
use crate::resume::entities::extract_entities;
use crate::resume::sections::{extract_sections, SectionOptions};

/// Output of one parse: the raw text, where it came from, and the merged record.
#[derive(Debug, Clone)]
pub struct ParsedResume {
    pub text: String,
    pub source: TextSource,
    pub result: Record,
}

impl ParsedResume {
    pub fn used_ocr(&self) -> bool {
        matches!(self.source, TextSource::Ocr { .. })
    }
}

/// Extract → sections + entities → merge.
///
/// Text that is empty or whitespace-only stops the pipeline before any
/// extractor runs. Entity fields win over section fields on collision.
pub async fn parse_document(
    document: &Document,
    extractor: &TextExtractor,
    tagger: &dyn EntityTagger,
    options: &SectionOptions,
) -> Result<ParsedResume, AppError> {
    let extracted = extractor.extract(document).await?;
    if extracted.is_blank() {
        return Err(AppError::EmptyExtraction);
    }

    let sections = extract_sections(&extracted.text, options);
    if sections.is_empty() {
        debug!("no section matched");
    } else {
        debug!(fields = sections.len(), "section extraction done");
    }

    let entities = extract_entities(&extracted.text, tagger).await?;
    debug!(
        fields = entities.len(),
        backend = tagger.backend(),
        "entity extraction done"
    );

    let result = sections.merge(entities);
    info!(
        chars = extracted.text.chars().count(),
        fields = result.len(),
        "resume parsed"
    );

    Ok(ParsedResume {
        text: extracted.text,
        source: extracted.source,
        result,
    })
}

use std::sync::Arc;

use crate::extraction::TextExtractor;
use crate::ner::EntityTagger;
use crate::resume::sections::SectionOptions;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<TextExtractor>,
    /// Pluggable entity tagger. Default: RuleTagger. Swap via NER_ENDPOINT.
    pub tagger: Arc<dyn EntityTagger>,
    pub section_options: SectionOptions,
}

//! Named-entity tagging behind a narrow trait.
//!
//! `AppState` holds an `Arc<dyn EntityTagger>` built once at startup:
//! `RuleTagger` by default, `RemoteTagger` when `NER_ENDPOINT` is configured.

pub mod remote;
pub mod rules;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use remote::RemoteTagger;
pub use rules::RuleTagger;

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("NER service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Entity category. Anything other than PERSON, ORG and DATE is carried as
/// `Other` and ignored by the resume pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Person,
    Org,
    Date,
    Other(String),
}

impl From<String> for EntityLabel {
    fn from(label: String) -> Self {
        match label.as_str() {
            "PERSON" => EntityLabel::Person,
            "ORG" => EntityLabel::Org,
            "DATE" => EntityLabel::Date,
            _ => EntityLabel::Other(label),
        }
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        match label {
            EntityLabel::Person => "PERSON".to_string(),
            EntityLabel::Org => "ORG".to_string(),
            EntityLabel::Date => "DATE".to_string(),
            EntityLabel::Other(s) => s,
        }
    }
}

/// A labelled span. `start`/`end` are offsets as reported by the tagger and
/// are only used for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Tags entities in a text, returning spans in document order.
#[async_trait]
pub trait EntityTagger: Send + Sync {
    async fn tag(&self, text: &str) -> Result<Vec<EntitySpan>, TaggerError>;

    /// Short backend name, for logs.
    fn backend(&self) -> &'static str;
}

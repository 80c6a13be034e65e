//! Remote tagger. Calls an external NER service (for example a spaCy
//! `en_core_web_sm` pipeline served over HTTP).
//!
//! Request:  `POST <endpoint>` with `{"text": "..."}`
//! Response: `{"ents": [{"text": "...", "label": "ORG", "start": 0, "end": 4}, ...]}`
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EntitySpan, EntityTagger, TaggerError};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct TagRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TagResponse {
    ents: Vec<EntitySpan>,
}

/// HTTP client for the NER service. Retries on 429 (rate limit) and 5xx errors
/// with exponential backoff.
#[derive(Clone)]
pub struct RemoteTagger {
    client: Client,
    endpoint: String,
}

impl RemoteTagger {
    pub fn new(endpoint: String) -> Result<Self, TaggerError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            endpoint,
        })
    }
}

#[async_trait]
impl EntityTagger for RemoteTagger {
    async fn tag(&self, text: &str) -> Result<Vec<EntitySpan>, TaggerError> {
        let request_body = TagRequest { text };
        let mut last_error: Option<TaggerError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "NER call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&self.endpoint)
                .json(&request_body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(TaggerError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("NER service returned {}: {}", status, body);
                last_error = Some(TaggerError::Service {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TaggerError::Service {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let body = response.text().await?;
            let spans = parse_response(&body)?;
            debug!(spans = spans.len(), "NER call succeeded");
            return Ok(spans);
        }

        Err(last_error.unwrap_or(TaggerError::Service {
            status: 429,
            message: format!("rate limited after {MAX_RETRIES} retries"),
        }))
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

/// Parses the service response, returning spans ordered by start offset.
fn parse_response(body: &str) -> Result<Vec<EntitySpan>, TaggerError> {
    let mut spans = serde_json::from_str::<TagResponse>(body)?.ents;
    spans.sort_by_key(|s| s.start);
    Ok(spans)
}

//! Test doubles for the injected capabilities, and DOCX fixtures.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use docx_rs::{Docx, Paragraph, Run};

use crate::extraction::{
    ExtractionError, OcrEngine, PageImage, PageRasterizer, PdfTextLayer, TextExtractor,
};
use crate::ner::{EntityLabel, EntitySpan, EntityTagger, TaggerError};
use crate::resume::sections::SectionOptions;
use crate::state::AppState;

/// Returns a fixed text layer.
pub struct FakeTextLayer(String);

impl FakeTextLayer {
    pub fn new(text: &str) -> Self {
        Self(text.to_string())
    }
}

#[async_trait]
impl PdfTextLayer for FakeTextLayer {
    async fn read_text(&self, _pdf: &Bytes) -> Result<String, ExtractionError> {
        Ok(self.0.clone())
    }
}

/// Produces `pages` empty page images numbered from 1.
pub struct FakeRasterizer(usize);

impl FakeRasterizer {
    pub fn new(pages: usize) -> Self {
        Self(pages)
    }
}

#[async_trait]
impl PageRasterizer for FakeRasterizer {
    async fn rasterize(&self, _pdf: &Bytes) -> Result<Vec<PageImage>, ExtractionError> {
        Ok((1..=self.0)
            .map(|page_number| PageImage {
                page_number,
                png: Vec::new(),
            })
            .collect())
    }
}

/// OCR spy: records every page it is asked to recognize and answers
/// `"page N\n"` unless configured otherwise.
#[derive(Default)]
pub struct SpyOcr {
    calls: Mutex<Vec<usize>>,
    blank: bool,
    fail_on: Option<usize>,
    pages: Option<Vec<String>>,
}

impl SpyOcr {
    pub fn blank() -> Self {
        Self {
            blank: true,
            ..Self::default()
        }
    }

    pub fn failing_on(page: usize) -> Self {
        Self {
            fail_on: Some(page),
            ..Self::default()
        }
    }

    /// Answers page N with `pages[N - 1]`.
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: Some(pages.iter().map(|p| p.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrEngine for SpyOcr {
    async fn recognize(&self, page: &PageImage) -> Result<String, ExtractionError> {
        self.calls.lock().unwrap().push(page.page_number);
        if self.fail_on == Some(page.page_number) {
            return Err(ExtractionError::Ocr {
                page: page.page_number,
                message: "simulated failure".to_string(),
            });
        }
        if self.blank {
            return Ok(" \n".to_string());
        }
        if let Some(pages) = &self.pages {
            return Ok(pages
                .get(page.page_number - 1)
                .cloned()
                .unwrap_or_default());
        }
        Ok(format!("page {}\n", page.page_number))
    }
}

/// Tagger that returns canned spans, or fails.
#[derive(Default)]
pub struct StubTagger {
    spans: Vec<EntitySpan>,
    fail: bool,
}

impl StubTagger {
    pub fn with(spans: &[(&str, EntityLabel)]) -> Self {
        let mut offset = 0;
        let spans = spans
            .iter()
            .map(|(text, label)| {
                let span = EntitySpan {
                    text: text.to_string(),
                    label: label.clone(),
                    start: offset,
                    end: offset + text.len(),
                };
                offset = span.end + 1;
                span
            })
            .collect();
        Self { spans, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            spans: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl EntityTagger for StubTagger {
    async fn tag(&self, _text: &str) -> Result<Vec<EntitySpan>, TaggerError> {
        if self.fail {
            return Err(TaggerError::Service {
                status: 503,
                message: "model unavailable".to_string(),
            });
        }
        Ok(self.spans.clone())
    }

    fn backend(&self) -> &'static str {
        "stub"
    }
}

/// Builds an in-memory DOCX with one single-run paragraph per entry.
pub fn docx_bytes(paragraphs: &[&str]) -> Bytes {
    let mut docx = Docx::new();
    for text in paragraphs {
        let para = if text.is_empty() {
            Paragraph::new()
        } else {
            Paragraph::new().add_run(Run::new().add_text(*text))
        };
        docx = docx.add_paragraph(para);
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).unwrap();
    Bytes::from(buf.into_inner())
}

/// Application state wired to fakes: a PDF text layer of `layer`, `ocr_pages`
/// scanned pages and the given tagger.
pub fn test_state(
    layer: &str,
    ocr: Arc<SpyOcr>,
    ocr_pages: usize,
    tagger: Arc<dyn EntityTagger>,
) -> AppState {
    AppState {
        extractor: Arc::new(TextExtractor::new(
            Arc::new(FakeTextLayer::new(layer)),
            Arc::new(FakeRasterizer::new(ocr_pages)),
            ocr,
        )),
        tagger,
        section_options: SectionOptions::default(),
    }
}

//! Text extraction: turns an uploaded PDF or DOCX into one text string.
//!
//! PDFs are read through their text layer first. When that yields nothing but
//! whitespace the document is treated as scanned: every page is rasterized and
//! run through OCR, in page order. The three PDF capabilities are traits so the
//! binaries behind them (`pdf-extract`, `pdftoppm`, `tesseract`) can be swapped
//! out in tests.

pub mod docx;
pub mod ocr;
pub mod pdf;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::document::{Document, DocumentKind};

pub use ocr::TesseractOcr;
pub use pdf::{PdfExtractTextLayer, PdftoppmRasterizer};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF text layer could not be read: {0}")]
    PdfParsing(String),

    #[error("PDF rasterization failed: {0}")]
    Rasterize(String),

    #[error("OCR failed on page {page}: {message}")]
    Ocr { page: usize, message: String },

    #[error("DOCX could not be read: {0}")]
    Docx(String),
}

/// A rasterized PDF page ready for OCR. `page_number` is 1-based.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub page_number: usize,
    pub png: Vec<u8>,
}

/// Reads the embedded text layer of a PDF, pages concatenated in order.
#[async_trait]
pub trait PdfTextLayer: Send + Sync {
    async fn read_text(&self, pdf: &Bytes) -> Result<String, ExtractionError>;
}

/// Renders every page of a PDF to an image, in page order.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn rasterize(&self, pdf: &Bytes) -> Result<Vec<PageImage>, ExtractionError>;
}

/// Recognizes the text on a single page image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, page: &PageImage) -> Result<String, ExtractionError>;
}

/// Where the extracted text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextSource {
    TextLayer,
    Ocr { pages: usize },
    Docx,
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub source: TextSource,
}

impl ExtractedText {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Text extractor with injected PDF capabilities. Built once at startup and
/// shared read-only between requests.
#[derive(Clone)]
pub struct TextExtractor {
    text_layer: Arc<dyn PdfTextLayer>,
    rasterizer: Arc<dyn PageRasterizer>,
    ocr: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(
        text_layer: Arc<dyn PdfTextLayer>,
        rasterizer: Arc<dyn PageRasterizer>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            text_layer,
            rasterizer,
            ocr,
        }
    }

    pub async fn extract(&self, document: &Document) -> Result<ExtractedText, ExtractionError> {
        match document.kind {
            DocumentKind::Pdf => self.extract_pdf(&document.bytes).await,
            DocumentKind::Docx => {
                let text = docx::extract_text(document.bytes.clone()).await?;
                Ok(ExtractedText {
                    text,
                    source: TextSource::Docx,
                })
            }
        }
    }

    async fn extract_pdf(&self, pdf: &Bytes) -> Result<ExtractedText, ExtractionError> {
        let text = self.text_layer.read_text(pdf).await?;
        if !text.trim().is_empty() {
            debug!(chars = text.len(), "PDF text layer read");
            return Ok(ExtractedText {
                text,
                source: TextSource::TextLayer,
            });
        }

        warn!("PDF has no text layer, it may be scanned. Falling back to OCR");
        let pages = self.rasterizer.rasterize(pdf).await?;

        let mut text = String::new();
        for page in &pages {
            let page_text = self.ocr.recognize(page).await?;
            debug!(page = page.page_number, chars = page_text.len(), "OCR page done");
            text.push_str(&page_text);
        }

        Ok(ExtractedText {
            text,
            source: TextSource::Ocr { pages: pages.len() },
        })
    }
}

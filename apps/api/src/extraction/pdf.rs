use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

use super::{ExtractionError, PageImage, PageRasterizer, PdfTextLayer};

/// Text-layer reader backed by `pdf-extract`.
///
/// Decoding is CPU-bound, so it runs on the blocking pool. A panic inside the
/// decoder surfaces as `ExtractionError::PdfParsing`.
pub struct PdfExtractTextLayer;

#[async_trait]
impl PdfTextLayer for PdfExtractTextLayer {
    async fn read_text(&self, pdf: &Bytes) -> Result<String, ExtractionError> {
        let pdf = pdf.clone();
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
            .await
            .map_err(|e| ExtractionError::PdfParsing(format!("decoder panicked: {e}")))?
            .map_err(|e| ExtractionError::PdfParsing(format!("{e:?}")))
    }
}

/// Page rasterizer that shells out to poppler's `pdftoppm`.
pub struct PdftoppmRasterizer {
    binary: PathBuf,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(binary: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            binary: binary.into(),
            dpi,
        }
    }
}

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    async fn rasterize(&self, pdf: &Bytes) -> Result<Vec<PageImage>, ExtractionError> {
        // Removed with everything in it when dropped.
        let workdir = TempDir::new()?;
        let input = workdir.path().join("input.pdf");
        tokio::fs::write(&input, pdf).await?;

        let output = Command::new(&self.binary)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(&input)
            .arg(workdir.path().join("page"))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ExtractionError::Rasterize(format!(
                    "failed to run {}: {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Rasterize(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let pages = collect_pages(workdir.path()).await?;
        debug!(pages = pages.len(), dpi = self.dpi, "PDF rasterized");
        Ok(pages)
    }
}

/// Reads `page-N.png` files written by pdftoppm, ordered by page number.
async fn collect_pages(dir: &Path) -> Result<Vec<PageImage>, ExtractionError> {
    let mut numbered = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if let Some(page_number) = name.to_str().and_then(page_number_from_file_name) {
            numbered.push((page_number, entry.path()));
        }
    }
    numbered.sort_by_key(|(n, _)| *n);

    let mut pages = Vec::with_capacity(numbered.len());
    for (page_number, path) in numbered {
        pages.push(PageImage {
            page_number,
            png: tokio::fs::read(&path).await?,
        });
    }
    Ok(pages)
}

/// pdftoppm zero-pads the page number to the width of the page count
/// (`page-1.png`, `page-01.png`, `page-001.png`).
fn page_number_from_file_name(name: &str) -> Option<usize> {
    name.strip_prefix("page-")?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

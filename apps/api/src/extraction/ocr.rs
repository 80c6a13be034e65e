use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{ExtractionError, OcrEngine, PageImage};

/// OCR engine that pipes each page image through the `tesseract` CLI
/// (`tesseract stdin stdout -l <lang>`).
pub struct TesseractOcr {
    binary: PathBuf,
    lang: String,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<PathBuf>, lang: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, page: &PageImage) -> Result<String, ExtractionError> {
        let ocr_error = |message: String| ExtractionError::Ocr {
            page: page.page_number,
            message,
        };

        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", self.lang.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ocr_error(format!("failed to run {}: {e}", self.binary.display())))?;

        // tesseract reads the whole image before writing anything, so writing
        // stdin to completion first cannot deadlock on a full stdout pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ocr_error("stdin not captured".to_string()))?;
        stdin.write_all(&page.png).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ocr_error(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_reports_page() {
        let engine = TesseractOcr::new("/nonexistent/tesseract", "eng");
        let page = PageImage {
            page_number: 4,
            png: vec![0x89, b'P', b'N', b'G'],
        };

        let err = engine.recognize(&page).await.unwrap_err();
        match err {
            ExtractionError::Ocr { page, message } => {
                assert_eq!(page, 4);
                assert!(message.contains("/nonexistent/tesseract"));
            }
            other => panic!("expected OCR error, got {other:?}"),
        }
    }
}

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Declared type of an uploaded document, decided from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Returns `None` for anything that is not `.pdf` or `.docx` (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }
}

/// A single uploaded file. Lives for one request and is dropped once its text is extracted.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Bytes,
}

impl Document {
    pub fn new(file_name: impl Into<String>, kind: DocumentKind, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            bytes,
        }
    }
}

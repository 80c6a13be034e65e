use bytes::Bytes;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

use super::ExtractionError;

/// Extracts DOCX text: every body paragraph followed by `\n`, in document order.
pub async fn extract_text(bytes: Bytes) -> Result<String, ExtractionError> {
    let paragraphs = tokio::task::spawn_blocking(move || read_paragraphs(&bytes))
        .await
        .map_err(|e| ExtractionError::Docx(format!("reader panicked: {e}")))??;
    Ok(join_paragraphs(&paragraphs))
}

/// Reads the text of each top-level body paragraph. Empty paragraphs are kept;
/// tables, images and section properties are not paragraphs and are skipped.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(format!("{e:?}")))?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect())
}

pub fn join_paragraphs(paragraphs: &[String]) -> String {
    let mut text = String::with_capacity(paragraphs.iter().map(|p| p.len() + 1).sum());
    for para in paragraphs {
        text.push_str(para);
        text.push('\n');
    }
    text
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&para.children, &mut text);
    text
}

fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}

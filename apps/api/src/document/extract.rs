/// Text extraction from uploaded documents.
///
/// PDF and Word extraction delegate to `pdf-extract` and `docx-rs`; both are
/// treated as opaque converters. Images are never decoded here — they come
/// back as `Extracted::Image` and are forwarded to the model as-is.
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;

use crate::document::FormatTag;

/// Outcome of extraction: human-readable text, or a marker that the document
/// is an image and must be forwarded instead of decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    Image,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("unsupported document format")]
    Unsupported,
}

/// Extracts text from a document buffer according to its format tag.
///
/// Callers must never pass `FormatTag::Unknown` — detection is expected to
/// reject unsupported uploads before extraction is attempted. The minimum
/// extracted-length check is the caller's responsibility.
pub fn extract(buffer: &[u8], format: FormatTag) -> Result<Extracted, ExtractionError> {
    match format {
        FormatTag::Pdf => pdf_extract::extract_text_from_mem(buffer)
            .map(Extracted::Text)
            .map_err(|e| ExtractionError::Pdf(e.to_string())),
        FormatTag::WordDocument => extract_docx_text(buffer).map(Extracted::Text),
        FormatTag::PlainText => Ok(Extracted::Text(
            String::from_utf8_lossy(buffer).into_owned(),
        )),
        FormatTag::Image => Ok(Extracted::Image),
        FormatTag::Unknown => Err(ExtractionError::Unsupported),
    }
}

/// Walks the DOCX document tree collecting run text, one line per paragraph.
fn extract_docx_text(buffer: &[u8]) -> Result<String, ExtractionError> {
    let docx = read_docx(buffer).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(para) = child {
            let mut line = String::new();
            for pc in &para.children {
                if let ParagraphChild::Run(run) = pc {
                    for rc in &run.children {
                        if let RunChild::Text(t) = rc {
                            line.push_str(&t.text);
                        }
                    }
                }
            }
            if !line.is_empty() {
                paragraphs.push(line);
            }
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Document handling — classification of uploaded files and the normalized
/// payload form consumed by the analysis dispatcher.
pub mod encode;
pub mod extract;

/// Format classification of an uploaded document.
///
/// Derived once per upload from the declared MIME type first and the filename
/// extension second. `Unknown` is a valid terminal classification, not an
/// error — callers decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    Pdf,
    WordDocument,
    Image,
    PlainText,
    Unknown,
}

/// Classifies a document from its declared MIME type and filename.
/// Pure function of the two strings; rules are evaluated in priority order.
pub fn detect(mime_type: &str, filename: &str) -> FormatTag {
    let mime = mime_type.to_lowercase();
    let name = filename.to_lowercase();

    if mime == "application/pdf" || name.ends_with(".pdf") {
        FormatTag::Pdf
    } else if mime.contains("word") || name.ends_with(".doc") || name.ends_with(".docx") {
        FormatTag::WordDocument
    } else if mime.starts_with("image/") {
        FormatTag::Image
    } else if mime == "text/plain" || name.ends_with(".txt") {
        FormatTag::PlainText
    } else {
        FormatTag::Unknown
    }
}

/// The normalized form of a document, ready for the model call.
///
/// `Image` holds a base64 data URI embedding the original bytes and MIME
/// type. `Text` holds extracted (or pasted) text; the minimum-length checks
/// are enforced by the handler that builds the payload, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedPayload {
    Text(String),
    Image(String),
}

impl ProcessedPayload {
    pub fn is_image(&self) -> bool {
        matches!(self, ProcessedPayload::Image(_))
    }
}

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use tracing::{info, warn};

use crate::analysis::{dispatch, AnalysisResult};
use crate::document::encode::to_data_uri;
use crate::document::extract::{extract, Extracted};
use crate::document::{detect, FormatTag, ProcessedPayload};
use crate::errors::AppError;
use crate::state::AppState;

/// Extracted file text shorter than this (trimmed) is treated as an
/// extraction failure, not silently forwarded.
const MIN_EXTRACTED_LEN: usize = 10;
/// Freeform pasted job text must carry at least this much content.
const MIN_JOB_TEXT_LEN: usize = 20;

/// One user-submitted artifact as it arrived in the multipart form.
struct UploadedFile {
    filename: String,
    content_type: String,
    bytes: Bytes,
}

#[derive(Debug, Clone, Copy)]
enum DocumentRole {
    Cv,
    Job,
}

impl DocumentRole {
    fn label(self) -> &'static str {
        match self {
            DocumentRole::Cv => "CV",
            DocumentRole::Job => "job description",
        }
    }
}

/// POST /analyze
///
/// Multipart form: `cv` (file, required) plus either `jobDescription` (file)
/// or `jobDescriptionText` (text). The file takes precedence if both are
/// present. Responds 200 with the analysis report, 400 for bad input, 429
/// when the provider is rate limited, 500 otherwise.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut cv_file: Option<UploadedFile> = None;
    let mut job_file: Option<UploadedFile> = None;
    let mut job_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv" => cv_file = Some(read_file_field(field).await?),
            "jobDescription" => job_file = Some(read_file_field(field).await?),
            "jobDescriptionText" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Invalid multipart form data: {e}"))
                })?;
                job_text = Some(text);
            }
            _ => {}
        }
    }

    let cv_file = cv_file.ok_or_else(|| AppError::Validation("A CV file is required.".into()))?;
    if job_file.is_none() && job_text.is_none() {
        return Err(AppError::Validation("A job description is required.".into()));
    }

    info!(
        filename = %cv_file.filename,
        content_type = %cv_file.content_type,
        "processing CV upload"
    );

    // PDF/DOCX extraction is CPU-bound; keep it off the reactor.
    let cv_payload =
        tokio::task::spawn_blocking(move || process_document(&cv_file, DocumentRole::Cv))
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))??;

    let job_payload = if let Some(file) = job_file {
        tokio::task::spawn_blocking(move || process_document(&file, DocumentRole::Job))
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))??
    } else {
        let text = job_text.unwrap_or_default().trim().to_string();
        if text.chars().count() < MIN_JOB_TEXT_LEN {
            return Err(AppError::Validation(
                "The job description is too short. Provide more detail.".into(),
            ));
        }
        ProcessedPayload::Text(text)
    };

    let provider = state.provider.as_ref().ok_or(AppError::Unconfigured)?;

    let modality = dispatch::InputModality::classify(&cv_payload, &job_payload);
    info!(?modality, "dispatching analysis");

    let result = dispatch::analyze(provider.as_ref(), &cv_payload, &job_payload).await?;

    info!(score = result.score, "analysis completed");
    Ok(Json(result))
}

async fn read_file_field(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read the uploaded file: {e}")))?;
    Ok(UploadedFile {
        filename,
        content_type,
        bytes,
    })
}

/// Normalizes one uploaded document into a dispatchable payload.
///
/// Images skip extraction entirely and become data-URI payloads; everything
/// else goes through extraction and the minimum-length check.
fn process_document(
    file: &UploadedFile,
    role: DocumentRole,
) -> Result<ProcessedPayload, AppError> {
    let tag = detect(&file.content_type, &file.filename);

    if tag == FormatTag::Unknown {
        return Err(AppError::Validation(match role {
            DocumentRole::Cv => "Unsupported CV format. Use PDF, Word, or an image.".to_string(),
            DocumentRole::Job => {
                "Unsupported job description format. Use PDF, Word, an image, or plain text."
                    .to_string()
            }
        }));
    }

    if tag == FormatTag::Image {
        return Ok(ProcessedPayload::Image(to_data_uri(
            &file.bytes,
            &file.content_type,
        )));
    }

    match extract(&file.bytes, tag) {
        Ok(Extracted::Image) => Ok(ProcessedPayload::Image(to_data_uri(
            &file.bytes,
            &file.content_type,
        ))),
        Ok(Extracted::Text(text)) => {
            // Character count, not byte length: accented text must not pass
            // the threshold early.
            if text.trim().chars().count() < MIN_EXTRACTED_LEN {
                Err(AppError::Validation(format!(
                    "Could not extract text from the {}. Check that the file is not corrupt.",
                    role.label()
                )))
            } else {
                Ok(ProcessedPayload::Text(text))
            }
        }
        Err(e) => {
            warn!("{} extraction failed: {e}", role.label());
            Err(AppError::Validation(format!(
                "Could not process the {} file. Check the file format.",
                role.label()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: &str, content_type: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    #[test]
    fn near_empty_extracted_text_is_rejected_as_corrupt() {
        let file = upload("cv.txt", "text/plain", b"abcde");
        let err = process_document(&file, DocumentRole::Cv).unwrap_err();
        let AppError::Validation(msg) = err else {
            panic!("expected a validation error");
        };
        assert!(msg.contains("CV"));
        assert!(msg.contains("corrupt"));
    }

    #[test]
    fn multibyte_text_is_measured_in_characters_not_bytes() {
        // "ééééé" is 5 characters but 10 bytes; it must still be rejected.
        let file = upload("cv.txt", "text/plain", "ééééé".as_bytes());
        let err = process_document(&file, DocumentRole::Cv).unwrap_err();
        let AppError::Validation(msg) = err else {
            panic!("expected a validation error");
        };
        assert!(msg.contains("corrupt"));
    }

    #[test]
    fn ten_multibyte_characters_pass_the_threshold() {
        let file = upload("cv.txt", "text/plain", "éééééééééé".as_bytes());
        let payload = process_document(&file, DocumentRole::Cv).unwrap();
        assert!(matches!(payload, ProcessedPayload::Text(_)));
    }

    #[test]
    fn ten_character_text_passes_the_threshold() {
        let file = upload("cv.txt", "text/plain", b"abcdefghij");
        let payload = process_document(&file, DocumentRole::Cv).unwrap();
        assert_eq!(payload, ProcessedPayload::Text("abcdefghij".to_string()));
    }

    #[test]
    fn image_upload_becomes_a_data_uri_payload() {
        let file = upload("scan.png", "image/png", &[1, 2, 3]);
        let payload = process_document(&file, DocumentRole::Cv).unwrap();
        let ProcessedPayload::Image(uri) = payload else {
            panic!("expected an image payload");
        };
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn unknown_format_is_rejected_with_a_role_specific_message() {
        let file = upload("archive.zip", "application/zip", b"PK");
        let err = process_document(&file, DocumentRole::Job).unwrap_err();
        let AppError::Validation(msg) = err else {
            panic!("expected a validation error");
        };
        assert!(msg.contains("job description"));
    }
}

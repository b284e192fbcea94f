/// Analysis dispatcher — selects one of four request-construction strategies
/// from the input modality and makes exactly one provider call.
use thiserror::Error;

use crate::analysis::prompts::{dual_image_prompt, text_prompt, vision_prompt, ANALYSIS_SYSTEM};
use crate::analysis::validate::validate;
use crate::analysis::AnalysisResult;
use crate::document::ProcessedPayload;
use crate::provider::{AnalysisProvider, CompletionRequest, ContentPart, ProviderError};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("the model returned an empty response")]
    NoResponse,

    #[error("the model response was not valid JSON: {0}")]
    MalformedJson(serde_json::Error),

    #[error("the model response does not match the expected shape: {0}")]
    InvalidShape(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The four input modalities, one per dispatch strategy.
///
/// An explicit enumeration rather than two independent booleans: dispatch is
/// total over it, so a new modality cannot fall through silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModality {
    /// Both documents are text.
    TextText,
    /// The CV is an image, the job posting is text.
    ImageText,
    /// The job posting is an image, the CV is text.
    TextImage,
    /// Both documents are images.
    ImageImage,
}

impl InputModality {
    /// Pure function of the two is-image flags.
    pub fn classify(cv: &ProcessedPayload, job: &ProcessedPayload) -> Self {
        match (cv.is_image(), job.is_image()) {
            (false, false) => InputModality::TextText,
            (true, false) => InputModality::ImageText,
            (false, true) => InputModality::TextImage,
            (true, true) => InputModality::ImageImage,
        }
    }
}

/// Runs one analysis: builds the strategy-specific request, makes a single
/// provider call, parses and validates the response. No retries here — a
/// transient provider failure propagates directly.
pub async fn analyze(
    provider: &dyn AnalysisProvider,
    cv: &ProcessedPayload,
    job: &ProcessedPayload,
) -> Result<AnalysisResult, DispatchError> {
    let parts = match InputModality::classify(cv, job) {
        InputModality::TextText => {
            let (ProcessedPayload::Text(cv_text), ProcessedPayload::Text(job_text)) = (cv, job)
            else {
                unreachable!("classified TextText")
            };
            vec![ContentPart::Text(text_prompt(cv_text, job_text))]
        }
        InputModality::ImageText => {
            let (ProcessedPayload::Image(cv_uri), ProcessedPayload::Text(job_text)) = (cv, job)
            else {
                unreachable!("classified ImageText")
            };
            vec![
                ContentPart::Text(vision_prompt(job_text)),
                ContentPart::ImageUrl(cv_uri.clone()),
            ]
        }
        // The provider call is asymmetric: one slot takes an image, the other
        // only text. When the job posting is the image it occupies the image
        // slot and the CV text becomes the inline context.
        InputModality::TextImage => {
            let (ProcessedPayload::Text(cv_text), ProcessedPayload::Image(job_uri)) = (cv, job)
            else {
                unreachable!("classified TextImage")
            };
            vec![
                ContentPart::Text(vision_prompt(cv_text)),
                ContentPart::ImageUrl(job_uri.clone()),
            ]
        }
        InputModality::ImageImage => {
            let (ProcessedPayload::Image(cv_uri), ProcessedPayload::Image(job_uri)) = (cv, job)
            else {
                unreachable!("classified ImageImage")
            };
            vec![
                ContentPart::Text(dual_image_prompt()),
                ContentPart::ImageUrl(cv_uri.clone()),
                ContentPart::ImageUrl(job_uri.clone()),
            ]
        }
    };

    let request = CompletionRequest {
        system: ANALYSIS_SYSTEM.to_string(),
        parts,
    };

    let body = provider.complete(request).await?;
    let body = strip_json_fences(&body);
    if body.is_empty() {
        return Err(DispatchError::NoResponse);
    }

    let parsed: serde_json::Value =
        serde_json::from_str(body).map_err(DispatchError::MalformedJson)?;
    validate(parsed)
}

/// Strips markdown code fences in case the model wraps its JSON in them.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    for prefix in ["```json", "```"] {
        if let Some(stripped) = text.strip_prefix(prefix) {
            return stripped
                .strip_suffix("```")
                .unwrap_or(stripped)
                .trim();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every request it receives and plays back a canned response.
    struct StubProvider {
        response: Result<String, ()>,
        calls: Mutex<Vec<CompletionRequest>>,
    }

    impl StubProvider {
        fn returning(body: &str) -> Self {
            Self {
                response: Ok(body.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<CompletionRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnalysisProvider for StubProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push(request);
            self.response
                .clone()
                .map_err(|_| ProviderError::RateLimited)
        }
    }

    fn full_report(score: u8) -> String {
        serde_json::json!({
            "score": score,
            "scoreExplanation": "solid",
            "strengths": ["a"],
            "weaknesses": ["b"],
            "cvRecommendations": ["c"],
            "coverLetter": "Dear team,",
            "behaviorTips": ["d"],
            "conclusion": "go"
        })
        .to_string()
    }

    fn text(s: &str) -> ProcessedPayload {
        ProcessedPayload::Text(s.to_string())
    }

    fn image(uri: &str) -> ProcessedPayload {
        ProcessedPayload::Image(uri.to_string())
    }

    #[test]
    fn modality_is_a_pure_function_of_the_image_flags() {
        let t = text("t");
        let i = image("data:image/png;base64,AA");
        assert_eq!(InputModality::classify(&t, &t), InputModality::TextText);
        assert_eq!(InputModality::classify(&i, &t), InputModality::ImageText);
        assert_eq!(InputModality::classify(&t, &i), InputModality::TextImage);
        assert_eq!(InputModality::classify(&i, &i), InputModality::ImageImage);
    }

    #[tokio::test]
    async fn text_only_strategy_sends_a_single_text_part() {
        let stub = StubProvider::returning(&full_report(80));
        analyze(&stub, &text("the cv body"), &text("the job body"))
            .await
            .unwrap();

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].parts.len(), 1);
        let ContentPart::Text(prompt) = &calls[0].parts[0] else {
            panic!("expected a text part");
        };
        assert!(prompt.contains("the cv body"));
        assert!(prompt.contains("the job body"));
    }

    #[tokio::test]
    async fn cv_image_occupies_the_image_slot() {
        let stub = StubProvider::returning(&full_report(80));
        analyze(&stub, &image("data:image/png;base64,CV"), &text("job text"))
            .await
            .unwrap();

        let calls = stub.calls();
        assert_eq!(calls[0].parts.len(), 2);
        assert!(matches!(
            &calls[0].parts[1],
            ContentPart::ImageUrl(uri) if uri == "data:image/png;base64,CV"
        ));
        let ContentPart::Text(prompt) = &calls[0].parts[0] else {
            panic!("expected a text part");
        };
        assert!(prompt.contains("job text"));
    }

    #[tokio::test]
    async fn job_image_swaps_into_the_image_slot() {
        let stub = StubProvider::returning(&full_report(80));
        analyze(&stub, &text("cv text"), &image("data:image/jpeg;base64,JOB"))
            .await
            .unwrap();

        let calls = stub.calls();
        assert_eq!(calls[0].parts.len(), 2);
        assert!(matches!(
            &calls[0].parts[1],
            ContentPart::ImageUrl(uri) if uri == "data:image/jpeg;base64,JOB"
        ));
        let ContentPart::Text(prompt) = &calls[0].parts[0] else {
            panic!("expected a text part");
        };
        assert!(prompt.contains("cv text"));
    }

    #[tokio::test]
    async fn both_images_go_in_one_request_cv_first() {
        let stub = StubProvider::returning(&full_report(80));
        analyze(
            &stub,
            &image("data:image/png;base64,CV"),
            &image("data:image/png;base64,JOB"),
        )
        .await
        .unwrap();

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].parts.len(), 3);
        assert!(matches!(
            &calls[0].parts[1],
            ContentPart::ImageUrl(uri) if uri.ends_with("CV")
        ));
        assert!(matches!(
            &calls[0].parts[2],
            ContentPart::ImageUrl(uri) if uri.ends_with("JOB")
        ));
    }

    #[tokio::test]
    async fn every_strategy_sends_the_same_system_prompt() {
        let stub = StubProvider::returning(&full_report(50));
        analyze(&stub, &text("cv"), &text("job")).await.unwrap();
        analyze(&stub, &image("data:,a"), &image("data:,b"))
            .await
            .unwrap();

        let calls = stub.calls();
        assert_eq!(calls[0].system, calls[1].system);
        assert_eq!(calls[0].system, ANALYSIS_SYSTEM);
    }

    #[tokio::test]
    async fn empty_response_is_a_no_response_error() {
        let stub = StubProvider::returning("   ");
        let err = analyze(&stub, &text("cv"), &text("job")).await.unwrap_err();
        assert!(matches!(err, DispatchError::NoResponse));
    }

    #[tokio::test]
    async fn non_json_response_is_malformed() {
        let stub = StubProvider::returning("I am sorry, I cannot do that.");
        let err = analyze(&stub, &text("cv"), &text("job")).await.unwrap_err();
        assert!(matches!(err, DispatchError::MalformedJson(_)));
    }

    #[tokio::test]
    async fn fenced_json_is_still_accepted() {
        let fenced = format!("```json\n{}\n```", full_report(64));
        let stub = StubProvider::returning(&fenced);
        let result = analyze(&stub, &text("cv"), &text("job")).await.unwrap();
        assert_eq!(result.score, 64);
    }

    #[test]
    fn strip_json_fences_handles_all_forms() {
        assert_eq!(strip_json_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_json_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_json_fences("{}"), "{}");
    }
}

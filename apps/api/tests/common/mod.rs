#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use zeroname_api::provider::{AnalysisProvider, CompletionRequest, ProviderError};

enum StubBehavior {
    Respond(String),
    RateLimited,
}

/// Provider stub that records every request and plays back a canned outcome.
pub struct StubProvider {
    behavior: StubBehavior,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl StubProvider {
    pub fn returning(body: impl Into<String>) -> Self {
        Self {
            behavior: StubBehavior::Respond(body.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rate_limited() -> Self {
        Self {
            behavior: StubBehavior::RateLimited,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisProvider for StubProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(request);
        match &self.behavior {
            StubBehavior::Respond(body) => Ok(body.clone()),
            StubBehavior::RateLimited => Err(ProviderError::RateLimited),
        }
    }
}

/// A complete, valid report body with the given score.
pub fn report_json(score: u8) -> String {
    serde_json::json!({
        "score": score,
        "scoreExplanation": "good overlap with the posting",
        "strengths": ["relevant stack", "clear impact numbers"],
        "weaknesses": ["no leadership experience"],
        "cvRecommendations": ["ADD the team size under the last role"],
        "coverLetter": "Dear hiring team, ...",
        "behaviorTips": ["prepare the gap question"],
        "conclusion": "apply, with the fixes above"
    })
    .to_string()
}

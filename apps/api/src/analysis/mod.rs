/// Analysis — dispatching processed documents to the model provider and
/// validating the structured report that comes back.
pub mod dispatch;
pub mod handlers;
pub mod prompts;
pub mod validate;

use serde::{Deserialize, Serialize};

/// The structured compatibility report returned by the model.
///
/// Produced once per request and held only transiently; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Compatibility score, 0–100.
    pub score: u8,
    pub score_explanation: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub cv_recommendations: Vec<String>,
    pub cover_letter: String,
    pub behavior_tips: Vec<String>,
    pub conclusion: String,
}

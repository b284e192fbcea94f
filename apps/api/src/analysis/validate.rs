/// Result validation — shape-checks the parsed provider response before it
/// is surfaced to the caller.
use serde_json::Value;

use crate::analysis::dispatch::DispatchError;
use crate::analysis::AnalysisResult;

/// Validates a parsed provider response and converts it into a typed report.
///
/// The documented floor is "`score` is present and numeric"; deserializing
/// into `AnalysisResult` additionally requires every report field, which is
/// the permitted stricter check. A string score is rejected.
pub fn validate(parsed: Value) -> Result<AnalysisResult, DispatchError> {
    match parsed.get("score") {
        Some(score) if score.is_number() => {}
        Some(_) => {
            return Err(DispatchError::InvalidShape(
                "score is not a number".to_string(),
            ))
        }
        None => return Err(DispatchError::InvalidShape("score is missing".to_string())),
    }

    serde_json::from_value(parsed).map_err(|e| DispatchError::InvalidShape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_report() -> Value {
        json!({
            "score": 0,
            "scoreExplanation": "no overlap with the posting",
            "strengths": ["clear layout"],
            "weaknesses": ["wrong field entirely"],
            "cvRecommendations": ["target a different role"],
            "coverLetter": "Dear hiring team, ...",
            "behaviorTips": ["be honest about the gap"],
            "conclusion": "not a relevant application"
        })
    }

    #[test]
    fn empty_object_is_rejected() {
        let err = validate(json!({})).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidShape(msg) if msg.contains("missing")));
    }

    #[test]
    fn string_score_is_rejected() {
        let err = validate(json!({"score": "80"})).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidShape(msg) if msg.contains("not a number")));
    }

    #[test]
    fn complete_report_with_zero_score_is_accepted() {
        let report = validate(complete_report()).unwrap();
        assert_eq!(report.score, 0);
        assert_eq!(report.strengths.len(), 1);
    }

    #[test]
    fn numeric_score_with_missing_fields_is_still_invalid() {
        let err = validate(json!({"score": 72})).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidShape(_)));
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let mut report = complete_report();
        report["modelNotes"] = json!("ignored");
        assert!(validate(report).is_ok());
    }
}

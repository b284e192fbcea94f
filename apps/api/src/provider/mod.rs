/// Model provider client — the single point of entry for all LLM calls.
///
/// ARCHITECTURAL RULE: no other module may talk to the provider API directly.
/// The dispatcher depends only on the `AnalysisProvider` trait, so tests can
/// substitute a recording stub and no handler ever constructs a client.
///
/// Provider failures are classified into typed kinds here (auth, rate limit,
/// timeout) so callers match on an error variant, never on message text.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all analysis calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4.1-2025-04-14";
/// Low temperature: the report should be reproducible, not creative.
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 10_000;
/// Hosting-boundary ceiling on request duration. The provider call is aborted
/// past this point and surfaces as `ProviderError::Timeout`, never a hang.
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider authentication failed: {0}")]
    Auth(String),

    #[error("provider rate limit or quota exceeded")]
    RateLimited,

    #[error("provider request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("provider API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One content part of the user message: inline text or an image reference
/// (a base64 data URI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    ImageUrl(String),
}

/// A fully assembled provider request: the fixed system instructions plus the
/// strategy-specific user content parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub parts: Vec<ContentPart>,
}

/// The opaque analysis collaborator: documents in, one JSON-object-shaped
/// text payload out. Exactly one outbound call per invocation; retries, if
/// any, would live behind this trait, never in the dispatcher.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<WirePart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum WirePart<'a> {
    #[serde(rename = "text")]
    Text { text: &'a str },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: WireImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct WireImageUrl<'a> {
    url: &'a str,
    detail: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// OpenAI-backed provider client. Constructed once at startup and shared by
/// all handlers; stateless between calls.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl AnalysisProvider for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        // A single text part goes over the wire as a plain string message;
        // anything with an image uses the multi-part content form.
        let user_content = match request.parts.as_slice() {
            [ContentPart::Text(text)] => MessageContent::Text(text),
            parts => MessageContent::Parts(
                parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text(text) => WirePart::Text { text },
                        ContentPart::ImageUrl(url) => WirePart::ImageUrl {
                            image_url: WireImageUrl {
                                url,
                                detail: "high",
                            },
                        },
                    })
                    .collect(),
            ),
        };

        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(&request.system),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Auth(message),
                429 => ProviderError::RateLimited,
                code => ProviderError::Api {
                    status: code,
                    message,
                },
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(ProviderError::Http)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        debug!("provider call succeeded ({} bytes)", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_text_part_serializes_as_plain_string_content() {
        let msg = ChatMessage {
            role: "user",
            content: MessageContent::Text("hello"),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn image_part_serializes_with_image_url_tag() {
        let part = WirePart::ImageUrl {
            image_url: WireImageUrl {
                url: "data:image/png;base64,AAAA",
                detail: "high",
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "image_url");
        assert_eq!(json["image_url"]["url"], "data:image/png;base64,AAAA");
        assert_eq!(json["image_url"]["detail"], "high");
    }
}

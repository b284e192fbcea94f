use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

/// Encodes raw document bytes as an embeddable `data:` URI.
///
/// Pure and total: an empty buffer still produces a syntactically valid
/// (empty-payload) URI. Non-emptiness is validated upstream.
pub fn to_data_uri(buffer: &[u8], mime_type: &str) -> String {
    format!("data:{mime_type};base64,{}", BASE64_STANDARD.encode(buffer))
}

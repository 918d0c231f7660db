//! Classification of HTTP exchanges into typed outcomes.

use super::categories::*;
use super::types::MemicError;

/// Extracts a human-readable message from an error body.
///
/// Looks at `detail`, then `message`, then `error.message` in a JSON body and
/// falls back to the raw text, or `HTTP <status>` when the body is empty.
pub fn extract_error_message(status: u16, body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        let candidate = json
            .get("detail")
            .filter(|v| !v.is_null())
            .or_else(|| json.get("message").filter(|v| !v.is_null()))
            .or_else(|| json.get("error").and_then(|e| e.get("message")));

        if let Some(value) = candidate {
            return match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        format!("HTTP {}", status)
    } else {
        text
    }
}

/// Maps a non-success status code and body to the matching `MemicError`.
///
/// - 401 / 403 -> `Authentication`
/// - 404 -> `Resource::NotFound`
/// - anything else -> `Api::Status` carrying the status and raw body
pub fn map_http_status(status: u16, body: &[u8]) -> MemicError {
    let message = extract_error_message(status, body);

    match status {
        401 | 403 => MemicError::Authentication(AuthenticationError::Rejected { status, message }),
        404 => MemicError::Resource(ResourceError::NotFound { message }),
        _ => {
            let body_text = String::from_utf8_lossy(body).to_string();
            MemicError::Api(ApiError::Status {
                status,
                message,
                body: (!body_text.is_empty()).then_some(body_text),
            })
        }
    }
}

/// Returns `Ok(())` for 2xx statuses and the classified error otherwise.
pub fn classify_response(status: u16, body: &[u8]) -> Result<(), MemicError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(map_http_status(status, body))
    }
}

use crate::error::ClientError;
use crate::protocol::canonical::ChatResponse;

use super::api_error_from_body;

/// Decode a 2xx `OpenAI` Chat Completion body into the canonical response.
///
/// The body is already canonical-shaped. An embedded `error` object becomes
/// an API error carrying `status_code`; zero choices is an empty response.
/// Tool calls are re-indexed by position since the vendor only sends
/// `index` while streaming.
///
/// # Errors
///
/// Returns [`ClientError::Decode`], [`ClientError::Api`] or
/// [`ClientError::EmptyResponse`].
pub fn decode_openai_chat_response(
    status_code: u16,
    body: &[u8],
) -> Result<ChatResponse, ClientError> {
    let mut response: ChatResponse =
        serde_json::from_slice(body).map_err(|e| ClientError::decode("response", e))?;

    if let Some(error) = response.error.take() {
        return Err(api_error_from_body(status_code, error).into());
    }
    if response.choices.is_empty() {
        return Err(ClientError::EmptyResponse);
    }

    for choice in &mut response.choices {
        for (index, call) in choice.message.tool_calls.iter_mut().enumerate() {
            call.index = index;
        }
    }
    Ok(response)
}

use crate::error::ClientError;
use crate::stream::{check_delta_index, Decoded, SseLine, StreamDecoder};

use super::{api_error_from_body, OpenAiStreamPayload};

const DONE_SENTINEL: &str = "[DONE]";

/// Decoder for `data:`-only `OpenAI` streams. Keeps no state between lines.
#[derive(Debug, Default)]
pub struct OpenAiStreamDecoder;

impl OpenAiStreamDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl StreamDecoder for OpenAiStreamDecoder {
    fn decode_line(&mut self, line: &SseLine) -> Result<Decoded, ClientError> {
        if !line.is_data() {
            tracing::debug!(field = %line.field, "ignoring non-data SSE line");
            return Ok(Decoded::Pending);
        }
        let data = line.value.trim_end();
        if data == DONE_SENTINEL {
            tracing::debug!("openai stream done");
            return Ok(Decoded::Done);
        }
        if data.is_empty() {
            return Ok(Decoded::Pending);
        }

        let payload: OpenAiStreamPayload =
            serde_json::from_str(data).map_err(|e| ClientError::decode("stream chunk", e))?;
        if let Some(error) = payload.error {
            tracing::warn!(
                error_type = %error.error_type,
                code = %error.code,
                "openai stream reported an error"
            );
            return Err(api_error_from_body(0, error).into());
        }
        for choice in &payload.chunk.choices {
            check_delta_index("stream chunk", choice.index)?;
            for call in &choice.delta.tool_calls {
                check_delta_index("stream chunk", call.index)?;
            }
        }
        Ok(Decoded::Chunk(payload.chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::canonical::FinishReason;

    fn data(value: &str) -> SseLine {
        SseLine {
            field: "data".into(),
            value: value.into(),
        }
    }

    fn decode(value: &str) -> Result<Decoded, ClientError> {
        OpenAiStreamDecoder::new().decode_line(&data(value))
    }

    #[test]
    fn test_text_chunk() {
        let Decoded::Chunk(chunk) = decode(
            r#"{"id":"c1","object":"chat.completion.chunk","created":1,"model":"gpt-4o","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#,
        )
        .unwrap() else {
            panic!("expected chunk");
        };
        assert_eq!(chunk.id, "c1");
        assert_eq!(chunk.choices[0].delta.content.text(), "Hello");
        assert!(chunk.choices[0].finish_reason.is_none());
    }

    #[test]
    fn test_huge_tool_call_index_rejected() {
        let err = decode(
            r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":1000000000,"function":{"arguments":"x"}}]}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Decode {
                context: "stream chunk",
                ..
            }
        ));
    }

    #[test]
    fn test_tool_call_delta() {
        let Decoded::Chunk(chunk) = decode(
            r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":1,"function":{"arguments":"{\"a\""}}]}}]}"#,
        )
        .unwrap() else {
            panic!("expected chunk");
        };
        let call = &chunk.choices[0].delta.tool_calls[0];
        assert_eq!(call.index, 1);
        assert!(call.id.is_none());
        assert_eq!(call.function.arguments, "{\"a\"");
    }

    #[test]
    fn test_finish_chunk() {
        let Decoded::Chunk(chunk) =
            decode(r#"{"choices":[{"index":0,"delta":{},"finish_reason":"length"}]}"#).unwrap()
        else {
            panic!("expected chunk");
        };
        assert_eq!(chunk.choices[0].finish_reason, Some(FinishReason::Length));
    }

    #[test]
    fn test_usage_chunk() {
        let Decoded::Chunk(chunk) = decode(
            r#"{"choices":[],"usage":{"prompt_tokens":4,"completion_tokens":6,"total_tokens":10}}"#,
        )
        .unwrap() else {
            panic!("expected chunk");
        };
        assert_eq!(chunk.usage.map(|u| u.total_tokens), Some(10));
    }

    #[test]
    fn test_done_sentinel() {
        assert_eq!(decode("[DONE]").unwrap(), Decoded::Done);
    }

    #[test]
    fn test_non_data_lines_pending() {
        let mut decoder = OpenAiStreamDecoder::new();
        let line = SseLine {
            field: "event".into(),
            value: "ping".into(),
        };
        assert_eq!(decoder.decode_line(&line).unwrap(), Decoded::Pending);
    }

    #[test]
    fn test_embedded_error_terminates() {
        let err = decode(r#"{"error":{"code":"overloaded","message":"try later","type":"server_error"}}"#)
            .unwrap_err();
        let api = err.as_api_error().expect("api error");
        assert_eq!(api.status_code, 0);
        assert_eq!(api.code, "overloaded");
        assert_eq!(api.error_type, "server_error");
    }

    #[test]
    fn test_malformed_chunk() {
        assert!(matches!(
            decode("{oops"),
            Err(ClientError::Decode { context: "stream chunk", .. })
        ));
    }
}

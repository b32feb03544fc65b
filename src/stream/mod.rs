pub mod session;
pub mod sse;

pub use session::ChatStream;
pub use sse::{SseLine, SseLineReader, MAX_LINE_BYTES};

use serde::de::Error as _;

use crate::error::ClientError;
use crate::protocol::canonical::StreamChunk;

/// Largest choice or tool-call index a stream frame may address.
pub const MAX_DELTA_INDEX: usize = 1024;

/// Reject wire indices the merge engine would have to grow to.
pub(crate) fn check_delta_index(
    context: &'static str,
    index: usize,
) -> Result<usize, ClientError> {
    if index > MAX_DELTA_INDEX {
        return Err(ClientError::decode(
            context,
            serde_json::Error::custom(format_args!(
                "index {index} exceeds limit {MAX_DELTA_INDEX}"
            )),
        ));
    }
    Ok(index)
}

/// Outcome of feeding one SSE line to a dialect decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A canonical increment ready for the caller.
    Chunk(StreamChunk),
    /// The line was consumed without producing output.
    Pending,
    /// The dialect's terminal sentinel was observed.
    Done,
}

/// Per-dialect streaming decoder, advanced one meaningful SSE line at a time.
///
/// An `Err` is terminal for the stream.
pub trait StreamDecoder: Send {
    /// # Errors
    ///
    /// Returns a decode error for malformed payloads, or an API error when
    /// the vendor reports one in-stream.
    fn decode_line(&mut self, line: &SseLine) -> Result<Decoded, ClientError>;
}

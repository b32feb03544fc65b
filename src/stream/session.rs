use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use tokio::sync::{Mutex, Notify};

use super::sse::SseLineReader;
use super::{Decoded, StreamDecoder};
use crate::error::ClientError;
use crate::protocol::anthropic::stream::AnthropicStreamDecoder;
use crate::protocol::canonical::{ChatResponse, Dialect, StreamChunk};
use crate::protocol::merge::StreamAccumulator;
use crate::protocol::openai_chat::stream::OpenAiStreamDecoder;

type ByteStream = BoxStream<'static, Result<Bytes, ClientError>>;

struct SessionState {
    reader: SseLineReader<ByteStream>,
    decoder: Box<dyn StreamDecoder>,
}

impl SessionState {
    async fn next_chunk(&mut self) -> Result<Option<StreamChunk>, ClientError> {
        while let Some(line) = self.reader.next_line().await? {
            match self.decoder.decode_line(&line)? {
                Decoded::Chunk(chunk) => return Ok(Some(chunk)),
                Decoded::Pending => {}
                Decoded::Done => return Ok(None),
            }
        }
        Ok(None)
    }
}

/// A live streaming session over one upstream response body.
///
/// One task drives [`ChatStream::recv`]; any other task may call
/// [`ChatStream::close`] at any time. After close every read reports
/// [`ClientError::StreamClosed`] without touching the transport.
pub struct ChatStream {
    dialect: Dialect,
    closed: AtomicBool,
    close_signal: Notify,
    state: Mutex<Option<SessionState>>,
}

impl ChatStream {
    /// Wrap a raw SSE byte stream with the decoder for `dialect`.
    pub fn from_byte_stream<S, E>(dialect: Dialect, body: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<ClientError> + 'static,
    {
        let decoder: Box<dyn StreamDecoder> = match dialect {
            Dialect::OpenAi => Box::new(OpenAiStreamDecoder::new()),
            Dialect::Anthropic => Box::new(AnthropicStreamDecoder::new()),
        };
        Self::with_decoder(dialect, body, decoder)
    }

    pub fn with_decoder<S, E>(dialect: Dialect, body: S, decoder: Box<dyn StreamDecoder>) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<ClientError> + 'static,
    {
        let body: ByteStream = body.map(|chunk| chunk.map_err(Into::into)).boxed();
        Self {
            dialect,
            closed: AtomicBool::new(false),
            close_signal: Notify::new(),
            state: Mutex::new(Some(SessionState {
                reader: SseLineReader::new(body),
                decoder,
            })),
        }
    }

    pub(crate) fn from_response(dialect: Dialect, response: reqwest::Response) -> Self {
        Self::from_byte_stream(dialect, response.bytes_stream())
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Pull the next canonical chunk.
    ///
    /// Returns `Ok(None)` at end-of-stream. End-of-stream and errors release
    /// the transport; later calls keep returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::StreamClosed`] once [`ChatStream::close`] has
    /// been called, otherwise the transport, decode or API error that ended
    /// the stream.
    pub async fn recv(&self) -> Result<Option<StreamChunk>, ClientError> {
        if self.is_closed() {
            return Err(ClientError::StreamClosed);
        }

        let closed = self.close_signal.notified();
        tokio::pin!(closed);
        closed.as_mut().enable();

        let mut guard = tokio::select! {
            biased;
            () = closed.as_mut() => return Err(ClientError::StreamClosed),
            guard = self.state.lock() => guard,
        };
        if self.is_closed() {
            return Err(ClientError::StreamClosed);
        }
        let Some(state) = guard.as_mut() else {
            return Ok(None);
        };

        let result = tokio::select! {
            biased;
            () = closed.as_mut() => Err(ClientError::StreamClosed),
            result = state.next_chunk() => result,
        };
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!(dialect = %self.dialect, "stream finished");
                *guard = None;
            }
            Err(e) => {
                tracing::debug!(dialect = %self.dialect, error = %e, "stream terminated");
                *guard = None;
            }
        }
        result
    }

    /// Close the session and release the transport.
    ///
    /// Safe to call concurrently with an in-flight [`ChatStream::recv`],
    /// which then returns [`ClientError::StreamClosed`]. Idempotent.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.close_signal.notify_waiters();
        let mut guard = self.state.lock().await;
        guard.take();
    }

    /// Adapt the session into a [`Stream`] of chunks that ends after the
    /// first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<StreamChunk, ClientError>> + Send {
        futures_util::stream::unfold(Some(self), |session| async move {
            let session = session?;
            match session.recv().await {
                Ok(Some(chunk)) => Some((Ok(chunk), Some(session))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Drain the session and merge every delta into one response.
    ///
    /// # Errors
    ///
    /// Returns the first stream error, or [`ClientError::EmptyResponse`] when
    /// the stream ended without any choice.
    pub async fn collect(self) -> Result<ChatResponse, ClientError> {
        let mut acc = StreamAccumulator::new();
        while let Some(chunk) = self.recv().await? {
            acc.push(&chunk);
        }
        let response = acc.finish();
        if response.choices.is_empty() {
            return Err(ClientError::EmptyResponse);
        }
        Ok(response)
    }
}

impl std::fmt::Debug for ChatStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStream")
            .field("dialect", &self.dialect)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

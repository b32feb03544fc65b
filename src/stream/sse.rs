/// SSE (Server-Sent Events) line reader.
///
/// Splits a chunked byte stream into meaningful `field: value` lines. Blank
/// lines and `:` comments (keep-alives) are skipped; interpreting fields is
/// left to the dialect decoders.
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use memchr::memchr;

use crate::error::ClientError;

/// Hard ceiling on a single SSE line, excluding its terminator.
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// One meaningful SSE line split at its first colon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseLine {
    pub field: String,
    pub value: String,
}

impl SseLine {
    /// Parse a line with its terminator already removed.
    ///
    /// Returns `None` for blank lines and comments. One leading space after
    /// the colon is stripped; a line without a colon is a field with an
    /// empty value.
    #[must_use]
    pub fn parse(line: &[u8]) -> Option<Self> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() || line[0] == b':' {
            return None;
        }
        let (field, value) = match memchr(b':', line) {
            Some(pos) => {
                let value = &line[pos + 1..];
                (&line[..pos], value.strip_prefix(b" ").unwrap_or(value))
            }
            None => (line, &b""[..]),
        };
        Some(Self {
            field: String::from_utf8_lossy(field).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        })
    }

    #[must_use]
    pub fn is_data(&self) -> bool {
        self.field == "data"
    }

    #[must_use]
    pub fn is_event(&self) -> bool {
        self.field == "event"
    }
}

/// Pull-based reader of meaningful SSE lines over a byte stream.
pub struct SseLineReader<S> {
    inner: S,
    buffer: BytesMut,
    scan_from: usize,
    max_line_bytes: usize,
    eof: bool,
}

impl<S, E> SseLineReader<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<ClientError>,
{
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self::with_max_line_bytes(inner, MAX_LINE_BYTES)
    }

    #[must_use]
    pub fn with_max_line_bytes(inner: S, max_line_bytes: usize) -> Self {
        Self {
            inner,
            buffer: BytesMut::with_capacity(4096),
            scan_from: 0,
            max_line_bytes,
            eof: false,
        }
    }

    /// Next meaningful line, or `Ok(None)` once the byte stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::LineTooLong`] when a line exceeds the ceiling,
    /// or the underlying stream's error converted into [`ClientError`].
    pub async fn next_line(&mut self) -> Result<Option<SseLine>, ClientError> {
        loop {
            while let Some(raw) = self.split_line()? {
                if let Some(line) = SseLine::parse(&raw) {
                    return Ok(Some(line));
                }
            }

            if self.eof {
                // An unterminated final line is still delivered.
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let rest = self.buffer.split();
                self.scan_from = 0;
                match SseLine::parse(&rest) {
                    Some(line) => return Ok(Some(line)),
                    None => return Ok(None),
                }
            }

            match self.inner.next().await {
                Some(Ok(bytes)) => self.buffer.extend_from_slice(&bytes),
                Some(Err(e)) => return Err(e.into()),
                None => self.eof = true,
            }
        }
    }

    fn split_line(&mut self) -> Result<Option<BytesMut>, ClientError> {
        let limit = self.max_line_bytes;
        match memchr(b'\n', &self.buffer[self.scan_from..]) {
            Some(rel) => {
                let end = self.scan_from + rel;
                self.scan_from = 0;
                let mut line = self.buffer.split_to(end + 1);
                line.truncate(end);
                if line.last() == Some(&b'\r') {
                    line.truncate(end - 1);
                }
                if line.len() > limit {
                    return Err(ClientError::LineTooLong { limit });
                }
                Ok(Some(line))
            }
            None => {
                // Carriage return left pending at the tail belongs to the next \n.
                if self.buffer.len() > limit + 1 {
                    return Err(ClientError::LineTooLong { limit });
                }
                self.scan_from = self.buffer.len();
                Ok(None)
            }
        }
    }
}

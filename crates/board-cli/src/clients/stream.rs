//! Newline-delimited JSON event stream.
//!
//! The Board API sends one JSON record per line and a blank line every few
//! seconds as keep-alive. Records may be split across network chunks.

use board_core::event::{parse_record_bytes, GameEvent};
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::ClientError;

pub type ByteStream = BoxStream<'static, Result<Vec<u8>, ClientError>>;

/// Largest record accepted. A full game state is a few kilobytes.
pub const MAX_RECORD_BYTES: usize = 1 << 20;

pub struct EventStream {
    chunks: ByteStream,
    buf: Vec<u8>,
    done: bool,
}

impl EventStream {
    pub fn new(chunks: ByteStream) -> Self {
        Self {
            chunks,
            buf: Vec::new(),
            done: false,
        }
    }

    /// Build a stream from already-received records, mostly for tests.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        let chunks = futures::stream::iter(
            lines
                .into_iter()
                .map(|line| Ok::<_, ClientError>(format!("{line}\n").into_bytes())),
        );
        Self::new(chunks.boxed())
    }

    /// Next decoded event, or `None` at end of stream.
    pub async fn next_event(&mut self) -> Result<Option<GameEvent>, ClientError> {
        loop {
            if let Some(line) = self.take_line() {
                if is_blank(&line) {
                    continue;
                }
                tracing::debug!(record = %String::from_utf8_lossy(&line), "Stream record");
                return Ok(Some(parse_record_bytes(&line)?));
            }

            if self.done {
                return self.take_trailing();
            }

            if self.buf.len() > MAX_RECORD_BYTES {
                return Err(ClientError::RecordTooLong {
                    limit: MAX_RECORD_BYTES,
                });
            }

            match self.chunks.next().await {
                Some(chunk) => self.buf.extend_from_slice(&chunk?),
                None => self.done = true,
            }
        }
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let end = self.buf.iter().position(|&b| b == b'\n')?;
        Some(self.buf.drain(..=end).collect())
    }

    /// A final record without a trailing newline.
    fn take_trailing(&mut self) -> Result<Option<GameEvent>, ClientError> {
        let rest = std::mem::take(&mut self.buf);
        if is_blank(&rest) {
            return Ok(None);
        }
        if rest.len() > MAX_RECORD_BYTES {
            return Err(ClientError::RecordTooLong {
                limit: MAX_RECORD_BYTES,
            });
        }
        Ok(Some(parse_record_bytes(&rest)?))
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

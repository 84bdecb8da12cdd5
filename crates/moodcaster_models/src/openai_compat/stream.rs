//! Server-sent event decoding for streamed chat completions.

use crate::openai_compat::ChatCompletionChunk;
use tracing::{trace, warn};

/// Payload that marks the end of a completion stream.
pub const STREAM_TERMINATOR: &str = "[DONE]";

/// Incremental decoder for `text/event-stream` bodies.
///
/// Bytes may arrive split at arbitrary points, including inside a UTF-8
/// sequence, so input is buffered until a full line is available. Frames
/// that fail to parse are skipped.
///
/// # Examples
///
/// ```
/// use moodcaster_models::EventStreamDecoder;
///
/// let mut decoder = EventStreamDecoder::new();
/// decoder.feed(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\nda");
/// decoder.feed(b"ta: [DONE]\n\n");
/// assert!(decoder.is_finished());
///
/// let chunks = decoder.finish();
/// assert_eq!(chunks[0].text(), Some("Hi"));
/// ```
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    buffer: Vec<u8>,
    chunks: Vec<ChatCompletionChunk>,
    finished: bool,
}

impl EventStreamDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw bytes and decodes every complete line.
    pub fn feed(&mut self, bytes: &[u8]) {
        if self.finished {
            return;
        }
        self.buffer.extend_from_slice(bytes);

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.decode_line(&String::from_utf8_lossy(&line));
            if self.finished {
                self.buffer.clear();
                break;
            }
        }
    }

    /// Returns true once the terminator frame has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Flushes any trailing partial line and returns the decoded chunks.
    pub fn finish(mut self) -> Vec<ChatCompletionChunk> {
        if !self.finished && !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.decode_line(&String::from_utf8_lossy(&rest));
        }
        self.chunks
    }

    fn decode_line(&mut self, line: &str) {
        let line = line.trim();
        let Some(payload) = line.strip_prefix("data:") else {
            // Comments, event names and blank separators carry no content
            return;
        };
        let payload = payload.trim();

        if payload == STREAM_TERMINATOR {
            trace!("Stream terminator received");
            self.finished = true;
            return;
        }
        if payload.is_empty() {
            return;
        }

        match serde_json::from_str::<ChatCompletionChunk>(payload) {
            Ok(chunk) => self.chunks.push(chunk),
            Err(e) => warn!(error = %e, frame = payload, "Skipping malformed stream frame"),
        }
    }
}

/// Decodes a complete event-stream body.
pub fn decode_event_stream(body: &str) -> Vec<ChatCompletionChunk> {
    let mut decoder = EventStreamDecoder::new();
    decoder.feed(body.as_bytes());
    decoder.finish()
}

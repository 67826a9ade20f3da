//! Incremental reader for `data:`-framed chat completion streams.
//!
//! DESIGN
//! ======
//! The body arrives as arbitrary byte chunks. [`Utf8Decoder`] turns them into
//! text while carrying split multi-byte sequences across calls, [`SseParser`]
//! reassembles newline-terminated frames and extracts text deltas, and
//! [`read_stream`] drives both over any async byte stream.
//!
//! The parser is a three-state machine: `Idle` before the first chunk,
//! `Streaming` while frames are being consumed, `Done` once the terminator
//! frame was seen or the source closed.
//!
//! ERROR HANDLING
//! ==============
//! Malformed frames are never reported. A `data:` line whose payload does not
//! parse is assumed to be the front of a payload split across chunks: it is
//! pushed back onto the buffer and scanning pauses until more bytes arrive.
//! At end of stream the leftover buffer is parsed one line at a time and
//! anything that still fails to parse is dropped.

use std::pin::pin;

use futures::{Stream, StreamExt};
use serde_json::Value;

/// Prefix of a data frame, including the single separating space.
pub const DATA_PREFIX: &str = "data: ";

/// Payload of the frame that ends a stream.
pub const DONE_TOKEN: &str = "[DONE]";

// =============================================================================
// UTF-8 DECODER
// =============================================================================

/// Streaming UTF-8 decoder.
///
/// Invalid sequences become U+FFFD. A sequence cut off at the end of a chunk
/// is held back and completed by the next call.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, prefixed by any bytes carried over from the last call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    if let Some(len) = err.error_len() {
                        out.push(char::REPLACEMENT_CHARACTER);
                        rest = &after[len..];
                    } else {
                        self.pending = after.to_vec();
                        break;
                    }
                }
            }
        }
        out
    }

    /// Flush the decoder at end of input. An incomplete trailing sequence
    /// decodes to a single U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.pending.clear();
        char::REPLACEMENT_CHARACTER.to_string()
    }

    /// Number of bytes held back waiting for the rest of a sequence.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

// =============================================================================
// FRAMES
// =============================================================================

/// Classification of a single line received from the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamFrame<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// Keep-alive / comment line starting with `:`.
    Comment,
    /// Line without the `data: ` prefix.
    Malformed,
    /// `data: [DONE]`.
    Done,
    /// `data: <payload>` with the payload trimmed.
    Data(&'a str),
}

/// Classify one line. A single trailing `\r` is ignored.
#[must_use]
pub fn classify_line(line: &str) -> StreamFrame<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return StreamFrame::Blank;
    }
    if line.starts_with(':') {
        return StreamFrame::Comment;
    }
    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return StreamFrame::Malformed;
    };
    let payload = rest.trim();
    if payload == DONE_TOKEN { StreamFrame::Done } else { StreamFrame::Data(payload) }
}

/// Parse a data frame payload and pull out `choices[0].delta.content`.
///
/// Any valid JSON is accepted; a missing path or a non-string `content`
/// yields `Ok(None)`.
///
/// # Errors
///
/// Returns the JSON error when the payload is not valid JSON, which the
/// parser treats as an incomplete frame.
pub fn parse_delta(payload: &str) -> Result<Option<String>, serde_json::Error> {
    let value: Value = serde_json::from_str(payload)?;
    Ok(value
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("delta"))
        .and_then(|delta| delta.get("content"))
        .and_then(Value::as_str)
        .map(str::to_owned))
}

// =============================================================================
// SINK
// =============================================================================

/// Receiver of parsed deltas.
pub trait DeltaSink {
    /// Called once per data frame that carries non-empty text, in order.
    fn on_delta(&mut self, delta: &str);

    /// Called exactly once after the stream is fully consumed.
    fn on_done(&mut self) {}
}

impl DeltaSink for Vec<String> {
    fn on_delta(&mut self, delta: &str) {
        self.push(delta.to_owned());
    }
}

impl DeltaSink for String {
    fn on_delta(&mut self, delta: &str) {
        self.push_str(delta);
    }
}

// =============================================================================
// PARSER
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    Idle,
    Streaming,
    Done,
}

/// Line framer and delta extractor over decoded text.
#[derive(Debug)]
pub struct SseParser {
    buffer: String,
    state: ReaderState,
    terminated: bool,
    completed: bool,
    deltas: usize,
}

impl Default for SseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SseParser {
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: String::new(), state: ReaderState::Idle, terminated: false, completed: false, deltas: 0 }
    }

    #[must_use]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// `true` once `data: [DONE]` was consumed.
    #[must_use]
    pub fn terminated(&self) -> bool {
        self.terminated
    }

    /// Number of deltas emitted so far.
    #[must_use]
    pub fn deltas(&self) -> usize {
        self.deltas
    }

    /// Text received but not yet consumed as complete frames.
    #[must_use]
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Append decoded text and emit every delta that is now complete.
    pub fn push<K: DeltaSink + ?Sized>(&mut self, text: &str, sink: &mut K) -> ReaderState {
        if self.state == ReaderState::Done {
            return self.state;
        }
        self.state = ReaderState::Streaming;
        self.buffer.push_str(text);
        self.drain_lines(sink);
        self.state
    }

    /// End of input: flush residual text best-effort, then signal completion.
    ///
    /// `tail` is whatever the decoder released on flush. Completion is
    /// signalled at most once no matter how often this is called.
    pub fn finish<K: DeltaSink + ?Sized>(&mut self, tail: &str, sink: &mut K) {
        if self.completed {
            return;
        }
        if !self.terminated {
            self.buffer.push_str(tail);
            let residual = std::mem::take(&mut self.buffer);
            if !residual.trim().is_empty() {
                self.flush_residual(&residual, sink);
            }
        }
        self.buffer.clear();
        self.state = ReaderState::Done;
        self.completed = true;
        sink.on_done();
    }

    fn drain_lines<K: DeltaSink + ?Sized>(&mut self, sink: &mut K) {
        while let Some(newline) = self.buffer.find('\n') {
            let raw: String = self.buffer.drain(..=newline).collect();
            let line = &raw[..newline];
            let line = line.strip_suffix('\r').unwrap_or(line);

            match classify_line(line) {
                StreamFrame::Blank | StreamFrame::Comment | StreamFrame::Malformed => {}
                StreamFrame::Done => {
                    self.terminated = true;
                    self.state = ReaderState::Done;
                    self.buffer.clear();
                    return;
                }
                StreamFrame::Data(payload) => match parse_delta(payload) {
                    Ok(Some(text)) => self.emit(&text, sink),
                    Ok(None) => {}
                    Err(_) => {
                        // Likely the front of a payload split across chunks.
                        self.buffer.insert(0, '\n');
                        self.buffer.insert_str(0, line);
                        return;
                    }
                },
            }
        }
    }

    fn flush_residual<K: DeltaSink + ?Sized>(&mut self, residual: &str, sink: &mut K) {
        for raw in residual.split('\n') {
            match classify_line(raw) {
                StreamFrame::Done => {
                    self.terminated = true;
                    break;
                }
                StreamFrame::Data(payload) => {
                    if let Ok(Some(text)) = parse_delta(payload) {
                        self.emit(&text, sink);
                    }
                }
                StreamFrame::Blank | StreamFrame::Comment | StreamFrame::Malformed => {}
            }
        }
    }

    fn emit<K: DeltaSink + ?Sized>(&mut self, text: &str, sink: &mut K) {
        if text.is_empty() {
            return;
        }
        self.deltas += 1;
        sink.on_delta(text);
    }
}

// =============================================================================
// READ LOOP
// =============================================================================

/// Error raised while pulling chunks from the body.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("stream read failed: {0}")]
    Read(String),
}

/// Counters describing a fully consumed stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Body chunks pulled from the source.
    pub chunks: usize,
    /// Deltas delivered to the sink.
    pub deltas: usize,
    /// `true` when the stream ended with `data: [DONE]` rather than EOF.
    pub terminated: bool,
}

/// Consume a chat completion body and feed its deltas to `sink`.
///
/// Reading stops at the terminator frame even if the source has more bytes.
/// `sink.on_done()` is called exactly once on success; a read error aborts
/// without calling it and leaves already-delivered deltas in place.
///
/// # Errors
///
/// Returns [`StreamError::Read`] if the underlying stream yields an error.
pub async fn read_stream<S, B, E, K>(body: S, sink: &mut K) -> Result<StreamSummary, StreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
    K: DeltaSink + ?Sized,
{
    let mut body = pin!(body);
    let mut decoder = Utf8Decoder::new();
    let mut parser = SseParser::new();
    let mut chunks = 0_usize;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| StreamError::Read(e.to_string()))?;
        chunks += 1;
        let text = decoder.decode(chunk.as_ref());
        if parser.push(&text, sink) == ReaderState::Done {
            break;
        }
    }

    let tail = decoder.finish();
    parser.finish(&tail, sink);

    Ok(StreamSummary { chunks, deltas: parser.deltas(), terminated: parser.terminated() })
}

#[cfg(test)]
#[path = "sse_test.rs"]
mod tests;

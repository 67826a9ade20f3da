//! Shared wire model and client-side logic for HealthWatch.
//!
//! This crate owns the request/response shapes used by both `server` and
//! `cli`, plus the client halves of the two data flows: the incremental
//! chat stream reader and the CSV row parser used before upload.

pub mod chat;
pub mod csv;
pub mod outbreak;
pub mod pincode;
pub mod sse;
pub mod transcript;

pub use chat::{ChatMessage, ChatRequest, Role, TransportError};
pub use csv::{CsvRow, UploadRequest, parse_csv, parse_leading_int};
pub use outbreak::{ErrorBody, OutbreakRecord, UploadResponse};
pub use pincode::{PincodeError, validate_pincode};
pub use sse::{DeltaSink, ReaderState, SseParser, StreamError, StreamSummary, Utf8Decoder, read_stream};
pub use transcript::{Transcript, TranscriptError, TurnState};

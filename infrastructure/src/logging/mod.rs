//! Logging infrastructure: structured run transcripts.
//!
//! Provides [`JsonlRunLogger`], a JSONL file writer that implements the
//! [`RunLogger`](conductor_application::RunLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlRunLogger;

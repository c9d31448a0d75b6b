//! Child-process plumbing shared by the command-backed adapters.
//!
//! Every request is one process: the JSON payload is written to stdin, the
//! trimmed stdout is the reply.

mod runner;

pub use runner::{CommandSpec, ProcessError};

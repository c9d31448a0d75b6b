//! Application-level configuration.
//!
//! - [`ExecutionParams`]: orchestration loop control (mode, iteration and
//!   retry bounds, concurrency, timeouts)

pub mod execution_params;

pub use execution_params::ExecutionParams;

//! Logging infrastructure for structured epoch logs.
//!
//! Provides [`JsonlEpochLogger`], a JSONL file writer that implements
//! the [`EpochLogger`](quizsolver_application::EpochLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlEpochLogger;

//! Infrastructure layer for quizsolver
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod quiz;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileGeneratorConfig, FileLoggingConfig, FileOutputConfig,
    FileOutputFormat, FileSolverConfig,
};
pub use logging::JsonlEpochLogger;
pub use quiz::{GeneratorError, GeneratorSettings, SyntheticQuiz};

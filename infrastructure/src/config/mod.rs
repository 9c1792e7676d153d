//! Configuration file loading for quizsolver
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Environment: `QUIZSOLVER_<SECTION>__<KEY>`
//! 3. Project root: `./quizsolver.toml` or `./.quizsolver.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/quizsolver/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileGeneratorConfig, FileLoggingConfig, FileOutputConfig, FileOutputFormat,
    FileSolverConfig,
};
pub use loader::ConfigLoader;

//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod epoch_logger;
pub mod progress;
pub mod quiz_oracle;

//! Application-level configuration.
//!
//! - [`SolverConfig`]: solver behavior (strategy choice, windows, termination)

pub mod solver_config;

pub use solver_config::SolverConfig;

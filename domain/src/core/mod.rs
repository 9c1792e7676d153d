//! Core domain concepts shared across all subdomains.
//!
//! - [`content_id::ContentId`]: content-addressed identifier of questions and answers
//! - [`error::DomainError`]: domain-level errors

pub mod content_id;
pub mod error;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the storage engine API consumed by
//!   the tree projection, the document session and UI collaborators.
//! - Apply defaults and validation so repositories stay query-only.

pub mod store;

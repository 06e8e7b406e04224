//! Analysis Provider integration.
//!
//! The client speaks an Ollama-compatible chat API; the terms module
//! carries the dictionary of known problematic phrases used in prompts.

pub mod client;
pub mod terms;

pub use client::{BiasDetector, ProviderConfig};
pub use terms::{builtin_terms, merge_terms, KnownTerm};

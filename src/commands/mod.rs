//! Command implementations for the CLI
//!
//! - translation / rag / roi: compute and print a scenario report
//! - export: translation estimate as CSV
//! - narrate: one-shot narrative commentary for a scenario
//! - session: interactive parameter editing with debounced commentary
//! - catalog: list model rates
//! - config: configuration display and validation

pub mod catalog;
pub mod config;
pub mod export;
pub mod narrate;
pub mod rag;
pub mod render;
pub mod roi;
pub mod session;
pub mod translation;

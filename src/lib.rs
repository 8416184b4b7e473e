pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod narrative;
pub mod normalize;
pub mod session;

pub use logging::init_tracing;

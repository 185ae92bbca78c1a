//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod encoding;
pub mod text;

pub use config::Config;
pub use diagnostic::Diagnostic;

//! ccsproj - Code Composer Studio project files
//!
//! This crate reads the IDE's `.pjt` project format into an in-memory
//! model and exports it as a GNU Makefile, back to the IDE format, or as
//! qmake fragments (sources, defines, include paths).

pub mod core;
pub mod export;
pub mod ops;
pub mod parser;
pub mod util;

/// Test utilities for ccsproj unit tests.
///
/// Only available when compiling tests. Provides sample project files and
/// a builder for assembling project models by hand.
#[cfg(test)]
pub mod test_support;

pub use core::{ConfigSettings, ProjectSettings};
pub use export::{ExportFormat, ProjectExport};
pub use parser::{ProjectParser, ProjectReader};

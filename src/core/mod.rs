//! Core data structures for ccsproj.
//!
//! This module contains the in-memory model of a project file:
//! - Build steps and their run conditions
//! - Per-file option overlays
//! - Per-configuration tool options
//! - Project-wide settings: files, tools and configurations

pub mod build_step;
pub mod config_settings;
pub mod file_options;
pub mod project;

pub use build_step::{BuildCondition, BuildStep, BuildStepList};
pub use config_settings::ConfigSettings;
pub use file_options::FileOptions;
pub use project::{FileKind, ProjectSettings, ProjectType, Tool, ToolSet};

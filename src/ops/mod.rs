//! High-level operations.
//!
//! This module contains the implementation of ccsproj commands.

pub mod convert;

pub use convert::{convert, default_build_config, ConvertError, ConvertOptions, OutputSpec};

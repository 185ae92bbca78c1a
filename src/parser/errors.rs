//! Parse and read error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// A data line that the current section cannot accept.
///
/// The first error aborts the parse; no partial model is returned.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ParseError {
    #[error("unknown config line: '{line}'")]
    #[diagnostic(code(ccsproj::parse::malformed_line))]
    MalformedLine { line: String },

    #[error("unknown project type '{value}'")]
    #[diagnostic(
        code(ccsproj::parse::project_type),
        help("valid values: Executable, Library")
    )]
    UnknownProjectType { value: String },

    #[error("unknown source file list key '{key}'")]
    #[diagnostic(code(ccsproj::parse::source_key))]
    UnknownSourceKey { key: String },

    #[error("unknown configuration key '{key}' in configuration '{config}'")]
    #[diagnostic(code(ccsproj::parse::config_key))]
    UnknownConfigKey { key: String, config: String },

    #[error("unknown tool: '{tool}'")]
    #[diagnostic(code(ccsproj::parse::tool))]
    UnknownTool { tool: String },

    #[error("unknown tool configuration key '{key}' for tool '{tool}' in configuration '{config}'")]
    #[diagnostic(code(ccsproj::parse::tool_key))]
    UnknownToolKey {
        key: String,
        tool: String,
        config: String,
    },

    #[error("unknown option value '{value}' for file '{file}' in configuration '{config}'")]
    #[diagnostic(code(ccsproj::parse::file_options))]
    UnknownFileOptions {
        value: String,
        file: String,
        config: String,
    },

    #[error("wrong link order value '{value}' for file '{file}' in configuration '{config}'")]
    #[diagnostic(code(ccsproj::parse::link_order))]
    InvalidLinkOrder {
        value: String,
        file: String,
        config: String,
    },

    #[error("wrong run condition value '{value}' for file '{file}' in configuration '{config}'")]
    #[diagnostic(code(ccsproj::parse::run_condition))]
    InvalidRunCondition {
        value: String,
        file: String,
        config: String,
    },

    #[error(
        "wrong exclude from build value '{value}' for file '{file}' in configuration '{config}'"
    )]
    #[diagnostic(code(ccsproj::parse::exclude_from_build))]
    InvalidExcludeFromBuild {
        value: String,
        file: String,
        config: String,
    },

    #[error("unknown option key '{key}' for file '{file}' in configuration '{config}'")]
    #[diagnostic(code(ccsproj::parse::file_key))]
    UnknownFileKey {
        key: String,
        file: String,
        config: String,
    },
}

impl ParseError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            ParseError::MalformedLine { .. } => diag
                .with_context("data lines have the form `Key=Value`")
                .with_suggestion("Comment the line out with a leading `;`"),

            ParseError::UnknownProjectType { .. } => {
                diag.with_suggestion("Use `ProjectType=Executable` or `ProjectType=Library`")
            }

            ParseError::UnknownSourceKey { .. } => {
                diag.with_context("the [Source Files] section only accepts `Source=`")
            }

            ParseError::UnknownConfigKey { .. } => diag.with_context(
                "configuration sections accept `InitialBuildCmd=` and `FinalBuildCmd=`",
            ),

            ParseError::UnknownTool { tool } => diag
                .with_context("known tools: Compiler, Linker, Archiver")
                .with_suggestion(format!("Remove the `[\"{}\" Settings: ...]` section", tool)),

            ParseError::UnknownToolKey { .. } => {
                diag.with_context("tool sections only accept `Options=`")
            }

            ParseError::UnknownFileOptions { .. } => diag
                .with_context("file options must start with `\"Compiler\" `")
                .with_suggestion("Use `Options=\"Compiler\" +{added} -{removed}`"),

            ParseError::InvalidLinkOrder { .. } => {
                diag.with_suggestion("Use a non-negative integer, e.g. `LinkOrder=1`")
            }

            ParseError::InvalidRunCondition { .. } => {
                diag.with_suggestion("Use one of: `If file builds`, `Always`, `Never`")
            }

            ParseError::InvalidExcludeFromBuild { .. } => {
                diag.with_suggestion("Use `true` or `false`")
            }

            ParseError::UnknownFileKey { .. } => diag.with_context(
                "file sections accept Options, LinkOrder, Run, PreBuildCmd, PostBuildCmd, ExcludeFromBuild",
            ),
        }
    }
}

/// Failure to load a project file.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ReadError {
    #[error("failed to open project '{}': {source}", path.display())]
    #[diagnostic(code(ccsproj::read::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stray carriage return on line {line}")]
    #[diagnostic(
        code(ccsproj::read::carriage_return),
        help("convert the file to LF or CRLF line endings")
    )]
    StrayCarriageReturn { line: usize },

    #[error("line {line}: {source}")]
    #[diagnostic(code(ccsproj::read::parse))]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },
}

impl ReadError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ReadError::Io { path, source } => {
                Diagnostic::error(format!("failed to open project: {}", source))
                    .with_location(path.clone())
            }

            ReadError::StrayCarriageReturn { line } => {
                Diagnostic::error(format!("stray carriage return on line {}", line))
                    .with_suggestion("Convert the file to LF or CRLF line endings")
            }

            ReadError::Parse { line, source } => {
                source.to_diagnostic().with_context(format!("at line {}", line))
            }
        }
    }
}

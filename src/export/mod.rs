//! Project exporters.
//!
//! Every output format implements [`ProjectExport`], which renders a parsed
//! [`ProjectSettings`] into the bytes of the target file. Rendering is pure;
//! the only failure an export can report is writing those bytes, which
//! [`write_to`] handles for both named files and standard output.

pub mod ccs;
pub mod makefile;
pub mod qt;

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::core::project::ProjectSettings;
use crate::util::diagnostic::{suggestions, Diagnostic};

pub use ccs::CcsExport;
pub use makefile::MakefileExport;
pub use qt::{QtDefinesExport, QtIncludesExport, QtSourcesExport};

/// A renderer of one output format.
pub trait ProjectExport {
    /// Render the project into the bytes of the output file.
    fn render(&self, project: &ProjectSettings) -> Vec<u8>;
}

/// Output formats understood by the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Ccs,
    Makefile,
    QtSources,
    QtDefines,
    QtIncludes,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Ccs,
        ExportFormat::Makefile,
        ExportFormat::QtSources,
        ExportFormat::QtDefines,
        ExportFormat::QtIncludes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Ccs => "ccs",
            ExportFormat::Makefile => "makefile",
            ExportFormat::QtSources => "qt-sources",
            ExportFormat::QtDefines => "qt-defines",
            ExportFormat::QtIncludes => "qt-includes",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ccs" | "pjt" | "project" => Ok(ExportFormat::Ccs),
            "makefile" | "make" => Ok(ExportFormat::Makefile),
            "qt-sources" => Ok(ExportFormat::QtSources),
            "qt-defines" => Ok(ExportFormat::QtDefines),
            "qt-includes" => Ok(ExportFormat::QtIncludes),
            _ => Err(ExportFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing an output format name.
#[derive(Debug, Clone)]
pub struct ExportFormatParseError(pub String);

impl fmt::Display for ExportFormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown output format `{}`", self.0)
    }
}

impl std::error::Error for ExportFormatParseError {}

impl ExportFormatParseError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string()).with_suggestion(suggestions::FORMATS)
    }
}

/// Where an export is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Interpret a command line output argument; `-` is standard output.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(arg))
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Destination::Stdout => None,
            Destination::File(path) => Some(path),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("<stdout>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Errors writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ExportError::Io { path, source } => {
                let mut diag = Diagnostic::error(format!("failed to write '{}'", path))
                    .with_context(source.to_string());
                if source.kind() == io::ErrorKind::NotFound {
                    diag = diag.with_suggestion("Create the output directory first");
                }
                diag
            }
        }
    }
}

/// Write rendered bytes to a destination.
///
/// A named file is created (or truncated) and closed before returning,
/// on success and on failure alike.
pub fn write_to(destination: &Destination, bytes: &[u8]) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: destination.to_string(),
        source,
    };

    match destination {
        Destination::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(bytes).map_err(io_error)?;
            handle.flush().map_err(io_error)
        }
        Destination::File(path) => {
            let mut file = File::create(path).map_err(io_error)?;
            file.write_all(bytes).map_err(io_error)?;
            file.flush().map_err(io_error)
        }
    }
}

/// Render `project` with `exporter` and write it to `destination`.
pub fn export(
    exporter: &dyn ProjectExport,
    project: &ProjectSettings,
    destination: &Destination,
) -> Result<(), ExportError> {
    let bytes = exporter.render(project);
    tracing::debug!("writing {} bytes to {}", bytes.len(), destination);
    write_to(destination, &bytes)
}

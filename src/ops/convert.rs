//! Implementation of a conversion run: read one project, write every
//! requested output.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::project::ProjectSettings;
use crate::export::{
    export, CcsExport, Destination, ExportError, ExportFormat, MakefileExport, ProjectExport,
    QtDefinesExport, QtIncludesExport, QtSourcesExport,
};
use crate::parser::{ProjectReader, ReadError};
use crate::util::config::MakefileConfig;
use crate::util::diagnostic::Diagnostic;

/// One requested output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub format: ExportFormat,
    pub destination: Destination,
}

impl OutputSpec {
    pub fn new(format: ExportFormat, destination: Destination) -> Self {
        OutputSpec {
            format,
            destination,
        }
    }
}

/// Options for a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Project file to read
    pub input: PathBuf,

    /// Outputs, written in order
    pub outputs: Vec<OutputSpec>,

    /// Configuration used by the Qt defines and includes fragments
    pub build_config: Option<String>,

    /// Makefile exporter settings
    pub makefile: MakefileConfig,
}

impl ConvertOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        ConvertOptions {
            input: input.into(),
            outputs: Vec::new(),
            build_config: None,
            makefile: MakefileConfig::default(),
        }
    }
}

/// Errors of a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ConvertError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::Read(_) => 2,
            ConvertError::Export(_) => 3,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConvertError::Read(e) => e.to_diagnostic(),
            ConvertError::Export(e) => e.to_diagnostic(),
        }
    }
}

/// Read the input project and write each requested output.
///
/// The project is read once. Outputs are written in the order given; the
/// first failure stops the run.
pub fn convert(opts: &ConvertOptions) -> Result<ProjectSettings, ConvertError> {
    let project = ProjectReader::new(&opts.input).read()?;

    tracing::debug!(
        "read {}: {} configurations, {} sources",
        opts.input.display(),
        project.configs().count(),
        project.sources().len()
    );

    let build_config = opts
        .build_config
        .clone()
        .unwrap_or_else(|| default_build_config(&project));

    for output in &opts.outputs {
        let exporter = exporter_for(output, opts, &build_config);
        tracing::debug!("exporting {} to {}", output.format, output.destination);
        export(exporter.as_ref(), &project, &output.destination)?;
    }

    Ok(project)
}

/// The lexicographically first configuration, or an empty name when the
/// project declares none.
pub fn default_build_config(project: &ProjectSettings) -> String {
    project.configs().next().unwrap_or_default().to_string()
}

fn exporter_for(
    output: &OutputSpec,
    opts: &ConvertOptions,
    build_config: &str,
) -> Box<dyn ProjectExport> {
    match output.format {
        ExportFormat::Ccs => Box::new(CcsExport),
        ExportFormat::Makefile => {
            let exporter = MakefileExport::new(opts.makefile.clone());
            match output.destination.path() {
                Some(path) => {
                    let path = path_str(path);
                    Box::new(exporter.with_target(&path).with_makefile_name(&path))
                }
                None => Box::new(exporter.with_target(&path_str(&opts.input))),
            }
        }
        ExportFormat::QtSources => Box::new(QtSourcesExport),
        ExportFormat::QtDefines => Box::new(QtDefinesExport::new(build_config)),
        ExportFormat::QtIncludes => Box::new(QtIncludesExport::new(build_config)),
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

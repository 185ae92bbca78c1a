//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use ccsproj::export::{Destination, ExportFormat};
use ccsproj::ops::OutputSpec;
use ccsproj::util::diagnostic::{suggestions, Diagnostic};

/// ccsproj - convert Code Composer Studio projects to Makefiles and qmake fragments
#[derive(Parser, Debug)]
#[command(name = "ccsproj")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file, merged over ./ccsproj.toml and the user config
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Configuration used by qt-defines and qt-includes
    #[arg(long, value_name = "NAME")]
    pub build_config: Option<String>,

    /// Project file to read
    pub input: PathBuf,

    /// Output format and path pairs; a path of `-` writes to stdout
    #[arg(value_name = "FORMAT OUTPUT", num_args = 0..)]
    pub outputs: Vec<String>,
}

impl Cli {
    /// Pair up the trailing arguments into outputs.
    pub fn output_specs(&self) -> Result<Vec<OutputSpec>, Diagnostic> {
        if self.outputs.len() % 2 != 0 {
            return Err(Diagnostic::error(format!(
                "output format `{}` has no output path",
                self.outputs[self.outputs.len() - 1]
            ))
            .with_suggestion(suggestions::USAGE));
        }

        self.outputs
            .chunks(2)
            .map(|pair| {
                let format = pair[0]
                    .parse::<ExportFormat>()
                    .map_err(|e| e.to_diagnostic())?;
                Ok(OutputSpec::new(format, Destination::from_arg(&pair[1])))
            })
            .collect()
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "ccsproj=debug"
        } else if self.quiet {
            "ccsproj=warn"
        } else {
            "ccsproj=info"
        }
    }
}

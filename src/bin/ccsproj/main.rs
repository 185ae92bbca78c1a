//! ccsproj CLI - convert Code Composer Studio projects

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ccsproj::ops::{convert, ConvertError, ConvertOptions};
use ccsproj::parser::ReadError;
use ccsproj::util::config::{global_config_path, load_config, project_config_path, Config};
use ccsproj::util::diagnostic::{emit, suggestions, Diagnostic};

mod cli;

use cli::Cli;

/// Exit code for missing or malformed arguments.
const EXIT_USAGE: i32 = 1;

/// A failed run: what to print and how to exit.
struct Failure {
    code: i32,
    diagnostic: Diagnostic,
}

impl Failure {
    fn usage(diagnostic: Diagnostic) -> Self {
        Failure {
            code: EXIT_USAGE,
            diagnostic,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and exit 0.
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(failure) = run(&cli) {
        emit(&failure.diagnostic, color);
        std::process::exit(failure.code);
    }
}

fn run(cli: &Cli) -> Result<(), Failure> {
    let outputs = cli.output_specs().map_err(Failure::usage)?;

    let config = load_settings(cli).map_err(|e| {
        Failure::usage(
            Diagnostic::error(format!("{:#}", e)).with_suggestion(suggestions::USAGE),
        )
    })?;

    let opts = ConvertOptions {
        input: cli.input.clone(),
        outputs,
        build_config: cli.build_config.clone(),
        makefile: config.makefile,
    };

    convert(&opts).map_err(|e| {
        let mut diagnostic = e.to_diagnostic();
        if let ConvertError::Read(read) = &e {
            if diagnostic.location.is_none() {
                diagnostic = diagnostic.with_location(&cli.input);
            }
            if matches!(read, ReadError::Parse { .. }) && !cli.verbose {
                diagnostic = diagnostic.with_suggestion(suggestions::VERBOSE);
            }
        }
        Failure {
            code: e.exit_code(),
            diagnostic,
        }
    })?;

    Ok(())
}

/// Merge the user config, `./ccsproj.toml` and the `--settings` file.
fn load_settings(cli: &Cli) -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let global = global_config_path();

    let mut config = load_config(global.as_deref(), &project_config_path(&cwd));

    if let Some(path) = &cli.settings {
        config.merge(Config::load(path)?);
    }

    Ok(config)
}

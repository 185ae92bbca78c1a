//! Reading project files from disk.

use std::path::{Path, PathBuf};

use crate::core::project::ProjectSettings;
use crate::parser::errors::ReadError;
use crate::parser::ProjectParser;
use crate::util::encoding::decode_legacy;

/// Loads and parses one project file.
#[derive(Debug, Clone)]
pub struct ProjectReader {
    path: PathBuf,
}

impl ProjectReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProjectReader { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file and parse it into project settings.
    pub fn read(&self) -> Result<ProjectSettings, ReadError> {
        let bytes = std::fs::read(&self.path).map_err(|source| ReadError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("read {} bytes from {}", bytes.len(), self.path.display());

        parse_text(&decode_legacy(&bytes))
    }
}

/// Parse project text that is already in memory.
pub fn parse_text(text: &str) -> Result<ProjectSettings, ReadError> {
    let mut parser = ProjectParser::new();

    for (line, content) in normalized_lines(text)? {
        parser
            .parse_line(content)
            .map_err(|source| ReadError::Parse { line, source })?;
    }

    Ok(parser.into_settings())
}

/// Split text into lines the parser should see, with 1-based line numbers.
///
/// CRLF endings are accepted; any other carriage return is an error.
/// Lines are trimmed of spaces and tabs. Blank lines and `;` comments are
/// dropped.
pub fn normalized_lines(text: &str) -> Result<Vec<(usize, &str)>, ReadError> {
    let mut lines = Vec::new();

    for (index, raw) in text.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);

        if raw.contains('\r') {
            return Err(ReadError::StrayCarriageReturn { line: index + 1 });
        }

        let line = raw.trim_matches([' ', '\t']);

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        lines.push((index + 1, line));
    }

    Ok(lines)
}

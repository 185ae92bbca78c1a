//! Fragments for qmake projects: source list, preprocessor defines and
//! include paths, one entry per line.

use crate::core::project::ProjectSettings;
use crate::export::ProjectExport;
use crate::util::encoding::encode_legacy;

/// Source files of the project.
#[derive(Debug, Clone, Default)]
pub struct QtSourcesExport;

impl ProjectExport for QtSourcesExport {
    fn render(&self, project: &ProjectSettings) -> Vec<u8> {
        let mut out = String::new();
        for source in project.sources() {
            out.push_str(source);
            out.push('\n');
        }
        encode_legacy(&out)
    }
}

/// Defines and undefines of one configuration as preprocessor directives.
#[derive(Debug, Clone)]
pub struct QtDefinesExport {
    config: String,
}

impl QtDefinesExport {
    pub fn new(config: impl Into<String>) -> Self {
        QtDefinesExport {
            config: config.into(),
        }
    }
}

impl ProjectExport for QtDefinesExport {
    fn render(&self, project: &ProjectSettings) -> Vec<u8> {
        let config = project.config_settings(&self.config);
        let mut out = String::new();

        for define in config.defines() {
            match define.split_once('=') {
                Some((name, value)) => out.push_str(&format!("#define {} {}\n", name, value)),
                None => out.push_str(&format!("#define {}\n", define)),
            }
        }
        for undefine in config.undefines() {
            out.push_str(&format!("#undef {}\n", undefine));
        }

        encode_legacy(&out)
    }
}

/// Include paths of one configuration.
#[derive(Debug, Clone)]
pub struct QtIncludesExport {
    config: String,
}

impl QtIncludesExport {
    pub fn new(config: impl Into<String>) -> Self {
        QtIncludesExport {
            config: config.into(),
        }
    }
}

impl ProjectExport for QtIncludesExport {
    fn render(&self, project: &ProjectSettings) -> Vec<u8> {
        let config = project.config_settings(&self.config);
        let mut out = String::new();
        for include in config.include_paths() {
            out.push_str(include);
            out.push('\n');
        }
        encode_legacy(&out)
    }
}

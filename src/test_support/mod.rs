//! Test utilities for ccsproj unit tests.
//!
//! Provides sample project texts and a small builder for assembling
//! [`ProjectSettings`] without going through the parser.

pub mod fixtures;

use crate::core::project::{ProjectSettings, ProjectType};

/// Builder for project settings used by exporter tests.
#[derive(Debug, Default)]
pub struct ProjectBuilder {
    settings: ProjectSettings,
}

impl ProjectBuilder {
    pub fn new(project_type: ProjectType) -> Self {
        let mut settings = ProjectSettings::new();
        settings.set_project_type(project_type);
        ProjectBuilder { settings }
    }

    pub fn tools(mut self, tools: &[&str]) -> Self {
        for tool in tools {
            self.settings.add_tool(tool);
        }
        self
    }

    pub fn sources(mut self, sources: &[&str]) -> Self {
        for source in sources {
            self.settings.add_source(source);
        }
        self
    }

    pub fn config(mut self, name: &str, compiler: &[&str], linker: &[&str]) -> Self {
        let config = self.settings.config_mut(name);
        for option in compiler {
            config.add_compiler_option(option);
        }
        for option in linker {
            config.add_linker_option(option);
        }
        self
    }

    pub fn with(mut self, f: impl FnOnce(&mut ProjectSettings)) -> Self {
        f(&mut self.settings);
        self
    }

    pub fn build(self) -> ProjectSettings {
        self.settings
    }
}

//! Project file parser.
//!
//! The parser is a section-driven state machine. Section headers
//! (`[...]`) switch the state; every other line is a `Key=Value` data line
//! interpreted by the current section.
//!
//! Per-tool and per-file sections (`["X" Settings: "Config"]`) are told
//! apart by looking `X` up in the tools and files declared so far, so the
//! `[Project Settings]` and `[Source Files]` sections must come first. A
//! settings section whose subject was never declared is skipped with a
//! warning.

pub mod errors;
pub mod reader;

use std::sync::LazyLock;

use regex::Regex;

use crate::core::build_step::{BuildCondition, BuildStep};
use crate::core::file_options::FileOptions;
use crate::core::project::{ProjectSettings, ProjectType, Tool};
use crate::util::text::{between, split, split_key_value, starts_with};

pub use errors::{ParseError, ReadError};
pub use reader::ProjectReader;

/// `"Debug" Settings`
static CONFIG_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"]*)"\s+Settings$"#).unwrap());

/// `"Compiler" Settings: "Debug"` or `"src/main.c" Settings: "Debug"`
static SUBJECT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"]*)"\s+Settings:\s*"([^"]*)"$"#).unwrap());

/// Prefix of the only per-file `Options=` value the parser understands.
const FILE_COMPILER_OPTIONS: &str = "\"Compiler\" ";

/// The kind of section the parser is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    /// Before the first header, or inside an unrecognized section
    None,
    ProjectSettings,
    SourceFiles,
    ConfigSettings,
    ToolSettings,
    SourceSettings,
    LibrarySettings,
    CommandSettings,
}

/// Consumes normalized lines and builds a [`ProjectSettings`].
#[derive(Debug)]
pub struct ProjectParser {
    section: SectionType,
    settings: ProjectSettings,

    current_config: String,
    current_tool: String,
    current_file: String,
}

impl Default for ProjectParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectParser {
    pub fn new() -> Self {
        ProjectParser {
            section: SectionType::None,
            settings: ProjectSettings::new(),
            current_config: String::new(),
            current_tool: String::new(),
            current_file: String::new(),
        }
    }

    /// Feed one trimmed, non-blank, non-comment line.
    pub fn parse_line(&mut self, line: &str) -> Result<(), ParseError> {
        match section_name(line) {
            Some(name) => {
                self.parse_section(name);
                Ok(())
            }
            None => self.parse_data(line),
        }
    }

    pub fn section(&self) -> SectionType {
        self.section
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn into_settings(self) -> ProjectSettings {
        self.settings
    }

    /// Reset to the initial state, dropping everything parsed so far.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    // Sections

    fn parse_section(&mut self, name: &str) {
        self.section = self.classify_section(name);

        tracing::debug!("section [{}] -> {:?}", name, self.section);
    }

    /// Decide the section type. The order of the checks matters: a tool
    /// and a file with the same name resolve to the tool.
    fn classify_section(&mut self, name: &str) -> SectionType {
        if name.eq_ignore_ascii_case("Project Settings") {
            return SectionType::ProjectSettings;
        }

        if name.eq_ignore_ascii_case("Source Files") {
            return SectionType::SourceFiles;
        }

        if let Some(caps) = CONFIG_HEADER.captures(name) {
            self.current_config = caps[1].to_string();
            return SectionType::ConfigSettings;
        }

        let Some(caps) = SUBJECT_HEADER.captures(name) else {
            tracing::debug!("skipping section [{}]", name);
            return SectionType::None;
        };

        let subject = &caps[1];
        let settings = &self.settings;

        let section = if settings.tools().contains(subject) {
            self.current_tool = subject.to_string();
            SectionType::ToolSettings
        } else if settings.sources().contains(subject) {
            self.current_file = subject.to_string();
            SectionType::SourceSettings
        } else if settings.libraries().contains(subject) {
            self.current_file = subject.to_string();
            SectionType::LibrarySettings
        } else if settings.commands().contains(subject) {
            self.current_file = subject.to_string();
            SectionType::CommandSettings
        } else {
            tracing::warn!(
                "skipping section [{}]: `{}` is not a declared tool or file",
                name,
                subject
            );
            return SectionType::None;
        };

        self.current_config = caps[2].to_string();
        section
    }

    // Data

    fn parse_data(&mut self, line: &str) -> Result<(), ParseError> {
        let (key, value) = split_key_value(line).ok_or_else(|| ParseError::MalformedLine {
            line: line.to_string(),
        })?;

        match self.section {
            SectionType::None => Ok(()),
            SectionType::ProjectSettings => self.parse_project_settings(key, value),
            SectionType::SourceFiles => self.parse_source_file(key, value),
            SectionType::ConfigSettings => self.parse_config_settings(key, value),
            SectionType::ToolSettings => self.parse_tool_settings(key, value),
            SectionType::SourceSettings
            | SectionType::LibrarySettings
            | SectionType::CommandSettings => self.parse_file_settings(key, value),
        }
    }

    fn parse_project_settings(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        if key.eq_ignore_ascii_case("ProjectType") {
            let project_type: ProjectType =
                value.parse().map_err(|_| ParseError::UnknownProjectType {
                    value: value.to_string(),
                })?;
            self.settings.set_project_type(project_type);
        } else if key.eq_ignore_ascii_case("Tool") {
            self.settings.add_tool(value);
        } else if key.eq_ignore_ascii_case("Config") {
            self.settings.add_config(value);
        } else if key.eq_ignore_ascii_case("CPUFamily") {
            self.settings.set_cpu_family(value);
        } else if key.eq_ignore_ascii_case("ProjectDir") {
            self.settings.set_project_dir(value);
        } else {
            tracing::warn!("unknown Project Settings key `{}`", key);
        }

        Ok(())
    }

    fn parse_source_file(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        if !key.eq_ignore_ascii_case("Source") {
            return Err(ParseError::UnknownSourceKey {
                key: key.to_string(),
            });
        }

        self.settings.add_source(value);
        Ok(())
    }

    fn parse_config_settings(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        let config = self.settings.config_mut(&self.current_config);

        if key.eq_ignore_ascii_case("InitialBuildCmd") {
            config.pre_build_steps_mut().add_str(value);
        } else if key.eq_ignore_ascii_case("FinalBuildCmd") {
            config.post_build_steps_mut().add_str(value);
        } else {
            return Err(ParseError::UnknownConfigKey {
                key: key.to_string(),
                config: self.current_config.clone(),
            });
        }

        Ok(())
    }

    fn parse_tool_settings(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        if !key.eq_ignore_ascii_case("Options") {
            return Err(ParseError::UnknownToolKey {
                key: key.to_string(),
                tool: self.current_tool.clone(),
                config: self.current_config.clone(),
            });
        }

        let tool = Tool::from_name(&self.current_tool).ok_or_else(|| ParseError::UnknownTool {
            tool: self.current_tool.clone(),
        })?;

        let config = self.settings.config_mut(&self.current_config);

        for option in split(value, ' ').iter().filter(|o| !o.is_empty()) {
            match tool {
                Tool::Compiler => config.add_compiler_option(option),
                Tool::Linker => config.add_linker_option(option),
                Tool::Archiver => config.add_archiver_option(option.as_str()),
            }
        }

        Ok(())
    }

    fn parse_file_settings(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        if key.eq_ignore_ascii_case("Options") {
            if !starts_with(value, FILE_COMPILER_OPTIONS, true) {
                return Err(ParseError::UnknownFileOptions {
                    value: value.to_string(),
                    file: self.current_file.clone(),
                    config: self.current_config.clone(),
                });
            }

            let file = self.file_options_mut();

            for option in between(value, "+{", "}").map(tokens).unwrap_or_default() {
                file.add_option_added(option);
            }

            for option in between(value, "-{", "}").map(tokens).unwrap_or_default() {
                file.add_option_removed(option);
            }
        } else if key.eq_ignore_ascii_case("LinkOrder") {
            let order: u32 = value.parse().map_err(|_| ParseError::InvalidLinkOrder {
                value: value.to_string(),
                file: self.current_file.clone(),
                config: self.current_config.clone(),
            })?;
            self.file_options_mut().set_link_order(order);
        } else if key.eq_ignore_ascii_case("Run") {
            let condition = BuildCondition::from_file_label(value).ok_or_else(|| {
                ParseError::InvalidRunCondition {
                    value: value.to_string(),
                    file: self.current_file.clone(),
                    config: self.current_config.clone(),
                }
            })?;
            self.file_options_mut().set_build_condition(condition);
        } else if key.eq_ignore_ascii_case("PreBuildCmd") {
            self.file_options_mut()
                .pre_build_steps_mut()
                .add(BuildStep::parse(value));
        } else if key.eq_ignore_ascii_case("PostBuildCmd") {
            self.file_options_mut()
                .post_build_steps_mut()
                .add(BuildStep::parse(value));
        } else if key.eq_ignore_ascii_case("ExcludeFromBuild") {
            let exclude = if value.eq_ignore_ascii_case("true") {
                true
            } else if value.eq_ignore_ascii_case("false") {
                false
            } else {
                return Err(ParseError::InvalidExcludeFromBuild {
                    value: value.to_string(),
                    file: self.current_file.clone(),
                    config: self.current_config.clone(),
                });
            };
            self.file_options_mut().set_exclude_from_build(exclude);
        } else {
            return Err(ParseError::UnknownFileKey {
                key: key.to_string(),
                file: self.current_file.clone(),
                config: self.current_config.clone(),
            });
        }

        Ok(())
    }

    fn file_options_mut(&mut self) -> &mut FileOptions {
        self.settings
            .config_mut(&self.current_config)
            .file_options_mut(&self.current_file)
    }
}

/// Inner text of a `[...]` header line.
fn section_name(line: &str) -> Option<&str> {
    if line.len() < 2 {
        return None;
    }

    line.strip_prefix('[')?.strip_suffix(']')
}

fn tokens(s: &str) -> Vec<String> {
    split(s, ' ').into_iter().filter(|t| !t.is_empty()).collect()
}

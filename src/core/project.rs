//! Whole-project settings model.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::config_settings::ConfigSettings;
use crate::util::text::ends_with;

/// Declared project type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProjectType {
    #[default]
    Unknown,
    Executable,
    Library,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Unknown => "Unknown",
            ProjectType::Executable => "Executable",
            ProjectType::Library => "Library",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = ProjectTypeParseError;

    /// Case-insensitive; only the two declarable types are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("Executable") {
            Ok(ProjectType::Executable)
        } else if s.eq_ignore_ascii_case("Library") {
            Ok(ProjectType::Library)
        } else {
            Err(ProjectTypeParseError(s.to_string()))
        }
    }
}

/// Error returned when parsing an invalid project type string.
#[derive(Debug, Clone)]
pub struct ProjectTypeParseError(pub String);

impl fmt::Display for ProjectTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid project type '{}', valid values: Executable, Library",
            self.0
        )
    }
}

impl std::error::Error for ProjectTypeParseError {}

/// A build stage that can be enabled per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    Compiler,
    Linker,
    Archiver,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Compiler, Tool::Linker, Tool::Archiver];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Compiler => "Compiler",
            Tool::Linker => "Linker",
            Tool::Archiver => "Archiver",
        }
    }

    /// Look up a tool by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of enabled tools.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolSet(BTreeSet<Tool>);

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tool: Tool) {
        self.0.insert(tool);
    }

    pub fn remove(&mut self, tool: Tool) {
        self.0.remove(&tool);
    }

    pub fn contains(&self, tool: Tool) -> bool {
        self.0.contains(&tool)
    }

    pub fn union(&self, other: &ToolSet) -> ToolSet {
        ToolSet(self.0.union(&other.0).copied().collect())
    }

    pub fn difference(&self, other: &ToolSet) -> ToolSet {
        ToolSet(self.0.difference(&other.0).copied().collect())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tool> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Tool> for ToolSet {
    fn from_iter<T: IntoIterator<Item = Tool>>(iter: T) -> Self {
        ToolSet(iter.into_iter().collect())
    }
}

/// Role of a project file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Anything compiled
    Source,
    /// Precompiled `.lib`
    Library,
    /// Linker command file `.cmd`
    Command,
}

impl FileKind {
    pub fn of(path: &str) -> Self {
        if ends_with(path, ".lib", false) {
            FileKind::Library
        } else if ends_with(path, ".cmd", false) {
            FileKind::Command
        } else {
            FileKind::Source
        }
    }
}

/// Everything known about a project.
///
/// Sources, libraries and command files are disjoint sets; a path is
/// filed by its extension when added. Configurations are keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectSettings {
    project_type: ProjectType,
    cpu_family: String,
    project_dir: String,

    tool_set: ToolSet,
    tools: BTreeSet<String>,

    sources: BTreeSet<String>,
    libraries: BTreeSet<String>,
    commands: BTreeSet<String>,

    configs: BTreeMap<String, ConfigSettings>,
}

impl ProjectSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // Global settings

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn set_project_type(&mut self, project_type: ProjectType) {
        self.project_type = project_type;
    }

    pub fn cpu_family(&self) -> &str {
        &self.cpu_family
    }

    pub fn set_cpu_family(&mut self, cpu_family: impl Into<String>) {
        self.cpu_family = cpu_family.into();
    }

    pub fn project_dir(&self) -> &str {
        &self.project_dir
    }

    pub fn set_project_dir(&mut self, project_dir: impl Into<String>) {
        self.project_dir = project_dir.into();
    }

    // Tools

    /// Enabled tools.
    pub fn tool_set(&self) -> &ToolSet {
        &self.tool_set
    }

    pub fn has_tool(&self, tool: Tool) -> bool {
        self.tool_set.contains(tool)
    }

    /// Declared tool names, including ones that are not recognized.
    pub fn tools(&self) -> &BTreeSet<String> {
        &self.tools
    }

    /// Declare a tool. Unrecognized names are recorded but enable nothing.
    pub fn add_tool(&mut self, name: &str) {
        match Tool::from_name(name) {
            Some(tool) => self.tool_set.insert(tool),
            None => tracing::warn!("unknown tool `{}`", name),
        }

        self.tools.insert(name.to_string());
    }

    pub fn remove_tool(&mut self, name: &str) {
        if let Some(tool) = Tool::from_name(name) {
            self.tool_set.remove(tool);
        }

        self.tools.remove(name);
    }

    pub fn clear_tools(&mut self) {
        self.tool_set.clear();
        self.tools.clear();
    }

    // Files

    pub fn sources(&self) -> &BTreeSet<String> {
        &self.sources
    }

    pub fn libraries(&self) -> &BTreeSet<String> {
        &self.libraries
    }

    pub fn commands(&self) -> &BTreeSet<String> {
        &self.commands
    }

    /// Union of sources, libraries and command files, in path order.
    pub fn all_files(&self) -> BTreeSet<&str> {
        self.sources
            .iter()
            .chain(&self.libraries)
            .chain(&self.commands)
            .map(String::as_str)
            .collect()
    }

    /// Add a file to the set its extension selects.
    pub fn add_source(&mut self, path: &str) {
        let set = match FileKind::of(path) {
            FileKind::Source => &mut self.sources,
            FileKind::Library => &mut self.libraries,
            FileKind::Command => &mut self.commands,
        };

        set.insert(path.to_string());
    }

    pub fn remove_source(&mut self, path: &str) {
        self.sources.remove(path);
        self.libraries.remove(path);
        self.commands.remove(path);
    }

    // Configurations

    /// Configuration names in lexicographic order.
    pub fn configs(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    pub fn config(&self, name: &str) -> Option<&ConfigSettings> {
        self.configs.get(name)
    }

    /// Settings of a configuration, or empty settings if it does not exist.
    pub fn config_settings(&self, name: &str) -> ConfigSettings {
        self.configs.get(name).cloned().unwrap_or_default()
    }

    /// Mutable settings of a configuration, created on first access.
    pub fn config_mut(&mut self, name: &str) -> &mut ConfigSettings {
        self.configs.entry(name.to_string()).or_default()
    }

    /// Declare a configuration. Declaring an existing one keeps its settings.
    pub fn add_config(&mut self, name: &str) {
        self.configs.entry(name.to_string()).or_default();
    }

    pub fn remove_config(&mut self, name: &str) {
        self.configs.remove(name);
    }
}

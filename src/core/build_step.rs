//! Build steps: shell commands run before or after a build.

use std::fmt;

/// Suffix appended to a command that must always run.
const RUN_ALWAYS_SUFFIX: &str = ";Run=Always";

/// Suffix appended to a command that is disabled.
const RUN_NEVER_SUFFIX: &str = ";Run=Never";

/// When a build step (or a file's build) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BuildCondition {
    /// Run only if something was rebuilt (default)
    #[default]
    IfAnyFileBuilds,
    /// Run on every build
    Always,
    /// Never run
    Never,
}

impl BuildCondition {
    /// Every condition, in declaration order.
    pub const ALL: [BuildCondition; 3] = [
        BuildCondition::IfAnyFileBuilds,
        BuildCondition::Always,
        BuildCondition::Never,
    ];

    /// Human-facing label.
    ///
    /// The default condition reads differently depending on whether it is
    /// shown for the whole project or for a single file.
    pub fn label(&self, file: bool) -> &'static str {
        match self {
            BuildCondition::IfAnyFileBuilds if file => "If file builds",
            BuildCondition::IfAnyFileBuilds => "If any file builds",
            BuildCondition::Always => "Always",
            BuildCondition::Never => "Never",
        }
    }

    /// Inverse of [`label`](Self::label) for the file context. Exact match.
    pub fn from_file_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label(true) == label)
    }

    fn suffix(&self) -> Option<&'static str> {
        match self {
            BuildCondition::IfAnyFileBuilds => None,
            BuildCondition::Always => Some(RUN_ALWAYS_SUFFIX),
            BuildCondition::Never => Some(RUN_NEVER_SUFFIX),
        }
    }
}

/// A single command annotated with its run condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BuildStep {
    command: String,
    condition: BuildCondition,
}

impl BuildStep {
    pub fn new(command: impl Into<String>, condition: BuildCondition) -> Self {
        BuildStep {
            command: command.into(),
            condition,
        }
    }

    /// Parse the suffixed form, e.g. `copy a b;Run=Always`.
    pub fn parse(raw: &str) -> Self {
        for condition in [BuildCondition::Always, BuildCondition::Never] {
            if let Some(command) = condition.suffix().and_then(|s| raw.strip_suffix(s)) {
                return BuildStep::new(command, condition);
            }
        }

        BuildStep::new(raw, BuildCondition::IfAnyFileBuilds)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn condition(&self) -> BuildCondition {
        self.condition
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)?;

        if let Some(suffix) = self.condition.suffix() {
            f.write_str(suffix)?;
        }

        Ok(())
    }
}

/// Ordered list of build steps. Insertion order is execution order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildStepList {
    steps: Vec<BuildStep>,
}

impl BuildStepList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, step: BuildStep) {
        self.steps.push(step);
    }

    /// Append a step given in its suffixed string form.
    pub fn add_str(&mut self, raw: &str) {
        self.steps.push(BuildStep::parse(raw));
    }

    /// Remove every step equal to `step`.
    pub fn remove(&mut self, step: &BuildStep) {
        self.steps.retain(|s| s != step);
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BuildStep> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<'a> IntoIterator for &'a BuildStepList {
    type Item = &'a BuildStep;
    type IntoIter = std::slice::Iter<'a, BuildStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl FromIterator<BuildStep> for BuildStepList {
    fn from_iter<T: IntoIterator<Item = BuildStep>>(iter: T) -> Self {
        BuildStepList {
            steps: iter.into_iter().collect(),
        }
    }
}

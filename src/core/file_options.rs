//! Per-file overlay on top of a configuration's options.

use std::collections::BTreeSet;

use crate::core::build_step::{BuildCondition, BuildStepList};

/// Options attached to one source file within one configuration.
///
/// Added/removed compiler options are kept as raw tokens and only applied
/// against the configuration's base options by each exporter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileOptions {
    link_order: Option<u32>,
    exclude_from_build: bool,
    build_condition: BuildCondition,
    options_added: BTreeSet<String>,
    options_removed: BTreeSet<String>,
    pre_build_steps: BuildStepList,
    post_build_steps: BuildStepList,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no overlay is present, i.e. the file needs no settings section.
    pub fn is_default(&self) -> bool {
        self.link_order.is_none()
            && !self.exclude_from_build
            && self.build_condition == BuildCondition::IfAnyFileBuilds
            && self.options_added.is_empty()
            && self.options_removed.is_empty()
            && self.pre_build_steps.is_empty()
            && self.post_build_steps.is_empty()
    }

    pub fn link_order(&self) -> Option<u32> {
        self.link_order
    }

    pub fn set_link_order(&mut self, order: u32) {
        self.link_order = Some(order);
    }

    pub fn remove_link_order(&mut self) {
        self.link_order = None;
    }

    pub fn is_excluded_from_build(&self) -> bool {
        self.exclude_from_build
    }

    pub fn set_exclude_from_build(&mut self, exclude: bool) {
        self.exclude_from_build = exclude;
    }

    pub fn build_condition(&self) -> BuildCondition {
        self.build_condition
    }

    pub fn set_build_condition(&mut self, condition: BuildCondition) {
        self.build_condition = condition;
    }

    pub fn options_added(&self) -> &BTreeSet<String> {
        &self.options_added
    }

    pub fn options_removed(&self) -> &BTreeSet<String> {
        &self.options_removed
    }

    pub fn add_option_added(&mut self, option: impl Into<String>) {
        self.options_added.insert(option.into());
    }

    pub fn add_option_removed(&mut self, option: impl Into<String>) {
        self.options_removed.insert(option.into());
    }

    pub fn remove_option_added(&mut self, option: &str) {
        self.options_added.remove(option);
    }

    pub fn remove_option_removed(&mut self, option: &str) {
        self.options_removed.remove(option);
    }

    pub fn clear_options_added(&mut self) {
        self.options_added.clear();
    }

    pub fn clear_options_removed(&mut self) {
        self.options_removed.clear();
    }

    pub fn pre_build_steps(&self) -> &BuildStepList {
        &self.pre_build_steps
    }

    pub fn pre_build_steps_mut(&mut self) -> &mut BuildStepList {
        &mut self.pre_build_steps
    }

    pub fn post_build_steps(&self) -> &BuildStepList {
        &self.post_build_steps
    }

    pub fn post_build_steps_mut(&mut self) -> &mut BuildStepList {
        &mut self.post_build_steps
    }

    /// Apply this overlay to a base option list.
    ///
    /// Every base option starting with a removed token is dropped, so
    /// `-{-g}` also drops `-gp`. Added tokens are then appended in set order.
    pub fn apply_to(&self, base: &[String]) -> Vec<String> {
        let mut options: Vec<String> = base
            .iter()
            .filter(|o| !self.options_removed.iter().any(|r| o.starts_with(r.as_str())))
            .cloned()
            .collect();

        options.extend(self.options_added.iter().cloned());
        options
    }
}

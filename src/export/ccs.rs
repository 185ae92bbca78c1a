//! Writer for the IDE's own project format.
//!
//! The output parses back into an equal [`ProjectSettings`], so a project
//! can be normalized by reading and re-writing it.

use std::fmt::Write as _;

use crate::core::build_step::BuildCondition;
use crate::core::config_settings::ConfigSettings;
use crate::core::project::{ProjectSettings, ProjectType, Tool};
use crate::export::ProjectExport;
use crate::util::encoding::encode_legacy;
use crate::util::text::join;

const HEADER: &str =
    "; Code Composer Project File, Version 2.0 (do not modify or remove this line)";

/// Renders a project in the IDE project format.
#[derive(Debug, Clone, Default)]
pub struct CcsExport;

impl ProjectExport for CcsExport {
    fn render(&self, project: &ProjectSettings) -> Vec<u8> {
        let mut out = String::new();
        write_project(&mut out, project);
        encode_legacy(&out)
    }
}

fn entry(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "{}={}", key, value);
}

fn quoted_entry(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "{}=\"{}\"", key, value);
}

fn write_project(out: &mut String, project: &ProjectSettings) {
    out.push_str(HEADER);
    out.push_str("\n\n");

    out.push_str("[Project Settings]\n");
    quoted_entry(out, "ProjectDir", project.project_dir());
    if project.project_type() != ProjectType::Unknown {
        entry(out, "ProjectType", project.project_type().as_str());
    }
    entry(out, "CPUFamily", project.cpu_family());
    for tool in project.tools() {
        quoted_entry(out, "Tool", tool);
    }
    for config in project.configs() {
        quoted_entry(out, "Config", config);
    }
    out.push('\n');

    out.push_str("[Source Files]\n");
    let files = project
        .libraries()
        .iter()
        .chain(project.sources())
        .chain(project.commands());
    for file in files {
        quoted_entry(out, "Source", file);
    }
    out.push('\n');

    for name in project.configs() {
        let _ = writeln!(out, "[\"{}\" Settings]", name);
        let config = project.config_settings(name);
        for step in config.pre_build_steps() {
            entry(out, "InitialBuildCmd", &step.to_string());
        }
        for step in config.post_build_steps() {
            entry(out, "FinalBuildCmd", &step.to_string());
        }
        out.push('\n');
    }

    let tool_options: [(Tool, fn(&ConfigSettings) -> Vec<String>); 3] = [
        (Tool::Compiler, ConfigSettings::compiler_flags),
        (Tool::Linker, ConfigSettings::linker_flags),
        (Tool::Archiver, |config| config.archiver_options().to_vec()),
    ];
    for (tool, options) in tool_options {
        if !project.has_tool(tool) {
            continue;
        }
        for name in project.configs() {
            let config = project.config_settings(name);
            let _ = writeln!(out, "[\"{}\" Settings: \"{}\"]", tool, name);
            entry(out, "Options", &join(options(&config), ' '));
            out.push('\n');
        }
    }

    for name in project.configs() {
        let config = project.config_settings(name);
        for file in project.all_files() {
            write_file_section(out, name, file, &config);
        }
    }
}

fn write_file_section(out: &mut String, config_name: &str, file: &str, config: &ConfigSettings) {
    let overlay = config.file_options(file);
    if overlay.is_default() {
        return;
    }

    let _ = writeln!(out, "[\"{}\" Settings: \"{}\"]", file, config_name);

    let added = overlay.options_added();
    let removed = overlay.options_removed();
    if !added.is_empty() || !removed.is_empty() {
        let mut options = vec!["\"Compiler\"".to_string()];
        if !added.is_empty() {
            options.push(format!("+{{{}}}", join(added, ' ')));
        }
        if !removed.is_empty() {
            options.push(format!("-{{{}}}", join(removed, ' ')));
        }
        entry(out, "Options", &join(&options, ' '));
    }

    if let Some(order) = overlay.link_order() {
        entry(out, "LinkOrder", &order.to_string());
    }

    if overlay.is_excluded_from_build() {
        entry(out, "ExcludeFromBuild", "true");
    }

    if overlay.build_condition() != BuildCondition::IfAnyFileBuilds {
        quoted_entry(out, "Run", overlay.build_condition().label(true));
    }

    for step in overlay.pre_build_steps() {
        entry(out, "PreBuildCmd", &step.to_string());
    }
    for step in overlay.post_build_steps() {
        entry(out, "PostBuildCmd", &step.to_string());
    }

    out.push('\n');
}

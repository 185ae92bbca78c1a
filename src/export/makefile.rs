//! GNU Makefile exporter.
//!
//! The generated Makefile builds every configuration of the project into a
//! directory named after it. Each configuration gets its own block of
//! variables and rules, in this order:
//!
//! 1. compiler variables (`INCLUDES_`, `DEFINES_`, `UNDEFINES_` and the
//!    derived `IFLAGS_`, `DFLAGS_`, `UFLAGS_`)
//! 2. linker variables and the link rule
//! 3. the pre-build and post-build marker targets
//! 4. one compile rule per object file
//! 5. a `check_<config>` rule asserting that every `%NAME%` variable
//!    referenced by the configuration is set
//!
//! `%NAME%` placeholders are rewritten to `$(NAME)` and Windows path
//! separators to `/`. Build step commands are transcoded from
//! Windows-1251 to UTF-8; everything else is written back in the legacy
//! single-byte form it was read in.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::build_step::{BuildCondition, BuildStep};
use crate::core::config_settings::{without_option, ConfigSettings, INCLUDE_FLAG, LIBRARY_FLAG};
use crate::core::project::{ProjectSettings, Tool};
use crate::export::ProjectExport;
use crate::util::config::MakefileConfig;
use crate::util::encoding::{cp1251_to_utf8, encode_legacy};
use crate::util::text::{basename, join, strip_extension, to_option};

/// Width of banner comments.
const BANNER_WIDTH: usize = 80;

/// Makefile name used when the output is not a named file.
const DEFAULT_MAKEFILE_NAME: &str = "Makefile";

/// Renders a project as a GNU Makefile.
#[derive(Debug, Clone)]
pub struct MakefileExport {
    config: MakefileConfig,
    target: String,
    makefile_name: String,
}

impl MakefileExport {
    pub fn new(config: MakefileConfig) -> Self {
        MakefileExport {
            config,
            target: String::new(),
            makefile_name: DEFAULT_MAKEFILE_NAME.to_string(),
        }
    }

    /// Derive the build target name from a path: its basename with the
    /// final extension stripped.
    pub fn with_target(mut self, path: &str) -> Self {
        self.target = strip_extension(basename(path)).to_string();
        self
    }

    /// Name the Makefile refers to itself by (`$(MAKEFILE)`).
    pub fn with_makefile_name(mut self, path: &str) -> Self {
        self.makefile_name = basename(path).to_string();
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    fn object_name(&self, source: &str) -> String {
        let name = basename(source);
        if name.contains('.') {
            format!("{}.{}", strip_extension(name), self.config.object_extension())
        } else {
            name.to_string()
        }
    }
}

impl ProjectExport for MakefileExport {
    fn render(&self, project: &ProjectSettings) -> Vec<u8> {
        let mut out = MakefileWriter::new(self.config.name_width());
        let compiler = project.has_tool(Tool::Compiler);
        let linker = project.has_tool(Tool::Linker);
        let archiver = project.has_tool(Tool::Archiver);

        out.assign("TARGET", &self.target);
        out.assign("MAKEFILE", &self.makefile_name);
        out.assign("Proj_dir", "$(CURDIR)");
        out.blank();

        if compiler {
            out.assign("CC", self.config.compiler());
        }
        if linker {
            out.assign("LD", self.config.linker());
        }
        if archiver {
            out.assign("AR", self.config.archiver());
        }
        out.blank();

        // Object list keeps one entry per source; rules go to the last
        // source that maps to a given object name, in source order.
        let objects: Vec<String> = project
            .sources()
            .iter()
            .map(|source| self.object_name(source))
            .collect();
        let last_source: BTreeMap<&str, &str> = objects
            .iter()
            .zip(project.sources())
            .map(|(object, source)| (object.as_str(), source.as_str()))
            .collect();
        let object_sources: Vec<(&str, &str)> = objects
            .iter()
            .zip(project.sources())
            .map(|(object, source)| (object.as_str(), source.as_str()))
            .filter(|(object, source)| last_source.get(object) == Some(source))
            .collect();

        out.assign("SOURCES", &fix_variables(&join(project.sources(), ' ')));
        out.assign("OBJECTS", &join(&objects, ' '));
        out.blank();

        for name in project.configs() {
            out.assign(&format!("OBJDIR_{}", name.to_ascii_uppercase()), name);
        }
        out.blank();

        for name in project.configs() {
            let config = project.config_settings(name);
            let excluded: Vec<String> = object_sources
                .iter()
                .filter(|(_, source)| config.file_options(source).is_excluded_from_build())
                .map(|(object, _)| format!("{}/{}", name, object))
                .collect();

            let all_objects = format!("$(addprefix {}/,$(OBJECTS))", name);
            let value = if excluded.is_empty() {
                all_objects
            } else {
                format!("$(filter-out {},{})", join(&excluded, ' '), all_objects)
            };
            out.assign(&format!("OBJECTS_{}", name.to_ascii_uppercase()), &value);
        }
        out.blank();

        let mut phony = vec![
            "all".to_string(),
            "clean".to_string(),
            "check".to_string(),
        ];
        for name in project.configs() {
            let lower = name.to_ascii_lowercase();
            phony.push(lower.clone());
            if compiler {
                phony.push(format!("obj_{}", lower));
            }
            phony.push(format!("pre_{}", lower));
            phony.push(format!("post_{}", lower));
            phony.push(format!("check_{}", lower));
        }
        out.line(&format!(".PHONY: {}", join(&phony, ' ')));
        out.blank();

        let lower_configs: Vec<String> = project.configs().map(str::to_ascii_lowercase).collect();
        out.line(&format!("all: {}", join(&lower_configs, ' ')));
        out.blank();
        out.line("clean:");
        out.line(&format!("\trm -rf {}", join(project.configs(), ' ')));
        out.blank();

        for name in project.configs() {
            tracing::debug!("exporting configuration `{}` to Makefile", name);

            let config = project.config_settings(name);
            let block = ConfigBlock {
                name,
                lower: name.to_ascii_lowercase(),
                upper: name.to_ascii_uppercase(),
                config: &config,
            };

            out.banner(1, name);

            if compiler {
                block.write_compiler_variables(&mut out);
            }
            if linker {
                block.write_link(&mut out, project);
            }
            block.write_prebuild(&mut out);
            block.write_postbuild(&mut out);
            if compiler {
                block.write_objects(&mut out, &object_sources);
            }
            block.write_checks(&mut out);
        }

        out.banner(1, "Checks");
        out.line("check:");
        for variable in self.config.required_variables() {
            out.line(&format!(
                "\t@echo 'check {0}' && test -n '$({0})'",
                variable
            ));
        }
        let tool_checks = [(compiler, "CC"), (linker, "LD"), (archiver, "AR")];
        for (enabled, tool) in tool_checks {
            if enabled {
                out.line(&format!(
                    "\t@echo 'check {0} executable' && which $(firstword $({0})) > /dev/null",
                    tool
                ));
            }
        }
        out.blank();

        out.finish()
    }
}

/// Emission of the rules of one configuration.
struct ConfigBlock<'a> {
    name: &'a str,
    lower: String,
    upper: String,
    config: &'a ConfigSettings,
}

impl ConfigBlock<'_> {
    fn var(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.upper)
    }

    fn write_compiler_variables(&self, out: &mut MakefileWriter) {
        let u = &self.upper;

        out.banner(3, "Compiler options");
        out.assign(
            &self.var("INCLUDES_"),
            &fix_variables(&join(self.config.include_paths(), ' ')),
        );
        out.assign(&self.var("DEFINES_"), &join(self.config.defines(), ' '));
        out.assign(&self.var("UNDEFINES_"), &join(self.config.undefines(), ' '));
        out.blank();

        out.assign(
            &self.var("IFLAGS_"),
            &format!("$(addsuffix \",$(addprefix -i\",$(INCLUDES_{})))", u),
        );
        out.assign(
            &self.var("DFLAGS_"),
            &format!("$(addsuffix \",$(addprefix -d\",$(DEFINES_{})))", u),
        );
        out.assign(
            &self.var("UFLAGS_"),
            &format!("$(addsuffix \",$(addprefix -u\",$(UNDEFINES_{})))", u),
        );
        out.blank();
    }

    fn write_link(&self, out: &mut MakefileWriter, project: &ProjectSettings) {
        let u = &self.upper;

        out.banner(3, "Linker options");
        out.assign(&self.var("MEM_"), &fix_variables(&join(project.commands(), ' ')));
        out.assign(&self.var("LIBS_"), &fix_variables(&join(project.libraries(), ' ')));
        out.blank();

        let map = self
            .config
            .linker_option("-m")
            .unwrap_or_else(|| format!("./$(OBJDIR_{})/$(TARGET).map", u));
        let output = self
            .config
            .linker_option("-o")
            .unwrap_or_else(|| format!("./$(OBJDIR_{})/$(TARGET).out", u));
        out.assign(&self.var("MAP_"), &fix_variables(&map));
        out.assign(&self.var("OUT_"), &fix_variables(&output));
        out.blank();

        out.assign(&format!("OUT_{}_DIR", u), &format!("$(dir $(OUT_{}))", u));
        out.blank();

        let mut flags: Vec<String> = self
            .config
            .library_paths()
            .iter()
            .map(|path| to_option(INCLUDE_FLAG, &fix_variables(path), true))
            .chain(
                self.config
                    .libraries()
                    .iter()
                    .map(|library| to_option(LIBRARY_FLAG, &fix_variables(library), true)),
            )
            .collect();
        let options = without_option(self.config.linker_options(), "-m");
        flags.extend(without_option(&options, "-o"));
        flags.push("-m".to_string());
        flags.push(format!("$(MAP_{})", u));
        flags.push("-o".to_string());
        flags.push(format!("$(OUT_{})", u));
        out.assign(&self.var("LDFLAGS_"), &join(&flags, ' '));
        out.blank();

        out.banner(5, "Link");
        out.line(&format!("{}: $(OUT_{})", self.lower, u));
        out.blank();
        out.line(&format!(
            "$(OUT_{0}): $(MEM_{0}) $(OBJDIR_{0})/pre_build $(OBJECTS_{0}) $(LIBS_{0})",
            u
        ));
        out.line(&format!("\tmkdir -p $(OUT_{}_DIR)", u));
        out.line(&format!(
            "\t$(LD) $(LDFLAGS_{0}) $(MEM_{0}) $(OBJECTS_{0}) $(LIBS_{0})",
            u
        ));
        out.blank();
    }

    fn write_prebuild(&self, out: &mut MakefileWriter) {
        let u = &self.upper;

        out.banner(2, "Prebuild");
        out.line(&format!("pre_{}: $(OBJDIR_{})/pre_build", self.lower, u));
        out.blank();
        out.line(&format!(
            "$(OBJDIR_{0})/pre_build: $(MEM_{0}) $(SOURCES) $(LIBS_{0}) $(MAKEFILE)",
            u
        ));
        out.line(&format!("\tmkdir -p $(OBJDIR_{})", u));
        for step in self.config.pre_build_steps() {
            out.step(step);
        }
        out.line("\ttouch $@");
        out.blank();
    }

    fn write_postbuild(&self, out: &mut MakefileWriter) {
        let u = &self.upper;

        out.banner(2, "Postbuild");
        out.line(&format!("post_{}: $(OBJDIR_{})/post_build", self.lower, u));
        out.blank();
        out.line(&format!("$(OBJDIR_{0})/post_build: $(OUT_{0}) $(MAKEFILE)", u));
        for step in self.config.post_build_steps() {
            out.step(step);
        }
        out.line("\ttouch $@");
        out.blank();
    }

    fn write_objects(&self, out: &mut MakefileWriter, object_sources: &[(&str, &str)]) {
        let u = &self.upper;

        out.banner(2, "Object files");
        out.line(&format!("obj_{}: $(OBJECTS_{})", self.lower, u));
        out.blank();
        out.line(&format!("$(OBJDIR_{}):", u));
        out.line("\tmkdir -p $@");
        out.blank();

        for &(object, source) in object_sources {
            let overlay = self.config.file_options(source);
            if overlay.is_excluded_from_build() {
                tracing::debug!("{}: `{}` excluded from build", self.name, source);
                continue;
            }

            let mut options = without_option(&overlay.apply_to(self.config.compiler_options()), "-fr");
            options.push(format!("-fr $(OBJDIR_{})", u));

            let source = fix_variables(source);
            out.line(&format!("$(OBJDIR_{})/{}: {} $(MAKEFILE)", u, object, source));
            out.line(&format!(
                "\t$(CC) {1} $(IFLAGS_{0}) $(DFLAGS_{0}) $(UFLAGS_{0}) {2}",
                u,
                join(&options, ' '),
                source
            ));
            out.blank();
        }
    }

    fn write_checks(&self, out: &mut MakefileWriter) {
        let steps = self
            .config
            .pre_build_steps()
            .iter()
            .chain(self.config.post_build_steps())
            .map(BuildStep::command);

        let mut variables = BTreeSet::new();
        collect_variables(&mut variables, self.config.include_paths());
        collect_variables(&mut variables, self.config.defines());
        collect_variables(&mut variables, self.config.undefines());
        collect_variables(&mut variables, self.config.compiler_options());
        collect_variables(&mut variables, self.config.library_paths());
        collect_variables(&mut variables, self.config.libraries());
        collect_variables(&mut variables, self.config.linker_options());
        collect_variables(&mut variables, self.config.archiver_options());
        collect_variables(&mut variables, steps);

        out.banner(2, "Checks");
        out.line(&format!("check_{}: check", self.lower));
        for variable in &variables {
            out.line(&format!(
                "\t@echo 'check {0} variable' && test -n \"$({0})\" > /dev/null",
                variable
            ));
        }
        out.blank();
    }
}

/// Line-oriented output buffer.
struct MakefileWriter {
    buf: Vec<u8>,
    name_width: usize,
}

impl MakefileWriter {
    fn new(name_width: usize) -> Self {
        MakefileWriter {
            buf: Vec::new(),
            name_width,
        }
    }

    fn line(&mut self, text: &str) {
        self.buf.extend(encode_legacy(text));
        self.buf.push(b'\n');
    }

    fn blank(&mut self) {
        self.buf.push(b'\n');
    }

    /// `NAME := value`, with the name padded to the column width.
    fn assign(&mut self, name: &str, value: &str) {
        let padding = self.name_width.saturating_sub(name.len()).max(1);
        self.line(&format!("{}{}:= {}", name, " ".repeat(padding), value));
    }

    /// A build step recipe line. Steps that never run are left out.
    fn step(&mut self, step: &BuildStep) {
        if step.condition() == BuildCondition::Never {
            return;
        }
        let command = fix_variables(&cp1251_to_utf8(step.command()));
        self.buf.push(b'\t');
        self.buf.extend(command.as_bytes());
        self.buf.push(b'\n');
    }

    fn banner(&mut self, level: u8, name: &str) {
        match level {
            1 => {
                self.banner_line('=', "");
                self.banner_line('=', name);
                self.banner_line('=', "");
            }
            2 => {
                self.banner_line('=', "");
                self.banner_line('-', name);
                self.banner_line('=', "");
            }
            3 => {
                self.banner_line('-', "");
                self.banner_line('=', name);
                self.banner_line('-', "");
            }
            4 => {
                self.banner_line('-', "");
                self.banner_line('-', name);
                self.banner_line('-', "");
            }
            5 => self.banner_line('=', name),
            _ => self.banner_line('-', name),
        }
        self.blank();
    }

    fn banner_line(&mut self, fill: char, name: &str) {
        let mut text = String::from("### ");
        if !name.is_empty() {
            text.push_str(name);
            text.push(' ');
        }
        let width = text.chars().count();
        text.extend(std::iter::repeat(fill).take(BANNER_WIDTH.saturating_sub(width)));
        self.line(&text);
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Rewrite `%NAME%` to `$(NAME)` and `\` to `/`.
///
/// Percent signs alternate between opening and closing a reference, so an
/// unbalanced trailing `%` opens a reference that is never closed.
pub fn fix_variables(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut open = false;

    for c in s.chars() {
        match c {
            '%' if !open => {
                result.push_str("$(");
                open = true;
            }
            '%' => {
                result.push(')');
                open = false;
            }
            '\\' => result.push('/'),
            c => result.push(c),
        }
    }

    result
}

/// Collect the names of `%NAME%` references from a list of options.
///
/// Each option is scanned on its own; a reference left open at the end of
/// an option is discarded, as are empty names (`%%`).
pub fn collect_variables<I, S>(variables: &mut BTreeSet<String>, options: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for option in options {
        let mut name = String::new();
        let mut open = false;

        for c in option.as_ref().chars() {
            if c != '%' {
                if open {
                    name.push(c);
                }
                continue;
            }

            if open && !name.is_empty() {
                variables.insert(std::mem::take(&mut name));
            }
            name.clear();
            open = !open;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project::ProjectType;
    use crate::parser::reader::parse_text;
    use crate::test_support::fixtures::{two_source_project, SAMPLE_PROJECT};
    use crate::test_support::ProjectBuilder;

    fn render(project: &ProjectSettings) -> String {
        let exporter = MakefileExport::new(MakefileConfig::default())
            .with_target("out/app.mk")
            .with_makefile_name("out/app.mk");
        String::from_utf8(exporter.render(project)).unwrap()
    }

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_target_strips_final_extension() {
        let exporter = MakefileExport::new(MakefileConfig::default());
        assert_eq!(exporter.clone().with_target("build/app.out.mk").target(), "app.out");
        assert_eq!(exporter.clone().with_target("build\\Makefile").target(), "Makefile");
        assert_eq!(exporter.with_target("app.mk").target(), "app");
    }

    #[test]
    fn test_object_list_replaces_extension() {
        let text = render(&two_source_project());
        assert!(lines(&text).contains(&"OBJECTS             := a.obj b.obj"));
        assert!(text.contains("$(OBJDIR_DEBUG)/a.obj: a.c $(MAKEFILE)\n"));
        assert!(text.contains("$(OBJDIR_DEBUG)/b.obj: b.c $(MAKEFILE)\n"));
    }

    #[test]
    fn test_header_variables() {
        let text = render(&two_source_project());
        let lines = lines(&text);
        assert_eq!(lines[0], "TARGET              := app");
        assert_eq!(lines[1], "MAKEFILE            := app.mk");
        assert_eq!(lines[2], "Proj_dir            := $(CURDIR)");
        assert_eq!(lines[4], "CC                  := cl6x");
        assert_eq!(lines[5], "LD                  := cl6x -z");
        assert!(!text.contains("AR                  :="));
    }

    #[test]
    fn test_long_variable_names_keep_one_space() {
        let mut out = MakefileWriter::new(20);
        out.assign("LDFLAGS_VERYLONGCONFIGNAME", "-c");
        assert_eq!(out.finish(), b"LDFLAGS_VERYLONGCONFIGNAME := -c\n".to_vec());
    }

    #[test]
    fn test_configured_tools_and_object_extension() {
        let config = MakefileConfig {
            compiler: Some("cl2000".to_string()),
            object_extension: Some("o".to_string()),
            required_variables: Some(vec!["C2000_DIR".to_string()]),
            ..MakefileConfig::default()
        };
        let exporter = MakefileExport::new(config).with_target("app");
        let text = String::from_utf8(exporter.render(&two_source_project())).unwrap();

        assert!(text.contains("CC                  := cl2000\n"));
        assert!(text.contains("OBJECTS             := a.o b.o\n"));
        assert!(text.contains("\t@echo 'check C2000_DIR' && test -n '$(C2000_DIR)'\n"));
        assert!(!text.contains("C6X_C_DIR"));
    }

    #[test]
    fn test_colliding_basenames_share_one_rule() {
        let project = ProjectBuilder::new(ProjectType::Executable)
            .tools(&["Compiler"])
            .sources(&["one/util.c", "two/util.c"])
            .config("Debug", &[], &[])
            .build();
        let text = render(&project);

        assert!(text.contains("OBJECTS             := util.obj util.obj\n"));
        assert_eq!(text.matches("$(OBJDIR_DEBUG)/util.obj:").count(), 1);
        assert!(text.contains("$(OBJDIR_DEBUG)/util.obj: two/util.c $(MAKEFILE)\n"));
    }

    #[test]
    fn test_compile_rules_follow_source_order() {
        let project = ProjectBuilder::new(ProjectType::Executable)
            .tools(&["Compiler"])
            .sources(&["z/a.c", "b.c"])
            .config("Debug", &[], &[])
            .build();
        let text = render(&project);

        assert!(text.contains("OBJECTS             := b.obj a.obj\n"));
        let b = text.find("$(OBJDIR_DEBUG)/b.obj: b.c").unwrap();
        let a = text.find("$(OBJDIR_DEBUG)/a.obj: z/a.c").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_removed_overlay_option_drops_prefixed_base_options() {
        let project = ProjectBuilder::new(ProjectType::Executable)
            .tools(&["Compiler"])
            .sources(&["a.c"])
            .config("Debug", &["-gp", "-mv6400"], &[])
            .with(|p| {
                let file = p.config_mut("Debug").file_options_mut("a.c");
                file.add_option_removed("-g");
                file.add_option_added("-o0");
            })
            .build();
        let text = render(&project);

        assert!(text.contains(
            "\t$(CC) -mv6400 -o0 -fr $(OBJDIR_DEBUG) $(IFLAGS_DEBUG) $(DFLAGS_DEBUG) $(UFLAGS_DEBUG) a.c\n"
        ));
    }

    #[test]
    fn test_library_tokens_are_rewritten_and_checked() {
        let project = ProjectBuilder::new(ProjectType::Executable)
            .tools(&["Linker"])
            .config("Debug", &[], &["-c", "-i\"%LIBDIR%\\lib\"", "-l\"%RTS%.lib\""])
            .build();
        let text = render(&project);

        assert!(text.contains(
            "LDFLAGS_DEBUG       := -i\"$(LIBDIR)/lib\" -l\"$(RTS).lib\" -c -m $(MAP_DEBUG) -o $(OUT_DEBUG)\n"
        ));
        assert!(text.contains(
            "check_debug: check\n\
             \t@echo 'check LIBDIR variable' && test -n \"$(LIBDIR)\" > /dev/null\n\
             \t@echo 'check RTS variable' && test -n \"$(RTS)\" > /dev/null\n\n"
        ));
    }

    #[test]
    fn test_config_blocks_follow_fixed_order() {
        let settings = parse_text(SAMPLE_PROJECT).unwrap();
        let text = render(&settings);

        let debug = text.find("### Debug ").unwrap();
        let release = text.find("### Release ").unwrap();
        let block = &text[debug..release];

        let positions: Vec<usize> = [
            "### Compiler options ",
            "### Linker options ",
            "### Link ",
            "### Prebuild ",
            "### Postbuild ",
            "### Object files ",
            "### Checks ",
        ]
        .iter()
        .map(|banner| block.find(banner).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(release < text.rfind("### Checks ").unwrap());
    }

    #[test]
    fn test_phony_and_main_targets() {
        let settings = parse_text(SAMPLE_PROJECT).unwrap();
        let text = render(&settings);

        assert!(text.contains(
            ".PHONY: all clean check debug obj_debug pre_debug post_debug check_debug \
             release obj_release pre_release post_release check_release\n"
        ));
        assert!(text.contains("all: debug release\n\nclean:\n\trm -rf Debug Release\n"));
    }

    #[test]
    fn test_compiler_variables() {
        let settings = parse_text(SAMPLE_PROJECT).unwrap();
        let text = render(&settings);

        assert!(text.contains("INCLUDES_DEBUG      := ../inc $(C6X_C_DIR)/include\n"));
        assert!(text.contains("DEFINES_DEBUG       := _DEBUG\n"));
        assert!(text.contains(
            "IFLAGS_DEBUG        := $(addsuffix \",$(addprefix -i\",$(INCLUDES_DEBUG)))\n"
        ));
        assert!(text.contains(
            "UFLAGS_DEBUG        := $(addsuffix \",$(addprefix -u\",$(UNDEFINES_DEBUG)))\n"
        ));
    }

    #[test]
    fn test_map_and_output_come_from_linker_options() {
        let settings = parse_text(SAMPLE_PROJECT).unwrap();
        let text = render(&settings);

        assert!(text.contains("MAP_DEBUG           := ./Debug/app.map\n"));
        assert!(text.contains("OUT_DEBUG           := ./Debug/app.out\n"));
        assert!(text.contains("LDFLAGS_DEBUG       := -c -w -x -m $(MAP_DEBUG) -o $(OUT_DEBUG)\n"));
        assert!(text.contains("MEM_DEBUG           := link.cmd\n"));
        assert!(text.contains("LIBS_DEBUG          := lib/rts6400.lib\n"));
    }

    #[test]
    fn test_map_and_output_defaults() {
        let text = render(&two_source_project());

        assert!(text.contains("MAP_DEBUG           := ./$(OBJDIR_DEBUG)/$(TARGET).map\n"));
        assert!(text.contains("OUT_DEBUG           := ./$(OBJDIR_DEBUG)/$(TARGET).out\n"));
        assert!(text.contains("LDFLAGS_DEBUG       := -c -m $(MAP_DEBUG) -o $(OUT_DEBUG)\n"));
        assert!(text.contains("OUT_DEBUG_DIR       := $(dir $(OUT_DEBUG))\n"));
    }

    #[test]
    fn test_compile_rule_applies_file_overlay() {
        let settings = parse_text(SAMPLE_PROJECT).unwrap();
        let text = render(&settings);

        assert!(text.contains(
            "$(OBJDIR_RELEASE)/dsp.obj: src/dsp.c $(MAKEFILE)\n\
             \t$(CC) -mv6400 -o2 -fr $(OBJDIR_RELEASE) $(IFLAGS_RELEASE) $(DFLAGS_RELEASE) $(UFLAGS_RELEASE) src/dsp.c\n"
        ));
        assert!(text.contains(
            "\t$(CC) -o3 -mv6400 -fr $(OBJDIR_RELEASE) $(IFLAGS_RELEASE) $(DFLAGS_RELEASE) $(UFLAGS_RELEASE) src/main.c\n"
        ));
        assert!(text.contains(
            "\t$(CC) -g -mv6400 -fr $(OBJDIR_DEBUG) $(IFLAGS_DEBUG) $(DFLAGS_DEBUG) $(UFLAGS_DEBUG) src/dsp.c\n"
        ));
    }

    #[test]
    fn test_build_steps_are_rewritten() {
        let settings = parse_text(SAMPLE_PROJECT).unwrap();
        let text = render(&settings);

        assert!(text.contains(
            "$(OBJDIR_DEBUG)/pre_build: $(MEM_DEBUG) $(SOURCES) $(LIBS_DEBUG) $(MAKEFILE)\n\
             \tmkdir -p $(OBJDIR_DEBUG)\n\
             \techo start $(BUILD_ID)\n\
             \ttouch $@\n"
        ));
        assert!(text.contains(
            "$(OBJDIR_DEBUG)/post_build: $(OUT_DEBUG) $(MAKEFILE)\n\
             \tcopy Debug/app.out $(DEPLOY_DIR)\n\
             \ttouch $@\n"
        ));
    }

    #[test]
    fn test_never_steps_are_skipped() {
        let mut project = two_source_project();
        let steps = project.config_mut("Debug").pre_build_steps_mut();
        steps.add_str("echo skipped;Run=Never");
        steps.add_str("echo kept");
        let text = render(&project);

        assert!(text.contains("\techo kept\n"));
        assert!(!text.contains("echo skipped"));
    }

    #[test]
    fn test_build_steps_are_transcoded() {
        let project = ProjectBuilder::new(ProjectType::Executable)
            .tools(&["Compiler"])
            .with(|p| {
                // "echo Привет" as decoded from Windows-1251 bytes
                let raw: Vec<u8> = b"echo \xcf\xf0\xe8\xe2\xe5\xf2\x98".to_vec();
                let command = crate::util::encoding::decode_legacy(&raw);
                p.config_mut("Debug").pre_build_steps_mut().add_str(&command);
            })
            .build();
        let text = render(&project);

        assert!(text.contains("\techo Привет\n"));
    }

    #[test]
    fn test_excluded_files_are_filtered() {
        let project = ProjectBuilder::new(ProjectType::Executable)
            .tools(&["Compiler", "Linker"])
            .sources(&["a.c", "b.c"])
            .config("Debug", &[], &[])
            .with(|p| {
                p.config_mut("Debug")
                    .file_options_mut("b.c")
                    .set_exclude_from_build(true);
            })
            .build();
        let text = render(&project);

        assert!(text.contains(
            "OBJECTS_DEBUG       := $(filter-out Debug/b.obj,$(addprefix Debug/,$(OBJECTS)))\n"
        ));
        assert!(text.contains("$(OBJDIR_DEBUG)/a.obj:"));
        assert!(!text.contains("$(OBJDIR_DEBUG)/b.obj:"));
    }

    #[test]
    fn test_config_check_lists_referenced_variables() {
        let settings = parse_text(SAMPLE_PROJECT).unwrap();
        let text = render(&settings);

        assert!(text.contains(
            "check_debug: check\n\
             \t@echo 'check BUILD_ID variable' && test -n \"$(BUILD_ID)\" > /dev/null\n\
             \t@echo 'check C6X_C_DIR variable' && test -n \"$(C6X_C_DIR)\" > /dev/null\n\
             \t@echo 'check DEPLOY_DIR variable' && test -n \"$(DEPLOY_DIR)\" > /dev/null\n\n"
        ));
        assert!(text.contains("check_release: check\n\n"));
    }

    #[test]
    fn test_global_check_rule() {
        let settings = parse_text(SAMPLE_PROJECT).unwrap();
        let text = render(&settings);

        assert!(text.ends_with(
            "check:\n\
             \t@echo 'check C6X_C_DIR' && test -n '$(C6X_C_DIR)'\n\
             \t@echo 'check CC executable' && which $(firstword $(CC)) > /dev/null\n\
             \t@echo 'check LD executable' && which $(firstword $(LD)) > /dev/null\n\n"
        ));
    }

    #[test]
    fn test_no_compiler_means_no_object_rules() {
        let project = ProjectBuilder::new(ProjectType::Library)
            .tools(&["Archiver"])
            .sources(&["a.c"])
            .config("Debug", &[], &[])
            .build();
        let text = render(&project);

        assert!(text.contains("AR                  := ar6x\n"));
        assert!(!text.contains("### Object files"));
        assert!(!text.contains("### Compiler options"));
        assert!(!text.contains("obj_debug"));
        assert!(text.contains("\t@echo 'check AR executable'"));
    }

    #[test]
    fn test_banner_lines_fill_width() {
        let mut out = MakefileWriter::new(20);
        out.banner(2, "Prebuild");
        let text = String::from_utf8(out.finish()).unwrap();
        let lines = lines(&text);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], format!("### {}", "=".repeat(76)));
        assert_eq!(lines[1], format!("### Prebuild {}", "-".repeat(67)));
        assert_eq!(lines[2], lines[0]);
        assert_eq!(lines[3], "");
        assert!(lines[..3].iter().all(|l| l.len() == 80));
    }

    #[test]
    fn test_fix_variables() {
        assert_eq!(fix_variables("%C6X_C_DIR%\\include"), "$(C6X_C_DIR)/include");
        assert_eq!(fix_variables("a%B%c%D%"), "a$(B)c$(D)");
        assert_eq!(fix_variables("plain"), "plain");
    }

    #[test]
    fn test_collect_variables() {
        let mut variables = BTreeSet::new();
        collect_variables(
            &mut variables,
            ["%B%\\x %A%", "-i\"%B%\"", "100%% done", "%OPEN"],
        );

        let collected: Vec<&str> = variables.iter().map(String::as_str).collect();
        assert_eq!(collected, vec!["A", "B"]);
    }
}

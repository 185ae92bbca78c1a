//! Settings of a single build configuration.

use std::collections::BTreeMap;

use crate::core::build_step::BuildStepList;
use crate::core::file_options::FileOptions;
use crate::util::text::{fix_path, flag_with_quoted_value, strip_quotes, to_option};

/// Flag carrying an include path (compiler) or library search path (linker).
pub const INCLUDE_FLAG: &str = "-i";
/// Flag carrying a preprocessor define.
pub const DEFINE_FLAG: &str = "-d";
/// Flag carrying a preprocessor undefine.
pub const UNDEFINE_FLAG: &str = "-u";
/// Flag carrying a library name.
pub const LIBRARY_FLAG: &str = "-l";

/// One named build configuration, e.g. `Debug` or `Release`.
///
/// Raw option tokens of the recognized `-x"value"` shapes are routed into
/// structured lists when added; everything else lands in the matching
/// "other" list. Order inside each list is append order. Include and
/// library search paths are stored with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigSettings {
    pre_build_steps: BuildStepList,
    post_build_steps: BuildStepList,

    defines: Vec<String>,
    undefines: Vec<String>,
    include_paths: Vec<String>,
    compiler_options: Vec<String>,

    library_paths: Vec<String>,
    libraries: Vec<String>,
    linker_options: Vec<String>,

    archiver_options: Vec<String>,

    files: BTreeMap<String, FileOptions>,
}

impl ConfigSettings {
    pub fn new() -> Self {
        Self::default()
    }

    // Build steps

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

    // Compiler options

    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    pub fn undefines(&self) -> &[String] {
        &self.undefines
    }

    pub fn include_paths(&self) -> &[String] {
        &self.include_paths
    }

    /// Compiler options that are not includes, defines or undefines.
    pub fn compiler_options(&self) -> &[String] {
        &self.compiler_options
    }

    /// Add a raw compiler token, routing `-i"X"`, `-d"X"` and `-u"X"`.
    pub fn add_compiler_option(&mut self, option: &str) {
        if let Some(path) = flag_with_quoted_value(option, INCLUDE_FLAG) {
            self.include_paths.push(fix_path(path));
        } else if let Some(define) = flag_with_quoted_value(option, DEFINE_FLAG) {
            self.defines.push(define.to_string());
        } else if let Some(undefine) = flag_with_quoted_value(option, UNDEFINE_FLAG) {
            self.undefines.push(undefine.to_string());
        } else {
            self.compiler_options.push(option.to_string());
        }
    }

    pub fn add_define(&mut self, define: impl Into<String>) {
        self.defines.push(define.into());
    }

    pub fn add_undefine(&mut self, undefine: impl Into<String>) {
        self.undefines.push(undefine.into());
    }

    pub fn add_include_path(&mut self, path: &str) {
        self.include_paths.push(fix_path(path));
    }

    pub fn add_other_compiler_option(&mut self, option: impl Into<String>) {
        self.compiler_options.push(option.into());
    }

    pub fn remove_define(&mut self, define: &str) {
        self.defines.retain(|d| d != define);
    }

    pub fn remove_undefine(&mut self, undefine: &str) {
        self.undefines.retain(|u| u != undefine);
    }

    pub fn remove_include_path(&mut self, path: &str) {
        let path = fix_path(path);
        self.include_paths.retain(|p| *p != path);
    }

    pub fn remove_compiler_option(&mut self, option: &str) {
        self.compiler_options.retain(|o| o != option);
    }

    pub fn clear_defines(&mut self) {
        self.defines.clear();
    }

    pub fn clear_undefines(&mut self) {
        self.undefines.clear();
    }

    pub fn clear_include_paths(&mut self) {
        self.include_paths.clear();
    }

    pub fn clear_compiler_options(&mut self) {
        self.compiler_options.clear();
    }

    /// Recompose compiler tokens: include paths, defines, undefines, other.
    pub fn compiler_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();

        flags.extend(self.include_paths.iter().map(|p| to_option(INCLUDE_FLAG, p, true)));
        flags.extend(self.defines.iter().map(|d| to_option(DEFINE_FLAG, d, true)));
        flags.extend(self.undefines.iter().map(|u| to_option(UNDEFINE_FLAG, u, true)));
        flags.extend(self.compiler_options.iter().cloned());

        flags
    }

    // Linker options

    pub fn library_paths(&self) -> &[String] {
        &self.library_paths
    }

    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    /// Linker options that are not library paths or library names.
    pub fn linker_options(&self) -> &[String] {
        &self.linker_options
    }

    /// Add a raw linker token, routing `-i"X"` and `-l"X"`.
    pub fn add_linker_option(&mut self, option: &str) {
        if let Some(path) = flag_with_quoted_value(option, INCLUDE_FLAG) {
            self.library_paths.push(fix_path(path));
        } else if let Some(library) = flag_with_quoted_value(option, LIBRARY_FLAG) {
            self.libraries.push(library.to_string());
        } else {
            self.linker_options.push(option.to_string());
        }
    }

    pub fn add_library_path(&mut self, path: &str) {
        self.library_paths.push(fix_path(path));
    }

    pub fn add_library(&mut self, library: impl Into<String>) {
        self.libraries.push(library.into());
    }

    pub fn add_other_linker_option(&mut self, option: impl Into<String>) {
        self.linker_options.push(option.into());
    }

    pub fn remove_library_path(&mut self, path: &str) {
        let path = fix_path(path);
        self.library_paths.retain(|p| *p != path);
    }

    pub fn remove_library(&mut self, library: &str) {
        self.libraries.retain(|l| l != library);
    }

    pub fn remove_linker_option(&mut self, option: &str) {
        self.linker_options.retain(|o| o != option);
    }

    pub fn clear_linker_options(&mut self) {
        self.library_paths.clear();
        self.libraries.clear();
        self.linker_options.clear();
    }

    /// Recompose linker tokens: library paths, libraries, other.
    pub fn linker_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();

        flags.extend(self.library_paths.iter().map(|p| to_option(INCLUDE_FLAG, p, true)));
        flags.extend(self.libraries.iter().map(|l| to_option(LIBRARY_FLAG, l, true)));
        flags.extend(self.linker_options.iter().cloned());

        flags
    }

    /// Value of a linker flag given as `-m x`, `-mx` or `-m"x"`. Last one wins.
    pub fn linker_option(&self, flag: &str) -> Option<String> {
        option_value(&self.linker_options, flag)
    }

    // Archiver options

    pub fn archiver_options(&self) -> &[String] {
        &self.archiver_options
    }

    pub fn add_archiver_option(&mut self, option: impl Into<String>) {
        self.archiver_options.push(option.into());
    }

    pub fn remove_archiver_option(&mut self, option: &str) {
        self.archiver_options.retain(|o| o != option);
    }

    pub fn clear_archiver_options(&mut self) {
        self.archiver_options.clear();
    }

    // Per-file overlays

    /// Overlay of a file, or the default overlay if none was recorded.
    pub fn file_options(&self, file: &str) -> FileOptions {
        self.files.get(file).cloned().unwrap_or_default()
    }

    /// Mutable overlay of a file, created on first access.
    pub fn file_options_mut(&mut self, file: &str) -> &mut FileOptions {
        self.files.entry(file.to_string()).or_default()
    }

    /// Every file with a recorded overlay, in path order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileOptions)> {
        self.files.iter().map(|(path, options)| (path.as_str(), options))
    }

    pub fn clear_file_link_order(&mut self) {
        for options in self.files.values_mut() {
            options.remove_link_order();
        }
    }
}

/// Look up the value of `flag` in an option list.
///
/// Accepts the separate form (`-o app.out`), the joined form (`-oapp.out`)
/// and the quoted joined form (`-o"app.out"`). Last occurrence wins.
pub fn option_value(options: &[String], flag: &str) -> Option<String> {
    let mut value = None;
    let mut tokens = options.iter();

    while let Some(token) = tokens.next() {
        if token == flag {
            if let Some(next) = tokens.next() {
                value = Some(next.clone());
            }
        } else if let Some(rest) = token.strip_prefix(flag) {
            value = Some(strip_quotes(rest).unwrap_or(rest).to_string());
        }
    }

    value
}

/// Drop every occurrence of `flag` from an option list, including the
/// separate value token that follows a bare flag.
pub fn without_option(options: &[String], flag: &str) -> Vec<String> {
    let mut result = Vec::with_capacity(options.len());
    let mut tokens = options.iter();

    while let Some(token) = tokens.next() {
        if token == flag {
            tokens.next();
        } else if !token.starts_with(flag) {
            result.push(token.clone());
        }
    }

    result
}

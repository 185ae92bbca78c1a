//! CLI integration tests for ccsproj.
//!
//! These tests run the binary against project files written to a temporary
//! directory and check the produced outputs and exit codes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const PROJECT: &str = r#"; Code Composer Project File, Version 2.0 (do not modify or remove this line)

[Project Settings]
ProjectDir="C:\work\firmware\"
ProjectType=Executable
CPUFamily=TMS320C64XX
Tool="Compiler"
Tool="Linker"
Config="Debug"
Config="Release"

[Source Files]
Source="main.c"
Source="drivers\uart.c"
Source="rts6400.lib"
Source="firmware.cmd"

["Debug" Settings]
InitialBuildCmd=echo %BUILD_ID%;Run=Always

["Compiler" Settings: "Debug"]
Options=-g -fr"$(Proj_dir)\Debug" -i"%C6X_C_DIR%\include" -d"_DEBUG"

["Compiler" Settings: "Release"]
Options=-o3 -fr"$(Proj_dir)\Release" -d"NDEBUG" -d"LEVEL=3"

["Linker" Settings: "Debug"]
Options=-c -m".\Debug\firmware.map" -o".\Debug\firmware.out" -x

["Linker" Settings: "Release"]
Options=-c -x

["drivers\uart.c" Settings: "Release"]
Options="Compiler" +{-o2} -{-o3}
ExcludeFromBuild=true
"#;

/// Get the ccsproj binary command, isolated from the user's config.
fn ccsproj(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ccsproj").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory holding `firmware.pjt`.
fn project_dir() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("firmware.pjt");
    fs::write(&path, PROJECT).unwrap();
    (tmp, path)
}

// ============================================================================
// Arguments
// ============================================================================

#[test]
fn test_help_exits_zero() {
    let tmp = TempDir::new().unwrap();
    ccsproj(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("FORMAT OUTPUT"));
}

#[test]
fn test_version_exits_zero() {
    let tmp = TempDir::new().unwrap();
    ccsproj(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ccsproj"));
}

#[test]
fn test_missing_input_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    ccsproj(tmp.path()).assert().code(1);
}

#[test]
fn test_odd_output_arguments_are_usage_error() {
    let (tmp, _) = project_dir();
    ccsproj(tmp.path())
        .args(["firmware.pjt", "makefile"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("has no output path"));
}

#[test]
fn test_unknown_format_is_usage_error() {
    let (tmp, _) = project_dir();
    ccsproj(tmp.path())
        .args(["firmware.pjt", "cmake", "CMakeLists.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown output format `cmake`"));
    assert!(!tmp.path().join("CMakeLists.txt").exists());
}

// ============================================================================
// Reading
// ============================================================================

#[test]
fn test_read_only_run_succeeds() {
    let (tmp, _) = project_dir();
    ccsproj(tmp.path())
        .arg("firmware.pjt")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_project_exits_two() {
    let tmp = TempDir::new().unwrap();
    ccsproj(tmp.path())
        .args(["missing.pjt", "makefile", "Makefile"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to open project"));
    assert!(!tmp.path().join("Makefile").exists());
}

#[test]
fn test_parse_error_exits_two_with_line() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("bad.pjt"),
        "[Project Settings]\nProjectType=Driver\n",
    )
    .unwrap();

    ccsproj(tmp.path())
        .arg("bad.pjt")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown project type 'Driver'"))
        .stderr(predicate::str::contains("at line 2"))
        .stderr(predicate::str::contains("bad.pjt"));
}

#[test]
fn test_stray_carriage_return_exits_two() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("cr.pjt"),
        "[Project Settings]\rProjectType=Executable\n",
    )
    .unwrap();

    ccsproj(tmp.path())
        .arg("cr.pjt")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("stray carriage return on line 1"));
}

#[test]
fn test_crlf_line_endings_are_accepted() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("crlf.pjt"), PROJECT.replace('\n', "\r\n")).unwrap();

    ccsproj(tmp.path())
        .args(["crlf.pjt", "qt-sources", "-"])
        .assert()
        .success()
        .stdout("drivers\\uart.c\nmain.c\n");
}

// ============================================================================
// Exports
// ============================================================================

#[test]
fn test_makefile_target_from_output_name() {
    let (tmp, _) = project_dir();
    ccsproj(tmp.path())
        .args(["firmware.pjt", "makefile", "build.mk"])
        .assert()
        .success();

    let makefile = fs::read_to_string(tmp.path().join("build.mk")).unwrap();
    assert!(makefile.starts_with("TARGET              := build\n"));
    assert!(makefile.contains("MAKEFILE            := build.mk\n"));
    assert!(makefile.contains("OBJECTS             := uart.obj main.obj\n"));
    assert!(makefile.contains("MAP_DEBUG           := ./Debug/firmware.map\n"));
    assert!(makefile.contains(
        "OBJECTS_RELEASE     := $(filter-out Release/uart.obj,$(addprefix Release/,$(OBJECTS)))\n"
    ));
    assert!(makefile.contains("\techo $(BUILD_ID)\n"));
}

#[test]
fn test_makefile_to_stdout_uses_input_stem() {
    let (tmp, _) = project_dir();
    ccsproj(tmp.path())
        .args(["firmware.pjt", "MAKE", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("TARGET              := firmware\n"))
        .stdout(predicate::str::contains("all: debug release\n"));
}

#[test]
fn test_ccs_output_is_stable() {
    let (tmp, _) = project_dir();
    ccsproj(tmp.path())
        .args(["firmware.pjt", "ccs", "first.pjt"])
        .assert()
        .success();
    ccsproj(tmp.path())
        .args(["first.pjt", "pjt", "second.pjt"])
        .assert()
        .success();

    let first = fs::read(tmp.path().join("first.pjt")).unwrap();
    let second = fs::read(tmp.path().join("second.pjt")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_qt_fragments_default_to_first_config() {
    let (tmp, _) = project_dir();
    ccsproj(tmp.path())
        .args([
            "firmware.pjt",
            "qt-defines",
            "defines.h",
            "qt-includes",
            "includes.pri",
        ])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(tmp.path().join("defines.h")).unwrap(),
        "#define _DEBUG\n"
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("includes.pri")).unwrap(),
        "%C6X_C_DIR%/include\n"
    );
}

#[test]
fn test_qt_defines_for_selected_config() {
    let (tmp, _) = project_dir();
    ccsproj(tmp.path())
        .args(["--build-config", "Release", "firmware.pjt", "qt-defines", "-"])
        .assert()
        .success()
        .stdout("#define NDEBUG\n#define LEVEL 3\n");
}

#[test]
fn test_unwritable_output_exits_three() {
    let (tmp, _) = project_dir();
    ccsproj(tmp.path())
        .args(["firmware.pjt", "makefile", "missing/Makefile"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("failed to write"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_project_config_overrides_defaults() {
    let (tmp, _) = project_dir();
    fs::write(
        tmp.path().join("ccsproj.toml"),
        "[makefile]\ncompiler = \"cl6x --abi=eabi\"\nrequired-variables = []\n",
    )
    .unwrap();

    ccsproj(tmp.path())
        .args(["firmware.pjt", "makefile", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CC                  := cl6x --abi=eabi\n"))
        .stdout(predicate::str::contains("check C6X_C_DIR'").not());
}

#[test]
fn test_settings_file_wins_over_project_config() {
    let (tmp, _) = project_dir();
    fs::write(
        tmp.path().join("ccsproj.toml"),
        "[makefile]\ncompiler = \"cl-project\"\nlinker = \"lnk-project\"\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("ci.toml"),
        "[makefile]\ncompiler = \"cl-ci\"\n",
    )
    .unwrap();

    ccsproj(tmp.path())
        .args(["--settings", "ci.toml", "firmware.pjt", "makefile", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CC                  := cl-ci\n"))
        .stdout(predicate::str::contains("LD                  := lnk-project\n"));
}

#[test]
fn test_malformed_settings_file_is_usage_error() {
    let (tmp, _) = project_dir();
    fs::write(tmp.path().join("bad.toml"), "[makefile\n").unwrap();

    ccsproj(tmp.path())
        .args(["--settings", "bad.toml", "firmware.pjt", "makefile", "-"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_malformed_project_config_falls_back_to_defaults() {
    let (tmp, _) = project_dir();
    fs::write(tmp.path().join("ccsproj.toml"), "[makefile\n").unwrap();

    ccsproj(tmp.path())
        .args(["firmware.pjt", "makefile", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CC                  := cl6x\n"))
        .stderr(predicate::str::contains("Failed to load config"));
}

//! Sample project files.

use crate::core::project::{ProjectSettings, ProjectType};
use crate::test_support::ProjectBuilder;

/// A typical two-configuration DSP project.
pub const SAMPLE_PROJECT: &str = r#"; Code Composer Project File, Version 2.0 (do not modify or remove this line)

[Project Settings]
ProjectDir="C:\dsp\app\"
ProjectType=Executable
CPUFamily=TMS320C64XX
Tool="Compiler"
Tool="CustomBuilder"
Tool="Linker"
Config="Debug"
Config="Release"

[Source Files]
Source="lib\rts6400.lib"
Source="link.cmd"
Source="src\dsp.c"
Source="src\main.c"

["Debug" Settings]
InitialBuildCmd=echo start %BUILD_ID%;Run=Always
FinalBuildCmd=copy Debug\app.out %DEPLOY_DIR%

["Release" Settings]
FinalBuildCmd=echo done

["Compiler" Settings: "Debug"]
Options=-g -fr"$(Proj_dir)\Debug" -i"..\inc" -i"%C6X_C_DIR%\include" -d"_DEBUG" -mv6400

["Compiler" Settings: "Release"]
Options=-o3 -fr"$(Proj_dir)\Release" -i"..\inc" -d"NDEBUG" -mv6400

["Linker" Settings: "Debug"]
Options=-c -m".\Debug\app.map" -o".\Debug\app.out" -w -x

["Linker" Settings: "Release"]
Options=-c -m".\Release\app.map" -o".\Release\app.out" -w -x

["src\dsp.c" Settings: "Release"]
Options="Compiler" +{-o2} -{-o3}

["link.cmd" Settings: "Debug"]
LinkOrder=1

["link.cmd" Settings: "Release"]
LinkOrder=1
"#;

/// Executable with two plain C sources and one configuration.
pub fn two_source_project() -> ProjectSettings {
    ProjectBuilder::new(ProjectType::Executable)
        .tools(&["Compiler", "Linker"])
        .sources(&["a.c", "b.c"])
        .config("Debug", &["-g"], &["-c"])
        .build()
}

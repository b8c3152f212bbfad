//! `fwgen build`: configure and compile a generated project.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fwgen_tools::{detect, elf_path, BuildConfig, BuildSystem, Builder, ProcessRunner};

pub fn run(runner: &dyn ProcessRunner, project_dir: &Path, system: BuildSystem) -> Result<()> {
    let elf = build_project(runner, project_dir, system, &mut |line| println!("{line}"))?;
    println!("Built {}", elf.display());
    Ok(())
}

pub(crate) fn build_project(
    runner: &dyn ProcessRunner,
    project_dir: &Path,
    system: BuildSystem,
    on_line: &mut dyn FnMut(&str),
) -> Result<PathBuf> {
    detect(runner)
        .require(system.required_tools())
        .with_context(|| format!("checking tools for a {system} build"))?;
    Builder::new(BuildConfig::new(project_dir, system), runner)
        .run(on_line)
        .with_context(|| format!("building {}", project_dir.display()))?;
    Ok(elf_path(project_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::FakeRunner;
    use fwgen_tools::ToolError;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CMakeLists.txt"), "").unwrap();
        std::fs::write(dir.path().join("Makefile"), "").unwrap();
        dir
    }

    fn programs(runner: &FakeRunner) -> Vec<String> {
        runner
            .calls()
            .into_iter()
            .filter(|c| !c.args.iter().any(|a| a == "--version"))
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn cmake_configures_then_builds() {
        let dir = project();
        let runner = FakeRunner::default();
        let mut lines = Vec::new();
        let elf = build_project(&runner, dir.path(), BuildSystem::Cmake, &mut |l| lines.push(l.to_string())).unwrap();
        assert_eq!(elf, dir.path().join("build/firmware.elf"));
        let calls = programs(&runner);
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("cmake -S"));
        assert!(calls[1].starts_with("cmake --build"));
        assert_eq!(lines, ["cmake 1.0", "cmake 1.0"]);
    }

    #[test]
    fn make_runs_make_only() {
        let dir = project();
        let runner = FakeRunner::default().with_missing("ninja");
        build_project(&runner, dir.path(), BuildSystem::Make, &mut |_| {}).unwrap();
        assert_eq!(programs(&runner), ["make"]);
    }

    #[test]
    fn missing_tools_stop_before_building() {
        let dir = project();
        let runner = FakeRunner::default().with_missing("ninja").with_missing("cmake");
        let err = build_project(&runner, dir.path(), BuildSystem::Cmake, &mut |_| {}).unwrap_err();
        match err.downcast_ref::<ToolError>() {
            Some(ToolError::ToolMissing { tools }) => assert_eq!(tools, &["cmake", "ninja"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(programs(&runner).is_empty());
    }
}

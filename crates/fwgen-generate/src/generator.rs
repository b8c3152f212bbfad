//! Project generation pipeline.
//!
//! Every failure aborts the run. Pin validation happens before the first
//! directory is created; later failures can leave a partially written tree,
//! which the next successful run overwrites in place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fwgen_catalog::{BoardDefinition, PackDefinition, PackTemplates};
use fwgen_core::fsutil;
use fwgen_pins::{resolve, PinMap, PinRequest};

use crate::context::build_context;
use crate::digest::FileDigest;
use crate::error::{GenerateError, Result};
use crate::manifest::{self, GenerationManifest, ManifestPin, TOOLCHAIN};
use crate::probe::{ProbeSettings, TARGET_CFG_PATH};
use crate::render::{MiniJinjaRenderer, TemplateRenderer};
use crate::report::GenerationReport;

/// Base name of the build artifact.
pub const FIRMWARE_NAME: &str = "firmware";

/// Where the build leaves the ELF image, relative to the project directory.
pub const ELF_PATH: &str = "build/firmware.elf";

/// The pack's startup file is copied here verbatim.
pub const STARTUP_FILE: &str = "startup_gcc.s";

pub const TOOLCHAIN_FILE: &str = "cmake/toolchain-arm-none-eabi.cmake";

/// Sub-directories created in every project.
const PROJECT_DIRS: [&str; 4] = ["cmake", "build", "out", "openocd"];

const TOOLCHAIN_CMAKE: &str = r#"set(CMAKE_SYSTEM_NAME Generic)
set(CMAKE_SYSTEM_PROCESSOR ARM)

set(CMAKE_TRY_COMPILE_TARGET_TYPE STATIC_LIBRARY)

set(TOOLCHAIN_PREFIX arm-none-eabi-)

set(CMAKE_C_COMPILER ${TOOLCHAIN_PREFIX}gcc)
set(CMAKE_ASM_COMPILER ${TOOLCHAIN_PREFIX}gcc)
set(CMAKE_OBJCOPY ${TOOLCHAIN_PREFIX}objcopy)
set(CMAKE_SIZE ${TOOLCHAIN_PREFIX}size)

set(CMAKE_C_FLAGS_INIT "-Wall -Wextra -Werror -ffunction-sections -fdata-sections")
set(CMAKE_EXE_LINKER_FLAGS_INIT "-Wl,--gc-sections")
"#;

/// Template bindings paired with the project file each one produces.
fn render_plan(templates: &PackTemplates) -> [(&str, &'static str); 15] {
    [
        (&templates.cmakelists, "CMakeLists.txt"),
        (&templates.linker, "linker.ld"),
        (&templates.system, "system.c"),
        (&templates.main, "main.c"),
        (&templates.family_gpio, "family_gpio.h"),
        (&templates.makefile, "Makefile"),
        (&templates.hal_h, "hal.h"),
        (&templates.hal_gpio_h, "hal_gpio.h"),
        (&templates.hal_gpio_c, "hal_gpio.c"),
        (&templates.hal_clock_h, "hal_clock.h"),
        (&templates.hal_clock_c, "hal_clock.c"),
        (&templates.hal_delay_h, "hal_delay.h"),
        (&templates.hal_delay_c, "hal_delay.c"),
        (&templates.app_pins_h, "app_pins.h"),
        (&templates.app_pins_c, "app_pins.c"),
    ]
    .map(|(template, output)| (template.as_str(), output))
}

/// Caller-controlled generation settings.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Project directory. Created if missing.
    pub output_dir: PathBuf,
    /// LED display name. Falls back to the board's LED name.
    pub led_alias: Option<String>,
    /// Build project name. Defaults to the output directory's name.
    pub project_name: Option<String>,
    /// Adapter speed baked into the generated flash script.
    pub speed_khz: Option<u32>,
}

impl GenerateOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub manifest: GenerationManifest,
    pub report: GenerationReport,
    pub pins: PinMap,
}

/// A name usable as a CMake project and Makefile target.
fn project_name(options: &GenerateOptions, output_dir: &Path) -> String {
    let raw = options
        .project_name
        .clone()
        .or_else(|| output_dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        FIRMWARE_NAME.to_string()
    } else {
        cleaned
    }
}

/// Writes project files and remembers their digests.
struct ProjectWriter<'a> {
    dir: &'a Path,
    files: BTreeMap<String, FileDigest>,
    order: Vec<String>,
}

impl<'a> ProjectWriter<'a> {
    fn new(dir: &'a Path) -> Self {
        Self {
            dir,
            files: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    fn write(&mut self, rel: &str, contents: &[u8]) -> Result<()> {
        let path = self.dir.join(rel);
        fsutil::atomic_write(&path, contents).map_err(GenerateError::io("write", &path))?;
        tracing::debug!(file = rel, bytes = contents.len(), "wrote project file");
        self.files.insert(rel.to_string(), FileDigest::compute(contents));
        self.order.push(rel.to_string());
        Ok(())
    }

    fn copy(&mut self, what: &'static str, src: &Path, rel: &str) -> Result<()> {
        if !src.is_file() {
            return Err(GenerateError::MissingSource {
                what,
                path: src.to_path_buf(),
            });
        }
        let contents = std::fs::read(src).map_err(GenerateError::io("read", src))?;
        self.write(rel, &contents)
    }
}

fn create_project_dirs(out: &Path) -> Result<PathBuf> {
    fsutil::ensure_dir(out).map_err(GenerateError::io("create", out))?;
    for sub in PROJECT_DIRS {
        let dir = out.join(sub);
        fsutil::ensure_dir(&dir).map_err(GenerateError::io("create", &dir))?;
    }
    std::fs::canonicalize(out).map_err(GenerateError::io("resolve", out))
}

/// Files edited since the previous run. An unreadable previous manifest
/// only costs the check.
fn edited_since_last_run(output_dir: &Path) -> Vec<String> {
    match GenerationManifest::load_from(output_dir) {
        Ok(Some(previous)) => previous.modified_files(output_dir),
        Ok(None) => Vec::new(),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable previous manifest");
            Vec::new()
        }
    }
}

/// Generate a project with the pack's MiniJinja templates.
pub fn generate(
    board: &BoardDefinition,
    pack: &PackDefinition,
    requests: &[PinRequest],
    options: &GenerateOptions,
) -> Result<GenerationOutput> {
    let renderer = MiniJinjaRenderer::new(pack.templates_dir());
    generate_with(&renderer, board, pack, requests, options)
}

/// Run the full pipeline:
/// resolve -> context -> directories -> render -> copy -> manifest.
pub fn generate_with(
    renderer: &dyn TemplateRenderer,
    board: &BoardDefinition,
    pack: &PackDefinition,
    requests: &[PinRequest],
    options: &GenerateOptions,
) -> Result<GenerationOutput> {
    // Stage 1: pin resolution, before anything touches disk
    let pins = resolve(board, requests, options.led_alias.as_deref())?;

    // Stage 2: template context
    let probe = ProbeSettings::resolve(board, pack, options.speed_khz);
    let name = project_name(options, &options.output_dir);
    let context = build_context(&name, board, pack, &pins, &probe, FIRMWARE_NAME, ELF_PATH);

    // Stage 3: directory tree
    let output_dir = create_project_dirs(&options.output_dir)?;
    let overwritten_edits = edited_since_last_run(&output_dir);
    for file in &overwritten_edits {
        tracing::warn!(file = %file, "overwriting hand-edited file");
    }

    // Stage 4: rendered sources
    let mut writer = ProjectWriter::new(&output_dir);
    for (template, output) in render_plan(&pack.templates) {
        let text = renderer.render(template, &context)?;
        writer.write(output, text.as_bytes())?;
    }

    // Stage 5: verbatim and fixed files
    writer.copy("startup file", &pack.startup_path(), STARTUP_FILE)?;
    writer.write(TOOLCHAIN_FILE, TOOLCHAIN_CMAKE.as_bytes())?;
    writer.copy("debug probe target file", &pack.target_cfg_path(), TARGET_CFG_PATH)?;

    // Stage 6: manifest
    let manifest = GenerationManifest {
        generated_at: manifest::timestamp(chrono::Utc::now()),
        board: board.id.clone(),
        pack: pack.id.clone(),
        mcu: board.mcu.clone(),
        output_dir: output_dir.clone(),
        toolchain: TOOLCHAIN.to_string(),
        pins: pins.pins().iter().map(ManifestPin::from).collect(),
        files: writer.files,
    };
    manifest.save(&GenerationManifest::path_in(&output_dir))?;

    let report = GenerationReport {
        board: board.id.clone(),
        pack: pack.id.clone(),
        output_dir: output_dir.clone(),
        files_written: writer.order,
        overwritten_edits,
        pin_count: pins.len(),
        skipped_pins: pins
            .pins()
            .iter()
            .filter(|p| p.skip_init)
            .map(|p| p.identifier.clone())
            .collect(),
        led_identifier: pins.led().identifier.clone(),
        button_identifier: pins.button_identifier().map(str::to_string),
    };
    tracing::info!(
        board = %board.id,
        output_dir = %output_dir.display(),
        files = report.files_written.len(),
        pins = report.pin_count,
        "generated project"
    );

    Ok(GenerationOutput {
        manifest,
        report,
        pins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::{board, pack};
    use crate::context::GenerationContext;
    use std::sync::Mutex;

    /// Renders every template as a short summary of the context.
    #[derive(Debug, Default)]
    struct FakeRenderer {
        rendered: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl TemplateRenderer for FakeRenderer {
        fn render(&self, template: &str, context: &GenerationContext) -> Result<String> {
            if self.fail_on == Some(template) {
                return Err(GenerateError::Render {
                    template: template.to_string(),
                    detail: "boom".into(),
                });
            }
            if let Ok(mut rendered) = self.rendered.lock() {
                rendered.push(template.to_string());
            }
            let initialized: Vec<&str> = context
                .pins
                .iter()
                .filter(|p| !p.skip_init)
                .map(|p| p.identifier.as_str())
                .collect();
            Ok(format!("{template}: {} init={}\n", context.board_id, initialized.join(",")))
        }
    }

    fn pack_in(root: &Path) -> PackDefinition {
        let mut pack = pack();
        pack.root = root.join("packs/stm32f0");
        let templates = pack.templates_dir();
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(templates.join("startup_stm32f0.s"), ".syntax unified\n").unwrap();
        std::fs::create_dir_all(pack.root.join("openocd")).unwrap();
        std::fs::write(
            pack.root.join("openocd/stm32f0x.cfg"),
            "source [find target/stm32f0x.cfg]\n",
        )
        .unwrap();
        pack
    }

    fn requests() -> Vec<PinRequest> {
        vec![PinRequest::new("BTN1", "C", 13).with_pull("up")]
    }

    #[test]
    fn writes_complete_project() {
        let root = tempfile::tempdir().unwrap();
        let pack = pack_in(root.path());
        let out = root.path().join("blinky");
        let renderer = FakeRenderer::default();
        let output = generate_with(&renderer, &board(), &pack, &requests(), &GenerateOptions::new(&out)).unwrap();

        for sub in PROJECT_DIRS {
            assert!(out.join(sub).is_dir(), "{sub}");
        }
        assert_eq!(renderer.rendered.lock().unwrap().len(), 15);
        assert_eq!(
            std::fs::read_to_string(out.join("main.c")).unwrap(),
            "main.c.j2: nucleo_f091rc init=APP_PIN_BTN1,APP_PIN_LD2\n"
        );
        assert_eq!(std::fs::read_to_string(out.join(STARTUP_FILE)).unwrap(), ".syntax unified\n");
        assert!(std::fs::read_to_string(out.join(TOOLCHAIN_FILE))
            .unwrap()
            .contains("set(TOOLCHAIN_PREFIX arm-none-eabi-)"));
        assert!(out.join(TARGET_CFG_PATH).is_file());

        let manifest = GenerationManifest::load_from(&out).unwrap().unwrap();
        assert_eq!(manifest, output.manifest);
        assert_eq!(manifest.output_dir, std::fs::canonicalize(&out).unwrap());
        assert_eq!(manifest.toolchain, "arm-none-eabi");
        let ids: Vec<_> = manifest.pins.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["APP_PIN_BTN1", "APP_PIN_LD2"]);
        assert_eq!(manifest.files.len(), 18);
        assert!(manifest.generated_at.ends_with('Z'));
        assert_eq!(output.report.files_written.len(), 18);
    }

    #[test]
    fn invalid_pins_write_nothing() {
        let root = tempfile::tempdir().unwrap();
        let pack = pack_in(root.path());
        let out = root.path().join("never");
        let requests = vec![PinRequest::new("A", "B", 3), PinRequest::new("B", "B", 3)];
        let err = generate_with(&FakeRenderer::default(), &board(), &pack, &requests, &GenerateOptions::new(&out))
            .unwrap_err();
        assert!(matches!(err, GenerateError::Pins(_)));
        assert!(!out.exists());
    }

    #[test]
    fn regeneration_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let pack = pack_in(root.path());
        let out = root.path().join("blinky");
        let options = GenerateOptions::new(&out);
        let first = generate_with(&FakeRenderer::default(), &board(), &pack, &requests(), &options).unwrap();
        let second = generate_with(&FakeRenderer::default(), &board(), &pack, &requests(), &options).unwrap();

        let mut a = first.manifest.clone();
        let mut b = second.manifest.clone();
        a.generated_at.clear();
        b.generated_at.clear();
        assert_eq!(a, b);
        assert!(second.report.overwritten_edits.is_empty());
    }

    #[test]
    fn hand_edits_reported_and_overwritten() {
        let root = tempfile::tempdir().unwrap();
        let pack = pack_in(root.path());
        let out = root.path().join("blinky");
        let options = GenerateOptions::new(&out);
        generate_with(&FakeRenderer::default(), &board(), &pack, &requests(), &options).unwrap();
        std::fs::write(out.join("main.c"), "/* mine */\n").unwrap();

        let second = generate_with(&FakeRenderer::default(), &board(), &pack, &requests(), &options).unwrap();
        assert_eq!(second.report.overwritten_edits, vec!["main.c"]);
        assert!(std::fs::read_to_string(out.join("main.c")).unwrap().starts_with("main.c.j2"));
    }

    #[test]
    fn reserved_pins_absent_from_init() {
        let root = tempfile::tempdir().unwrap();
        let pack = pack_in(root.path());
        let out = root.path().join("blinky");
        let requests = vec![PinRequest::new("SWDIO", "A", 13), PinRequest::new("Relay", "B", 0)];
        let output =
            generate_with(&FakeRenderer::default(), &board(), &pack, &requests, &GenerateOptions::new(&out)).unwrap();

        let swdio = &output.manifest.pins[0];
        assert!(swdio.skip_initialization);
        assert_eq!(swdio.reserved_reason.as_deref(), Some("SWDIO"));
        assert_eq!(output.report.skipped_pins, vec!["APP_PIN_SWDIO"]);
        let app_pins = std::fs::read_to_string(out.join("app_pins.c")).unwrap();
        assert!(!app_pins.contains("APP_PIN_SWDIO"));
        assert!(app_pins.contains("APP_PIN_RELAY"));
    }

    #[test]
    fn missing_startup_file_fails_after_render() {
        let root = tempfile::tempdir().unwrap();
        let pack = pack_in(root.path());
        std::fs::remove_file(pack.startup_path()).unwrap();
        let out = root.path().join("blinky");
        let err = generate_with(&FakeRenderer::default(), &board(), &pack, &requests(), &GenerateOptions::new(&out))
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingSource { what: "startup file", .. }));
        assert!(out.join("main.c").is_file());
        assert!(!out.join(manifest::MANIFEST_FILE).exists());
    }

    #[test]
    fn render_failure_aborts() {
        let root = tempfile::tempdir().unwrap();
        let pack = pack_in(root.path());
        let out = root.path().join("blinky");
        let renderer = FakeRenderer {
            fail_on: Some("linker.ld.j2"),
            ..FakeRenderer::default()
        };
        let err = generate_with(&renderer, &board(), &pack, &requests(), &GenerateOptions::new(&out)).unwrap_err();
        assert!(matches!(err, GenerateError::Render { .. }));
        assert!(out.join("CMakeLists.txt").is_file());
        assert!(!out.join("linker.ld").exists());
    }

    #[test]
    fn project_name_defaults_and_sanitizes() {
        let mut options = GenerateOptions::new("/work/my blinky");
        assert_eq!(project_name(&options, Path::new("/work/my blinky")), "my_blinky");
        options.project_name = Some("  ".into());
        assert_eq!(project_name(&options, Path::new("/")), "firmware");
    }
}

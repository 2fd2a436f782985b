//! # Pumpkin Decorator CLI
//!
//! Headless host for the pumpkin decorator.
//!
//! Replays a JSON-lines event script (the same events the page forwards)
//! through the input adapter and writes the PNG export to disk.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p pumpkin-cli -- session.jsonl --out-dir out --yes
//! ```
//!
//! ## Realtime flicker:
//!
//! ```bash
//! cargo run -p pumpkin-cli -- session.jsonl --realtime
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Decorator configuration plus host options
//! - `FileSink` - Download sink writing exports into a directory
//! - `run_script` - Drives a controller through one script

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use pumpkin_core::{
    DecorResult, DecoratorConfig, DecoratorController, DeleteKeyBinding, Dispatched, DownloadSink,
    FlickerScheduler, InputAdapter, InputEvent, ManualFlicker, Scene, TokioFlicker, Zone,
};
use pumpkin_renderer::{ExportConfig, PumpkinExporter};

/// Command-line arguments for pumpkin-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "pumpkin-cli")]
#[command(about = "Replay a pumpkin decorator event script and export the result")]
#[command(version)]
pub struct CliArgs {
    /// Event script, one JSON event per line. Reads stdin when omitted or `-`.
    #[arg(env = "PUMPKIN_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Directory the exported PNG is written to
    #[arg(long, short = 'o', env = "PUMPKIN_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Decoration zone width in pixels
    #[arg(long, env = "PUMPKIN_ZONE_WIDTH", default_value = "400")]
    pub zone_width: f32,

    /// Decoration zone height in pixels
    #[arg(long, env = "PUMPKIN_ZONE_HEIGHT", default_value = "450")]
    pub zone_height: f32,

    /// Flicker on a timer and sleep through `wait` events
    #[arg(long, env = "PUMPKIN_REALTIME")]
    pub realtime: bool,

    /// Answer yes to the clear prompt without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Keep the Delete key bound until the selection is cleared
    #[arg(long, env = "PUMPKIN_PERSISTENT_DELETE")]
    pub persistent_delete: bool,

    /// Seed for flicker sampling
    #[arg(long, env = "PUMPKIN_SEED")]
    pub seed: Option<u64>,

    /// Print the final scene as JSON on stdout
    #[arg(long)]
    pub dump_scene: bool,

    /// Skip loading system fonts for glyph text
    #[arg(long, env = "PUMPKIN_NO_SYSTEM_FONTS")]
    pub no_system_fonts: bool,
}

/// CLI host configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Script path; `None` reads stdin.
    pub script: Option<PathBuf>,
    /// Export directory.
    pub out_dir: PathBuf,
    /// Decorator configuration.
    pub decorator: DecoratorConfig,
    /// Use the tokio flicker timer and real waits.
    pub realtime: bool,
    /// Auto-confirm the clear prompt.
    pub auto_confirm: bool,
    /// Print the final scene.
    pub dump_scene: bool,
    /// Load system fonts for the exporter.
    pub load_system_fonts: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: None,
            out_dir: PathBuf::from("."),
            decorator: DecoratorConfig::default(),
            realtime: false,
            auto_confirm: false,
            dump_scene: false,
            load_system_fonts: true,
        }
    }
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        let delete_binding = if args.persistent_delete {
            DeleteKeyBinding::Persistent
        } else {
            DeleteKeyBinding::SingleShot
        };
        Self {
            script: args.script.filter(|path| path.as_os_str() != "-"),
            out_dir: args.out_dir,
            decorator: DecoratorConfig {
                zone: Zone::new(args.zone_width, args.zone_height),
                delete_binding,
                flicker_seed: args.seed,
                ..DecoratorConfig::default()
            },
            realtime: args.realtime,
            auto_confirm: args.yes,
            dump_scene: args.dump_scene,
            load_system_fonts: !args.no_system_fonts,
        }
    }
}

/// Writes offered downloads into a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Write into `dir`, creating it on first use.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FileSink {
    fn offer(&mut self, filename: &str, bytes: Vec<u8>) -> DecorResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "export written");
        Ok(())
    }
}

/// Outcome of replaying one script.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Events dispatched.
    pub events: usize,
    /// Events that changed nothing.
    pub ignored: usize,
    /// Exports written.
    pub exports: usize,
    /// Scene after the last event.
    pub scene: Scene,
    /// Whether the pumpkin ended lit.
    pub lit: bool,
    /// Glow-overlay opacity after the last event.
    pub glow_opacity: f32,
}

/// Ask on stderr and read the answer from stdin.
///
/// Anything but `y`/`yes` declines, including end of input.
pub fn prompt_stdin(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            tracing::warn!("failed to read confirmation: {e}");
            false
        }
    }
}

/// Replay `script`, asking the terminal before a clear unless auto-confirmed.
///
/// # Errors
///
/// Returns an error if the script is not valid JSON lines.
pub async fn run_script(config: &CliConfig, script: &str) -> anyhow::Result<SessionReport> {
    if config.auto_confirm {
        run_script_with(config, script, |_| true).await
    } else {
        run_script_with(config, script, prompt_stdin).await
    }
}

/// Replay `script`, answering the clear prompt with `confirm`.
///
/// In realtime mode flicker runs on the tokio timer and `wait` events sleep;
/// otherwise waits only advance the manual flicker clock.
///
/// # Errors
///
/// Returns an error if the script is not valid JSON lines.
pub async fn run_script_with(
    config: &CliConfig,
    script: &str,
    confirm: impl FnMut(&str) -> bool + 'static,
) -> anyhow::Result<SessionReport> {
    let events = InputEvent::parse_lines(script)?;
    tracing::debug!(events = events.len(), "script parsed");

    let scheduler: Box<dyn FlickerScheduler> = match (config.realtime, TokioFlicker::current()) {
        (true, Some(flicker)) => Box::new(flicker),
        (true, None) => {
            tracing::warn!("no tokio runtime, falling back to manual flicker");
            Box::new(ManualFlicker::new(config.decorator.flicker_seed))
        }
        (false, _) => Box::new(ManualFlicker::new(config.decorator.flicker_seed)),
    };
    let mut controller = DecoratorController::new(&config.decorator, scheduler);

    let exporter = PumpkinExporter::new(ExportConfig {
        load_system_fonts: config.load_system_fonts,
        ..ExportConfig::default()
    });
    let mut adapter = InputAdapter::new(confirm)
        .with_rasterizer(Box::new(exporter))
        .with_sink(Box::new(FileSink::new(&config.out_dir)));

    let mut ignored = 0;
    let mut exports = 0;
    for (line, event) in events.iter().enumerate() {
        match adapter.dispatch(&mut controller, event) {
            Dispatched::Wait(duration) if config.realtime => tokio::time::sleep(duration).await,
            Dispatched::Exported(true) => exports += 1,
            Dispatched::Ignored => {
                tracing::debug!(event = line + 1, "event had no effect");
                ignored += 1;
            }
            _ => {}
        }
    }

    let report = SessionReport {
        events: events.len(),
        ignored,
        exports,
        scene: controller.scene().clone(),
        lit: controller.is_lit(),
        glow_opacity: controller.glow_opacity(),
    };
    tracing::info!(
        events = report.events,
        ignored = report.ignored,
        exports = report.exports,
        decorations = report.scene.len(),
        lit = report.lit,
        "script finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_map_to_config() {
        let args = CliArgs::parse_from([
            "pumpkin-cli",
            "session.jsonl",
            "--zone-width",
            "200",
            "--persistent-delete",
            "--seed",
            "7",
            "-y",
        ]);
        let config = CliConfig::from(args);
        assert_eq!(config.script, Some(PathBuf::from("session.jsonl")));
        assert_eq!(config.decorator.zone, Zone::new(200.0, 450.0));
        assert_eq!(config.decorator.delete_binding, DeleteKeyBinding::Persistent);
        assert_eq!(config.decorator.flicker_seed, Some(7));
        assert!(config.auto_confirm);
        assert!(!config.realtime);
        assert!(config.load_system_fonts);
    }

    #[test]
    fn test_dash_reads_stdin() {
        let config = CliConfig::from(CliArgs::parse_from(["pumpkin-cli", "-"]));
        assert_eq!(config.script, None);
        let config = CliConfig::from(CliArgs::parse_from(["pumpkin-cli"]));
        assert_eq!(config.script, None);
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.out_dir, PathBuf::from("."));
        assert_eq!(config.decorator.delete_binding, DeleteKeyBinding::SingleShot);
        assert!(!config.dump_scene);
    }

    #[test]
    fn test_file_sink_creates_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        let mut sink = FileSink::new(&nested);
        sink.offer("out.png", vec![1, 2, 3]).expect("write");
        assert_eq!(std::fs::read(nested.join("out.png")).expect("read"), vec![1, 2, 3]);
        assert_eq!(sink.dir(), nested.as_path());
    }
}

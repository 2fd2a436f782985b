//! # Pumpkin Decorator CLI
//!
//! Replays an event script against the decorator and writes the export.

use std::io::Read;

use anyhow::Context;
use clap::Parser;
use pumpkin_cli::{run_script, CliArgs, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing, with JSON output when `RUST_LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("pumpkin_cli=debug,pumpkin_core=debug,pumpkin_renderer=debug")
    });

    // Logs go to stderr so `--dump-scene` output stays clean.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting pumpkin decorator v{}", pumpkin_core::VERSION);

    let args = CliArgs::parse();
    let config = CliConfig::from(args);

    let script = match &config.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            tracing::debug!("reading script from stdin");
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("failed to read script from stdin")?;
            script
        }
    };

    tracing::info!(
        "Zone {}x{}, output dir {}",
        config.decorator.zone.width,
        config.decorator.zone.height,
        config.out_dir.display()
    );

    let report = run_script(&config, &script).await?;

    if config.dump_scene {
        println!("{}", report.scene.to_json()?);
    }

    tracing::info!("Pumpkin decorator exited");
    Ok(())
}

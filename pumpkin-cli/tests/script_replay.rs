//! Integration tests for pumpkin-cli.
//!
//! Replays scripts end to end and checks the files written.

use std::path::Path;

use pumpkin_cli::{run_script, run_script_with, CliConfig};
use pumpkin_core::EXPORT_FILENAME;

fn config(out_dir: &Path) -> CliConfig {
    let mut config = CliConfig::new();
    config.out_dir = out_dir.to_path_buf();
    config.auto_confirm = true;
    config.load_system_fonts = false;
    config.decorator.flicker_seed = Some(31);
    config
}

const SESSION: &str = r#"
# place, drag and export
{"type":"palette_drop","data":{"kind":"skull","x":100.0,"y":100.0}}
{"type":"palette_click","data":{"kind":"ghost"}}
{"type":"pointer_down","data":{"target":2,"x":200.0,"y":225.0}}
{"type":"pointer_move","data":{"x":900.0,"y":-50.0}}
{"type":"pointer_up"}
{"type":"color_changed","data":{"value":"purple"}}
{"type":"export_requested"}
"#;

#[tokio::test]
async fn test_session_writes_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = run_script(&config(dir.path()), SESSION).await.expect("run");

    assert_eq!(report.events, 7);
    assert_eq!(report.exports, 1);
    assert_eq!(report.ignored, 0);
    assert_eq!(report.scene.len(), 2);

    let ghost = report.scene.decorations().nth(1).expect("ghost");
    assert_eq!((ghost.position.x, ghost.position.y), (360.0, 0.0));

    let png = std::fs::read(dir.path().join(EXPORT_FILENAME)).expect("export written");
    assert_eq!(&png[0..4], &[137, 80, 78, 71]);
}

#[tokio::test]
async fn test_declined_clear_keeps_decorations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = r#"
{"type":"palette_click","data":{"kind":"bat"}}
{"type":"clear_requested"}
"#;
    let report = run_script_with(&config(dir.path()), script, |_| false)
        .await
        .expect("run");
    assert_eq!(report.scene.len(), 1);

    let report = run_script(&config(dir.path()), script).await.expect("run");
    assert!(report.scene.is_empty());
}

#[tokio::test]
async fn test_missing_targets_are_counted_as_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = r#"
{"type":"click","data":{"target":9}}
{"type":"key","data":{"key":"Delete"}}
"#;
    let report = run_script(&config(dir.path()), script).await.expect("run");
    assert_eq!(report.ignored, 2);
    assert!(!dir.path().join(EXPORT_FILENAME).exists());
}

#[tokio::test]
async fn test_invalid_script_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = run_script(&config(dir.path()), "{\"type\":\"spin\"}").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_manual_waits_drive_flicker() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = r#"
{"type":"flicker_toggled","data":{"checked":true}}
{"type":"light_button"}
{"type":"wait","data":{"ms":450}}
"#;
    let report = run_script(&config(dir.path()), script).await.expect("run");
    assert!(report.lit);
    assert!((0.3..=0.8).contains(&report.glow_opacity));
}

#[tokio::test(start_paused = true)]
async fn test_realtime_flicker_runs_on_timer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config(dir.path());
    config.realtime = true;
    let script = r#"
{"type":"flicker_toggled","data":{"checked":true}}
{"type":"light_button"}
{"type":"wait","data":{"ms":1000}}
"#;
    let report = run_script(&config, script).await.expect("run");
    assert!(report.lit);
    assert!((0.3..=0.8).contains(&report.glow_opacity));
}

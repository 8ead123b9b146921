use std::fs;
use std::path::Path;
use std::process::Command;

use rainchart::config::ChartConfig;
use rainchart::loader::SourceCatalog;
use rainchart::palette::Stylesheet;
use rainchart::{ChartError, ChartRuntime, RenderOutcome};
use tempfile::TempDir;

/// Helper function to run rainchart against the fixtures in test/
fn run_rainchart(args: &[&str], out_dir: &Path) -> Result<String, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_rainchart"))
        .args(["--data-dir", "test", "--out-dir"])
        .arg(out_dir)
        .args(args)
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn fixture_runtime(out_dir: &Path) -> ChartRuntime {
    let catalog = SourceCatalog::discover(Path::new("test")).expect("Failed to read fixtures");
    ChartRuntime::new(ChartConfig::default(), Stylesheet::default(), catalog, out_dir)
}

#[test]
fn test_end_to_end_svg_export() {
    let out = TempDir::new().unwrap();
    let result = run_rainchart(&["--source", "rainfall"], out.path());
    assert!(result.is_ok(), "Failed: {:?}", result.err());

    let svg = fs::read_to_string(out.path().join("belize-rainfall-rainfall.svg")).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Toledo"));
    assert!(svg.contains("Stann Creek"));
}

#[test]
fn test_end_to_end_jpg_export() {
    let out = TempDir::new().unwrap();
    let result = run_rainchart(&["--source", "two_districts", "--format", "jpg"], out.path());
    assert!(result.is_ok(), "Failed: {:?}", result.err());

    let bytes = fs::read(out.path().join("belize-rainfall-two_districts.jpg")).unwrap();
    assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
}

#[test]
fn test_end_to_end_list_sources() {
    let out = TempDir::new().unwrap();
    let stdout = run_rainchart(&["--list"], out.path()).unwrap();
    let labels: Vec<&str> = stdout.lines().collect();
    assert_eq!(labels, vec!["empty", "rainfall", "two_districts", "wrong_columns"]);
}

#[test]
fn test_end_to_end_hover_label() {
    let out = TempDir::new().unwrap();
    let stdout = run_rainchart(&["--source", "two_districts", "--hover", "corozal"], out.path()).unwrap();
    assert!(stdout.contains("Corozal: 55.0 mm"));
}

#[test]
fn test_end_to_end_bad_schema_names_file() {
    let out = TempDir::new().unwrap();
    let result = run_rainchart(&["--source", "wrong_columns"], out.path());
    assert!(result.is_err(), "Should have failed with schema error");
    let stderr = result.unwrap_err();
    assert!(stderr.contains("wrong_columns.csv"));
    assert!(stderr.contains("Available sources: empty, rainfall, two_districts, wrong_columns"));
}

#[test]
fn test_end_to_end_empty_source_still_exports() {
    let out = TempDir::new().unwrap();
    let result = run_rainchart(&["--source", "empty"], out.path());
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(out.path().join("belize-rainfall-empty.svg").exists());
}

#[test]
fn test_end_to_end_bad_color() {
    let out = TempDir::new().unwrap();
    let result = run_rainchart(&["--source", "rainfall", "--bar-color", "#nothex"], out.path());
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Unrecognized color"));
}

#[tokio::test]
async fn test_pipeline_sorted_and_complete() {
    let out = TempDir::new().unwrap();
    let mut runtime = fixture_runtime(out.path());

    let outcome = runtime.render("rainfall").await;
    assert!(matches!(outcome, RenderOutcome::Rendered { bars: 6 }));

    let surface = runtime.surface().unwrap();
    let values: Vec<f64> = surface.bars.iter().map(|b| b.entry.value).collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(surface.bars[0].entry.category, "Toledo");
    assert_eq!(surface.bars[5].entry.category, "Corozal");

    let baseline = surface.plot_area.y + surface.plot_area.height;
    assert!(surface.bars.iter().all(|b| b.rect.y <= baseline));
}

#[tokio::test]
async fn test_switching_sources_leaves_nothing_stale() {
    let out = TempDir::new().unwrap();
    let mut runtime = fixture_runtime(out.path());

    runtime.render("rainfall").await;
    runtime.render("wrong_columns").await;
    let failed = runtime.surface().unwrap();
    assert!(failed.bars.is_empty());
    assert!(!failed.texts().any(|t| t == "Toledo"));

    runtime.render("empty").await;
    let empty = runtime.surface().unwrap();
    assert!(empty.bars.is_empty());
    assert!(!empty.texts().any(|t| t.contains("wrong_columns")));
}

#[tokio::test]
async fn test_raster_export_after_render() {
    let out = TempDir::new().unwrap();
    let mut runtime = fixture_runtime(out.path());
    assert!(matches!(runtime.export_raster(), Err(ChartError::ExportTargetMissing)));

    runtime.render("two_districts").await;
    let artifact = runtime.export_raster().unwrap();
    assert_eq!(
        artifact.path.file_name().unwrap().to_string_lossy(),
        "belize-rainfall-two_districts.jpg"
    );
}

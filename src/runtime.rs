// Chart runtime: the three entry points the control surface drives

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::compiler;
use crate::config::ChartConfig;
use crate::error::{ChartError, ChartResult};
use crate::export::{self, ExportArtifact};
use crate::interaction::HoverState;
use crate::ir::{RawRecord, SceneGraph};
use crate::loader::{self, DataSource, SourceCatalog};
use crate::palette::Stylesheet;
use crate::transform;

/// Tag for one requested load. Only the ticket matching the latest request
/// may replace the visible chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub source: DataSource,
}

#[derive(Debug)]
pub enum RenderOutcome {
    /// Chart drawn with this many bars.
    Rendered { bars: usize },
    /// Source loaded but had no rows; an empty chart is shown.
    Empty,
    /// Load failed; the error message replaced the chart.
    Failed(ChartError),
    /// A newer request superseded this one; nothing changed.
    Stale,
}

impl RenderOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, RenderOutcome::Stale)
    }
}

pub struct ChartRuntime {
    config: ChartConfig,
    stylesheet: Stylesheet,
    catalog: SourceCatalog,
    out_dir: PathBuf,
    generation: u64,
    surface: Option<SceneGraph>,
    hover: HoverState,
}

impl ChartRuntime {
    pub fn new(config: ChartConfig, stylesheet: Stylesheet, catalog: SourceCatalog, out_dir: impl Into<PathBuf>) -> Self {
        let hover = HoverState::new(config.unit.clone(), config.tooltip_offset);
        ChartRuntime {
            config,
            stylesheet,
            catalog,
            out_dir: out_dir.into(),
            generation: 0,
            surface: None,
            hover,
        }
    }

    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    /// The chart currently on display, if any.
    pub fn surface(&self) -> Option<&SceneGraph> {
        self.surface.as_ref()
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// Hover state together with the surface it applies to.
    pub fn hover_mut(&mut self) -> Option<(&SceneGraph, &mut HoverState)> {
        self.surface.as_ref().map(|surface| (surface, &mut self.hover))
    }

    /// Record a new request and return its ticket. Unknown ids still get a
    /// ticket so the failure is reported through the error surface.
    pub fn begin_load(&mut self, source_id: &str) -> LoadTicket {
        self.generation += 1;
        let source = self
            .catalog
            .find(source_id)
            .cloned()
            .unwrap_or_else(|| DataSource::new(source_id, source_id));
        debug!(generation = self.generation, source = %source.label, "Load requested");
        LoadTicket {
            generation: self.generation,
            source,
        }
    }

    /// Apply a finished load, unless a newer request has been made since.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: ChartResult<Vec<RawRecord>>) -> RenderOutcome {
        if ticket.generation != self.generation {
            warn!(
                generation = ticket.generation,
                latest = self.generation,
                source = %ticket.source.label,
                "Discarding stale load result"
            );
            return RenderOutcome::Stale;
        }

        let (surface, outcome) = match result {
            Ok(records) => {
                let entries = transform::aggregate(&records);
                let surface = compiler::compile_chart(&entries, &self.config, &ticket.source.label);
                if entries.is_empty() {
                    warn!(source = %ticket.source.label, "Data source has no rows");
                    (surface, RenderOutcome::Empty)
                } else {
                    info!(source = %ticket.source.label, bars = entries.len(), "Chart rendered");
                    (surface, RenderOutcome::Rendered { bars: entries.len() })
                }
            }
            Err(err) => {
                warn!(source = %ticket.source.label, error = %err, "Showing load error");
                let surface = compiler::compile_error(&self.config, &ticket.source.label, &ticket.source.file_name());
                (surface, RenderOutcome::Failed(err))
            }
        };

        // Swap the new surface in whole; hover state belonged to the old one
        self.surface = Some(surface);
        self.hover.reset();
        outcome
    }

    /// Load, aggregate and draw a source, replacing whatever was shown.
    pub async fn render(&mut self, source_id: &str) -> RenderOutcome {
        let ticket = self.begin_load(source_id);
        let result = if self.catalog.find(source_id).is_some() {
            loader::load_source(&ticket.source).await
        } else {
            Err(ChartError::data_load(source_id, "unknown data source"))
        };
        self.complete_load(ticket, result)
    }

    pub fn export_vector(&self) -> ChartResult<ExportArtifact> {
        let surface = self.surface.as_ref().ok_or(ChartError::ExportTargetMissing)?;
        export::export_vector(surface, &self.stylesheet, &self.config, &self.out_dir)
    }

    pub fn export_raster(&self) -> ChartResult<ExportArtifact> {
        let surface = self.surface.as_ref().ok_or(ChartError::ExportTargetMissing)?;
        export::export_raster(surface, &self.stylesheet, &self.config, &self.out_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Point, StyleClass, MONTHS};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const HEADER: &str = "District,Jan,Feb,Mar,Apr,May,Jun,Jul,Aug,Sep,Oct,Nov,Dec";

    fn fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("2019.csv"),
            format!(
                "{}\nOrange Walk,0,0,0,0,0,0,0,0,0,0,0,0\nCorozal,10,20,30,40,50,60,70,80,90,100,110,0\n",
                HEADER
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("2020.csv"),
            format!(
                "{}\nToledo,300,200,100,100,200,300,400,300,300,400,400,300\nCayo,50,40,30,20,60,150,200,150,180,200,150,100\nBelize,80,60,40,30,90,200,180,170,220,260,200,120\n",
                HEADER
            ),
        )
        .unwrap();
        fs::write(dir.path().join("empty.csv"), format!("{}\n", HEADER)).unwrap();
        fs::write(dir.path().join("broken.csv"), "not,a,rainfall,table\n1,2,3,4\n").unwrap();
        dir
    }

    fn runtime(data: &Path, out: &Path) -> ChartRuntime {
        let catalog = SourceCatalog::discover(data).unwrap();
        ChartRuntime::new(ChartConfig::default(), Stylesheet::default(), catalog, out)
    }

    fn records(category: &str, value: f64) -> Vec<RawRecord> {
        vec![RawRecord { category: category.to_string(), months: [Some(value); MONTHS] }]
    }

    #[tokio::test]
    async fn test_render_scenario_a() {
        let data = fixture_dir();
        let mut rt = runtime(data.path(), data.path());

        let outcome = rt.render("2019").await;
        assert!(matches!(outcome, RenderOutcome::Rendered { bars: 2 }));

        let surface = rt.surface().unwrap();
        assert_eq!(surface.bars[0].entry.category, "Corozal");
        assert_eq!(surface.bars[0].entry.value, 55.0);
        assert_eq!(surface.bars[1].entry.category, "Orange Walk");
        assert_eq!(surface.bars[1].entry.value, 0.0);
    }

    #[tokio::test]
    async fn test_render_failure_shows_error_naming_file() {
        let data = fixture_dir();
        let mut rt = runtime(data.path(), data.path());
        rt.render("2020").await;

        let outcome = rt.render("broken").await;
        assert!(matches!(outcome, RenderOutcome::Failed(ChartError::DataLoad { .. })));

        let surface = rt.surface().unwrap();
        assert!(surface.bars.is_empty());
        assert_eq!(surface.count_class(StyleClass::ErrorMessage), 1);
        assert_eq!(surface.count_class(StyleClass::GridLine), 0);
        assert!(surface.texts().any(|t| t.contains("broken.csv")));
    }

    #[tokio::test]
    async fn test_render_unknown_source() {
        let data = fixture_dir();
        let mut rt = runtime(data.path(), data.path());
        let outcome = rt.render("1999").await;
        assert!(matches!(&outcome, RenderOutcome::Failed(err) if err.is_recoverable()));
        assert!(rt.surface().unwrap().texts().any(|t| t.contains("1999")));
        assert!(rt.catalog().find("1999").is_none());
    }

    #[tokio::test]
    async fn test_switch_to_empty_clears_bars() {
        let data = fixture_dir();
        let mut rt = runtime(data.path(), data.path());
        rt.render("2020").await;
        assert_eq!(rt.surface().unwrap().bars.len(), 3);

        let outcome = rt.render("empty").await;
        assert!(matches!(outcome, RenderOutcome::Empty));
        let surface = rt.surface().unwrap();
        assert!(surface.bars.is_empty());
        assert_eq!(surface.count_class(StyleClass::ValueLabel), 0);
        assert_eq!(surface.source_label, "empty");
    }

    #[tokio::test]
    async fn test_rerender_is_idempotent() {
        let data = fixture_dir();
        let mut rt = runtime(data.path(), data.path());
        rt.render("2020").await;
        let first = rt.surface().unwrap().clone();
        rt.render("2020").await;
        assert_eq!(rt.surface().unwrap(), &first);
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut rt = ChartRuntime::new(
            ChartConfig::default(),
            Stylesheet::default(),
            SourceCatalog::default(),
            "out",
        );
        let older = rt.begin_load("2019");
        let newer = rt.begin_load("2020");

        // Newer request finishes first
        let outcome = rt.complete_load(newer, Ok(records("Cayo", 10.0)));
        assert!(matches!(outcome, RenderOutcome::Rendered { bars: 1 }));

        // Older one arrives late and must not replace the chart
        let outcome = rt.complete_load(older, Ok(records("Toledo", 99.0)));
        assert!(outcome.is_stale());
        let surface = rt.surface().unwrap();
        assert_eq!(surface.source_label, "2020");
        assert_eq!(surface.bars[0].entry.category, "Cayo");
    }

    #[test]
    fn test_stale_failure_does_not_show_error() {
        let mut rt = ChartRuntime::new(ChartConfig::default(), Stylesheet::default(), SourceCatalog::default(), "out");
        let older = rt.begin_load("a");
        let newer = rt.begin_load("b");
        rt.complete_load(newer, Ok(records("Cayo", 10.0)));
        let outcome = rt.complete_load(older, Err(ChartError::data_load("a", "timeout")));
        assert!(outcome.is_stale());
        assert_eq!(rt.surface().unwrap().bars.len(), 1);
    }

    #[test]
    fn test_export_before_render() {
        let rt = ChartRuntime::new(ChartConfig::default(), Stylesheet::default(), SourceCatalog::default(), "out");
        assert!(matches!(rt.export_vector(), Err(ChartError::ExportTargetMissing)));
        assert!(matches!(rt.export_raster(), Err(ChartError::ExportTargetMissing)));
    }

    #[tokio::test]
    async fn test_exports_named_after_label() {
        let data = fixture_dir();
        let out = TempDir::new().unwrap();
        let mut rt = runtime(data.path(), out.path());
        rt.render("2020").await;

        let svg = rt.export_vector().unwrap();
        assert_eq!(svg.path, out.path().join("belize-rainfall-2020.svg"));
        let jpg = rt.export_raster().unwrap();
        assert_eq!(jpg.path, out.path().join("belize-rainfall-2020.jpg"));
        assert!(jpg.path.exists());
    }

    #[tokio::test]
    async fn test_render_resets_hover() {
        let data = fixture_dir();
        let mut rt = runtime(data.path(), data.path());
        rt.render("2020").await;

        let (surface, hover) = rt.hover_mut().unwrap();
        let rect = surface.bars[0].rect;
        hover.dispatch(surface, Point::new(rect.x + 1.0, rect.bottom() - 1.0));
        assert!(rt.hover().tooltip().is_some());

        rt.render("2019").await;
        assert!(rt.hover().tooltip().is_none());
    }
}

// Data sources and asynchronous loading of their CSV content

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::csv_reader;
use crate::error::{ChartError, ChartResult};
use crate::ir::RawRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub label: String,
    pub path: PathBuf,
}

impl DataSource {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DataSource {
            label: label.into(),
            path: path.into(),
        }
    }

    /// File name used in error messages.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Enumerable set of data sources, ordered by label.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    sources: Vec<DataSource>,
}

impl SourceCatalog {
    pub fn new(mut sources: Vec<DataSource>) -> Self {
        sources.sort_by(|a, b| a.label.cmp(&b.label));
        SourceCatalog { sources }
    }

    /// Every `*.csv` file in `dir`, labeled by its file stem.
    pub fn discover(dir: &Path) -> ChartResult<Self> {
        let mut sources = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                sources.push(DataSource::new(stem.to_string_lossy(), path.clone()));
            }
        }
        debug!(dir = %dir.display(), count = sources.len(), "Discovered data sources");
        Ok(SourceCatalog::new(sources))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.label.as_str())
    }

    /// Look a source up by label or by file name.
    pub fn find(&self, id: &str) -> Option<&DataSource> {
        self.sources
            .iter()
            .find(|s| s.label == id || s.file_name() == id)
    }
}

/// Fetch and parse a source. Errors carry the source's file name.
pub async fn load_source(source: &DataSource) -> ChartResult<Vec<RawRecord>> {
    info!(source = %source.label, path = %source.path.display(), "Loading data source");

    let content = tokio::fs::read_to_string(&source.path)
        .await
        .map_err(|e| ChartError::data_load(source.file_name(), e))?;

    let records = csv_reader::parse_records(content.as_bytes())
        .map_err(|e| ChartError::data_load(source.file_name(), format!("{:#}", e)))?;

    debug!(source = %source.label, rows = records.len(), "Parsed data source");
    Ok(records)
}

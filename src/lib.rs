// Library exports for rainchart

pub mod config;
pub mod error;

// Pipeline stages
pub mod csv_reader;
pub mod loader;
pub mod ir;
pub mod transform;
pub mod scale;
pub mod compiler;
pub mod palette;
pub mod graph;
pub mod interaction;
pub mod export;
pub mod runtime;

pub use error::{ChartError, ChartResult};
pub use runtime::{ChartRuntime, RenderOutcome};

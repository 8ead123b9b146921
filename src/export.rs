// Export of a rendered chart to vector (SVG) or raster (JPEG) files.
// Both paths serialize the scene to SVG first; the raster path rasterizes it
// at a higher density on white and encodes JPEG. Output is staged in a temp
// file next to the destination and removed on any failure.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::ImageEncoder;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::ChartConfig;
use crate::error::{ChartError, ChartResult};
use crate::graph;
use crate::ir::SceneGraph;
use crate::palette::Stylesheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub path: PathBuf,
    pub size_bytes: usize,
}

pub fn export_vector(
    scene: &SceneGraph,
    sheet: &Stylesheet,
    config: &ChartConfig,
    out_dir: &Path,
) -> ChartResult<ExportArtifact> {
    let svg = graph::to_svg(scene, sheet, None).map_err(|e| ChartError::Render(format!("{:#}", e)))?;
    let file_name = config.export_file_name(&scene.source_label, ExportFormat::Svg.extension());
    let path = write_download(out_dir, &file_name, svg.as_bytes())?;

    info!(path = %path.display(), "Exported vector chart");
    Ok(ExportArtifact {
        format: ExportFormat::Svg,
        path,
        size_bytes: svg.len(),
    })
}

pub fn export_raster(
    scene: &SceneGraph,
    sheet: &Stylesheet,
    config: &ChartConfig,
    out_dir: &Path,
) -> ChartResult<ExportArtifact> {
    let svg = graph::to_svg(scene, sheet, None).map_err(|e| ChartError::Render(format!("{:#}", e)))?;
    let pixmap = rasterize(&svg, config.raster_scale)?;
    drop(svg);
    let jpeg = encode_jpeg(&pixmap, config.jpeg_quality)?;

    let file_name = config.export_file_name(&scene.source_label, ExportFormat::Jpeg.extension());
    let path = write_download(out_dir, &file_name, &jpeg)?;

    info!(
        path = %path.display(),
        width = pixmap.width(),
        height = pixmap.height(),
        "Exported raster chart"
    );
    Ok(ExportArtifact {
        format: ExportFormat::Jpeg,
        path,
        size_bytes: jpeg.len(),
    })
}

/// Rasterize an SVG document at `scale` times its logical size over white.
pub fn rasterize(svg: &str, scale: f32) -> ChartResult<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| ChartError::Rasterization(format!("Failed to decode SVG: {}", e)))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        ChartError::Rasterization(format!("Cannot allocate a {}x{} drawing surface", width, height))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Encode an opaque pixmap as JPEG.
pub fn encode_jpeg(pixmap: &tiny_skia::Pixmap, quality: u8) -> ChartResult<Vec<u8>> {
    let rgb: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue()]
        })
        .collect();

    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, quality)
        .write_image(&rgb, pixmap.width(), pixmap.height(), image::ColorType::Rgb8)
        .map_err(|e| ChartError::Rasterization(format!("Failed to encode JPEG: {}", e)))?;
    Ok(jpeg)
}

/// Write `bytes` to `out_dir/file_name` through a staged temporary file.
fn write_download(out_dir: &Path, file_name: &str, bytes: &[u8]) -> ChartResult<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let target = out_dir.join(file_name);

    let mut staged = NamedTempFile::new_in(out_dir)?;
    let result = staged.write_all(bytes).and_then(|_| staged.flush());
    if let Err(e) = result {
        debug!(file = %file_name, "Released staged export after write failure");
        return Err(ChartError::Io(e));
    }

    staged.persist(&target).map_err(|e| ChartError::Io(e.error))?;
    Ok(target)
}

// Chart layout and export configuration

/// Space reserved around the drawable area for axes, captions and title.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Margin {
            top: 60.0,
            right: 30.0,
            bottom: 80.0,
            left: 80.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    /// Fraction of each category slot left empty between bars.
    pub bar_padding: f64,
    /// Multiplier applied to the largest value to get the value-axis upper bound.
    pub headroom: f64,
    /// Tick count hint for the value axis.
    pub value_tick_hint: usize,
    pub title: String,
    pub x_caption: String,
    pub y_caption: String,
    pub unit: String,
    /// Prefix of exported file names: `<prefix>-<label>.<ext>`.
    pub file_prefix: String,
    /// Offset of the floating hover label from the pointer.
    pub tooltip_offset: (f64, f64),
    pub raster_scale: f32,
    pub jpeg_quality: u8,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 900,
            height: 500,
            margin: Margin::default(),
            bar_padding: 0.3,
            headroom: 1.15,
            value_tick_hint: 8,
            title: "Average Monthly Rainfall by District in Belize".to_string(),
            x_caption: "District".to_string(),
            y_caption: "Average Rainfall (mm)".to_string(),
            unit: "mm".to_string(),
            file_prefix: "belize-rainfall".to_string(),
            tooltip_offset: (12.0, -28.0),
            raster_scale: 2.0,
            jpeg_quality: 95,
        }
    }
}

impl ChartConfig {
    pub fn drawable_width(&self) -> f64 {
        (self.width as f64 - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn drawable_height(&self) -> f64 {
        (self.height as f64 - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// File name for an export of the given source label.
    pub fn export_file_name(&self, label: &str, extension: &str) -> String {
        format!("{}-{}.{}", self.file_prefix, label, extension)
    }
}

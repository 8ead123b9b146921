// Colors and per-class visual rules for chart elements

use plotters::style::RGBColor;

use crate::ir::StyleClass;

/// Parse a color given as `#rrggbb` or as one of the named category colors.
pub fn parse_color(input: &str) -> Option<RGBColor> {
    let input = input.trim();
    if let Some(hex) = input.strip_prefix('#') {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }

    let color = match input.to_ascii_lowercase().as_str() {
        "steelblue" => RGBColor(70, 130, 180),
        "blue" => RGBColor(31, 119, 180),
        "orange" => RGBColor(255, 127, 14),
        "green" => RGBColor(44, 160, 44),
        "red" => RGBColor(214, 39, 40),
        "purple" => RGBColor(148, 103, 189),
        "brown" => RGBColor(140, 86, 75),
        "pink" => RGBColor(227, 119, 194),
        "gray" | "grey" => RGBColor(127, 127, 127),
        "olive" => RGBColor(188, 189, 34),
        "cyan" => RGBColor(23, 190, 207),
        "black" => RGBColor(0, 0, 0),
        "white" => RGBColor(255, 255, 255),
        _ => return None,
    };
    Some(color)
}

/// Resolved look of one element class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub color: RGBColor,
    pub opacity: f64,
    pub stroke_width: u32,
    pub font_size: u32,
    pub bold: bool,
}

impl ElementStyle {
    fn stroke(color: RGBColor, stroke_width: u32) -> Self {
        ElementStyle { color, opacity: 1.0, stroke_width, font_size: 0, bold: false }
    }

    fn text(color: RGBColor, font_size: u32, bold: bool) -> Self {
        ElementStyle { color, opacity: 1.0, stroke_width: 0, font_size, bold }
    }
}

/// The chart's stylesheet. Drawing resolves every element through it, so a
/// serialized surface carries its styling inline.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub font_family: String,
    pub bar_fill: RGBColor,
    pub bar_opacity: f64,
    pub bar_hover_opacity: f64,
    pub bar_hover_stroke: RGBColor,
    pub bar_hover_stroke_width: u32,
    pub text_color: RGBColor,
    pub grid_color: RGBColor,
    pub axis_color: RGBColor,
    pub error_color: RGBColor,
    pub tooltip_fill: RGBColor,
    pub tooltip_border: RGBColor,
    pub tooltip_font_size: u32,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Stylesheet {
            font_family: "sans-serif".to_string(),
            bar_fill: RGBColor(70, 130, 180),
            bar_opacity: 0.85,
            bar_hover_opacity: 1.0,
            bar_hover_stroke: RGBColor(44, 62, 80),
            bar_hover_stroke_width: 2,
            text_color: RGBColor(51, 51, 51),
            grid_color: RGBColor(224, 224, 224),
            axis_color: RGBColor(102, 102, 102),
            error_color: RGBColor(192, 57, 43),
            tooltip_fill: RGBColor(255, 255, 255),
            tooltip_border: RGBColor(153, 153, 153),
            tooltip_font_size: 12,
        }
    }
}

impl Stylesheet {
    pub fn rule(&self, class: StyleClass) -> ElementStyle {
        match class {
            StyleClass::Bar => ElementStyle {
                color: self.bar_fill,
                opacity: self.bar_opacity,
                stroke_width: 0,
                font_size: 0,
                bold: false,
            },
            StyleClass::GridLine => ElementStyle::stroke(self.grid_color, 1),
            StyleClass::AxisLine | StyleClass::AxisTick => ElementStyle::stroke(self.axis_color, 1),
            StyleClass::TickLabel => ElementStyle::text(self.text_color, 12, false),
            StyleClass::ValueLabel => ElementStyle::text(self.text_color, 11, true),
            StyleClass::Title => ElementStyle::text(self.text_color, 20, true),
            StyleClass::AxisCaption => ElementStyle::text(self.text_color, 14, false),
            StyleClass::Message => ElementStyle::text(self.axis_color, 16, false),
            StyleClass::ErrorMessage => ElementStyle::text(self.error_color, 16, true),
        }
    }
}

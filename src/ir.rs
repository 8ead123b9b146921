// =============================================================================
// Phase 1: Loading
// =============================================================================

pub const MONTHS: usize = 12;

/// One row of a rainfall file: a district and its twelve monthly readings.
/// `None` marks a missing or non-numeric cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub category: String,
    pub months: [Option<f64>; MONTHS],
}

// =============================================================================
// Phase 2: Aggregation
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedEntry {
    pub category: String,
    pub value: f64,
}

// =============================================================================
// Phase 3: Compilation (Scene Graph)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle in surface coordinates (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Named visual role of an element. The stylesheet resolves each class to
/// concrete colors and fonts when the surface is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    Bar,
    GridLine,
    AxisLine,
    AxisTick,
    TickLabel,
    ValueLabel,
    Title,
    AxisCaption,
    Message,
    ErrorMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// A single bar, bound to the entry it represents.
#[derive(Debug, Clone, PartialEq)]
pub struct BarMark {
    pub entry: AggregatedEntry,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    DrawLine {
        from: Point,
        to: Point,
        class: StyleClass,
    },
    DrawText {
        at: Point,
        content: String,
        anchor: Anchor,
        /// Rotated a quarter turn counter-clockwise (vertical captions).
        vertical: bool,
        class: StyleClass,
    },
}

/// The rendered chart: everything needed to draw or export one frame.
/// Rebuilt from scratch on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    /// Label of the data source this surface was built from.
    pub source_label: String,
    /// Drawable area the bars and gridlines live in.
    pub plot_area: Rect,
    pub bars: Vec<BarMark>,
    pub commands: Vec<DrawCommand>,
}

impl SceneGraph {
    /// Index of the bar under `p`, if any.
    pub fn bar_at(&self, p: Point) -> Option<usize> {
        self.bars.iter().position(|bar| bar.rect.contains(p))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::DrawText { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    pub fn count_class(&self, class: StyleClass) -> usize {
        self.commands
            .iter()
            .filter(|cmd| match cmd {
                DrawCommand::DrawLine { class: c, .. } | DrawCommand::DrawText { class: c, .. } => {
                    *c == class
                }
            })
            .count()
    }
}

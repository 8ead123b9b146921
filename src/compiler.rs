use crate::config::ChartConfig;
use crate::ir::{AggregatedEntry, Anchor, BarMark, DrawCommand, Point, Rect, SceneGraph, StyleClass};
use crate::scale::{BandScale, LinearScale};
use crate::transform::format_value;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const VALUE_LABEL_GAP: f64 = 5.0;

pub const NO_DATA_MESSAGE: &str = "No data available";

/// Compile ranked entries into a complete chart surface
pub fn compile_chart(entries: &[AggregatedEntry], config: &ChartConfig, source_label: &str) -> SceneGraph {
    let plot_area = plot_area(config);
    let (ox, oy) = (plot_area.x, plot_area.y);
    let (w, h) = (plot_area.width, plot_area.height);

    let band = BandScale::new(
        entries.iter().map(|e| e.category.clone()).collect(),
        w,
        config.bar_padding,
    );
    let linear = LinearScale::for_values(entries.iter().map(|e| e.value), config.headroom, h);

    let mut commands = Vec::new();

    // Gridlines and value axis
    for tick in linear.ticks(config.value_tick_hint) {
        let y = oy + linear.map(tick);
        commands.push(DrawCommand::DrawLine {
            from: Point::new(ox, y),
            to: Point::new(ox + w, y),
            class: StyleClass::GridLine,
        });
        commands.push(DrawCommand::DrawLine {
            from: Point::new(ox - TICK_SIZE, y),
            to: Point::new(ox, y),
            class: StyleClass::AxisTick,
        });
        commands.push(text(
            Point::new(ox - TICK_SIZE - TICK_PADDING, y),
            format_tick(tick),
            Anchor::End,
            StyleClass::TickLabel,
        ));
    }
    commands.push(DrawCommand::DrawLine {
        from: Point::new(ox, oy),
        to: Point::new(ox, oy + h),
        class: StyleClass::AxisLine,
    });

    // Category axis
    commands.push(DrawCommand::DrawLine {
        from: Point::new(ox, oy + h),
        to: Point::new(ox + w, oy + h),
        class: StyleClass::AxisLine,
    });

    let mut bars = Vec::with_capacity(entries.len());
    for entry in entries {
        // Categories come from the entries themselves, so the lookup always succeeds
        let (Some(left), Some(center)) = (band.position(&entry.category), band.center(&entry.category)) else {
            continue;
        };
        let cx = ox + center;

        commands.push(DrawCommand::DrawLine {
            from: Point::new(cx, oy + h),
            to: Point::new(cx, oy + h + TICK_SIZE),
            class: StyleClass::AxisTick,
        });
        commands.push(text(
            Point::new(cx, oy + h + TICK_SIZE + TICK_PADDING + 10.0),
            entry.category.clone(),
            Anchor::Middle,
            StyleClass::TickLabel,
        ));

        let top = linear.map(entry.value);
        let rect = Rect {
            x: ox + left,
            y: oy + top,
            width: band.bandwidth(),
            height: h - top,
        };
        commands.push(text(
            Point::new(cx, rect.y - VALUE_LABEL_GAP),
            format_value(entry.value),
            Anchor::Middle,
            StyleClass::ValueLabel,
        ));
        bars.push(BarMark { entry: entry.clone(), rect });
    }

    if entries.is_empty() {
        commands.push(text(
            Point::new(ox + w / 2.0, oy + h / 2.0),
            NO_DATA_MESSAGE.to_string(),
            Anchor::Middle,
            StyleClass::Message,
        ));
    }

    // Title and captions
    commands.push(text(
        Point::new(config.width as f64 / 2.0, config.margin.top / 2.0),
        config.title.clone(),
        Anchor::Middle,
        StyleClass::Title,
    ));
    commands.push(text(
        Point::new(ox + w / 2.0, config.height as f64 - 20.0),
        config.x_caption.clone(),
        Anchor::Middle,
        StyleClass::AxisCaption,
    ));
    commands.push(DrawCommand::DrawText {
        at: Point::new(20.0, oy + h / 2.0),
        content: config.y_caption.clone(),
        anchor: Anchor::Middle,
        vertical: true,
        class: StyleClass::AxisCaption,
    });

    SceneGraph {
        width: config.width,
        height: config.height,
        source_label: source_label.to_string(),
        plot_area,
        bars,
        commands,
    }
}

/// A surface holding nothing but a centered error naming the failed source
pub fn compile_error(config: &ChartConfig, source_label: &str, source_name: &str) -> SceneGraph {
    let plot_area = plot_area(config);
    SceneGraph {
        width: config.width,
        height: config.height,
        source_label: source_label.to_string(),
        plot_area,
        bars: Vec::new(),
        commands: vec![text(
            Point::new(plot_area.x + plot_area.width / 2.0, plot_area.y + plot_area.height / 2.0),
            format!("Error loading data from {}", source_name),
            Anchor::Middle,
            StyleClass::ErrorMessage,
        )],
    }
}

fn plot_area(config: &ChartConfig) -> Rect {
    Rect {
        x: config.margin.left,
        y: config.margin.top,
        width: config.drawable_width(),
        height: config.drawable_height(),
    }
}

fn text(at: Point, content: String, anchor: Anchor, class: StyleClass) -> DrawCommand {
    DrawCommand::DrawText {
        at,
        content,
        anchor,
        vertical: false,
        class,
    }
}

/// Integers print bare; fractional ticks keep only the digits they need.
fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.6}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use crate::interaction::HoverState;
use crate::ir::{Anchor, DrawCommand, Point, SceneGraph, StyleClass};
use crate::palette::{ElementStyle, Stylesheet};

const TOOLTIP_PADDING: i32 = 6;
const TOOLTIP_HEIGHT: i32 = 24;
/// Rough advance per character used to size the tooltip box.
const TOOLTIP_CHAR_WIDTH: f64 = 7.0;

/// Draw a scene onto any plotters backend. Gridlines go first, then bars,
/// then every other element, then the hover overlay if one is given.
pub fn draw_scene<DB>(
    root: &DrawingArea<DB, Shift>,
    scene: &SceneGraph,
    sheet: &Stylesheet,
    hover: Option<&HoverState>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (background, foreground): (Vec<&DrawCommand>, Vec<&DrawCommand>) = scene
        .commands
        .iter()
        .partition(|cmd| matches!(cmd, DrawCommand::DrawLine { class: StyleClass::GridLine, .. }));

    for cmd in background {
        draw_command(root, cmd, sheet)?;
    }

    let bar_rule = sheet.rule(StyleClass::Bar);
    for (index, bar) in scene.bars.iter().enumerate() {
        let emphasized = hover.map(|h| h.is_emphasized(index)).unwrap_or(false);
        let opacity = if emphasized { sheet.bar_hover_opacity } else { bar_rule.opacity };
        let corners = [
            to_backend(Point::new(bar.rect.x, bar.rect.y)),
            to_backend(Point::new(bar.rect.x + bar.rect.width, bar.rect.bottom())),
        ];

        root.draw(&Rectangle::new(corners, bar_rule.color.mix(opacity).filled()))
            .with_context(|| format!("Failed to draw bar '{}'", bar.entry.category))?;

        if emphasized {
            let outline = ShapeStyle {
                color: sheet.bar_hover_stroke.to_rgba(),
                filled: false,
                stroke_width: sheet.bar_hover_stroke_width,
            };
            root.draw(&Rectangle::new(corners, outline))
                .context("Failed to draw bar outline")?;
        }
    }

    for cmd in foreground {
        draw_command(root, cmd, sheet)?;
    }

    if let Some(tooltip) = hover.and_then(|h| h.tooltip()) {
        let (x, y) = to_backend(tooltip.position);
        let width = (tooltip.text.chars().count() as f64 * TOOLTIP_CHAR_WIDTH) as i32 + 2 * TOOLTIP_PADDING;
        let corners = [(x, y), (x + width, y + TOOLTIP_HEIGHT)];

        root.draw(&Rectangle::new(corners, sheet.tooltip_fill.filled()))
            .context("Failed to draw tooltip background")?;
        root.draw(&Rectangle::new(corners, ShapeStyle {
            color: sheet.tooltip_border.to_rgba(),
            filled: false,
            stroke_width: 1,
        }))
        .context("Failed to draw tooltip border")?;

        let font = FontDesc::new(
            FontFamily::Name(&sheet.font_family),
            sheet.tooltip_font_size as f64,
            FontStyle::Normal,
        );
        let style = TextStyle::from(font)
            .color(&sheet.text_color)
            .pos(Pos::new(HPos::Left, VPos::Center));
        root.draw_text(&tooltip.text, &style, (x + TOOLTIP_PADDING, y + TOOLTIP_HEIGHT / 2))
            .context("Failed to draw tooltip text")?;
    }

    Ok(())
}

fn draw_command<DB>(root: &DrawingArea<DB, Shift>, cmd: &DrawCommand, sheet: &Stylesheet) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    match cmd {
        DrawCommand::DrawLine { from, to, class } => {
            let rule = sheet.rule(*class);
            let style = ShapeStyle {
                color: rule.color.mix(rule.opacity),
                filled: false,
                stroke_width: rule.stroke_width,
            };
            root.draw(&PathElement::new(vec![to_backend(*from), to_backend(*to)], style))
                .with_context(|| format!("Failed to draw {:?} line", class))?;
        }
        DrawCommand::DrawText { at, content, anchor, vertical, class } => {
            let rule = sheet.rule(*class);
            let color = rule.color.mix(rule.opacity);
            let font = text_font(sheet, &rule, *vertical);
            let v_pos = if *class == StyleClass::ValueLabel { VPos::Bottom } else { VPos::Center };
            let style = TextStyle::from(font)
                .color(&color)
                .pos(Pos::new(h_pos(*anchor), v_pos));
            root.draw_text(content, &style, to_backend(*at))
                .with_context(|| format!("Failed to draw text '{}'", content))?;
        }
    }
    Ok(())
}

fn text_font<'a>(sheet: &'a Stylesheet, rule: &ElementStyle, vertical: bool) -> FontDesc<'a> {
    let style = if rule.bold { FontStyle::Bold } else { FontStyle::Normal };
    let font = FontDesc::new(FontFamily::Name(&sheet.font_family), rule.font_size as f64, style);
    if vertical {
        font.transform(FontTransform::Rotate270)
    } else {
        font
    }
}

fn h_pos(anchor: Anchor) -> HPos {
    match anchor {
        Anchor::Start => HPos::Left,
        Anchor::Middle => HPos::Center,
        Anchor::End => HPos::Right,
    }
}

fn to_backend(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Serialize a scene into a standalone SVG document. Every style is written
/// as inline attributes, so the document renders the same anywhere.
pub fn to_svg(scene: &SceneGraph, sheet: &Stylesheet, hover: Option<&HoverState>) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height)).into_drawing_area();
        draw_scene(&root, scene, sheet, hover)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg)
}

// Hover feedback for bars: emphasis and a floating label under the pointer

use crate::ir::{AggregatedEntry, Point, SceneGraph};
use crate::transform::format_value;

/// Callbacks attached to every rendered bar.
pub trait BarInteraction {
    fn on_enter(&mut self, entry: &AggregatedEntry, index: usize, pointer: Point);
    fn on_move(&mut self, entry: &AggregatedEntry, index: usize, pointer: Point);
    fn on_leave(&mut self, entry: &AggregatedEntry, index: usize);
}

/// Floating label shown while a bar is hovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverState {
    unit: String,
    offset: (f64, f64),
    emphasized: Option<usize>,
    tooltip: Option<Tooltip>,
}

impl HoverState {
    pub fn new(unit: impl Into<String>, offset: (f64, f64)) -> Self {
        HoverState {
            unit: unit.into(),
            offset,
            emphasized: None,
            tooltip: None,
        }
    }

    pub fn emphasized(&self) -> Option<usize> {
        self.emphasized
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn is_emphasized(&self, index: usize) -> bool {
        self.emphasized == Some(index)
    }

    pub fn reset(&mut self) {
        self.emphasized = None;
        self.tooltip = None;
    }

    fn label_position(&self, pointer: Point) -> Point {
        Point::new(pointer.x + self.offset.0, pointer.y + self.offset.1)
    }

    /// Route a raw pointer position to enter/move/leave callbacks by
    /// hit-testing the scene's bars.
    pub fn dispatch(&mut self, scene: &SceneGraph, pointer: Point) {
        let hit = scene.bar_at(pointer);
        match (self.emphasized, hit) {
            (Some(current), Some(index)) if current == index => {
                self.on_move(&scene.bars[index].entry, index, pointer);
            }
            (current, hit) => {
                if let Some(current) = current {
                    if let Some(bar) = scene.bars.get(current) {
                        self.on_leave(&bar.entry, current);
                    } else {
                        self.reset();
                    }
                }
                if let Some(index) = hit {
                    self.on_enter(&scene.bars[index].entry, index, pointer);
                }
            }
        }
    }

    /// Pointer left the chart entirely.
    pub fn pointer_out(&mut self, scene: &SceneGraph) {
        if let Some(current) = self.emphasized {
            match scene.bars.get(current) {
                Some(bar) => self.on_leave(&bar.entry, current),
                None => self.reset(),
            }
        }
    }
}

impl BarInteraction for HoverState {
    fn on_enter(&mut self, entry: &AggregatedEntry, index: usize, pointer: Point) {
        self.emphasized = Some(index);
        self.tooltip = Some(Tooltip {
            text: format!("{}: {} {}", entry.category, format_value(entry.value), self.unit),
            position: self.label_position(pointer),
        });
    }

    fn on_move(&mut self, _entry: &AggregatedEntry, index: usize, pointer: Point) {
        if self.emphasized != Some(index) {
            return;
        }
        let position = self.label_position(pointer);
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.position = position;
        }
    }

    fn on_leave(&mut self, _entry: &AggregatedEntry, index: usize) {
        if self.emphasized == Some(index) {
            self.reset();
        }
    }
}

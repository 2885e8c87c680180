//! Inline editing of text bodies and shape labels.

use super::Editor;
use crate::shapes::{NodeId, NodeKind};
use kurbo::Point;

/// What an inline edit writes back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// Body of a text node.
    Body,
    /// Label of a rect, circle or line.
    Label,
}

/// An open inline editor overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineEdit {
    pub node_id: NodeId,
    pub target: EditTarget,
    /// Current contents of the overlay.
    pub text: String,
    /// Contents when the edit opened, restored on cancel.
    pub original: String,
    /// Overlay position in screen coordinates.
    pub anchor: Point,
    /// Font size in screen pixels.
    pub font_size: f64,
}

impl InlineEdit {
    /// Rows needed to show the text without scrolling.
    pub fn rows(&self) -> usize {
        self.text.lines().count().max(1)
    }

    /// Longest line in characters.
    pub fn columns(&self) -> usize {
        self.text.lines().map(|l| l.chars().count()).max().unwrap_or(0).max(1)
    }
}

impl Editor {
    pub fn inline_edit(&self) -> Option<&InlineEdit> {
        self.inline_edit.as_ref()
    }

    /// Select the node under `position` and open an inline editor on it.
    ///
    /// Returns `false` when nothing editable was hit.
    pub fn double_click(&mut self, position: Point) -> bool {
        if self.inline_edit.is_some() {
            self.commit_inline_edit();
        }
        let world = self.viewport.screen_to_world(position);
        let Some(node) = self.scene.hit_test(world, None) else {
            return false;
        };
        let scale = self.viewport.scale();
        let (target, text, anchor, font_size) = match &node.kind {
            NodeKind::Text(shape) => (
                EditTarget::Body,
                shape.text.clone(),
                node.position(),
                shape.font_size,
            ),
            NodeKind::Rect(_) | NodeKind::Circle(_) => (
                EditTarget::Label,
                node.label().map(|l| l.text.clone()).unwrap_or_default(),
                node.bounds().center(),
                node.label().map_or(14.0, |l| l.font_size),
            ),
            NodeKind::Line(_) => (
                EditTarget::Label,
                node.label().map(|l| l.text.clone()).unwrap_or_default(),
                node.line_start().midpoint(node.line_end()),
                node.label().map_or(14.0, |l| l.font_size),
            ),
            NodeKind::Freehand(_) => return false,
        };
        let node_id = node.id.clone();
        self.scene.select_only([&node_id]);
        self.inline_edit = Some(InlineEdit {
            node_id,
            target,
            original: text.clone(),
            text,
            anchor: self.viewport.world_to_screen(anchor),
            font_size: font_size * scale,
        });
        self.notify();
        true
    }

    /// Replace the overlay contents as the user types.
    pub fn set_inline_text(&mut self, text: impl Into<String>) {
        if let Some(edit) = &mut self.inline_edit {
            edit.text = text.into();
            self.notify();
        }
    }

    /// Write the overlay back to its node and close it.
    ///
    /// An empty text body keeps the previous text; an empty label removes
    /// the label. Returns `true` if the node changed.
    pub fn commit_inline_edit(&mut self) -> bool {
        let Some(edit) = self.inline_edit.take() else {
            return false;
        };
        let trimmed = edit.text.trim();
        let changed = match self.scene.get_mut(&edit.node_id) {
            Some(node) => match edit.target {
                EditTarget::Body => match &mut node.kind {
                    NodeKind::Text(shape) if !trimmed.is_empty() && shape.text != trimmed => {
                        shape.text = trimmed.to_string();
                        let size = shape.approximate_size();
                        node.width = size.width;
                        node.height = size.height;
                        true
                    }
                    _ => false,
                },
                EditTarget::Label => {
                    let next = (!trimmed.is_empty()).then(|| trimmed.to_string());
                    let current = node.label().map(|l| l.text.clone());
                    current != next && node.set_label(next)
                }
            },
            None => {
                log::debug!("Inline edit target {} is gone", edit.node_id);
                false
            }
        };
        if changed {
            self.commit();
        } else {
            self.notify();
        }
        changed
    }

    /// Close the overlay without writing anything.
    pub fn cancel_inline_edit(&mut self) {
        if self.inline_edit.take().is_some() {
            self.notify();
        }
    }
}

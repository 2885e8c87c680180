//! Bridge from a streamed diagram description to scene nodes.
//!
//! A generator emits newline-delimited JSON records, one per node or edge.
//! [`JsonlDecoder`] turns arbitrary text chunks into [`AiItem`]s and
//! [`DiagramBridge`] applies them to an [`Editor`], laying nodes out on a
//! grid and connecting edges with bound lines.

use crate::editor::Editor;
use crate::shapes::{Anchor, LineBinding, NodeId, NodeKind, SceneNode};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Columns of the layout grid.
pub const GRID_COLUMNS: usize = 4;
/// Horizontal distance between grid cells.
pub const COLUMN_SPACING: f64 = 220.0;
/// Vertical distance between grid rows.
pub const ROW_SPACING: f64 = 140.0;
/// Size of generated nodes.
pub const NODE_WIDTH: f64 = 160.0;
pub const NODE_HEIGHT: f64 = 60.0;

/// Shape of a generated node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiShape {
    #[default]
    Rect,
    Circle,
}

/// One record of the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AiItem {
    Node {
        id: String,
        label: String,
        #[serde(default)]
        shape: AiShape,
    },
    Edge {
        id: String,
        source: String,
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

/// Incremental JSONL decoder.
#[derive(Debug, Default)]
pub struct JsonlDecoder {
    buffer: String,
}

impl JsonlDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the items of every line it completes.
    pub fn push(&mut self, chunk: &str) -> Vec<AiItem> {
        self.buffer.push_str(chunk);
        let mut items = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            items.extend(parse_line(&line));
        }
        items
    }

    /// Flush a trailing line that had no newline.
    pub fn finish(&mut self) -> Option<AiItem> {
        let rest = std::mem::take(&mut self.buffer);
        parse_line(&rest)
    }
}

fn parse_line(line: &str) -> Option<AiItem> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(item) => Some(item),
        Err(e) => {
            log::warn!("Skipping malformed diagram record {:?}: {}", line, e);
            None
        }
    }
}

/// Applies streamed items to an editor.
#[derive(Debug)]
pub struct DiagramBridge {
    origin: Point,
    /// External node id to scene id.
    nodes: HashMap<String, NodeId>,
    edges: HashSet<String>,
    placed: usize,
}

impl Default for DiagramBridge {
    fn default() -> Self {
        Self::new(Point::new(100.0, 100.0))
    }
}

impl DiagramBridge {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            nodes: HashMap::new(),
            edges: HashSet::new(),
            placed: 0,
        }
    }

    /// Scene id created for an external node id.
    pub fn scene_id(&self, external: &str) -> Option<&NodeId> {
        self.nodes.get(external)
    }

    /// Top-left corner of the `index`-th node.
    pub fn slot(&self, index: usize) -> Point {
        let col = (index % GRID_COLUMNS) as f64;
        let row = (index / GRID_COLUMNS) as f64;
        Point::new(self.origin.x + col * COLUMN_SPACING, self.origin.y + row * ROW_SPACING)
    }

    /// Apply one item. Returns the id of the created scene node, if any.
    pub fn apply(&mut self, editor: &mut Editor, item: AiItem) -> Option<NodeId> {
        match item {
            AiItem::Node { id, label, shape } => self.add_node(editor, id, label, shape),
            AiItem::Edge {
                id,
                source,
                target,
                label,
            } => self.add_edge(editor, id, &source, &target, label),
        }
    }

    fn add_node(&mut self, editor: &mut Editor, id: String, label: String, shape: AiShape) -> Option<NodeId> {
        if self.nodes.contains_key(&id) {
            log::debug!("Ignoring repeated diagram node {}", id);
            return None;
        }
        let slot = self.slot(self.placed);
        let mut node = match shape {
            AiShape::Rect => SceneNode::rect(slot.x, slot.y, NODE_WIDTH, NODE_HEIGHT),
            AiShape::Circle => SceneNode::circle(slot.x, slot.y, NODE_WIDTH, NODE_HEIGHT),
        };
        let label = label.trim();
        if !label.is_empty() {
            node.set_label(Some(label.to_string()));
        }
        match editor.add_node(node) {
            Ok(scene_id) => {
                self.placed += 1;
                self.nodes.insert(id, scene_id.clone());
                Some(scene_id)
            }
            Err(e) => {
                log::warn!("Could not add diagram node {}: {}", id, e);
                None
            }
        }
    }

    fn add_edge(
        &mut self,
        editor: &mut Editor,
        id: String,
        source: &str,
        target: &str,
        label: Option<String>,
    ) -> Option<NodeId> {
        if self.edges.contains(&id) {
            log::debug!("Ignoring repeated diagram edge {}", id);
            return None;
        }
        let endpoints = self.bounds_of(editor, source).zip(self.bounds_of(editor, target));
        let Some(((from_id, from), (to_id, to))) = endpoints else {
            log::debug!("Dropping edge {}: {} -> {} has an unknown endpoint", id, source, target);
            return None;
        };
        let (start_anchor, end_anchor) = facing_anchors(from, to);

        let mut line = SceneNode::line(start_anchor.point_in(from), end_anchor.point_in(to));
        if let NodeKind::Line(shape) = &mut line.kind {
            shape.end_arrow = true;
            shape.start_binding = Some(LineBinding::new(from_id, start_anchor));
            shape.end_binding = Some(LineBinding::new(to_id, end_anchor));
        }
        if let Some(text) = label.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            line.set_label(Some(text.to_string()));
        }
        match editor.add_node(line) {
            Ok(scene_id) => {
                self.edges.insert(id);
                Some(scene_id)
            }
            Err(e) => {
                log::warn!("Could not add diagram edge {}: {}", id, e);
                None
            }
        }
    }

    fn bounds_of(&self, editor: &Editor, external: &str) -> Option<(NodeId, Rect)> {
        let scene_id = self.nodes.get(external)?;
        let node = editor.scene().get(scene_id)?;
        Some((scene_id.clone(), node.bounds()))
    }
}

/// Anchors on `from` and `to` that face each other.
fn facing_anchors(from: Rect, to: Rect) -> (Anchor, Anchor) {
    let delta = to.center() - from.center();
    if delta.x.abs() >= delta.y.abs() {
        if delta.x >= 0.0 {
            (Anchor::E, Anchor::W)
        } else {
            (Anchor::W, Anchor::E)
        }
    } else if delta.y >= 0.0 {
        (Anchor::S, Anchor::N)
    } else {
        (Anchor::N, Anchor::S)
    }
}

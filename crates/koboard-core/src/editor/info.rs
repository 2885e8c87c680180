//! Derived view-state for the surrounding UI.

use crate::shapes::{LineBinding, NodeId, NodeKind, NodeType, SceneNode};
use serde::{Serialize, Serializer};

/// A property value that is either shared by the whole selection or mixed.
///
/// Serializes as the value itself or the string `"mixed"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Mixed<T> {
    Value(T),
    Mixed,
}

impl<T: PartialEq> Mixed<T> {
    /// Collapse values: equal values give `Value`, otherwise `Mixed`.
    /// `None` when there are no values at all.
    pub fn of(values: impl IntoIterator<Item = T>) -> Option<Self> {
        let mut values = values.into_iter();
        let first = values.next()?;
        for value in values {
            if value != first {
                return Some(Mixed::Mixed);
            }
        }
        Some(Mixed::Value(first))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Mixed::Value(v) => Some(v),
            Mixed::Mixed => None,
        }
    }
}

impl<T: Serialize> Serialize for Mixed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Mixed::Value(v) => v.serialize(serializer),
            Mixed::Mixed => serializer.serialize_str("mixed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeInfo {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInfo {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_size: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInfo {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub stroke: String,
    pub line_width: f64,
    pub start_arrow: bool,
    pub end_arrow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_binding: Option<LineBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_binding: Option<LineBinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreehandInfo {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub stroke: String,
    pub stroke_width: f64,
    pub point_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSelectionInfo {
    pub count: usize,
    pub ids: Vec<NodeId>,
    pub node_types: Vec<NodeType>,
    pub x: Mixed<f64>,
    pub y: Mixed<f64>,
    pub width: Mixed<f64>,
    pub height: Mixed<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Mixed<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Mixed<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Mixed<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Mixed<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<Mixed<f64>>,
}

/// Summary of the current selection for property panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SelectionInfo {
    None,
    Rect(ShapeInfo),
    Circle(ShapeInfo),
    Text(TextInfo),
    Line(LineInfo),
    Freehand(FreehandInfo),
    Multi(MultiSelectionInfo),
}

impl SelectionInfo {
    /// Summarize the given selected nodes.
    pub fn from_nodes(selected: &[&SceneNode]) -> Self {
        match selected {
            [] => SelectionInfo::None,
            [node] => single(node),
            nodes => SelectionInfo::Multi(multi(nodes)),
        }
    }
}

fn single(node: &SceneNode) -> SelectionInfo {
    let label = node.label().map(|l| l.text.clone());
    match &node.kind {
        NodeKind::Rect(shape) => SelectionInfo::Rect(ShapeInfo {
            id: node.id.clone(),
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
            fill: shape.fill.clone(),
            stroke: shape.stroke.clone(),
            corner_radius: shape.corner_radius,
            label,
        }),
        NodeKind::Circle(shape) => SelectionInfo::Circle(ShapeInfo {
            id: node.id.clone(),
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
            fill: shape.fill.clone(),
            stroke: shape.stroke.clone(),
            corner_radius: None,
            label,
        }),
        NodeKind::Text(shape) => SelectionInfo::Text(TextInfo {
            id: node.id.clone(),
            x: node.x,
            y: node.y,
            text: shape.text.clone(),
            font_size: shape.font_size,
            color: shape.color.clone(),
        }),
        NodeKind::Line(shape) => {
            let end = node.line_end();
            SelectionInfo::Line(LineInfo {
                id: node.id.clone(),
                x: node.x,
                y: node.y,
                end_x: end.x,
                end_y: end.y,
                stroke: shape.stroke.clone(),
                line_width: shape.line_width,
                start_arrow: shape.start_arrow,
                end_arrow: shape.end_arrow,
                label,
                start_binding: shape.start_binding.clone(),
                end_binding: shape.end_binding.clone(),
            })
        }
        NodeKind::Freehand(shape) => SelectionInfo::Freehand(FreehandInfo {
            id: node.id.clone(),
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
            stroke: shape.stroke.clone(),
            stroke_width: shape.stroke_width,
            point_count: shape.len(),
        }),
    }
}

fn multi(nodes: &[&SceneNode]) -> MultiSelectionInfo {
    let mut node_types: Vec<NodeType> = Vec::new();
    for node in nodes {
        if !node_types.contains(&node.node_type()) {
            node_types.push(node.node_type());
        }
    }

    let shape_styles: Vec<(&String, &String)> = nodes
        .iter()
        .filter_map(|n| match &n.kind {
            NodeKind::Rect(s) => Some((&s.fill, &s.stroke)),
            NodeKind::Circle(s) => Some((&s.fill, &s.stroke)),
            _ => None,
        })
        .collect();
    let texts: Vec<(f64, &String)> = nodes
        .iter()
        .filter_map(|n| match &n.kind {
            NodeKind::Text(t) => Some((t.font_size, &t.color)),
            _ => None,
        })
        .collect();
    let lines: Vec<(f64, &String)> = nodes
        .iter()
        .filter_map(|n| n.as_line().map(|l| (l.line_width, &l.stroke)))
        .collect();

    let (mut fill, mut stroke) = (None, None);
    if shape_styles.len() == nodes.len() {
        fill = Mixed::of(shape_styles.iter().map(|(f, _)| (*f).clone()));
        stroke = Mixed::of(shape_styles.iter().map(|(_, s)| (*s).clone()));
    } else if !shape_styles.is_empty() {
        fill = Some(Mixed::Mixed);
        stroke = Some(Mixed::Mixed);
    }

    let (mut font_size, mut color) = (None, None);
    if texts.len() == nodes.len() {
        font_size = Mixed::of(texts.iter().map(|(size, _)| *size));
        color = Mixed::of(texts.iter().map(|(_, c)| (*c).clone()));
    } else if !texts.is_empty() {
        color = Some(Mixed::Mixed);
    }

    let mut line_width = None;
    if lines.len() == nodes.len() {
        line_width = Mixed::of(lines.iter().map(|(w, _)| *w));
        stroke = Mixed::of(lines.iter().map(|(_, s)| (*s).clone()));
    }

    MultiSelectionInfo {
        count: nodes.len(),
        ids: nodes.iter().map(|n| n.id.clone()).collect(),
        node_types,
        x: Mixed::of(nodes.iter().map(|n| n.x)).unwrap_or(Mixed::Mixed),
        y: Mixed::of(nodes.iter().map(|n| n.y)).unwrap_or(Mixed::Mixed),
        width: Mixed::of(nodes.iter().map(|n| n.width)).unwrap_or(Mixed::Mixed),
        height: Mixed::of(nodes.iter().map(|n| n.height)).unwrap_or(Mixed::Mixed),
        fill,
        stroke,
        font_size,
        color,
        line_width,
    }
}

/// Availability of undo and redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoRedoState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Property changes applied to every selected node where they make sense.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeProps {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub corner_radius: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub line_width: Option<f64>,
    pub stroke_width: Option<f64>,
    pub start_arrow: Option<bool>,
    pub end_arrow: Option<bool>,
    /// `Some("")` removes the label.
    pub label: Option<String>,
}

impl NodeProps {
    /// Apply to one node. Returns `true` if anything changed.
    pub(crate) fn apply(&self, node: &mut SceneNode) -> bool {
        let before = node.clone();
        if let Some(x) = self.x {
            node.x = x;
        }
        if let Some(y) = self.y {
            node.y = y;
        }
        if let NodeKind::Freehand(shape) = &mut node.kind {
            let sx = self.width.map_or(1.0, |w| crate::selection::ratio(w, node.width));
            let sy = self.height.map_or(1.0, |h| crate::selection::ratio(h, node.height));
            shape.scale_points(sx, sy);
        }
        if let Some(width) = self.width {
            node.width = width;
        }
        if let Some(height) = self.height {
            node.height = height;
        }
        if let Some(label) = &self.label {
            let text = label.trim();
            node.set_label((!text.is_empty()).then(|| text.to_string()));
        }
        match &mut node.kind {
            NodeKind::Rect(shape) => {
                set(&mut shape.fill, &self.fill);
                set(&mut shape.stroke, &self.stroke);
                if let Some(radius) = self.corner_radius {
                    shape.corner_radius = (radius > 0.0).then_some(radius);
                }
            }
            NodeKind::Circle(shape) => {
                set(&mut shape.fill, &self.fill);
                set(&mut shape.stroke, &self.stroke);
            }
            NodeKind::Text(shape) => {
                set(&mut shape.text, &self.text);
                set(&mut shape.font_size, &self.font_size);
                set(&mut shape.color, &self.color);
                if self.text.is_some() || self.font_size.is_some() {
                    let size = shape.approximate_size();
                    node.width = size.width;
                    node.height = size.height;
                }
            }
            NodeKind::Line(shape) => {
                set(&mut shape.stroke, &self.stroke);
                set(&mut shape.line_width, &self.line_width);
                set(&mut shape.start_arrow, &self.start_arrow);
                set(&mut shape.end_arrow, &self.end_arrow);
            }
            NodeKind::Freehand(shape) => {
                set(&mut shape.stroke, &self.stroke);
                set(&mut shape.stroke_width, &self.stroke_width);
            }
        }
        *node != before
    }
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

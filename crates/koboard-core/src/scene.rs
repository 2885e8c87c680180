//! Scene: the ordered collection of nodes.

use crate::paint::Painter;
use crate::shapes::{LineBinding, LineEnd, NodeId, NodeType, SceneNode, rect_contains_rect, rects_overlap};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Scene loading errors.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Invalid scene JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid {kind} node at index {index}: {source}")]
    InvalidNode {
        index: usize,
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),
}

/// Serialized form of a scene: `{ "nodes": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    pub nodes: Vec<SceneNode>,
}

#[derive(Deserialize)]
struct RawSceneData {
    nodes: Vec<serde_json::Value>,
}

impl SceneData {
    /// Parse scene JSON, skipping records of unknown type.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build from an already parsed JSON value.
    ///
    /// Unknown or missing `type` tags are skipped with a warning. Records of
    /// a known type that fail to decode are an error. Later duplicates of an
    /// id are dropped.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SceneError> {
        let raw: RawSceneData = serde_json::from_value(value)?;
        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(raw.nodes.len());
        for (index, record) in raw.nodes.into_iter().enumerate() {
            let tag = record.get("type").and_then(|t| t.as_str()).unwrap_or_default();
            let Some(kind) = NodeType::from_tag(tag) else {
                log::warn!("Skipping node {} with unknown type {:?}", index, tag);
                continue;
            };
            let node: SceneNode = serde_json::from_value(record).map_err(|source| SceneError::InvalidNode {
                index,
                kind: kind.as_str(),
                source,
            })?;
            if !seen.insert(node.id.clone()) {
                log::warn!("Skipping node {} with duplicate id {}", index, node.id);
                continue;
            }
            nodes.push(node);
        }
        Ok(Self { nodes })
    }
}

/// Direction of a z-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMove {
    ToFront,
    ToBack,
    Forward,
    Backward,
}

/// Ordered node list; later nodes paint on top.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    /// Id to position in `nodes`, rebuilt on structural change.
    index: HashMap<NodeId, usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    /// Nodes in z-order (back to front).
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Mutable iteration in z-order. Ids must not be changed through this.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut SceneNode> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SceneNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        self.index.get(id).map(|&i| &mut self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a node in z-order.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Append a node on top. Ids must be unique.
    pub fn add_node(&mut self, node: SceneNode) -> Result<(), SceneError> {
        if self.index.contains_key(&node.id) {
            return Err(SceneError::DuplicateId(node.id));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Remove a node by id. Unknown ids are a no-op.
    pub fn remove_node(&mut self, id: &str) -> Option<SceneNode> {
        let i = self.index_of(id)?;
        let node = self.nodes.remove(i);
        self.rebuild_index();
        Some(node)
    }

    /// Remove every node matching the predicate.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&SceneNode) -> bool) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| !predicate(n));
        self.rebuild_index();
        before - self.nodes.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }

    /// Paint nodes back to front, culling those outside `view_bounds`.
    pub fn render(&mut self, painter: &mut dyn Painter, view_bounds: Option<Rect>) {
        for node in &mut self.nodes {
            if let Some(view) = view_bounds {
                if !rects_overlap(node.bounds(), view) {
                    continue;
                }
            }
            node.paint(painter);
        }
    }

    /// Topmost node under a world point.
    pub fn hit_test(&self, point: Point, view_bounds: Option<Rect>) -> Option<&SceneNode> {
        self.nodes.iter().rev().find(|node| {
            view_bounds.is_none_or(|view| rects_overlap(node.bounds(), view)) && node.hit_test(point)
        })
    }

    /// Ids of nodes whose whole bounding box lies inside `rect`.
    pub fn nodes_inside(&self, rect: Rect) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| rect_contains_rect(rect, n.bounds()))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Union of the bounds of all nodes.
    pub fn bounds(&self) -> Option<Rect> {
        self.nodes.iter().map(|n| n.bounds()).reduce(|a, b| a.union(b))
    }

    // --- Selection ---

    pub fn selected(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(|n| n.selected)
    }

    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.selected().map(|n| n.id.clone()).collect()
    }

    pub fn selection_count(&self) -> usize {
        self.selected().count()
    }

    pub fn clear_selection(&mut self) {
        for node in &mut self.nodes {
            node.selected = false;
        }
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) {
        if let Some(node) = self.get_mut(id) {
            node.selected = selected;
        }
    }

    /// Select exactly the given ids.
    pub fn select_only<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>) {
        let ids: HashSet<&NodeId> = ids.into_iter().collect();
        for node in &mut self.nodes {
            node.selected = ids.contains(&node.id);
        }
    }

    // --- Grouping ---

    /// Whether any ancestor of `node` (by parent chain) is in `set`.
    ///
    /// Walks at most `len` steps so malformed cyclic chains terminate.
    pub fn has_ancestor_in(&self, node: &SceneNode, set: &HashSet<NodeId>) -> bool {
        let mut current = node.parent_id.as_deref();
        let mut steps = 0;
        while let Some(parent) = current {
            if set.contains(parent) {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                break;
            }
            current = self.get(parent).and_then(|p| p.parent_id.as_deref());
        }
        false
    }

    /// Whether `ancestor` appears in the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let set = HashSet::from([ancestor.to_string()]);
        self.has_ancestor_in(node, &set)
    }

    /// Nodes outside `roots` whose parent chain reaches a root.
    pub fn descendants_of(&self, roots: &HashSet<NodeId>) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| !roots.contains(&n.id) && self.has_ancestor_in(n, roots))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Direct children of a node.
    pub fn children_of(&self, id: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(id))
            .map(|n| n.id.clone())
            .collect()
    }

    // --- Bindings ---

    fn binding_point(&self, binding: &LineBinding) -> Option<Point> {
        self.get(&binding.node_id).map(|target| target.anchor(binding.handle))
    }

    /// Move every bound line endpoint onto its target anchor.
    ///
    /// Bindings whose target is gone are cleared and the endpoint stays put.
    pub fn resolve_bindings(&mut self) {
        let mut updates = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let Some(line) = node.as_line() else {
                continue;
            };
            let start = line.start_binding.as_ref().map(|b| self.binding_point(b));
            let end = line.end_binding.as_ref().map(|b| self.binding_point(b));
            if start.is_some() || end.is_some() {
                updates.push((i, start, end));
            }
        }

        for (i, start, end) in updates {
            let node = &mut self.nodes[i];
            for (line_end, resolved) in [(LineEnd::Start, start), (LineEnd::End, end)] {
                match resolved {
                    Some(Some(point)) => match line_end {
                        LineEnd::Start => node.set_line_start(point),
                        LineEnd::End => node.set_line_end(point),
                    },
                    Some(None) => {
                        log::debug!("Clearing dangling {:?} binding on {}", line_end, node.id);
                        if let Some(line) = node.as_line_mut() {
                            line.set_binding(line_end, None);
                        }
                    }
                    None => {}
                }
            }
        }
    }

    // --- Z-order ---

    /// Reorder the selected nodes, keeping their relative order.
    pub fn move_selected(&mut self, direction: LayerMove) -> bool {
        let before: Vec<NodeId> = self.nodes.iter().map(|n| n.id.clone()).collect();
        match direction {
            LayerMove::ToFront => {
                let (selected, rest): (Vec<_>, Vec<_>) = self.nodes.drain(..).partition(|n| n.selected);
                self.nodes = rest;
                self.nodes.extend(selected);
            }
            LayerMove::ToBack => {
                let (selected, rest): (Vec<_>, Vec<_>) = self.nodes.drain(..).partition(|n| n.selected);
                self.nodes = selected;
                self.nodes.extend(rest);
            }
            LayerMove::Forward => {
                for i in (0..self.nodes.len().saturating_sub(1)).rev() {
                    if self.nodes[i].selected && !self.nodes[i + 1].selected {
                        self.nodes.swap(i, i + 1);
                    }
                }
            }
            LayerMove::Backward => {
                for i in 1..self.nodes.len() {
                    if self.nodes[i].selected && !self.nodes[i - 1].selected {
                        self.nodes.swap(i, i - 1);
                    }
                }
            }
        }
        self.rebuild_index();
        self.nodes.iter().map(|n| &n.id).ne(before.iter())
    }

    // --- Serialization ---

    /// Deep copy of the persistent state (selection flags cleared).
    pub fn to_data(&self) -> SceneData {
        SceneData {
            nodes: self
                .nodes
                .iter()
                .map(|n| SceneNode {
                    selected: false,
                    ..n.clone()
                })
                .collect(),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_data())
    }

    /// Replace all nodes.
    pub fn load_data(&mut self, data: SceneData) {
        self.nodes = data.nodes;
        self.rebuild_index();
    }

    /// Replace all nodes from JSON. On error the scene is unchanged.
    pub fn load_from_json(&mut self, json: &str) -> Result<(), SceneError> {
        let data = SceneData::from_json(json)?;
        self.load_data(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::testing::RecordingPainter;
    use crate::shapes::{Anchor, Label, NodeKind};
    use kurbo::Vec2;
    use pretty_assertions::assert_eq;

    fn node(id: &str, x: f64, y: f64, w: f64, h: f64) -> SceneNode {
        let mut n = SceneNode::rect(x, y, w, h);
        n.id = id.to_string();
        n
    }

    fn line(id: &str, start: Point, end: Point) -> SceneNode {
        let mut n = SceneNode::line(start, end);
        n.id = id.to_string();
        n
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = Scene::new();
        scene.add_node(node("a", 0.0, 0.0, 10.0, 10.0)).unwrap();
        scene.add_node(node("b", 0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(matches!(
            scene.add_node(node("a", 1.0, 1.0, 1.0, 1.0)),
            Err(SceneError::DuplicateId(_))
        ));
        assert!(scene.remove_node("missing").is_none());
        assert_eq!(scene.remove_node("a").map(|n| n.id), Some("a".to_string()));
        assert_eq!(scene.index_of("b"), Some(0));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_hit_test_topmost_wins() {
        let mut scene = Scene::new();
        scene.add_node(node("bottom", 0.0, 0.0, 100.0, 100.0)).unwrap();
        scene.add_node(node("top", 50.0, 50.0, 100.0, 100.0)).unwrap();
        let hit = scene.hit_test(Point::new(75.0, 75.0), None).map(|n| n.id.as_str());
        assert_eq!(hit, Some("top"));
        let hit = scene.hit_test(Point::new(10.0, 10.0), None).map(|n| n.id.as_str());
        assert_eq!(hit, Some("bottom"));
        assert!(scene.hit_test(Point::new(500.0, 500.0), None).is_none());
    }

    #[test]
    fn test_hit_test_respects_view_bounds() {
        let mut scene = Scene::new();
        scene.add_node(node("a", 0.0, 0.0, 10.0, 10.0)).unwrap();
        let view = Rect::new(100.0, 100.0, 200.0, 200.0);
        assert!(scene.hit_test(Point::new(5.0, 5.0), Some(view)).is_none());
    }

    #[test]
    fn test_render_culls_outside_view() {
        let mut scene = Scene::new();
        scene.add_node(node("in", 0.0, 0.0, 10.0, 10.0)).unwrap();
        scene.add_node(node("out", 500.0, 500.0, 10.0, 10.0)).unwrap();
        scene
            .add_node(line("backwards", Point::new(60.0, 60.0), Point::new(40.0, 40.0)))
            .unwrap();

        let mut painter = RecordingPainter::default();
        scene.render(&mut painter, Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
        // rect: fill + stroke, line: stroke
        assert_eq!(painter.ops.len(), 3);

        let mut painter = RecordingPainter::default();
        scene.render(&mut painter, None);
        assert_eq!(painter.ops.len(), 5);
    }

    #[test]
    fn test_render_measures_text() {
        let mut scene = Scene::new();
        let mut text = SceneNode::text(0.0, 0.0, "hi\nthere");
        text.width = 0.0;
        text.height = 0.0;
        let id = text.id.clone();
        scene.add_node(text).unwrap();
        scene.render(&mut RecordingPainter::default(), None);
        let text = scene.get(&id).unwrap();
        assert!(text.width > 0.0);
        assert!((text.height - 2.0 * 16.0 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_nodes_inside_is_strict() {
        let mut scene = Scene::new();
        scene.add_node(node("a", 0.0, 0.0, 50.0, 50.0)).unwrap();
        scene.add_node(node("b", 40.0, 40.0, 50.0, 50.0)).unwrap();
        assert_eq!(scene.nodes_inside(Rect::new(-10.0, -10.0, 60.0, 60.0)), vec!["a".to_string()]);
    }

    #[test]
    fn test_json_round_trip() {
        let mut scene = Scene::new();
        let mut rect = node("r", 10.0, 20.0, 30.0, 40.0);
        rect.set_label(Some("Hello\nWorld".to_string()));
        if let NodeKind::Rect(shape) = &mut rect.kind {
            shape.corner_radius = Some(6.0);
        }
        scene.add_node(rect).unwrap();
        let mut child = SceneNode::circle(1.0, 2.0, 3.0, 4.0);
        child.parent_id = Some("r".to_string());
        scene.add_node(child).unwrap();
        let mut connector = line("l", Point::new(0.0, 0.0), Point::new(-50.0, 25.0));
        if let Some(shape) = connector.as_line_mut() {
            shape.end_binding = Some(LineBinding::new("r", Anchor::E));
            shape.end_arrow = true;
            shape.label = Some(Label::new("yes"));
        }
        scene.add_node(connector).unwrap();
        scene
            .add_node(SceneNode::freehand(
                &[Point::new(1.0, 1.0), Point::new(5.0, 9.0)],
                "#ff0000",
                3.0,
            ))
            .unwrap();

        let json = scene.to_json().unwrap();
        let mut restored = Scene::new();
        restored.load_from_json(&json).unwrap();
        assert_eq!(restored.to_data(), scene.to_data());
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let json = r##"{"nodes":[
            {"id":"a","type":"rect","x":0,"y":0,"width":10,"height":10},
            {"id":"b","type":"hexagon","x":0,"y":0,"width":10,"height":10},
            {"id":"c","type":"text","x":0,"y":0,"width":0,"height":0,"text":"hi","fontSize":12,"color":"#000"}
        ]}"##;
        let mut scene = Scene::new();
        scene.load_from_json(json).unwrap();
        let ids: Vec<&str> = scene.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_malformed_json_leaves_scene_unchanged() {
        let mut scene = Scene::new();
        scene.add_node(node("keep", 0.0, 0.0, 1.0, 1.0)).unwrap();
        assert!(matches!(scene.load_from_json("{not json"), Err(SceneError::Parse(_))));
        assert!(matches!(
            scene.load_from_json(r#"{"nodes":[{"id":"x","type":"rect","x":"left"}]}"#),
            Err(SceneError::InvalidNode { index: 0, .. })
        ));
        assert!(scene.contains("keep"));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_resolve_bindings_follow_target() {
        let mut scene = Scene::new();
        scene.add_node(node("a", 0.0, 0.0, 100.0, 50.0)).unwrap();
        scene.add_node(node("b", 300.0, 0.0, 100.0, 50.0)).unwrap();
        let mut connector = line("l", Point::ZERO, Point::new(10.0, 10.0));
        if let Some(shape) = connector.as_line_mut() {
            shape.start_binding = Some(LineBinding::new("a", Anchor::E));
            shape.end_binding = Some(LineBinding::new("b", Anchor::W));
        }
        scene.add_node(connector).unwrap();
        scene.resolve_bindings();
        let l = scene.get("l").unwrap();
        assert_eq!(l.line_start(), Point::new(100.0, 25.0));
        assert_eq!(l.line_end(), Point::new(300.0, 25.0));

        scene.get_mut("b").unwrap().translate(Vec2::new(20.0, 40.0));
        scene.resolve_bindings();
        let l = scene.get("l").unwrap();
        assert_eq!(l.line_start(), Point::new(100.0, 25.0));
        assert_eq!(l.line_end(), Point::new(320.0, 65.0));
    }

    #[test]
    fn test_dangling_binding_is_cleared() {
        let mut scene = Scene::new();
        let mut connector = line("l", Point::ZERO, Point::new(10.0, 10.0));
        if let Some(shape) = connector.as_line_mut() {
            shape.end_binding = Some(LineBinding::new("gone", Anchor::N));
        }
        scene.add_node(connector).unwrap();
        scene.resolve_bindings();
        let l = scene.get("l").unwrap();
        assert!(l.as_line().unwrap().end_binding.is_none());
        assert_eq!(l.line_end(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_descendants_are_transitive_and_cycle_safe() {
        let mut scene = Scene::new();
        scene.add_node(node("root", 0.0, 0.0, 1.0, 1.0)).unwrap();
        let mut child = node("child", 0.0, 0.0, 1.0, 1.0);
        child.parent_id = Some("root".to_string());
        scene.add_node(child).unwrap();
        let mut grandchild = node("grandchild", 0.0, 0.0, 1.0, 1.0);
        grandchild.parent_id = Some("child".to_string());
        scene.add_node(grandchild).unwrap();
        let mut p = node("p", 0.0, 0.0, 1.0, 1.0);
        p.parent_id = Some("q".to_string());
        scene.add_node(p).unwrap();
        let mut q = node("q", 0.0, 0.0, 1.0, 1.0);
        q.parent_id = Some("p".to_string());
        scene.add_node(q).unwrap();

        let roots = HashSet::from(["root".to_string()]);
        assert_eq!(scene.descendants_of(&roots), vec!["child".to_string(), "grandchild".to_string()]);
        assert!(scene.is_ancestor("root", "grandchild"));
        assert!(!scene.is_ancestor("root", "p"));
    }

    #[test]
    fn test_layer_moves() {
        let mut scene = Scene::new();
        for id in ["a", "b", "c", "d"] {
            scene.add_node(node(id, 0.0, 0.0, 1.0, 1.0)).unwrap();
        }
        let order = |s: &Scene| s.nodes().iter().map(|n| n.id.clone()).collect::<Vec<_>>().join("");

        scene.set_selected("b", true);
        assert!(scene.move_selected(LayerMove::ToFront));
        assert_eq!(order(&scene), "acdb");
        assert!(!scene.move_selected(LayerMove::ToFront));
        assert!(scene.move_selected(LayerMove::Backward));
        assert_eq!(order(&scene), "acbd");
        assert!(scene.move_selected(LayerMove::ToBack));
        assert_eq!(order(&scene), "bacd");
        assert!(scene.move_selected(LayerMove::Forward));
        assert_eq!(order(&scene), "abcd");
        assert_eq!(scene.get("b").map(|n| n.x), Some(0.0));
        assert_eq!(scene.index_of("b"), Some(1));
    }
}

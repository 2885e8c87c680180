//! Selection commands: grouping, alignment, distribution, clipboard and
//! property edits.

use super::{Editor, NodeProps};
use crate::shapes::{NodeId, SceneNode, new_node_id};
use kurbo::{Rect, Vec2};
use std::collections::HashMap;

/// Edge or center line to align the selection on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Axis for distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn span(self, r: Rect) -> (f64, f64) {
        match self {
            Axis::Horizontal => (r.x0, r.x1),
            Axis::Vertical => (r.y0, r.y1),
        }
    }

    fn offset(self, amount: f64) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(amount, 0.0),
            Axis::Vertical => Vec2::new(0.0, amount),
        }
    }
}

impl Editor {
    fn selected_bounds(&self) -> Vec<(NodeId, Rect)> {
        self.scene.selected().map(|n| (n.id.clone(), n.bounds())).collect()
    }

    fn translate_nodes(&mut self, moves: &[(NodeId, Vec2)]) {
        for (id, delta) in moves {
            if let Some(node) = self.scene.get_mut(id) {
                node.translate(*delta);
            }
        }
        self.scene.resolve_bindings();
        self.commit();
    }

    /// Align the selection (two or more nodes) to an edge or center line.
    pub fn align(&mut self, alignment: Alignment) {
        let items = self.selected_bounds();
        if items.len() < 2 {
            return;
        }
        let Some(union) = items.iter().map(|(_, r)| *r).reduce(|a, b| a.union(b)) else {
            return;
        };
        let center = union.center();
        let moves: Vec<(NodeId, Vec2)> = items
            .into_iter()
            .map(|(id, r)| {
                let delta = match alignment {
                    Alignment::Left => Vec2::new(union.x0 - r.x0, 0.0),
                    Alignment::Center => Vec2::new(center.x - r.center().x, 0.0),
                    Alignment::Right => Vec2::new(union.x1 - r.x1, 0.0),
                    Alignment::Top => Vec2::new(0.0, union.y0 - r.y0),
                    Alignment::Middle => Vec2::new(0.0, center.y - r.center().y),
                    Alignment::Bottom => Vec2::new(0.0, union.y1 - r.y1),
                };
                (id, delta)
            })
            .collect();
        self.translate_nodes(&moves);
    }

    /// Space three or more selected nodes with equal gaps along `axis`.
    ///
    /// The first and last node in sorted order keep their positions.
    pub fn distribute(&mut self, axis: Axis) {
        let mut items = self.selected_bounds();
        if items.len() < 3 {
            return;
        }
        items.sort_by(|a, b| axis.span(a.1).0.total_cmp(&axis.span(b.1).0));

        let (first_min, _) = axis.span(items[0].1);
        let (_, last_max) = axis.span(items[items.len() - 1].1);
        let total: f64 = items.iter().map(|(_, r)| axis.span(*r).1 - axis.span(*r).0).sum();
        let gap = (last_max - first_min - total) / (items.len() - 1) as f64;

        let mut cursor = first_min;
        let moves: Vec<(NodeId, Vec2)> = items
            .into_iter()
            .map(|(id, r)| {
                let (min, max) = axis.span(r);
                let delta = axis.offset(cursor - min);
                cursor += max - min + gap;
                (id, delta)
            })
            .collect();
        self.translate_nodes(&moves);
    }

    /// Parent every selected node to the selected node with the largest area.
    ///
    /// Nodes that are ancestors of the chosen parent are left alone so the
    /// parent chain never loops.
    pub fn group(&mut self) {
        let items = self.selected_bounds();
        if items.len() < 2 {
            return;
        }
        let Some(parent) = items
            .iter()
            .max_by(|a, b| a.1.area().total_cmp(&b.1.area()))
            .map(|(id, _)| id.clone())
        else {
            return;
        };

        let mut changed = false;
        for (id, _) in items.iter().filter(|(id, _)| *id != parent) {
            if self.scene.is_ancestor(id, &parent) {
                log::warn!("Not grouping {} under its descendant {}", id, parent);
                continue;
            }
            if let Some(node) = self.scene.get_mut(id) {
                if node.parent_id.as_ref() != Some(&parent) {
                    node.parent_id = Some(parent.clone());
                    changed = true;
                }
            }
        }
        if changed {
            log::debug!("Grouped {} nodes under {}", items.len() - 1, parent);
            self.commit();
        }
    }

    /// Clear the parent of each selected node and of its direct children.
    pub fn ungroup(&mut self) {
        let selected = self.scene.selected_ids();
        let mut changed = false;
        for id in &selected {
            let mut targets = self.scene.children_of(id);
            targets.push(id.clone());
            for target in targets {
                if let Some(node) = self.scene.get_mut(&target) {
                    changed |= node.parent_id.take().is_some();
                }
            }
        }
        if changed {
            self.commit();
        }
    }

    /// Copy the selection into the clipboard and reset the paste stagger.
    pub fn copy(&mut self) {
        self.clipboard.nodes = self
            .scene
            .selected()
            .map(|n| SceneNode {
                selected: false,
                ..n.clone()
            })
            .collect();
        self.clipboard.paste_count = 0;
        log::debug!("Copied {} nodes", self.clipboard.nodes.len());
    }

    /// Paste the clipboard with fresh ids, staggered from the last paste.
    ///
    /// Parents and bindings pointing at other copied nodes are remapped;
    /// references to anything outside the copied set are dropped.
    pub fn paste(&mut self) -> Vec<NodeId> {
        if self.clipboard.nodes.is_empty() {
            return Vec::new();
        }
        self.clipboard.paste_count += 1;
        let offset = self.config.paste_offset * f64::from(self.clipboard.paste_count);
        let delta = Vec2::new(offset, offset);

        let ids: HashMap<NodeId, NodeId> = self
            .clipboard
            .nodes
            .iter()
            .map(|n| (n.id.clone(), new_node_id(n.node_type().as_str())))
            .collect();

        let mut pasted = Vec::with_capacity(ids.len());
        self.scene.clear_selection();
        for original in &self.clipboard.nodes {
            let mut node = original.clone();
            node.id = ids[&original.id].clone();
            node.parent_id = original.parent_id.as_ref().and_then(|p| ids.get(p).cloned());
            if let Some(line) = node.as_line_mut() {
                for binding in [&mut line.start_binding, &mut line.end_binding] {
                    *binding = binding.take().and_then(|mut b| {
                        b.node_id = ids.get(&b.node_id)?.clone();
                        Some(b)
                    });
                }
            }
            node.translate(delta);
            node.selected = true;
            let id = node.id.clone();
            match self.scene.add_node(node) {
                Ok(()) => pasted.push(id),
                Err(e) => log::warn!("Could not paste node: {}", e),
            }
        }
        self.scene.resolve_bindings();
        self.commit();
        pasted
    }

    /// Copy then paste in one step.
    pub fn duplicate(&mut self) -> Vec<NodeId> {
        self.copy();
        self.paste()
    }

    /// Apply property changes to every selected node.
    pub fn update_selected(&mut self, props: &NodeProps) {
        let ids = self.scene.selected_ids();
        let mut changed = false;
        for id in &ids {
            if let Some(node) = self.scene.get_mut(id) {
                changed |= props.apply(node);
            }
        }
        if changed {
            self.scene.resolve_bindings();
            self.commit();
        }
    }
}

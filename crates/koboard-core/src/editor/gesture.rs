//! Pointer gestures: one active at a time, from pointer-down to pointer-up.

use super::Editor;
use crate::input::{CursorIcon, Modifiers, MouseButton};
use crate::selection::{hit_handle, map_rect, ratio, resize_rect};
use crate::shapes::{Anchor, LineBinding, LineEnd, NodeId, NodeKind, SceneNode};
use crate::snap::{SnapTarget, collect_targets, find_line_endpoint, find_snap};
use kurbo::{Point, Rect};
use std::collections::HashSet;

/// Marquees no larger than this many screen pixels are treated as clicks.
const MIN_MARQUEE: f64 = 2.0;

/// Geometry of one node captured when a resize starts.
#[derive(Debug, Clone)]
pub(crate) struct ResizeOrigin {
    id: NodeId,
    bounds: Rect,
    /// Relative points of freehand nodes.
    points: Option<Vec<Point>>,
}

/// State of the active pointer gesture.
#[derive(Debug, Clone, Default)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    DrawingFreehand {
        node_id: NodeId,
        points: Vec<Point>,
    },
    DraggingEndpoint {
        line_id: NodeId,
        end: LineEnd,
        targets: Vec<SnapTarget>,
        snap_distance: f64,
        snap: Option<LineBinding>,
    },
    Resizing {
        handle: Anchor,
        start: Point,
        union: Rect,
        originals: Vec<ResizeOrigin>,
    },
    Dragging {
        start: Point,
        /// Unnormalized frames, so bound lines keep their signed extent.
        originals: Vec<(NodeId, Rect)>,
    },
    BoxSelecting {
        start: Point,
        current: Point,
        additive: bool,
    },
}

/// Public view of the active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Idle,
    Panning,
    DrawingFreehand,
    DraggingEndpoint,
    Resizing,
    Dragging,
    BoxSelecting,
}

impl Gesture {
    fn kind(&self) -> GestureKind {
        match self {
            Gesture::Idle => GestureKind::Idle,
            Gesture::Panning { .. } => GestureKind::Panning,
            Gesture::DrawingFreehand { .. } => GestureKind::DrawingFreehand,
            Gesture::DraggingEndpoint { .. } => GestureKind::DraggingEndpoint,
            Gesture::Resizing { .. } => GestureKind::Resizing,
            Gesture::Dragging { .. } => GestureKind::Dragging,
            Gesture::BoxSelecting { .. } => GestureKind::BoxSelecting,
        }
    }
}

impl Editor {
    pub fn active_gesture(&self) -> GestureKind {
        self.gesture.kind()
    }

    /// Marquee rectangle in world space while box-selecting.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::BoxSelecting { start, current, .. } => Some(Rect::from_points(*start, *current)),
            _ => None,
        }
    }

    /// Union bounds of selected nodes that can be resized (not text, not lines).
    pub fn resize_bounds(&self) -> Option<Rect> {
        self.scene
            .selected()
            .filter(|n| !n.is_text() && !n.is_line())
            .map(|n| n.bounds())
            .reduce(|a, b| a.union(b))
    }

    fn is_pan_trigger(&self, button: MouseButton, modifiers: Modifiers) -> bool {
        let modified = modifiers.ctrl || modifiers.meta || modifiers.shift;
        button == MouseButton::Middle
            || (button == MouseButton::Left && self.config.modifier_pan && modified)
    }

    /// Cursor to show when hovering `position` with no button pressed.
    pub fn cursor_at(&self, position: Point) -> CursorIcon {
        match self.gesture {
            Gesture::Panning { .. } => return CursorIcon::Grabbing,
            Gesture::Idle => {}
            _ => return CursorIcon::Default,
        }
        let world = self.viewport.screen_to_world(position);
        let scale = self.viewport.scale();
        if find_line_endpoint(&self.scene, world, self.config.endpoint_tolerance / scale).is_some() {
            return CursorIcon::Crosshair;
        }
        if let Some(bounds) = self.resize_bounds() {
            if let Some(handle) = hit_handle(bounds, world, self.config.handle_size / scale / 2.0) {
                return CursorIcon::Resize(handle);
            }
        }
        if self.scene.hit_test(world, None).is_some() {
            CursorIcon::Move
        } else {
            CursorIcon::Default
        }
    }

    /// Start a gesture. The first matching rule wins.
    pub fn pointer_down(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        if self.inline_edit.is_some() {
            self.commit_inline_edit();
        }
        if !matches!(self.gesture, Gesture::Idle) {
            return;
        }
        let world = self.viewport.screen_to_world(position);
        let scale = self.viewport.scale();

        if self.is_pan_trigger(button, modifiers) {
            self.gesture = Gesture::Panning { last: position };
            return;
        }
        if button != MouseButton::Left {
            return;
        }

        if self.tool == crate::tools::ToolKind::Freehand {
            self.begin_freehand(world);
            return;
        }

        if let Some((line_id, end)) =
            find_line_endpoint(&self.scene, world, self.config.endpoint_tolerance / scale)
        {
            if !self.scene.get(&line_id).is_some_and(|n| n.selected) {
                self.scene.select_only([&line_id]);
            }
            self.gesture = Gesture::DraggingEndpoint {
                line_id,
                end,
                targets: collect_targets(&self.scene),
                snap_distance: self.config.snap_distance / scale,
                snap: None,
            };
            self.notify();
            return;
        }

        if let Some(union) = self.resize_bounds() {
            if let Some(handle) = hit_handle(union, world, self.config.handle_size / scale / 2.0) {
                self.begin_resize(handle, position, union);
                return;
            }
        }

        if let Some(hit) = self.scene.hit_test(world, None).map(|n| n.id.clone()) {
            self.begin_drag(hit, world, modifiers.shift);
            return;
        }

        let additive = modifiers.command();
        if !additive {
            self.scene.clear_selection();
        }
        self.gesture = Gesture::BoxSelecting {
            start: world,
            current: world,
            additive,
        };
        self.notify();
    }

    fn begin_freehand(&mut self, world: Point) {
        let style = &self.freehand_style;
        let node = SceneNode::freehand(&[world], style.stroke.clone(), style.stroke_width);
        let node_id = node.id.clone();
        match self.scene.add_node(node) {
            Ok(()) => {
                self.gesture = Gesture::DrawingFreehand {
                    node_id,
                    points: vec![world],
                };
                self.notify();
            }
            Err(e) => log::warn!("Could not start stroke: {}", e),
        }
    }

    fn begin_resize(&mut self, handle: Anchor, start: Point, union: Rect) {
        let originals = self
            .scene
            .selected()
            .filter(|n| !n.is_text() && !n.is_line())
            .map(|n| ResizeOrigin {
                id: n.id.clone(),
                bounds: n.bounds(),
                points: match &n.kind {
                    NodeKind::Freehand(shape) => Some(shape.points.clone()),
                    _ => None,
                },
            })
            .collect();
        self.gesture = Gesture::Resizing {
            handle,
            start,
            union,
            originals,
        };
    }

    fn begin_drag(&mut self, hit: NodeId, world: Point, toggle: bool) {
        let was_selected = self.scene.get(&hit).is_some_and(|n| n.selected);
        if toggle {
            self.scene.set_selected(&hit, !was_selected);
        } else if !was_selected {
            self.scene.select_only([&hit]);
        }

        let roots: HashSet<NodeId> = self.scene.selected_ids().into_iter().collect();
        let mut moving: Vec<NodeId> = roots.iter().cloned().collect();
        moving.extend(self.scene.descendants_of(&roots));
        let originals = moving
            .into_iter()
            .filter_map(|id| {
                let frame = self.scene.get(&id)?.frame();
                Some((id, frame))
            })
            .collect();
        self.gesture = Gesture::Dragging {
            start: world,
            originals,
        };
        self.notify();
    }

    /// Advance the active gesture.
    pub fn pointer_move(&mut self, position: Point) {
        let world = self.viewport.screen_to_world(position);
        let scale = self.viewport.scale();
        match &mut self.gesture {
            Gesture::Idle => return,
            Gesture::Panning { last } => {
                self.viewport.pan_by(position - *last);
                *last = position;
            }
            Gesture::DrawingFreehand { node_id, points } => {
                points.push(world);
                if let Some(node) = self.scene.get_mut(node_id) {
                    node.set_freehand_points(points);
                }
            }
            Gesture::DraggingEndpoint {
                line_id,
                end,
                targets,
                snap_distance,
                snap,
            } => {
                let found = find_snap(targets, world, *snap_distance);
                let point = found.map_or(world, |t| t.point);
                *snap = found.map(SnapTarget::binding);
                if let Some(node) = self.scene.get_mut(line_id) {
                    match end {
                        LineEnd::Start => node.set_line_start(point),
                        LineEnd::End => node.set_line_end(point),
                    }
                }
            }
            Gesture::Resizing {
                handle,
                start,
                union,
                originals,
            } => {
                let delta = (position - *start) / scale;
                let resized = resize_rect(*union, *handle, delta, self.config.min_node_size);
                for origin in originals.iter() {
                    let Some(node) = self.scene.get_mut(&origin.id) else {
                        continue;
                    };
                    let frame = map_rect(origin.bounds, *union, resized);
                    node.x = frame.x0;
                    node.y = frame.y0;
                    node.width = frame.width();
                    node.height = frame.height();
                    if let (NodeKind::Freehand(shape), Some(points)) = (&mut node.kind, &origin.points) {
                        let sx = ratio(frame.width(), origin.bounds.width());
                        let sy = ratio(frame.height(), origin.bounds.height());
                        shape.points = points.clone();
                        shape.scale_points(sx, sy);
                    }
                }
                self.scene.resolve_bindings();
            }
            Gesture::Dragging { start, originals } => {
                let delta = world - *start;
                for (id, frame) in originals.iter() {
                    if let Some(node) = self.scene.get_mut(id) {
                        node.x = frame.x0 + delta.x;
                        node.y = frame.y0 + delta.y;
                        node.width = frame.width();
                        node.height = frame.height();
                    }
                }
                self.scene.resolve_bindings();
            }
            Gesture::BoxSelecting { current, .. } => {
                *current = world;
            }
        }
        self.notify();
    }

    /// Finish the active gesture.
    pub fn pointer_up(&mut self, position: Point) {
        let world = self.viewport.screen_to_world(position);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Panning { .. } => {
                self.persist();
                self.notify();
            }
            Gesture::DrawingFreehand { node_id, points } => {
                if points.len() < 2 {
                    self.scene.remove_node(&node_id);
                    self.notify();
                } else {
                    self.commit();
                }
            }
            Gesture::DraggingEndpoint {
                line_id, end, snap, ..
            } => {
                if let Some(line) = self.scene.get_mut(&line_id).and_then(SceneNode::as_line_mut) {
                    line.set_binding(end, snap);
                }
                self.scene.resolve_bindings();
                self.commit();
            }
            Gesture::Resizing { .. } | Gesture::Dragging { .. } => {
                self.scene.resolve_bindings();
                self.commit();
            }
            Gesture::BoxSelecting { start, additive, .. } => {
                let marquee = Rect::from_points(start, world);
                let min = MIN_MARQUEE / self.viewport.scale();
                if marquee.width() > min || marquee.height() > min {
                    for id in self.scene.nodes_inside(marquee) {
                        self.scene.set_selected(&id, true);
                    }
                }
                log::debug!(
                    "Box selection ({}) picked {} nodes",
                    if additive { "additive" } else { "replace" },
                    self.scene.selection_count()
                );
                self.notify();
            }
        }
    }
}

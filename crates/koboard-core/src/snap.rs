//! Anchor snapping for line endpoints.

use crate::scene::Scene;
use crate::shapes::{Anchor, LineBinding, LineEnd, NodeId};
use kurbo::Point;

/// A potential snap destination.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapTarget {
    pub node_id: NodeId,
    pub anchor: Anchor,
    pub point: Point,
}

impl SnapTarget {
    pub fn binding(&self) -> LineBinding {
        LineBinding::new(self.node_id.clone(), self.anchor)
    }
}

/// All anchors of nodes that lines may bind to (no lines, no text).
pub fn collect_targets(scene: &Scene) -> Vec<SnapTarget> {
    scene
        .nodes()
        .iter()
        .filter(|n| !n.is_line() && !n.is_text())
        .flat_map(|n| {
            Anchor::ALL.map(|anchor| SnapTarget {
                node_id: n.id.clone(),
                anchor,
                point: n.anchor(anchor),
            })
        })
        .collect()
}

/// Nearest target within `distance` of `point`.
pub fn find_snap(targets: &[SnapTarget], point: Point, distance: f64) -> Option<&SnapTarget> {
    targets
        .iter()
        .map(|t| (t, t.point.distance(point)))
        .filter(|(_, d)| *d <= distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(t, _)| t)
}

/// Line endpoint within `tolerance` of `point`; topmost line wins.
pub fn find_line_endpoint(scene: &Scene, point: Point, tolerance: f64) -> Option<(NodeId, LineEnd)> {
    scene.nodes().iter().rev().filter(|n| n.is_line()).find_map(|n| {
        let start = n.line_start().distance(point);
        let end = n.line_end().distance(point);
        if start > tolerance && end > tolerance {
            None
        } else if end <= start {
            Some((n.id.clone(), LineEnd::End))
        } else {
            Some((n.id.clone(), LineEnd::Start))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SceneNode;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        let mut rect = SceneNode::rect(0.0, 0.0, 100.0, 50.0);
        rect.id = "r".to_string();
        scene.add_node(rect).unwrap();
        scene.add_node(SceneNode::text(500.0, 500.0, "skip")).unwrap();
        let mut line = SceneNode::line(Point::new(200.0, 0.0), Point::new(300.0, 0.0));
        line.id = "l".to_string();
        scene.add_node(line).unwrap();
        scene
    }

    #[test]
    fn test_targets_exclude_lines_and_text() {
        let targets = collect_targets(&scene());
        assert_eq!(targets.len(), 8);
        assert!(targets.iter().all(|t| t.node_id == "r"));
    }

    #[test]
    fn test_nearest_snap_wins() {
        let targets = collect_targets(&scene());
        let snap = find_snap(&targets, Point::new(104.0, 27.0), 12.0).unwrap();
        assert_eq!(snap.anchor, Anchor::E);
        assert_eq!(snap.binding(), LineBinding::new("r", Anchor::E));
        assert!(find_snap(&targets, Point::new(130.0, 25.0), 12.0).is_none());
    }

    #[test]
    fn test_find_line_endpoint() {
        let scene = scene();
        assert_eq!(find_line_endpoint(&scene, Point::new(297.0, 3.0), 8.0), Some(("l".to_string(), LineEnd::End)));
        assert_eq!(find_line_endpoint(&scene, Point::new(201.0, 0.0), 8.0), Some(("l".to_string(), LineEnd::Start)));
        assert_eq!(find_line_endpoint(&scene, Point::new(250.0, 0.0), 8.0), None);
    }
}

//! Selection handles and resize geometry.

use crate::shapes::Anchor;
use kurbo::{Point, Rect, Vec2};

/// Handle positions around a bounding box.
pub fn handle_positions(bounds: Rect) -> [(Anchor, Point); 8] {
    Anchor::ALL.map(|anchor| (anchor, anchor.point_in(bounds)))
}

/// Handle within `radius` of `point`, if any.
pub fn hit_handle(bounds: Rect, point: Point, radius: f64) -> Option<Anchor> {
    handle_positions(bounds)
        .into_iter()
        .find(|(_, pos)| (point.x - pos.x).abs() <= radius && (point.y - pos.y).abs() <= radius)
        .map(|(anchor, _)| anchor)
}

/// Apply a handle drag to `original`.
///
/// Only the edges the handle controls move. Each extent is clamped to
/// `min_size`; past the minimum the opposite edge stays pinned.
pub fn resize_rect(original: Rect, handle: Anchor, delta: Vec2, min_size: f64) -> Rect {
    let mut rect = original;
    if handle.moves_left() {
        rect.x0 = (original.x0 + delta.x).min(original.x1 - min_size);
    }
    if handle.moves_right() {
        rect.x1 = (original.x1 + delta.x).max(original.x0 + min_size);
    }
    if handle.moves_top() {
        rect.y0 = (original.y0 + delta.y).min(original.y1 - min_size);
    }
    if handle.moves_bottom() {
        rect.y1 = (original.y1 + delta.y).max(original.y0 + min_size);
    }
    rect
}

/// Map `inner`, a rectangle inside `from`, proportionally into `to`.
pub fn map_rect(inner: Rect, from: Rect, to: Rect) -> Rect {
    let sx = ratio(to.width(), from.width());
    let sy = ratio(to.height(), from.height());
    Rect::new(
        to.x0 + (inner.x0 - from.x0) * sx,
        to.y0 + (inner.y0 - from.y0) * sy,
        to.x0 + (inner.x1 - from.x0) * sx,
        to.y0 + (inner.y1 - from.y0) * sy,
    )
}

/// `a / b`, or 1 when `b` is degenerate.
pub fn ratio(a: f64, b: f64) -> f64 {
    if b.abs() < f64::EPSILON { 1.0 } else { a / b }
}

//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest zoom level the viewport can reach.
pub const MIN_SCALE: f64 = 0.1;
/// Largest zoom level the viewport can reach.
pub const MAX_SCALE: f64 = 5.0;

fn default_min_scale() -> f64 {
    MIN_SCALE
}

fn default_max_scale() -> f64 {
    MAX_SCALE
}

/// Viewport manages the world-to-screen transform of the canvas.
///
/// The transform is stored in its full six component form
/// `[scale_x, skew_y, skew_x, scale_y, translate_x, translate_y]`, which is also
/// the persisted shape. Editor operations only ever produce uniform scale and
/// zero skew.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub transform: [f64; 6],
    #[serde(skip, default = "default_min_scale")]
    min_scale: f64,
    #[serde(skip, default = "default_max_scale")]
    max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            transform: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
        }
    }
}

impl Viewport {
    /// Create a viewport with the identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the zoom limits. The current scale is left untouched.
    pub fn with_scale_limits(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.min_scale = min_scale.min(max_scale);
        self.max_scale = max_scale.max(min_scale);
        self
    }

    /// Current zoom level.
    pub fn scale(&self) -> f64 {
        self.transform[0]
    }

    /// Current translation in screen pixels.
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.transform[4], self.transform[5])
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn affine(&self) -> Affine {
        Affine::new(self.transform)
    }

    /// Replace the transform, e.g. when restoring persisted state.
    ///
    /// Scale components are clamped to the zoom limits. A transform with a
    /// non-finite component or a non-positive scale is rejected and `false`
    /// is returned.
    pub fn set_transform(&mut self, transform: [f64; 6]) -> bool {
        let [a, b, c, d, tx, ty] = transform;
        if transform.iter().any(|v| !v.is_finite()) || a <= 0.0 || d <= 0.0 {
            return false;
        }
        self.transform = [
            a.clamp(self.min_scale, self.max_scale),
            b,
            c,
            d.clamp(self.min_scale, self.max_scale),
            tx,
            ty,
        ];
        true
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let [a, _, _, d, tx, ty] = self.transform;
        Point::new((screen.x - tx) / a, (screen.y - ty) / d)
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world: Point) -> Point {
        let [a, _, _, d, tx, ty] = self.transform;
        Point::new(world.x * a + tx, world.y * d + ty)
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.transform[4] += delta.x;
        self.transform[5] += delta.y;
    }

    /// Zoom by `factor`, keeping the world point under `screen` fixed.
    ///
    /// The applied ratio is derived from the clamped scale, so hitting a limit
    /// never drifts the anchor. Returns `false` when the scale did not change.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) -> bool {
        let current = self.scale();
        let target = (current * factor).clamp(self.min_scale, self.max_scale);
        let ratio = target / current;
        if (ratio - 1.0).abs() < f64::EPSILON {
            return false;
        }

        let [a, b, c, d, tx, ty] = self.transform;
        self.transform = [
            a * ratio,
            b * ratio,
            c * ratio,
            d * ratio,
            screen.x - (screen.x - tx) * ratio,
            screen.y - (screen.y - ty) * ratio,
        ];
        true
    }

    /// World-space rectangle visible on a surface of the given size.
    pub fn visible_world_rect(&self, surface: Size) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::ZERO),
            self.screen_to_world(Point::new(surface.width, surface.height)),
        )
    }

    /// Reset to the identity transform.
    pub fn reset(&mut self) {
        self.transform = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    }
}

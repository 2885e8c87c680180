//! Shared export types.

use peniko::Color;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result type for export operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Options shared by the SVG and PNG exporters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Margin around the scene bounds, in world units.
    pub padding: f64,
    /// Pixels per world unit for raster output.
    pub scale: f64,
    /// Canvas color; fully transparent skips the background.
    pub background: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            padding: 20.0,
            scale: 1.0,
            background: Color::from_rgba8(255, 255, 255, 255),
        }
    }
}

impl RenderOptions {
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}

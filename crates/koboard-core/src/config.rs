//! Editor configuration.

use crate::history::MAX_HISTORY;
use crate::tools::FreehandStyle;
use crate::viewport::{MAX_SCALE, MIN_SCALE};
use serde::{Deserialize, Serialize};

/// Storage key under which the editor persists its state.
pub const STORAGE_KEY: &str = "koboard_scene";

/// Tunables of the interactive editor.
///
/// Distances are in screen pixels unless noted and are divided by the
/// current zoom to get world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub history_capacity: usize,
    /// Distance within which a dragged line endpoint snaps to an anchor.
    pub snap_distance: f64,
    /// Pick radius around line endpoints.
    pub endpoint_tolerance: f64,
    /// Side length of a resize handle.
    pub handle_size: f64,
    /// Minimum width/height after a resize, in world units.
    pub min_node_size: f64,
    /// Per-paste offset, in world units.
    pub paste_offset: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub storage_key: String,
    /// Allow left button + shift/ctrl/meta to pan.
    pub modifier_pan: bool,
    pub show_grid: bool,
    /// Grid spacing in world units.
    pub grid_spacing: f64,
    pub freehand: FreehandStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: MAX_HISTORY,
            snap_distance: 12.0,
            endpoint_tolerance: 8.0,
            handle_size: 8.0,
            min_node_size: 10.0,
            paste_offset: 20.0,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            storage_key: STORAGE_KEY.to_string(),
            modifier_pan: true,
            show_grid: true,
            grid_spacing: 50.0,
            freehand: FreehandStyle::default(),
        }
    }
}

impl EditorConfig {
    /// Parse from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history_capacity, 50);
        assert!((config.snap_distance - 12.0).abs() < f64::EPSILON);
        assert_eq!(config.storage_key, "koboard_scene");
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{"snapDistance": 20, "modifierPan": false}"#).unwrap();
        assert!((config.snap_distance - 20.0).abs() < f64::EPSILON);
        assert!(!config.modifier_pan);
        assert!((config.paste_offset - 20.0).abs() < f64::EPSILON);
    }
}

//! Tool modes and per-tool default styles.

use serde::{Deserialize, Serialize};

/// Persistent pointer mode of the editor.
///
/// Shape insertion is a one-shot command, not a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Freehand,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Freehand => "Freehand",
        }
    }

    /// Keyboard shortcut for this tool.
    pub fn shortcut(&self) -> char {
        match self {
            ToolKind::Select => 'v',
            ToolKind::Freehand => 'p',
        }
    }
}

/// Style applied to new freehand strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreehandStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for FreehandStyle {
    fn default() -> Self {
        Self {
            stroke: "#000000".to_string(),
            stroke_width: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool() {
        assert_eq!(ToolKind::default(), ToolKind::Select);
        assert_eq!(ToolKind::Freehand.name(), "Freehand");
    }

    #[test]
    fn test_tool_serde() {
        assert_eq!(serde_json::to_string(&ToolKind::Freehand).unwrap(), "\"freehand\"");
    }
}

//! The editor: owns the scene, viewport and history and turns input into
//! scene mutations.

mod commands;
mod events;
mod gesture;
mod info;
mod inline_edit;

pub use commands::{Alignment, Axis};
pub use events::Subscription;
pub use gesture::GestureKind;
pub use info::{
    FreehandInfo, LineInfo, Mixed, MultiSelectionInfo, NodeProps, SelectionInfo, ShapeInfo,
    TextInfo, UndoRedoState,
};
pub use inline_edit::{EditTarget, InlineEdit};

use crate::config::EditorConfig;
use crate::history::History;
use crate::input::{Key, KeyEvent, PointerEvent};
use crate::paint::{Painter, SELECTION_COLOR, parse_color};
use crate::scene::{LayerMove, Scene, SceneError};
use crate::selection::handle_positions;
use crate::shapes::{NodeId, SceneNode};
use crate::storage::{BlobStore, PersistedState};
use crate::tools::{FreehandStyle, ToolKind};
use crate::viewport::Viewport;
use events::Listeners;
use gesture::Gesture;
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape, Size, Vec2};
use peniko::Color;

/// Zoom step of the zoom in/out commands.
const ZOOM_STEP: f64 = 1.2;
/// Wheel delta to zoom exponent.
const WHEEL_ZOOM_SPEED: f64 = 0.001;

/// Clipboard contents and the paste stagger counter.
#[derive(Debug, Default)]
struct Clipboard {
    nodes: Vec<SceneNode>,
    paste_count: u32,
}

/// Interactive whiteboard editor.
pub struct Editor {
    scene: Scene,
    viewport: Viewport,
    history: History,
    config: EditorConfig,
    tool: ToolKind,
    freehand_style: FreehandStyle,
    gesture: Gesture,
    inline_edit: Option<InlineEdit>,
    clipboard: Clipboard,
    surface_size: Size,
    storage: Option<Box<dyn BlobStore>>,
    listeners: Listeners,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor without persistence.
    pub fn new(config: EditorConfig) -> Self {
        let viewport = Viewport::new().with_scale_limits(config.min_scale, config.max_scale);
        let mut editor = Self {
            scene: Scene::new(),
            viewport,
            history: History::new(config.history_capacity),
            freehand_style: config.freehand.clone(),
            config,
            tool: ToolKind::default(),
            gesture: Gesture::Idle,
            inline_edit: None,
            clipboard: Clipboard::default(),
            surface_size: Size::new(800.0, 600.0),
            storage: None,
            listeners: Listeners::default(),
        };
        editor.history.reset(editor.scene.to_data());
        editor
    }

    /// Create an editor backed by a blob store, restoring any saved state.
    pub fn with_storage(config: EditorConfig, storage: Box<dyn BlobStore>) -> Self {
        let mut editor = Self::new(config);
        editor.storage = Some(storage);
        editor.restore_from_storage();
        editor.history.reset(editor.scene.to_data());
        editor
    }

    fn restore_from_storage(&mut self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let blob = match storage.load(&self.config.storage_key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Failed to read saved state: {}", e);
                return;
            }
        };
        match PersistedState::from_json(&blob) {
            Ok(state) => {
                self.scene.load_data(state.scene);
                if let Some(viewport) = state.viewport {
                    if !self.viewport.set_transform(viewport.transform) {
                        log::warn!("Ignoring invalid saved viewport {:?}", viewport.transform);
                    }
                }
                log::info!("Restored {} nodes from storage", self.scene.len());
            }
            Err(e) => log::warn!("Failed to restore saved state: {}", e),
        }
    }

    /// Write the persisted blob. Failures are logged and otherwise ignored.
    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let state = PersistedState {
            scene: self.scene.to_data(),
            viewport: Some(self.viewport),
        };
        let result = state
            .to_json()
            .and_then(|json| storage.save(&self.config.storage_key, &json));
        if let Err(e) = result {
            log::warn!("Failed to save state: {}", e);
        }
    }

    fn notify(&self) {
        self.listeners.notify();
    }

    /// Record a history snapshot, persist and notify.
    fn commit(&mut self) {
        self.history.push(self.scene.to_data());
        self.persist();
        self.notify();
    }

    // --- Accessors ---

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool != tool {
            log::debug!("Tool changed to {}", tool.name());
            self.tool = tool;
            self.notify();
        }
    }

    pub fn freehand_style(&self) -> &FreehandStyle {
        &self.freehand_style
    }

    pub fn set_freehand_style(&mut self, style: FreehandStyle) {
        self.freehand_style = style;
    }

    pub fn node_count(&self) -> usize {
        self.scene.len()
    }

    pub fn selection_count(&self) -> usize {
        self.scene.selection_count()
    }

    pub fn selection_info(&self) -> SelectionInfo {
        let selected: Vec<&SceneNode> = self.scene.selected().collect();
        SelectionInfo::from_nodes(&selected)
    }

    pub fn undo_redo_state(&self) -> UndoRedoState {
        UndoRedoState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Register a change listener; it stays attached while the guard lives.
    pub fn subscribe(&self, callback: impl FnMut() + 'static) -> Subscription {
        self.listeners.subscribe(callback)
    }

    // --- Viewport ---

    /// Size of the drawing surface in screen pixels.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface_size = Size::new(width.max(1.0), height.max(1.0));
        self.notify();
    }

    pub fn surface_size(&self) -> Size {
        self.surface_size
    }

    /// World rectangle currently on screen.
    pub fn visible_world_rect(&self) -> Rect {
        self.viewport.visible_world_rect(self.surface_size)
    }

    pub fn zoom_in(&mut self) {
        self.zoom_at_center(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_at_center(1.0 / ZOOM_STEP);
    }

    fn zoom_at_center(&mut self, factor: f64) {
        let center = Point::new(self.surface_size.width / 2.0, self.surface_size.height / 2.0);
        if self.viewport.zoom_at(center, factor) {
            self.persist();
            self.notify();
        }
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.persist();
        self.notify();
    }

    /// Wheel input: command-modified zooms at the pointer, otherwise pans.
    fn wheel(&mut self, position: Point, delta: Vec2, command: bool) {
        if command {
            self.viewport.zoom_at(position, (-delta.y * WHEEL_ZOOM_SPEED).exp());
        } else {
            self.viewport.pan_by(-delta);
        }
        self.persist();
        self.notify();
    }

    // --- Input dispatch ---

    /// Feed one pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, .. } => self.pointer_up(position),
            PointerEvent::DoubleClick { position } => {
                self.double_click(position);
            }
            PointerEvent::Scroll {
                position,
                delta,
                modifiers,
            } => self.wheel(position, delta, modifiers.command()),
        }
    }

    /// Feed one key press. Returns `true` if the editor consumed it.
    ///
    /// While an inline editor is open only its commit/cancel keys are
    /// handled; everything else belongs to the text overlay.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.inline_edit.is_some() {
            return match event.key {
                Key::Escape => {
                    self.cancel_inline_edit();
                    true
                }
                Key::Enter if event.modifiers.command() => {
                    self.commit_inline_edit();
                    true
                }
                _ => false,
            };
        }

        let shift = event.modifiers.shift;
        match &event.key {
            Key::Delete | Key::Backspace => {
                self.delete_selected();
                true
            }
            _ if event.is_command('z') && shift => {
                self.redo();
                true
            }
            _ if event.is_command('z') => {
                self.undo();
                true
            }
            _ if event.is_command('y') => {
                self.redo();
                true
            }
            _ if event.is_command('g') && shift => {
                self.ungroup();
                true
            }
            _ if event.is_command('g') => {
                self.group();
                true
            }
            _ if event.is_command('c') => {
                self.copy();
                true
            }
            _ if event.is_command('v') => {
                self.paste();
                true
            }
            _ if event.is_command('d') => {
                self.duplicate();
                true
            }
            Key::Character(c) if !event.modifiers.command() && !event.modifiers.alt => {
                let tool = [ToolKind::Select, ToolKind::Freehand]
                    .into_iter()
                    .find(|t| t.shortcut().eq_ignore_ascii_case(c));
                match tool {
                    Some(tool) => {
                        self.set_tool(tool);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    // --- Node creation and removal ---

    /// Insert a node on top of the scene and commit it.
    pub fn add_node(&mut self, node: SceneNode) -> Result<NodeId, SceneError> {
        let id = node.id.clone();
        self.scene.add_node(node)?;
        self.scene.resolve_bindings();
        self.commit();
        Ok(id)
    }

    fn add_selected(&mut self, node: SceneNode) -> NodeId {
        let id = node.id.clone();
        self.scene.clear_selection();
        if let Err(e) = self.scene.add_node(SceneNode {
            selected: true,
            ..node
        }) {
            log::warn!("Could not add node: {}", e);
        }
        self.commit();
        id
    }

    fn placement_origin(&self) -> Point {
        self.viewport.screen_to_world(Point::ZERO)
    }

    pub fn add_rect(&mut self) -> NodeId {
        let o = self.placement_origin();
        self.add_selected(SceneNode::rect(o.x + 100.0, o.y + 100.0, 100.0, 100.0))
    }

    pub fn add_circle(&mut self) -> NodeId {
        let o = self.placement_origin();
        self.add_selected(SceneNode::circle(o.x + 120.0, o.y + 120.0, 100.0, 100.0))
    }

    pub fn add_text(&mut self) -> NodeId {
        let o = self.placement_origin();
        self.add_selected(SceneNode::text(o.x + 150.0, o.y + 150.0, "Hello"))
    }

    pub fn add_line(&mut self) -> NodeId {
        let o = self.placement_origin();
        let start = Point::new(o.x + 100.0, o.y + 200.0);
        self.add_selected(SceneNode::line(start, start + Vec2::new(150.0, 0.0)))
    }

    /// Delete the selected nodes. Bindings to them are cleared.
    pub fn delete_selected(&mut self) {
        let removed = self.scene.remove_where(|n| n.selected);
        if removed > 0 {
            log::debug!("Deleted {} nodes", removed);
            self.scene.resolve_bindings();
            self.commit();
        }
    }

    /// Remove every node.
    pub fn clear_all(&mut self) {
        self.scene.clear();
        self.gesture = Gesture::Idle;
        self.commit();
    }

    // --- Selection ---

    pub fn select(&mut self, id: &str) {
        self.scene.select_only([&id.to_string()]);
        self.notify();
    }

    pub fn select_all(&mut self) {
        for node in self.scene.nodes_mut() {
            node.selected = true;
        }
        self.notify();
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
        self.notify();
    }

    // --- Layers ---

    fn move_layers(&mut self, direction: LayerMove) {
        if self.scene.move_selected(direction) {
            self.commit();
        }
    }

    pub fn bring_to_front(&mut self) {
        self.move_layers(LayerMove::ToFront);
    }

    pub fn send_to_back(&mut self) {
        self.move_layers(LayerMove::ToBack);
    }

    pub fn move_up(&mut self) {
        self.move_layers(LayerMove::Forward);
    }

    pub fn move_down(&mut self) {
        self.move_layers(LayerMove::Backward);
    }

    // --- History ---

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.replay(snapshot);
        }
    }

    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            self.replay(snapshot);
        }
    }

    fn replay(&mut self, snapshot: crate::scene::SceneData) {
        self.history.set_replaying(true);
        self.gesture = Gesture::Idle;
        self.scene.load_data(snapshot);
        self.commit();
        self.history.set_replaying(false);
    }

    // --- Serialization ---

    /// Scene as pretty JSON.
    pub fn save_json(&self) -> Result<String, serde_json::Error> {
        self.scene.to_json()
    }

    /// Replace the scene from JSON. Errors leave the scene untouched.
    pub fn load_json(&mut self, json: &str) -> Result<(), SceneError> {
        self.scene.load_from_json(json)?;
        self.gesture = Gesture::Idle;
        self.inline_edit = None;
        self.scene.resolve_bindings();
        self.commit();
        Ok(())
    }

    // --- Rendering ---

    /// Paint grid, scene and interaction overlays.
    pub fn render(&mut self, painter: &mut dyn Painter) {
        let scale = self.viewport.scale();
        let view = self.visible_world_rect();
        painter.set_transform(self.viewport.affine());

        if self.config.show_grid {
            self.paint_grid(painter, view, scale);
        }
        self.scene.render(painter, Some(view));

        if let Some(bounds) = self.resize_bounds() {
            painter.stroke_path(&bounds.to_path(0.1), SELECTION_COLOR, 1.0 / scale);
            let half = self.config.handle_size / scale / 2.0;
            for (_, pos) in handle_positions(bounds) {
                let square = Rect::from_center_size(pos, Size::new(half * 2.0, half * 2.0)).to_path(0.1);
                painter.fill_path(&square, Color::from_rgba8(255, 255, 255, 255));
                painter.stroke_path(&square, SELECTION_COLOR, 1.0 / scale);
            }
        }

        for node in self.scene.selected().filter(|n| n.is_line()) {
            for point in [node.line_start(), node.line_end()] {
                painter.fill_path(&Circle::new(point, 4.0 / scale).to_path(0.1), SELECTION_COLOR);
            }
        }

        if let Some(marquee) = self.marquee() {
            let path = marquee.to_path(0.1);
            painter.fill_path(&path, Color::from_rgba8(0x00, 0x66, 0xcc, 0x1a));
            painter.stroke_path(&path, SELECTION_COLOR, 1.0 / scale);
        }
    }

    fn paint_grid(&self, painter: &mut dyn Painter, view: Rect, scale: f64) {
        let spacing = self.config.grid_spacing;
        if spacing <= 0.0 {
            return;
        }
        let color = parse_color("#e5e5e5");
        let mut path = BezPath::new();
        let mut x = (view.x0 / spacing).floor() * spacing;
        while x <= view.x1 {
            path.move_to((x, view.y0));
            path.line_to((x, view.y1));
            x += spacing;
        }
        let mut y = (view.y0 / spacing).floor() * spacing;
        while y <= view.y1 {
            path.move_to((view.x0, y));
            path.line_to((view.x1, y));
            y += spacing;
        }
        painter.stroke_path(&path, color, 1.0 / scale);
    }
}

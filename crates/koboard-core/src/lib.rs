//! KoBoard Core Library
//!
//! Platform-agnostic scene graph and interaction engine for the KoBoard
//! whiteboard. The host feeds pointer and key events into an [`Editor`] and
//! paints through a [`Painter`].

pub mod bridge;
pub mod config;
pub mod editor;
pub mod history;
pub mod input;
pub mod paint;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod tools;
pub mod viewport;

pub use bridge::{AiItem, AiShape, DiagramBridge, JsonlDecoder};
pub use config::EditorConfig;
pub use editor::{Alignment, Axis, Editor, GestureKind, NodeProps, SelectionInfo, Subscription, UndoRedoState};
pub use history::History;
pub use input::{CursorIcon, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use paint::{Painter, TextAlign};
pub use scene::{Scene, SceneData, SceneError};
pub use shapes::{Anchor, LineBinding, NodeId, NodeKind, NodeType, SceneNode};
pub use storage::{BlobStore, MemoryStorage, PersistedState, StorageError};
pub use tools::{FreehandStyle, ToolKind};
pub use viewport::Viewport;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;

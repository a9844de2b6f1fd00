//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use ember_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Engine, EngineState};

// Configuration and errors
pub use crate::core::config::{WindowConfig, WindowFlags};
pub use crate::core::error::EngineError;

// Scene-facing context
pub use crate::core::context::{EngineContext, EngineControl};

// Scene system
pub use crate::core::scene::{Scene, SceneManager};

// Draw batch
pub use crate::core::draw::{Color, DrawCommand, DrawQueue, Rect};

// Input
pub use crate::core::input::{InputEvent, InputState, KeyCode, Modifiers, MouseButton};

// Capability traits for custom platforms
pub use crate::core::services::{
    AudioService, Clock, DisplayService, EventService, FontService, FrameInput, Platform,
    RenderService,
};

//=========================================================================
// Engine Core
//=========================================================================
//
// Engine-internal systems, independent of any platform backend:
//
// - `config`: window creation parameters
// - `context`: scene-facing shared state and loop steering
// - `draw`: deferred draw batch
// - `error`: bring-up error taxonomy
// - `input`: portable input events and per-frame state
// - `scene`: scene trait and name-keyed manager
// - `services`: capability traits the frame loop consumes
// - `timer`: wall-clock frame timing
//
// Everything here runs against the `services` traits only, which is what
// lets the whole loop execute under test with fake collaborators.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod config;
pub mod context;
pub mod draw;
pub mod error;
pub mod input;
pub mod scene;
pub mod services;
pub mod timer;

//=== Public API ==========================================================

pub use config::{WindowConfig, WindowFlags};
pub use context::{EngineContext, EngineControl};
pub use draw::{Color, DrawCommand, DrawQueue, Rect};
pub use error::EngineError;
pub use input::{InputEvent, InputState, KeyCode, Modifiers, MouseButton};
pub use scene::{Scene, SceneManager};
pub use services::{
    AudioService, Clock, DisplayService, EventService, FontService, FrameInput, Platform,
    RenderService,
};
pub use timer::FrameClock;

//=========================================================================
// Platform Services
//=========================================================================
//
// Capability interfaces between the engine loop and its platform
// collaborators.
//
// The loop core only ever talks to these traits, so platform backends can
// be swapped without touching core code, and the loop is testable against
// fake implementations with no window system present (Dependency
// Inversion Principle).
//
// Components:
// - `Platform`: ordered bring-up factory producing the service set
// - per-concern service traits consumed by the frame loop
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::config::WindowConfig;
use crate::core::draw::{Color, DrawCommand};
use crate::core::error::EngineError;
use crate::core::input::InputEvent;
use crate::core::timer::FrameClock;

//=== FrameInput ==========================================================

/// One frame's worth of collected platform events.
#[derive(Debug, Default)]
pub struct FrameInput {
    /// Input events in platform delivery order.
    pub events: Vec<InputEvent>,

    /// The user or OS asked for the window to close this frame.
    pub close_requested: bool,
}

//=== Display Service =====================================================

/// Owns the native window handle.
pub trait DisplayService {
    /// Current drawable size in physical pixels.
    fn size(&self) -> (u32, u32);
}

//=== Render Service ======================================================

/// Owns the drawing surface bound to the window.
///
/// The engine drives these methods in a fixed per-frame order:
/// `clear` → `update_viewport` → scene render (`submit` calls) → deferred
/// batch flush (more `submit` calls) → `reset_draw_color` → `present`.
pub trait RenderService {
    /// Begins a frame by clearing the surface with the current draw color.
    fn clear(&mut self);

    /// Recomputes the viewport to match the current window size.
    fn update_viewport(&mut self, size: (u32, u32));

    /// Draws a single command into the current frame.
    fn submit(&mut self, command: DrawCommand);

    /// Sets the draw color used for the next `clear`.
    fn set_draw_color(&mut self, color: Color);

    /// Resets the draw color to opaque black.
    fn reset_draw_color(&mut self);

    /// Submits the frame to the display.
    fn present(&mut self);
}

//=== Event Service =======================================================

/// Pumps platform events once per frame.
pub trait EventService {
    /// Collects the events that arrived since the previous frame.
    fn collect(&mut self) -> FrameInput;

    /// Resets per-frame transient event state.
    fn end_frame(&mut self);
}

//=== Audio Service =======================================================

/// Owns the audio output.
///
/// Mixing and playback are backend concerns; the engine only guarantees
/// bring-up order and teardown.
pub trait AudioService {
    fn set_master_volume(&mut self, volume: f32);

    fn master_volume(&self) -> f32;
}

//=== Font Service ========================================================

/// Owns the font registry.
pub trait FontService {
    /// Parses and registers font data under a name.
    fn load(&mut self, name: &str, bytes: &[u8]) -> Result<(), EngineError>;

    fn contains(&self, name: &str) -> bool;
}

//=== Clock ===============================================================

/// Frame timing source.
pub trait Clock {
    /// Seconds between the two most recent `tick` calls.
    fn delta_time(&self) -> f32;

    /// Marks the end of a frame.
    fn tick(&mut self);
}

//=== Platform ============================================================

/// Stateful bring-up factory for a full service set.
///
/// [`Engine::init_with`](crate::Engine::init_with) calls these methods in
/// exactly this order, short-circuiting on the first error:
///
/// 1. `init_multimedia` — event loop / core subsystem
/// 2. `init_audio`
/// 3. `init_fonts`
/// 4. `create_display` — native window
/// 5. `create_renderer` — surface bound to that window
/// 6. `create_events` — per-frame event pump
///
/// Implementations may carry state between steps (the winit backend keeps
/// the event loop from step 1 and the window from step 4 for later steps).
pub trait Platform {
    fn init_multimedia(&mut self) -> Result<(), EngineError>;

    fn init_audio(&mut self) -> Result<Box<dyn AudioService>, EngineError>;

    fn init_fonts(&mut self) -> Result<Box<dyn FontService>, EngineError>;

    fn create_display(
        &mut self,
        config: &WindowConfig,
    ) -> Result<Box<dyn DisplayService>, EngineError>;

    fn create_renderer(&mut self) -> Result<Box<dyn RenderService>, EngineError>;

    fn create_events(&mut self) -> Result<Box<dyn EventService>, EngineError>;

    /// Frame timing source; wall-clock unless overridden.
    fn create_clock(&mut self) -> Box<dyn Clock> {
        Box::new(FrameClock::new())
    }
}

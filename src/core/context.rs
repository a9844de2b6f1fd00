//=========================================================================
// Engine Context
//=========================================================================
//
// Shared data container for scenes.
//
// Scenes receive `&mut EngineContext` during their lifecycle methods.
// This separates scene-accessible data from the engine's own services:
// a scene can read input, queue deferred draws and steer the loop, but
// never touches the window or the render surface directly.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::draw::DrawQueue;
use crate::core::input::InputState;

//=== EngineControl =======================================================

/// Loop steering requests raised from inside a frame.
///
/// All requests are observed by the engine at step boundaries, never
/// mid-step:
///
/// - `quit` is observed at the loop test, so the requesting frame still
///   finishes (including its render) and no further frame begins.
/// - `terminate` aborts at the next step boundary; a fatal raised in
///   `update` skips that frame's render entirely.
/// - `switch_scene` is applied at the end of the frame, after the
///   end-of-frame reset.
#[derive(Debug, Default)]
pub struct EngineControl {
    quit: bool,
    fatal: Option<String>,
    pending_scene: Option<String>,
}

impl EngineControl {
    /// Requests a graceful exit. Idempotent.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Raises the abnormal-exit signal with a message.
    ///
    /// The first signal of a frame wins; later calls in the same frame are
    /// dropped (the loop is already unwinding past them).
    pub fn terminate(&mut self, message: impl Into<String>) {
        if self.fatal.is_none() {
            self.fatal = Some(message.into());
        }
    }

    /// Requests a switch to the named scene at the end of this frame.
    ///
    /// The last request of a frame wins.
    pub fn switch_scene(&mut self, name: impl Into<String>) {
        self.pending_scene = Some(name.into());
    }

    //--- Engine-side observation ------------------------------------------

    pub(crate) fn quit_requested(&self) -> bool {
        self.quit
    }

    pub(crate) fn take_fatal(&mut self) -> Option<String> {
        self.fatal.take()
    }

    pub(crate) fn take_pending_scene(&mut self) -> Option<String> {
        self.pending_scene.take()
    }
}

//=== EngineContext =======================================================

/// Shared context handed to scenes every frame.
pub struct EngineContext {
    /// Loop steering: quit, terminate, scene switching.
    pub control: EngineControl,

    /// Keyboard/mouse state for the current frame.
    pub input: InputState,

    /// Deferred draw batch, flushed after the scene renders.
    pub draw: DrawQueue,
}

impl EngineContext {
    pub(crate) fn new() -> Self {
        Self {
            control: EngineControl::default(),
            input: InputState::new(),
            draw: DrawQueue::new(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

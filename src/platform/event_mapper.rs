//=========================================================================
// Platform Event Mapper
//=========================================================================
//
// Converts winit window events into engine `InputEvent`s.
//
// Stateful modifier tracking: winit reports modifier changes as separate
// `ModifiersChanged` events, so the mapper caches the latest state and
// stamps it onto every subsequent key/mouse event.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Key Conversion ======================================================

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            //--- Numeric keys -------------------------------------------
            W::Digit0 => KeyCode::Digit0, W::Digit1 => KeyCode::Digit1,
            W::Digit2 => KeyCode::Digit2, W::Digit3 => KeyCode::Digit3,
            W::Digit4 => KeyCode::Digit4, W::Digit5 => KeyCode::Digit5,
            W::Digit6 => KeyCode::Digit6, W::Digit7 => KeyCode::Digit7,
            W::Digit8 => KeyCode::Digit8, W::Digit9 => KeyCode::Digit9,

            //--- Alphabetic keys ----------------------------------------
            W::KeyA => KeyCode::KeyA, W::KeyB => KeyCode::KeyB, W::KeyC => KeyCode::KeyC,
            W::KeyD => KeyCode::KeyD, W::KeyE => KeyCode::KeyE, W::KeyF => KeyCode::KeyF,
            W::KeyG => KeyCode::KeyG, W::KeyH => KeyCode::KeyH, W::KeyI => KeyCode::KeyI,
            W::KeyJ => KeyCode::KeyJ, W::KeyK => KeyCode::KeyK, W::KeyL => KeyCode::KeyL,
            W::KeyM => KeyCode::KeyM, W::KeyN => KeyCode::KeyN, W::KeyO => KeyCode::KeyO,
            W::KeyP => KeyCode::KeyP, W::KeyQ => KeyCode::KeyQ, W::KeyR => KeyCode::KeyR,
            W::KeyS => KeyCode::KeyS, W::KeyT => KeyCode::KeyT, W::KeyU => KeyCode::KeyU,
            W::KeyV => KeyCode::KeyV, W::KeyW => KeyCode::KeyW, W::KeyX => KeyCode::KeyX,
            W::KeyY => KeyCode::KeyY, W::KeyZ => KeyCode::KeyZ,

            //--- Arrow keys ---------------------------------------------
            W::ArrowDown => KeyCode::ArrowDown,
            W::ArrowLeft => KeyCode::ArrowLeft,
            W::ArrowRight => KeyCode::ArrowRight,
            W::ArrowUp => KeyCode::ArrowUp,

            //--- Special keys -------------------------------------------
            W::Space => KeyCode::Space,
            W::Enter => KeyCode::Enter,
            W::Escape => KeyCode::Escape,
            W::Tab => KeyCode::Tab,
            W::Backspace => KeyCode::Backspace,
            W::Delete => KeyCode::Delete,

            //--- Fallback -----------------------------------------------
            _ => KeyCode::Unidentified,
        }
    }
}

//=== Mouse Conversion ====================================================

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=== Modifier Conversion =================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

//=== EventMapper =========================================================

/// Converts winit window events to engine events, stamping cached
/// modifier state onto each one.
pub(crate) struct EventMapper {
    modifiers: Modifiers,
}

impl EventMapper {
    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
        }
    }

    /// Caches the modifier state applied to subsequent events.
    pub(crate) fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    /// Maps a window event; `None` for events the input layer ignores.
    pub(crate) fn map(&self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let key = match key_event.physical_key {
                    PhysicalKey::Code(code) => KeyCode::from(code),
                    _ => KeyCode::Unidentified,
                };

                let mapped = match key_event.state {
                    ElementState::Pressed => InputEvent::KeyDown {
                        key,
                        modifiers: self.modifiers,
                    },
                    ElementState::Released => InputEvent::KeyUp {
                        key,
                        modifiers: self.modifiers,
                    },
                };
                Some(mapped)
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(*button);
                let mapped = match state {
                    ElementState::Pressed => InputEvent::MouseButtonDown {
                        button,
                        modifiers: self.modifiers,
                    },
                    ElementState::Released => InputEvent::MouseButtonUp {
                        button,
                        modifiers: self.modifiers,
                    },
                };
                Some(mapped)
            }

            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::MouseMoved {
                x: position.x as f32,
                y: position.y as f32,
            }),

            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

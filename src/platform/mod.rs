//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Native backend: winit windowing/event pump, wgpu rendering, fontdue
// fonts, rodio audio (feature-gated).
//
// `WinitPlatform` is the bring-up factory the engine drives during
// `init`. It is stateful across the ordered steps:
//
// ```text
//   init_multimedia  → event loop + event channel
//   init_audio       → audio backend
//   init_fonts       → font registry
//   create_display   → shell (event loop + handler) pumps until the
//                      window exists; display handle returned
//   create_renderer  → wgpu surface bound to that window
//   create_events    → shell + channel receiver become the event service
// ```
//
// Everything in this module stays private to the crate; the engine core
// only sees the `core::services` traits.
//
//=========================================================================

//=== Module Declarations =================================================

mod audio;
mod display;
mod event_mapper;
mod events;
mod fonts;
mod input_buffer;
mod renderer;
mod shell;

//=== External Dependencies ===============================================

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use winit::event_loop::EventLoop;
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::config::WindowConfig;
use crate::core::error::EngineError;
use crate::core::input::InputEvent;
use crate::core::services::{
    AudioService, DisplayService, EventService, FontService, Platform, RenderService,
};
use display::WinitDisplay;
use events::WinitEvents;
use fonts::FontLibrary;
use renderer::WgpuRenderer;
use shell::WinitShell;

//=== PlatformEvent =======================================================

/// Events crossing from the winit handler to the engine-facing event
/// service, one channel hop per frame.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// Batched input events for a single pump.
    Inputs(Vec<InputEvent>),

    /// Window close requested by the user or the OS.
    CloseRequested,
}

//=== WinitPlatform =======================================================

/// Native bring-up factory.
///
/// Carries intermediate state between the ordered bring-up steps; each
/// step consumes what the earlier ones produced. Calling a step out of
/// order is an error, which the engine's fixed call sequence never does.
pub(crate) struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    shell: Option<WinitShell>,
    window: Option<Arc<Window>>,
    sender: Option<Sender<PlatformEvent>>,
    receiver: Option<Receiver<PlatformEvent>>,
}

impl WinitPlatform {
    pub(crate) fn new() -> Self {
        Self {
            event_loop: None,
            shell: None,
            window: None,
            sender: None,
            receiver: None,
        }
    }
}

impl Platform for WinitPlatform {
    fn init_multimedia(&mut self) -> Result<(), EngineError> {
        let event_loop =
            EventLoop::new().map_err(|e| EngineError::MultimediaInit(e.to_string()))?;

        let (sender, receiver) = unbounded();
        self.event_loop = Some(event_loop);
        self.sender = Some(sender);
        self.receiver = Some(receiver);

        debug!(target: "platform", "event loop created");
        Ok(())
    }

    fn init_audio(&mut self) -> Result<Box<dyn AudioService>, EngineError> {
        audio::bring_up()
    }

    fn init_fonts(&mut self) -> Result<Box<dyn FontService>, EngineError> {
        Ok(Box::new(FontLibrary::new()))
    }

    fn create_display(
        &mut self,
        config: &WindowConfig,
    ) -> Result<Box<dyn DisplayService>, EngineError> {
        let event_loop = self.event_loop.take().ok_or_else(|| {
            EngineError::WindowCreation("multimedia subsystem is not initialized".into())
        })?;
        let sender = self.sender.clone().ok_or_else(|| {
            EngineError::WindowCreation("event channel is not initialized".into())
        })?;

        let mut shell = WinitShell::new(event_loop, config.clone(), sender);

        // The window materializes inside `resumed`, delivered by a pump.
        // A few rounds cover platforms that need more than one.
        const CREATE_PUMPS: usize = 8;
        for _ in 0..CREATE_PUMPS {
            shell.pump();
            if shell.window().is_some() || shell.creation_failed() {
                break;
            }
        }

        if let Some(reason) = shell.take_creation_error() {
            return Err(EngineError::WindowCreation(reason));
        }
        let window = shell
            .window()
            .ok_or_else(|| EngineError::WindowCreation("platform never delivered a window".into()))?;

        self.shell = Some(shell);
        self.window = Some(window.clone());
        Ok(Box::new(WinitDisplay::new(window)))
    }

    fn create_renderer(&mut self) -> Result<Box<dyn RenderService>, EngineError> {
        let window = self
            .window
            .clone()
            .ok_or_else(|| EngineError::RendererInit("no window to bind a surface to".into()))?;

        Ok(Box::new(WgpuRenderer::new(window)?))
    }

    fn create_events(&mut self) -> Result<Box<dyn EventService>, EngineError> {
        let shell = self
            .shell
            .take()
            .ok_or_else(|| EngineError::MultimediaInit("display was not created".into()))?;
        let receiver = self
            .receiver
            .take()
            .ok_or_else(|| EngineError::MultimediaInit("event channel is not initialized".into()))?;

        Ok(Box::new(WinitEvents::new(shell, receiver)))
    }
}

//=========================================================================
// Winit Shell
//=========================================================================
//
// Owns the winit event loop and window, and pumps OS events once per
// engine frame.
//
// Architecture:
// ```text
//   WinitShell::pump()                       Engine frame loop:
//   ┌──────────────────────────┐
//   │ pump_app_events(0)       │             EventService::collect()
//   │   resumed() → window     │               └─ shell.pump()
//   │   window_event()         │               └─ drain channel
//   │     ├─ EventMapper       │
//   │     └─ InputBuffer       │
//   │ flush → channel ─────────┼──────────────► FrameInput
//   └──────────────────────────┘
// ```
//
// The engine owns the frame loop, so the shell never blocks: each pump
// drains whatever the OS queued since the previous frame and returns.
// Buffered input is flushed through the channel as one batch per pump,
// keeping delivery order deterministic.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, info, trace, warn};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::window::{Fullscreen, Window, WindowAttributes};

//=== Internal Dependencies ===============================================

use super::event_mapper::EventMapper;
use super::input_buffer::InputBuffer;
use super::PlatformEvent;
use crate::core::config::WindowConfig;
use crate::core::input::InputEvent;

//=== WinitShell ==========================================================

/// Event loop owner; pumped once per engine frame.
pub(crate) struct WinitShell {
    event_loop: EventLoop<()>,
    app: ShellApp,
}

impl WinitShell {
    pub(crate) fn new(
        event_loop: EventLoop<()>,
        config: WindowConfig,
        sender: Sender<PlatformEvent>,
    ) -> Self {
        Self {
            event_loop,
            app: ShellApp::new(config, sender),
        }
    }

    /// Drains pending OS events and flushes buffered input to the channel.
    ///
    /// The zero timeout makes this non-blocking; frame pacing belongs to
    /// the engine loop, not the platform.
    pub(crate) fn pump(&mut self) {
        let _status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);
        self.app.flush_input();
    }

    /// Window handle, once `resumed` has created it.
    pub(crate) fn window(&self) -> Option<Arc<Window>> {
        self.app.window.clone()
    }

    /// `true` once the handler has reported a window-creation failure.
    pub(crate) fn creation_failed(&self) -> bool {
        self.app.creation_error.is_some()
    }

    /// Window-creation failure reported by the handler, if any.
    pub(crate) fn take_creation_error(&mut self) -> Option<String> {
        self.app.creation_error.take()
    }
}

//=== ShellApp ============================================================

//
// The `ApplicationHandler` winit drives during a pump. Buffers mapped
// input until the pump ends; the close request goes straight to the
// channel so it survives even an input-free frame.
//
struct ShellApp {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    creation_error: Option<String>,
    buffer: InputBuffer,
    mapper: EventMapper,
    sender: Sender<PlatformEvent>,
}

impl ShellApp {
    fn new(config: WindowConfig, sender: Sender<PlatformEvent>) -> Self {
        Self {
            config,
            window: None,
            creation_error: None,
            buffer: InputBuffer::new(),
            mapper: EventMapper::new(),
            sender,
        }
    }

    fn window_attributes(&self) -> WindowAttributes {
        let flags = self.config.flags;

        let mut attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(flags.resizable)
            .with_decorations(!flags.borderless)
            .with_maximized(flags.maximized)
            .with_visible(!flags.hidden);

        if flags.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        if !flags.centered {
            attrs = attrs.with_position(PhysicalPosition::new(self.config.x, self.config.y));
        }

        attrs
    }

    /// Sends the frame's buffered input as one batch.
    ///
    /// Empty batches are not sent. A disconnected channel is logged and
    /// the events dropped; shutdown is already in progress at that point.
    fn flush_input(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let events = self.buffer.drain();
        trace!(target: "platform::input", "flushing {} input events", events.len());

        if self.sender.send(PlatformEvent::Inputs(events)).is_err() {
            warn!(target: "platform::input", "event channel disconnected, input dropped");
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for ShellApp {
    /// Creates the window on startup (and tolerates mobile resume cycles).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "window already exists (resume?)");
            return;
        }

        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "window created: {}x{} @ {}x scale",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                // Reported through bring-up, which owns failure logging.
                self.creation_error = Some(e.to_string());
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "window close requested");
                let _ = self.sender.send(PlatformEvent::CloseRequested);
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "modifiers changed: {:?}", state);
                self.mapper.update_modifiers(state.state());
            }

            WindowEvent::RedrawRequested => {
                // The engine redraws every frame on its own; nothing to do.
            }

            other => {
                if let Some(mapped) = self.mapper.map(&other) {
                    match mapped {
                        InputEvent::MouseMoved { .. } => self.buffer.push_continuous(mapped),
                        _ => self.buffer.push_discrete(mapped),
                    }
                }
            }
        }
    }
}

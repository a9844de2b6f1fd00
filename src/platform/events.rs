//=========================================================================
// Winit Event Service
//=========================================================================
//
// Engine-facing event collection: pumps the shell once, then drains the
// platform channel into a `FrameInput`.
//
// Flow:
//   collect() → shell.pump() → Receiver<PlatformEvent> → FrameInput
//
// Draining is bounded to keep a runaway producer from starving the
// frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::shell::WinitShell;
use super::PlatformEvent;
use crate::core::services::{EventService, FrameInput};

//=== WinitEvents =========================================================

/// Per-frame event pump over the winit shell.
pub(crate) struct WinitEvents {
    shell: WinitShell,
    receiver: Receiver<PlatformEvent>,
}

impl WinitEvents {
    pub(crate) fn new(shell: WinitShell, receiver: Receiver<PlatformEvent>) -> Self {
        Self { shell, receiver }
    }
}

impl EventService for WinitEvents {
    fn collect(&mut self) -> FrameInput {
        const MAX_BATCHES_PER_FRAME: usize = 100;

        self.shell.pump();

        let mut frame = FrameInput::default();
        let mut drained = 0;

        while drained < MAX_BATCHES_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs(batch)) => {
                    frame.events.extend(batch);
                    drained += 1;
                }
                Ok(PlatformEvent::CloseRequested) => {
                    frame.close_requested = true;
                    drained += 1;
                }
                // The sender lives in the shell this service owns, so a
                // disconnect means the platform is gone: treat as close.
                Err(TryRecvError::Disconnected) => {
                    frame.close_requested = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_BATCHES_PER_FRAME {
            warn!(target: "platform", "event backlog: drained {} batches this frame", drained);
        }

        frame
    }

    fn end_frame(&mut self) {
        // Shell buffers are already drained by the pump; per-frame input
        // deltas are reset engine-side.
    }
}

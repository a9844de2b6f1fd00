//=========================================================================
// Winit Display Service
//=========================================================================

use std::sync::Arc;

use winit::window::Window;

use crate::core::services::DisplayService;

//=== WinitDisplay ========================================================

/// Thin handle over the native window.
///
/// The window itself is shared with the renderer (surface lifetime) and
/// the shell (event routing); this wrapper is the loop's read-only view.
pub(crate) struct WinitDisplay {
    window: Arc<Window>,
}

impl WinitDisplay {
    pub(crate) fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl DisplayService for WinitDisplay {
    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

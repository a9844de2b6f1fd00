//=========================================================================
// Engine Errors
//=========================================================================
//
// Error taxonomy for engine bring-up.
//
// Each variant corresponds to one bring-up step, in acquisition order.
// Runtime faults inside platform backends (surface loss, device errors)
// are handled by the backends themselves and never surface here.
//
//=========================================================================

//=== EngineError =========================================================

/// Engine initialization errors.
///
/// Bring-up short-circuits at the first failing step; the variant tells
/// the caller which step failed. The payload carries the backend's own
/// message (winit/wgpu/rodio error text, or a fake's description in tests).
#[derive(Debug)]
pub enum EngineError {
    /// Multimedia subsystem (event loop) creation failed.
    MultimediaInit(String),

    /// Audio output bring-up failed.
    AudioInit(String),

    /// Font registry bring-up failed, or a font failed to parse.
    FontInit(String),

    /// Native window creation failed.
    WindowCreation(String),

    /// Render surface/device acquisition failed.
    RendererInit(String),

    /// `init` was called on an engine that already completed bring-up.
    AlreadyInitialized,
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultimediaInit(e) => write!(f, "multimedia subsystem init failed: {}", e),
            Self::AudioInit(e) => write!(f, "audio subsystem init failed: {}", e),
            Self::FontInit(e) => write!(f, "font subsystem init failed: {}", e),
            Self::WindowCreation(e) => write!(f, "window creation failed: {}", e),
            Self::RendererInit(e) => write!(f, "renderer init failed: {}", e),
            Self::AlreadyInitialized => write!(f, "engine is already initialized"),
        }
    }
}

impl std::error::Error for EngineError {}

//=========================================================================
// Unit Tests
//=========================================================================

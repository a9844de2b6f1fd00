//=========================================================================
// Audio Service Backends
//=========================================================================
//
// Audio output bring-up. With the `audio` feature the real rodio output
// stream is opened; without it a null backend preserves the bring-up
// step (and its position in the init order) on headless hosts.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;
use crate::core::services::AudioService;

//=== Bring-up ============================================================

#[cfg(feature = "audio")]
pub(crate) fn bring_up() -> Result<Box<dyn AudioService>, EngineError> {
    Ok(Box::new(RodioAudio::new()?))
}

#[cfg(not(feature = "audio"))]
pub(crate) fn bring_up() -> Result<Box<dyn AudioService>, EngineError> {
    log::debug!(target: "platform::audio", "audio feature disabled, using null output");
    Ok(Box::new(NullAudio::default()))
}

//=== NullAudio ===========================================================

/// No-op audio output for headless builds and tests.
pub(crate) struct NullAudio {
    volume: f32,
}

impl Default for NullAudio {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

impl AudioService for NullAudio {
    fn set_master_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn master_volume(&self) -> f32 {
        self.volume
    }
}

//=== RodioAudio ==========================================================

/// rodio output stream held open for the engine's lifetime.
#[cfg(feature = "audio")]
pub(crate) struct RodioAudio {
    // Dropping the stream closes the device; keep it alive.
    _stream: rodio::OutputStream,
    _handle: rodio::OutputStreamHandle,
    volume: f32,
}

#[cfg(feature = "audio")]
impl RodioAudio {
    pub(crate) fn new() -> Result<Self, EngineError> {
        let (stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| EngineError::AudioInit(e.to_string()))?;

        log::info!(target: "platform::audio", "audio output opened");
        Ok(Self {
            _stream: stream,
            _handle: handle,
            volume: 1.0,
        })
    }
}

#[cfg(feature = "audio")]
impl AudioService for RodioAudio {
    fn set_master_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn master_volume(&self) -> f32 {
        self.volume
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

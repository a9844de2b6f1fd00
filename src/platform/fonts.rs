//=========================================================================
// Font Library
//=========================================================================
//
// fontdue-backed font registry. Bring-up creates an empty registry;
// hosts load font data by name afterwards and rasterize through
// `glyph()` when they render text themselves.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;
use crate::core::services::FontService;

//=== FontLibrary =========================================================

/// Name-keyed registry of parsed fonts.
#[derive(Default)]
pub(crate) struct FontLibrary {
    fonts: HashMap<String, fontdue::Font>,
}

impl FontLibrary {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Rasterizes a glyph from a loaded font.
    ///
    /// Returns coverage bitmap plus its dimensions, or `None` when the
    /// font name is unknown.
    #[allow(dead_code)] // host-facing, unused by the loop itself
    pub(crate) fn glyph(&self, name: &str, ch: char, px: f32) -> Option<(usize, usize, Vec<u8>)> {
        let font = self.fonts.get(name)?;
        let (metrics, bitmap) = font.rasterize(ch, px);
        Some((metrics.width, metrics.height, bitmap))
    }
}

impl FontService for FontLibrary {
    fn load(&mut self, name: &str, bytes: &[u8]) -> Result<(), EngineError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| EngineError::FontInit(e.to_string()))?;

        debug!(target: "platform::fonts", "loaded font {:?}", name);
        if self.fonts.insert(name.to_owned(), font).is_some() {
            warn!("font {:?} was already loaded and has been replaced", name);
        }
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

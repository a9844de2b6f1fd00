//=========================================================================
// Window Configuration
//=========================================================================
//
// Parameters for native window creation, passed through `Engine::init`
// to the platform's display bring-up.
//
//=========================================================================

//=== WindowConfig ========================================================

/// Native window creation parameters.
///
/// `x`/`y` are the desired top-left position in screen coordinates and are
/// ignored when [`WindowFlags::centered`] is set (the window manager picks
/// the position).
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub flags: WindowFlags,
}

impl WindowConfig {
    /// Creates a config from the full parameter set.
    pub fn new(
        title: &str,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> Self {
        Self {
            title: title.to_owned(),
            x,
            y,
            width,
            height,
            flags,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ember Engine".to_owned(),
            x: 0,
            y: 0,
            width: 800,
            height: 600,
            flags: WindowFlags::CENTERED,
        }
    }
}

//=== WindowFlags =========================================================

/// Window style flags.
///
/// Common combinations are pre-defined as constants; arbitrary mixes can
/// be built with struct update syntax:
///
/// ```
/// use ember_engine::core::config::WindowFlags;
///
/// let flags = WindowFlags { maximized: true, ..WindowFlags::RESIZABLE };
/// assert!(flags.resizable && flags.maximized);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowFlags {
    /// Window can be resized by the user.
    pub resizable: bool,

    /// Borderless fullscreen on the current monitor.
    pub fullscreen: bool,

    /// No window decorations.
    pub borderless: bool,

    /// Start maximized.
    pub maximized: bool,

    /// Start hidden (shown by the host later, if ever).
    pub hidden: bool,

    /// Let the window manager position the window; `x`/`y` are ignored.
    pub centered: bool,
}

impl WindowFlags {
    /// No flags set: fixed-size, decorated, visible, positioned at `x`/`y`.
    pub const NONE: Self = Self {
        resizable: false,
        fullscreen: false,
        borderless: false,
        maximized: false,
        hidden: false,
        centered: false,
    };

    /// Resizable window.
    pub const RESIZABLE: Self = Self {
        resizable: true,
        fullscreen: false,
        borderless: false,
        maximized: false,
        hidden: false,
        centered: false,
    };

    /// Borderless fullscreen.
    pub const FULLSCREEN: Self = Self {
        resizable: false,
        fullscreen: true,
        borderless: false,
        maximized: false,
        hidden: false,
        centered: false,
    };

    /// Window-manager-chosen position.
    pub const CENTERED: Self = Self {
        resizable: false,
        fullscreen: false,
        borderless: false,
        maximized: false,
        hidden: false,
        centered: true,
    };

    /// Resizable and window-manager positioned.
    pub const RESIZABLE_CENTERED: Self = Self {
        resizable: true,
        fullscreen: false,
        borderless: false,
        maximized: false,
        hidden: false,
        centered: true,
    };
}

//=========================================================================
// Unit Tests
//=========================================================================

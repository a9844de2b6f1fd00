//=========================================================================
// Deferred Draw Batch
//=========================================================================
//
// Draw commands accumulated outside the scene's own render path and
// flushed after it, once per frame. Commands submitted here composite
// on top of whatever the active scene rendered.
//
// Flow:
//   anywhere in the frame → DrawQueue::push() → Engine::render() flush
//
//=========================================================================

//=== Color ===============================================================

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Components as normalized floats, in RGBA order.
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle in window pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

//=== DrawCommand =========================================================

/// A single batched draw operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Solid filled rectangle.
    Rect { rect: Rect, color: Color },

    /// Line segment, one pixel wide.
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
    },
}

//=== DrawQueue ===========================================================

/// Accumulates draw commands for the current frame.
///
/// The engine drains the queue after the active scene has rendered, so
/// batched commands always draw over scene content. The queue is empty
/// again when the next frame starts.
#[derive(Debug, Default)]
pub struct DrawQueue {
    commands: Vec<DrawCommand>,
}

impl DrawQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an arbitrary draw command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Queues a filled rectangle.
    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::Rect { rect, color });
    }

    /// Queues a line segment.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color) {
        self.push(DrawCommand::Line { from, to, color });
    }

    /// Returns an iterator that drains all queued commands in order.
    pub fn drain(&mut self) -> impl Iterator<Item = DrawCommand> + '_ {
        self.commands.drain(..)
    }

    /// Drops all queued commands without drawing them.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Frame Clock
//=========================================================================
//
// Wall-clock frame timing. `delta_time` reports the duration between the
// two most recent `tick` calls; the engine ticks once per frame, after
// rendering.
//
//=========================================================================

use std::time::{Duration, Instant};

use crate::core::services::Clock;

//=== FrameClock ==========================================================

/// Measures elapsed wall-clock time between frames.
///
/// The first frame observes a zero delta (there is no previous frame to
/// measure against).
pub struct FrameClock {
    last_tick: Instant,
    delta: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            delta: Duration::ZERO,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FrameClock {
    fn delta_time(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_tick;
        self.last_tick = now;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_delta_is_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.delta_time(), 0.0);
    }

    #[test]
    fn tick_measures_elapsed_time() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(5));
        clock.tick();
        assert!(clock.delta_time() > 0.0);
    }

    #[test]
    fn delta_is_stable_between_ticks() {
        let mut clock = FrameClock::new();
        clock.tick();
        let first = clock.delta_time();
        // No tick in between: repeated reads return the same value.
        assert_eq!(clock.delta_time(), first);
    }
}

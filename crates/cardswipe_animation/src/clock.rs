//! Frame clock
//!
//! Animations store absolute start/end timestamps and read the current time
//! from a shared clock that only the host loop advances. A duration is then
//! the same no matter how the host slices its frames.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Host-driven monotonic time, shared by every animation of a view.
///
/// Cloning yields another handle to the same clock.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    now: Rc<Cell<Duration>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Move time forward by one frame delta
    pub fn advance(&self, dt: Duration) -> Duration {
        let now = self.now.get().saturating_add(dt);
        self.now.set(now);
        now
    }
}

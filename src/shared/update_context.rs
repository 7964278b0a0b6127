use std::time::Duration;

use uom::si::{f64::*, time::second};

/// Provides data unowned by any system in the flight simulation
/// for the purpose of handling an update frame.
#[derive(Clone, Copy, Debug)]
pub struct UpdateContext {
    delta: Duration,
}
impl UpdateContext {
    /// Longest frame the simulation integrates in one go. Anything longer
    /// (a suspended browser tab, a debugger pause) is treated as this long.
    pub const MAX_DELTA: Duration = Duration::from_secs(1);

    pub fn new(delta: Duration) -> UpdateContext {
        UpdateContext {
            delta: delta.min(Self::MAX_DELTA),
        }
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_as_secs_f64(&self) -> f64 {
        self.delta.as_secs_f64()
    }

    pub fn delta_as_time(&self) -> Time {
        Time::new::<second>(self.delta.as_secs_f64())
    }

    pub fn is_idle(&self) -> bool {
        self.delta == Duration::from_secs(0)
    }
}

use std::time::Duration;

mod coordinates;
pub use coordinates::Coordinates;

mod update_context;
pub use update_context::UpdateContext;

/// The delay logic gate delays the true result of a given expression by the given amount of time.
/// False results are output immediately.
pub struct DelayedTrueLogicGate {
    delay: Duration,
    expression_result: bool,
    true_duration: Duration,
}
impl DelayedTrueLogicGate {
    pub fn new(delay: Duration) -> DelayedTrueLogicGate {
        DelayedTrueLogicGate {
            delay,
            expression_result: false,
            true_duration: Duration::from_millis(0),
        }
    }

    pub fn update(&mut self, context: &UpdateContext, expression_result: bool) {
        // We do not include the delta representing the moment before the expression_result became true.
        if self.expression_result && expression_result {
            self.true_duration += context.delta();
        } else {
            self.true_duration = Duration::from_millis(0);
        }

        self.expression_result = expression_result;
    }

    pub fn output(&self) -> bool {
        self.expression_result && self.delay <= self.true_duration
    }

    /// Time remaining until the output becomes true, assuming the expression stays true.
    pub fn remaining(&self) -> Duration {
        if self.expression_result {
            self.delay
                .checked_sub(self.true_duration)
                .unwrap_or_default()
        } else {
            self.delay
        }
    }
}

/// Given a current and target value, moves the value towards the target by at most
/// `rate_per_second` multiplied by the elapsed time. Never overshoots the target.
pub fn calculate_towards_target(
    current: f64,
    target: f64,
    rate_per_second: f64,
    delta: Duration,
) -> f64 {
    let step = rate_per_second.abs() * delta.as_secs_f64();

    if (current - target).abs() < f64::EPSILON {
        target
    } else if current > target {
        (current - step).max(target)
    } else {
        (current + step).min(target)
    }
}

/// Linear interpolation between `from` and `to`. `factor` is clamped to `[0, 1]`.
pub fn lerp(from: f64, to: f64, factor: f64) -> f64 {
    from + (to - from) * factor.clamp(0., 1.)
}

/// Wraps a heading in degrees into `[0, 360)`.
pub fn normalize_heading(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.);

    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if normalized >= 360. {
        0.
    } else {
        normalized
    }
}



#[cfg(test)]
mod heading_tests {
    use ntest::assert_about_eq;

    use super::*;

    #[test]
    fn headings_within_range_are_unchanged() {
        assert_about_eq!(normalize_heading(123.), 123.);
    }

    #[test]
    fn three_hundred_sixty_wraps_to_zero() {
        assert_about_eq!(normalize_heading(360.), 0.);
    }

    #[test]
    fn negative_headings_wrap_around() {
        assert_about_eq!(normalize_heading(-90.), 270.);
    }

    #[test]
    fn tiny_negative_heading_never_yields_three_hundred_sixty() {
        let heading = normalize_heading(-1e-20);

        assert!((0. ..360.).contains(&heading));
    }

    #[test]
    fn lerp_clamps_its_factor() {
        assert_about_eq!(lerp(0., 10., 0.5), 5.);
        assert_about_eq!(lerp(0., 10., 2.), 10.);
        assert_about_eq!(lerp(0., 10., -1.), 0.);
    }
}

//! Autopilot targets and engagement.
//!
//! The autopilot holds the selected speed, altitude, vertical speed and heading,
//! keeps each within its range, and computes the heading error the flight model
//! turns by. Whether a channel may engage is decided by whoever owns the engines;
//! the autopilot itself never looks at them.
use strum::{Display, EnumIter, EnumString};
use uom::si::{angle::degree, f64::*, length::foot, velocity::foot_per_minute, velocity::knot};

use crate::{
    shared::normalize_heading,
    simulation::{SimulationElement, SimulatorWriter},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum AutopilotChannel {
    #[strum(serialize = "ap1", serialize = "1")]
    One,
    #[strum(serialize = "ap2", serialize = "2")]
    Two,
}
impl AutopilotChannel {
    fn index(self) -> usize {
        match self {
            AutopilotChannel::One => 0,
            AutopilotChannel::Two => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AutopilotTarget {
    Speed,
    Altitude,
    VerticalSpeed,
    Heading,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum LateralMode {
    /// Fly the selected heading.
    Heading,
    /// Fly towards the active flight plan waypoint.
    Lnav,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum VerticalMode {
    /// Fly the selected altitude, speed and vertical speed.
    Selected,
    /// Take altitude and speed from the active waypoint's constraints.
    Vnav,
}

/// Shortest signed angle in degrees to turn from `current` to `target`,
/// in `(-180, 180]`. Positive means turning right.
pub fn heading_error(current: Angle, target: Angle) -> Angle {
    let difference = (target.get::<degree>() - current.get::<degree>()).rem_euclid(360.);

    Angle::new::<degree>(if difference > 180. {
        difference - 360.
    } else {
        difference
    })
}

pub struct Autopilot {
    speed_target: Velocity,
    altitude_target: Length,
    vertical_speed_target: Velocity,
    heading_target: Angle,
    channels_engaged: [bool; 2],
    lateral_mode: LateralMode,
    vertical_mode: VerticalMode,
}
impl Autopilot {
    pub const MIN_SPEED_KNOTS: f64 = 120.;
    pub const MAX_SPEED_KNOTS: f64 = 330.;
    pub const MIN_ALTITUDE_FEET: f64 = 0.;
    pub const MAX_ALTITUDE_FEET: f64 = 39_000.;
    pub const MAX_VERTICAL_SPEED_FEET_PER_MINUTE: f64 = 3_000.;

    pub fn new() -> Autopilot {
        Autopilot {
            speed_target: Velocity::new::<knot>(250.),
            altitude_target: Length::new::<foot>(10_000.),
            vertical_speed_target: Velocity::new::<foot_per_minute>(1_500.),
            heading_target: Angle::new::<degree>(0.),
            channels_engaged: [false, false],
            lateral_mode: LateralMode::Heading,
            vertical_mode: VerticalMode::Selected,
        }
    }

    /// Sets the speed target within `[120, 330]` knots. NaN is ignored.
    pub fn set_speed_target(&mut self, speed: Velocity) -> Velocity {
        let knots = speed.get::<knot>();
        if !knots.is_nan() {
            self.speed_target =
                Velocity::new::<knot>(knots.clamp(Self::MIN_SPEED_KNOTS, Self::MAX_SPEED_KNOTS));
        }

        self.speed_target
    }

    /// Sets the altitude target within `[0, 39000]` feet. NaN is ignored.
    pub fn set_altitude_target(&mut self, altitude: Length) -> Length {
        let feet = altitude.get::<foot>();
        if !feet.is_nan() {
            self.altitude_target = Length::new::<foot>(
                feet.clamp(Self::MIN_ALTITUDE_FEET, Self::MAX_ALTITUDE_FEET),
            );
        }

        self.altitude_target
    }

    /// Sets the vertical speed target within `[-3000, 3000]` feet per minute. NaN is ignored.
    pub fn set_vertical_speed_target(&mut self, vertical_speed: Velocity) -> Velocity {
        let fpm = vertical_speed.get::<foot_per_minute>();
        if !fpm.is_nan() {
            self.vertical_speed_target = Velocity::new::<foot_per_minute>(fpm.clamp(
                -Self::MAX_VERTICAL_SPEED_FEET_PER_MINUTE,
                Self::MAX_VERTICAL_SPEED_FEET_PER_MINUTE,
            ));
        }

        self.vertical_speed_target
    }

    /// Sets the heading target, wrapped into `[0, 360)`. NaN and infinities are ignored.
    pub fn set_heading_target(&mut self, heading: Angle) -> Angle {
        let degrees = heading.get::<degree>();
        if degrees.is_finite() {
            self.heading_target = Angle::new::<degree>(normalize_heading(degrees));
        }

        self.heading_target
    }

    /// Sets the given target from a raw value in its display unit:
    /// knots, feet, feet per minute or degrees.
    pub fn set_target(&mut self, target: AutopilotTarget, value: f64) {
        match target {
            AutopilotTarget::Speed => {
                self.set_speed_target(Velocity::new::<knot>(value));
            }
            AutopilotTarget::Altitude => {
                self.set_altitude_target(Length::new::<foot>(value));
            }
            AutopilotTarget::VerticalSpeed => {
                self.set_vertical_speed_target(Velocity::new::<foot_per_minute>(value));
            }
            AutopilotTarget::Heading => {
                self.set_heading_target(Angle::new::<degree>(value));
            }
        }
    }

    pub fn speed_target(&self) -> Velocity {
        self.speed_target
    }

    pub fn altitude_target(&self) -> Length {
        self.altitude_target
    }

    pub fn vertical_speed_target(&self) -> Velocity {
        self.vertical_speed_target
    }

    pub fn heading_target(&self) -> Angle {
        self.heading_target
    }

    /// Engages the channel. Returns true when this changed its state.
    pub fn engage(&mut self, channel: AutopilotChannel) -> bool {
        let changed = !self.channels_engaged[channel.index()];
        self.channels_engaged[channel.index()] = true;

        changed
    }

    /// Disengages the channel. Returns true when this changed its state.
    pub fn disengage(&mut self, channel: AutopilotChannel) -> bool {
        let changed = self.channels_engaged[channel.index()];
        self.channels_engaged[channel.index()] = false;

        changed
    }

    /// Disengages both channels, returning the ones which were engaged.
    pub fn disengage_all(&mut self) -> Vec<AutopilotChannel> {
        [AutopilotChannel::One, AutopilotChannel::Two]
            .iter()
            .copied()
            .filter(|&channel| self.disengage(channel))
            .collect()
    }

    pub fn is_channel_engaged(&self, channel: AutopilotChannel) -> bool {
        self.channels_engaged[channel.index()]
    }

    /// Either channel is sufficient for the autopilot to fly the aircraft.
    pub fn is_engaged(&self) -> bool {
        self.channels_engaged.iter().any(|&engaged| engaged)
    }

    pub fn set_lateral_mode(&mut self, mode: LateralMode) {
        self.lateral_mode = mode;
    }

    pub fn set_vertical_mode(&mut self, mode: VerticalMode) {
        self.vertical_mode = mode;
    }

    pub fn lateral_mode(&self) -> LateralMode {
        self.lateral_mode
    }

    pub fn vertical_mode(&self) -> VerticalMode {
        self.vertical_mode
    }
}
impl SimulationElement for Autopilot {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_bool("AP_1_ENGAGED", self.channels_engaged[0]);
        writer.write_bool("AP_2_ENGAGED", self.channels_engaged[1]);
        writer.write_f64("AP_SPEED_TARGET_KTS", self.speed_target.get::<knot>());
        writer.write_f64("AP_ALTITUDE_TARGET_FT", self.altitude_target.get::<foot>());
        writer.write_f64(
            "AP_VERTICAL_SPEED_TARGET_FPM",
            self.vertical_speed_target.get::<foot_per_minute>(),
        );
        writer.write_f64("AP_HEADING_TARGET_DEG", self.heading_target.get::<degree>());
        writer.write_bool("AP_LNAV", self.lateral_mode == LateralMode::Lnav);
        writer.write_bool("AP_VNAV", self.vertical_mode == VerticalMode::Vnav);
    }
}
impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod heading_error_tests {
    use super::*;
    use ntest::assert_about_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn error(current: f64, target: f64) -> f64 {
        heading_error(Angle::new::<degree>(current), Angle::new::<degree>(target)).get::<degree>()
    }

    #[test]
    fn turning_right_is_positive() {
        assert_about_eq!(error(10., 30.), 20.);
    }

    #[test]
    fn turning_left_is_negative() {
        assert_about_eq!(error(30., 10.), -20.);
    }

    #[test]
    fn takes_the_short_way_across_north() {
        assert_about_eq!(error(350., 10.), 20.);
        assert_about_eq!(error(10., 350.), -20.);
    }

    #[test]
    fn exactly_opposite_is_positive_one_hundred_eighty() {
        assert_about_eq!(error(90., 270.), 180.);
        assert_about_eq!(error(270., 90.), 180.);
    }

    #[test]
    fn on_target_is_zero() {
        assert_about_eq!(error(123., 123.), 0.);
    }

    #[test]
    fn is_always_within_half_open_range() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..10_000 {
            let e = error(rng.gen_range(0.0..360.0), rng.gen_range(0.0..360.0));
            assert!(e > -180. && e <= 180., "error was {}", e);
        }
    }
}

#[cfg(test)]
mod autopilot_tests {
    use super::*;
    use ntest::assert_about_eq;

    #[test]
    fn starts_disengaged() {
        let autopilot = Autopilot::new();

        assert!(!autopilot.is_engaged());
        assert!(!autopilot.is_channel_engaged(AutopilotChannel::One));
        assert!(!autopilot.is_channel_engaged(AutopilotChannel::Two));
    }

    #[test]
    fn altitude_target_above_range_reads_back_clamped() {
        let mut autopilot = Autopilot::new();
        autopilot.set_altitude_target(Length::new::<foot>(45_000.));

        assert_about_eq!(autopilot.altitude_target().get::<foot>(), 39_000.);
    }

    #[test]
    fn altitude_target_below_range_reads_back_clamped() {
        let mut autopilot = Autopilot::new();
        autopilot.set_altitude_target(Length::new::<foot>(-500.));

        assert_about_eq!(autopilot.altitude_target().get::<foot>(), 0.);
    }

    #[test]
    fn altitude_target_within_range_reads_back_unchanged() {
        let mut autopilot = Autopilot::new();
        autopilot.set_altitude_target(Length::new::<foot>(12_340.));

        assert_about_eq!(autopilot.altitude_target().get::<foot>(), 12_340.);
    }

    #[test]
    fn speed_target_is_clamped() {
        let mut autopilot = Autopilot::new();

        assert_about_eq!(
            autopilot.set_speed_target(Velocity::new::<knot>(50.)).get::<knot>(),
            120.
        );
        assert_about_eq!(
            autopilot.set_speed_target(Velocity::new::<knot>(500.)).get::<knot>(),
            330.
        );
    }

    #[test]
    fn vertical_speed_target_is_clamped() {
        let mut autopilot = Autopilot::new();

        autopilot.set_vertical_speed_target(Velocity::new::<foot_per_minute>(-6_000.));

        assert_about_eq!(
            autopilot.vertical_speed_target().get::<foot_per_minute>(),
            -3_000.
        );
    }

    #[test]
    fn heading_target_is_wrapped() {
        let mut autopilot = Autopilot::new();

        autopilot.set_heading_target(Angle::new::<degree>(-90.));
        assert_about_eq!(autopilot.heading_target().get::<degree>(), 270.);

        autopilot.set_heading_target(Angle::new::<degree>(720.));
        assert_about_eq!(autopilot.heading_target().get::<degree>(), 0.);
    }

    #[test]
    fn nan_targets_are_rejected() {
        let mut autopilot = Autopilot::new();
        autopilot.set_target(AutopilotTarget::Speed, 200.);
        autopilot.set_target(AutopilotTarget::Altitude, 5_000.);
        autopilot.set_target(AutopilotTarget::VerticalSpeed, 800.);
        autopilot.set_target(AutopilotTarget::Heading, 45.);

        autopilot.set_target(AutopilotTarget::Speed, f64::NAN);
        autopilot.set_target(AutopilotTarget::Altitude, f64::NAN);
        autopilot.set_target(AutopilotTarget::VerticalSpeed, f64::NAN);
        autopilot.set_target(AutopilotTarget::Heading, f64::NAN);

        assert_about_eq!(autopilot.speed_target().get::<knot>(), 200.);
        assert_about_eq!(autopilot.altitude_target().get::<foot>(), 5_000.);
        assert_about_eq!(
            autopilot.vertical_speed_target().get::<foot_per_minute>(),
            800.
        );
        assert_about_eq!(autopilot.heading_target().get::<degree>(), 45.);
    }

    #[test]
    fn either_channel_engages_the_autopilot() {
        let mut autopilot = Autopilot::new();
        autopilot.engage(AutopilotChannel::Two);

        assert!(autopilot.is_engaged());
        assert!(!autopilot.is_channel_engaged(AutopilotChannel::One));
    }

    #[test]
    fn engaging_twice_reports_no_change() {
        let mut autopilot = Autopilot::new();

        assert!(autopilot.engage(AutopilotChannel::One));
        assert!(!autopilot.engage(AutopilotChannel::One));
    }

    #[test]
    fn disengage_all_reports_previously_engaged_channels() {
        let mut autopilot = Autopilot::new();
        autopilot.engage(AutopilotChannel::Two);

        assert_eq!(autopilot.disengage_all(), vec![AutopilotChannel::Two]);
        assert!(!autopilot.is_engaged());
    }

    #[test]
    fn targets_and_channels_parse_from_names() {
        assert_eq!(
            "vertical_speed".parse::<AutopilotTarget>(),
            Ok(AutopilotTarget::VerticalSpeed)
        );
        assert_eq!("ap2".parse::<AutopilotChannel>(), Ok(AutopilotChannel::Two));
        assert_eq!("lnav".parse::<LateralMode>(), Ok(LateralMode::Lnav));
        assert!("flaps".parse::<AutopilotTarget>().is_err());
    }
}

//! Simplified flight dynamics. There is no aerodynamic model: speed, vertical
//! speed and heading each approach a forcing target at a bounded rate, and
//! attitude is derived from them for display only.
use log::debug;
use strum::{Display, EnumIter, EnumString};
use uom::si::{
    angle::degree,
    f64::*,
    length::{foot, nautical_mile},
    ratio::ratio,
    velocity::{foot_per_minute, knot},
};

use crate::{
    aircraft::AircraftType,
    autopilot::{heading_error, Autopilot},
    shared::{calculate_towards_target, normalize_heading, Coordinates, UpdateContext},
    simulation::{SimulationElement, SimulatorWriter},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    true_airspeed: Velocity,
    altitude: Length,
    vertical_speed: Velocity,
    heading: Angle,
    pitch: Angle,
    roll: Angle,
    position: Coordinates,
}
impl Kinematics {
    /// At rest on the ground at `position`.
    pub fn new(position: Coordinates, heading: Angle) -> Self {
        Self {
            true_airspeed: Velocity::new::<knot>(0.),
            altitude: Length::new::<foot>(0.),
            vertical_speed: Velocity::new::<foot_per_minute>(0.),
            heading: Angle::new::<degree>(normalize_heading(heading.get::<degree>())),
            pitch: Angle::new::<degree>(0.),
            roll: Angle::new::<degree>(0.),
            position,
        }
    }

    pub fn with_altitude(mut self, altitude: Length) -> Self {
        self.altitude = Length::new::<foot>(altitude.get::<foot>().max(0.));
        self
    }

    pub fn with_true_airspeed(mut self, true_airspeed: Velocity) -> Self {
        self.true_airspeed = Velocity::new::<knot>(true_airspeed.get::<knot>().max(0.));
        self
    }

    pub fn true_airspeed(&self) -> Velocity {
        self.true_airspeed
    }

    pub fn altitude(&self) -> Length {
        self.altitude
    }

    pub fn vertical_speed(&self) -> Velocity {
        self.vertical_speed
    }

    pub fn heading(&self) -> Angle {
        self.heading
    }

    pub fn pitch(&self) -> Angle {
        self.pitch
    }

    pub fn roll(&self) -> Angle {
        self.roll
    }

    pub fn position(&self) -> Coordinates {
        self.position
    }

    pub fn is_on_ground(&self) -> bool {
        self.altitude.get::<foot>() <= 0.
    }
}
impl SimulationElement for Kinematics {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_f64("KINEMATICS_TAS_KTS", self.true_airspeed.get::<knot>());
        writer.write_f64("KINEMATICS_ALTITUDE_FT", self.altitude.get::<foot>());
        writer.write_f64(
            "KINEMATICS_VS_FPM",
            self.vertical_speed.get::<foot_per_minute>(),
        );
        writer.write_f64("KINEMATICS_HEADING_DEG", self.heading.get::<degree>());
        writer.write_f64("KINEMATICS_PITCH_DEG", self.pitch.get::<degree>());
        writer.write_f64("KINEMATICS_ROLL_DEG", self.roll.get::<degree>());
        writer.write_f64("KINEMATICS_LATITUDE", self.position.latitude());
        writer.write_f64("KINEMATICS_LONGITUDE", self.position.longitude());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Control {
    Throttle,
    Flaps,
    Gear,
    Rudder,
    Trim,
}

/// Manual control inputs. Every setter keeps its value within range
/// and leaves the current value untouched when given NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Controls {
    throttle: Ratio,
    flaps_stage: u8,
    max_flaps_stage: u8,
    gear_down: bool,
    rudder: Ratio,
    trim: Ratio,
}
impl Controls {
    pub fn new(max_flaps_stage: u8) -> Self {
        Self {
            throttle: Ratio::new::<ratio>(0.),
            flaps_stage: 0,
            max_flaps_stage,
            gear_down: true,
            rudder: Ratio::new::<ratio>(0.),
            trim: Ratio::new::<ratio>(0.),
        }
    }

    /// Sets a control from a raw value: a fraction for the throttle, rudder
    /// and trim, a stage number for the flaps and `>= 0.5` meaning down for the gear.
    /// Returns false when the value was rejected.
    pub fn set(&mut self, control: Control, value: f64) -> bool {
        if value.is_nan() {
            debug!("Rejected NaN value for {}.", control);
            return false;
        }

        match control {
            Control::Throttle => self.throttle = Ratio::new::<ratio>(value.clamp(0., 1.)),
            Control::Flaps => {
                self.flaps_stage = value.round().clamp(0., self.max_flaps_stage as f64) as u8
            }
            Control::Gear => self.gear_down = value >= 0.5,
            Control::Rudder => self.rudder = Ratio::new::<ratio>(value.clamp(-1., 1.)),
            Control::Trim => self.trim = Ratio::new::<ratio>(value.clamp(-1., 1.)),
        }

        true
    }

    pub fn throttle(&self) -> Ratio {
        self.throttle
    }

    pub fn flaps_stage(&self) -> u8 {
        self.flaps_stage
    }

    pub fn gear_down(&self) -> bool {
        self.gear_down
    }

    pub fn rudder(&self) -> Ratio {
        self.rudder
    }

    pub fn trim(&self) -> Ratio {
        self.trim
    }
}
impl SimulationElement for Controls {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_f64("CONTROLS_THROTTLE", self.throttle.get::<ratio>());
        writer.write_f64("CONTROLS_FLAPS_STAGE", self.flaps_stage as f64);
        writer.write_bool("CONTROLS_GEAR_DOWN", self.gear_down);
        writer.write_f64("CONTROLS_RUDDER", self.rudder.get::<ratio>());
        writer.write_f64("CONTROLS_TRIM", self.trim.get::<ratio>());
    }
}

pub struct FlightModel {
    max_speed_kts: f64,
    rotation_speed_kts: f64,
    acceleration_kts_per_sec: f64,
    turn_rate_deg_per_sec: f64,
    vertical_acceleration_fpm_per_sec: f64,
}
impl FlightModel {
    pub const FLAP_DRAG_KNOTS: f64 = 10.;
    pub const GEAR_DRAG_KNOTS: f64 = 15.;
    pub const MAX_MANUAL_VERTICAL_SPEED_FPM: f64 = 2_000.;
    pub const MANUAL_TURN_RATE_DEG_PER_SEC: f64 = 3.;
    /// Feet per minute of commanded vertical speed per foot of altitude error.
    pub const ALTITUDE_CAPTURE_GAIN: f64 = 5.;
    pub const MAX_PITCH_DEG: f64 = 15.;
    pub const MAX_ROLL_DEG: f64 = 25.;
    /// Degrees of roll per degree of heading error.
    pub const ROLL_GAIN: f64 = 1.;

    pub fn new(aircraft: &AircraftType) -> Self {
        Self {
            max_speed_kts: aircraft.max_speed_kts,
            rotation_speed_kts: aircraft.rotation_speed_kts,
            acceleration_kts_per_sec: aircraft.acceleration_kts_per_sec,
            turn_rate_deg_per_sec: aircraft.turn_rate_deg_per_sec,
            vertical_acceleration_fpm_per_sec: aircraft.vertical_acceleration_fpm_per_sec,
        }
    }

    pub fn max_speed(&self) -> Velocity {
        Velocity::new::<knot>(self.max_speed_kts)
    }

    /// The speed the thrust levers, flaps and gear settle at without the autopilot.
    pub fn manual_speed_target(&self, controls: &Controls, engines_running: bool) -> Velocity {
        if !engines_running {
            return Velocity::new::<knot>(0.);
        }

        let target = controls.throttle.get::<ratio>() * self.max_speed_kts
            - controls.flaps_stage as f64 * Self::FLAP_DRAG_KNOTS
            - if controls.gear_down {
                Self::GEAR_DRAG_KNOTS
            } else {
                0.
            };

        Velocity::new::<knot>(target.max(0.))
    }

    /// Advances the kinematics by the context's delta. An idle context leaves them untouched.
    pub fn update(
        &self,
        context: &UpdateContext,
        kinematics: &mut Kinematics,
        controls: &Controls,
        autopilot: &Autopilot,
        engines_running: bool,
    ) {
        if context.is_idle() {
            return;
        }

        let autopilot_engaged = autopilot.is_engaged();

        self.update_speed(context, kinematics, controls, autopilot, engines_running);
        self.update_vertical(context, kinematics, controls, autopilot, autopilot_engaged);
        let remaining_heading_error =
            self.update_heading(context, kinematics, controls, autopilot, autopilot_engaged);
        self.update_attitude(kinematics, controls, autopilot_engaged, remaining_heading_error);
        self.update_position(context, kinematics);
    }

    fn update_speed(
        &self,
        context: &UpdateContext,
        kinematics: &mut Kinematics,
        controls: &Controls,
        autopilot: &Autopilot,
        engines_running: bool,
    ) {
        let target = if autopilot.is_engaged() {
            autopilot.speed_target()
        } else {
            self.manual_speed_target(controls, engines_running)
        };

        let speed = calculate_towards_target(
            kinematics.true_airspeed.get::<knot>(),
            target.get::<knot>().clamp(0., self.max_speed_kts),
            self.acceleration_kts_per_sec,
            context.delta(),
        );
        kinematics.true_airspeed = Velocity::new::<knot>(speed.clamp(0., self.max_speed_kts));
    }

    fn update_vertical(
        &self,
        context: &UpdateContext,
        kinematics: &mut Kinematics,
        controls: &Controls,
        autopilot: &Autopilot,
        autopilot_engaged: bool,
    ) {
        let mut target_fpm = if autopilot_engaged {
            let limit = autopilot.vertical_speed_target().get::<foot_per_minute>().abs();
            let altitude_error =
                autopilot.altitude_target().get::<foot>() - kinematics.altitude.get::<foot>();

            (altitude_error * Self::ALTITUDE_CAPTURE_GAIN).clamp(-limit, limit)
        } else {
            controls.trim.get::<ratio>() * Self::MAX_MANUAL_VERTICAL_SPEED_FPM
        };

        if kinematics.is_on_ground() {
            target_fpm = if kinematics.true_airspeed.get::<knot>() >= self.rotation_speed_kts {
                target_fpm.max(0.)
            } else {
                0.
            };
        }

        let mut vertical_speed_fpm = calculate_towards_target(
            kinematics.vertical_speed.get::<foot_per_minute>(),
            target_fpm,
            self.vertical_acceleration_fpm_per_sec,
            context.delta(),
        );

        let climbed: Length =
            Velocity::new::<foot_per_minute>(vertical_speed_fpm) * context.delta_as_time();
        let mut altitude_ft = kinematics.altitude.get::<foot>() + climbed.get::<foot>();
        if altitude_ft <= 0. {
            altitude_ft = 0.;
            vertical_speed_fpm = vertical_speed_fpm.max(0.);
        }

        kinematics.vertical_speed = Velocity::new::<foot_per_minute>(vertical_speed_fpm);
        kinematics.altitude = Length::new::<foot>(altitude_ft);
    }

    /// Turns the aircraft, returning the heading error left after turning.
    fn update_heading(
        &self,
        context: &UpdateContext,
        kinematics: &mut Kinematics,
        controls: &Controls,
        autopilot: &Autopilot,
        autopilot_engaged: bool,
    ) -> f64 {
        let current = kinematics.heading.get::<degree>();

        let (heading, remaining_error) = if autopilot_engaged {
            let error =
                heading_error(kinematics.heading, autopilot.heading_target()).get::<degree>();
            let max_turn = self.turn_rate_deg_per_sec * context.delta_as_secs_f64();
            let turn = error.clamp(-max_turn, max_turn);

            (current + turn, error - turn)
        } else if kinematics.true_airspeed.get::<knot>() > 0. {
            let drift = controls.rudder.get::<ratio>()
                * Self::MANUAL_TURN_RATE_DEG_PER_SEC
                * context.delta_as_secs_f64();

            (current + drift, 0.)
        } else {
            (current, 0.)
        };

        kinematics.heading = Angle::new::<degree>(normalize_heading(heading));

        remaining_error
    }

    fn update_attitude(
        &self,
        kinematics: &mut Kinematics,
        controls: &Controls,
        autopilot_engaged: bool,
        remaining_heading_error: f64,
    ) {
        let pitch = kinematics.vertical_speed.get::<foot_per_minute>()
            / Self::MAX_MANUAL_VERTICAL_SPEED_FPM
            * Self::MAX_PITCH_DEG;
        kinematics.pitch =
            Angle::new::<degree>(pitch.clamp(-Self::MAX_PITCH_DEG, Self::MAX_PITCH_DEG));

        let roll = if autopilot_engaged {
            remaining_heading_error * Self::ROLL_GAIN
        } else if kinematics.true_airspeed.get::<knot>() > 0. {
            controls.rudder.get::<ratio>() * Self::MAX_ROLL_DEG
        } else {
            0.
        };
        kinematics.roll = Angle::new::<degree>(roll.clamp(-Self::MAX_ROLL_DEG, Self::MAX_ROLL_DEG));
    }

    fn update_position(&self, context: &UpdateContext, kinematics: &mut Kinematics) {
        let distance: Length = kinematics.true_airspeed * context.delta_as_time();

        if distance.get::<nautical_mile>() > 0. {
            kinematics.position = kinematics.position.destination(kinematics.heading, distance);
        }
    }
}

#[cfg(test)]
mod controls_tests {
    use super::*;
    use ntest::assert_about_eq;

    #[test]
    fn starts_at_idle_with_gear_down() {
        let controls = Controls::new(4);

        assert_about_eq!(controls.throttle().get::<ratio>(), 0.);
        assert!(controls.gear_down());
        assert_eq!(controls.flaps_stage(), 0);
    }

    #[test]
    fn throttle_is_clamped_to_a_fraction() {
        let mut controls = Controls::new(4);

        controls.set(Control::Throttle, 1.5);
        assert_about_eq!(controls.throttle().get::<ratio>(), 1.);

        controls.set(Control::Throttle, -0.5);
        assert_about_eq!(controls.throttle().get::<ratio>(), 0.);
    }

    #[test]
    fn flaps_are_clamped_to_the_available_stages() {
        let mut controls = Controls::new(4);

        controls.set(Control::Flaps, 7.);

        assert_eq!(controls.flaps_stage(), 4);
    }

    #[test]
    fn rudder_and_trim_are_clamped_to_plus_minus_one() {
        let mut controls = Controls::new(4);

        controls.set(Control::Rudder, -3.);
        controls.set(Control::Trim, 3.);

        assert_about_eq!(controls.rudder().get::<ratio>(), -1.);
        assert_about_eq!(controls.trim().get::<ratio>(), 1.);
    }

    #[test]
    fn nan_is_rejected_and_leaves_the_value_unchanged() {
        let mut controls = Controls::new(4);
        controls.set(Control::Throttle, 0.4);

        assert!(!controls.set(Control::Throttle, f64::NAN));
        assert_about_eq!(controls.throttle().get::<ratio>(), 0.4);
    }

    #[test]
    fn gear_is_down_from_one_half() {
        let mut controls = Controls::new(4);

        controls.set(Control::Gear, 0.);
        assert!(!controls.gear_down());

        controls.set(Control::Gear, 1.);
        assert!(controls.gear_down());
    }

    #[test]
    fn controls_parse_from_names() {
        assert_eq!("throttle".parse::<Control>(), Ok(Control::Throttle));
        assert!("spoilers".parse::<Control>().is_err());
    }
}

use log::info;
use uom::si::{f64::*, length::nautical_mile};

use crate::{
    shared::Coordinates,
    simulation::{SimulationElement, SimulatorWriter},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    ident: String,
    position: Coordinates,
    altitude: Option<Length>,
    speed: Option<Velocity>,
}
impl Waypoint {
    pub fn new(ident: &str, position: Coordinates) -> Self {
        Self {
            ident: ident.to_owned(),
            position,
            altitude: None,
            speed: None,
        }
    }

    pub fn with_altitude(mut self, altitude: Length) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_speed(mut self, speed: Velocity) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn position(&self) -> Coordinates {
        self.position
    }

    pub fn altitude(&self) -> Option<Length> {
        self.altitude
    }

    pub fn speed(&self) -> Option<Velocity> {
        self.speed
    }
}

/// An ordered route from the origin to the destination. The destination is
/// always the last waypoint and can never be removed or sequenced past.
pub struct FlightPlan {
    origin: Coordinates,
    waypoints: Vec<Waypoint>,
    active: usize,
}
impl FlightPlan {
    pub const SEQUENCE_DISTANCE_NM: f64 = 2.;

    pub fn new(origin: Coordinates, destination: Waypoint) -> Self {
        Self {
            origin,
            waypoints: vec![destination],
            active: 0,
        }
    }

    pub fn insert_before_destination(&mut self, waypoint: Waypoint) {
        let index = self.waypoints.len() - 1;
        self.waypoints.insert(index, waypoint);
    }

    /// Removes every waypoint except the destination, which becomes active.
    pub fn clear(&mut self) {
        let destination_index = self.waypoints.len() - 1;
        self.waypoints.drain(..destination_index);
        self.active = 0;
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_waypoint(&self) -> &Waypoint {
        &self.waypoints[self.active]
    }

    pub fn destination(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    pub fn active_is_destination(&self) -> bool {
        self.active == self.waypoints.len() - 1
    }

    /// Length of the route from the origin through every waypoint.
    pub fn total_distance(&self) -> Length {
        self.route_distance(self.origin, 0)
    }

    /// Distance still to fly from `position` via the active waypoint.
    pub fn remaining_distance(&self, position: Coordinates) -> Length {
        self.route_distance(position, self.active)
    }

    /// Makes the next waypoint active once `position` is within
    /// [`FlightPlan::SEQUENCE_DISTANCE_NM`] of the active one. Returns the passed waypoint.
    pub fn sequence(&mut self, position: Coordinates) -> Option<&Waypoint> {
        if self.active_is_destination() {
            return None;
        }

        let distance = position.distance_to(&self.active_waypoint().position);
        if distance.get::<nautical_mile>() > Self::SEQUENCE_DISTANCE_NM {
            return None;
        }

        self.active += 1;
        let passed = &self.waypoints[self.active - 1];
        info!(
            "Sequenced waypoint {}, now flying to {}.",
            passed.ident, self.waypoints[self.active].ident
        );

        Some(passed)
    }

    pub fn bearing_to_active(&self, position: Coordinates) -> Angle {
        position.bearing_to(&self.active_waypoint().position)
    }

    fn route_distance(&self, from: Coordinates, first: usize) -> Length {
        let mut previous = from;
        let mut total = Length::new::<nautical_mile>(0.);
        for waypoint in &self.waypoints[first..] {
            total += previous.distance_to(&waypoint.position);
            previous = waypoint.position;
        }

        total
    }
}
impl SimulationElement for FlightPlan {
    fn write(&self, writer: &mut SimulatorWriter) {
        let active = self.active_waypoint();
        writer.write_f64("FP_ACTIVE_INDEX", self.active as f64);
        writer.write_f64("FP_ACTIVE_LATITUDE", active.position.latitude());
        writer.write_f64("FP_ACTIVE_LONGITUDE", active.position.longitude());
        writer.write_f64("FP_TOTAL_DISTANCE_NM", self.total_distance().get::<nautical_mile>());
    }
}

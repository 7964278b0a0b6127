use log::info;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use strum::Display;

use crate::simulation::{SimulationElement, SimulatorWriter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, FromPrimitive)]
pub enum FlightPhase {
    ColdDark = 1,
    SystemsActive = 2,
    EnginesRunning = 3,
    ReadyForTaxi = 4,
    InFlight = 5,
    PostFlight = 6,
}
impl FlightPhase {
    /// Reads a phase back from the number it is exported as.
    pub fn from_number(value: f64) -> Option<FlightPhase> {
        FlightPhase::from_f64(value)
    }

    pub fn number(self) -> f64 {
        self as u8 as f64
    }
}

pub struct FlightPhaseTracker {
    phase: FlightPhase,
    has_flown: bool,
}
impl FlightPhaseTracker {
    pub fn new() -> Self {
        Self {
            phase: FlightPhase::ColdDark,
            has_flown: false,
        }
    }

    /// Determines the phase from the current state of the aircraft.
    /// Returns the new phase when it changed.
    pub fn update(
        &mut self,
        powered: bool,
        running_engines: usize,
        engine_count: usize,
        on_ground: bool,
    ) -> Option<FlightPhase> {
        if !on_ground {
            self.has_flown = true;
        } else if running_engines > 0 && self.phase == FlightPhase::PostFlight {
            self.has_flown = false;
        }

        let phase = if !on_ground {
            FlightPhase::InFlight
        } else if self.has_flown && running_engines == 0 {
            FlightPhase::PostFlight
        } else if running_engines > 0 && running_engines == engine_count {
            FlightPhase::ReadyForTaxi
        } else if running_engines > 0 {
            FlightPhase::EnginesRunning
        } else if powered {
            FlightPhase::SystemsActive
        } else {
            FlightPhase::ColdDark
        };

        if phase == self.phase {
            None
        } else {
            info!("Flight phase changed from {} to {}.", self.phase, phase);
            self.phase = phase;
            Some(phase)
        }
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }
}
impl SimulationElement for FlightPhaseTracker {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_f64("FLIGHT_PHASE", self.phase.number());
    }
}
impl Default for FlightPhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod flight_phase_tests {
    use super::*;
    use crate::simulation::{test::TestReaderWriter, write_to_simulator};

    fn tracker_after(updates: &[(bool, usize, bool)]) -> FlightPhaseTracker {
        let mut tracker = FlightPhaseTracker::new();
        for &(powered, running_engines, on_ground) in updates {
            tracker.update(powered, running_engines, 2, on_ground);
        }

        tracker
    }

    #[test]
    fn starts_cold_and_dark() {
        assert_eq!(FlightPhaseTracker::new().phase(), FlightPhase::ColdDark);
    }

    #[test]
    fn electrical_power_activates_systems() {
        assert_eq!(
            tracker_after(&[(true, 0, true)]).phase(),
            FlightPhase::SystemsActive
        );
    }

    #[test]
    fn one_engine_running_is_engines_running() {
        assert_eq!(
            tracker_after(&[(true, 1, true)]).phase(),
            FlightPhase::EnginesRunning
        );
    }

    #[test]
    fn all_engines_running_is_ready_for_taxi() {
        assert_eq!(
            tracker_after(&[(true, 2, true)]).phase(),
            FlightPhase::ReadyForTaxi
        );
    }

    #[test]
    fn airborne_is_in_flight() {
        assert_eq!(
            tracker_after(&[(true, 2, true), (true, 2, false)]).phase(),
            FlightPhase::InFlight
        );
    }

    #[test]
    fn after_landing_with_engines_still_running_is_ready_for_taxi() {
        assert_eq!(
            tracker_after(&[(true, 2, false), (true, 2, true)]).phase(),
            FlightPhase::ReadyForTaxi
        );
    }

    #[test]
    fn engines_shut_down_after_landing_is_post_flight() {
        assert_eq!(
            tracker_after(&[(true, 2, false), (true, 2, true), (true, 0, true)]).phase(),
            FlightPhase::PostFlight
        );
    }

    #[test]
    fn post_flight_remains_when_power_is_lost() {
        assert_eq!(
            tracker_after(&[(true, 2, false), (true, 0, true), (false, 0, true)]).phase(),
            FlightPhase::PostFlight
        );
    }

    #[test]
    fn restarting_an_engine_after_post_flight_leaves_it() {
        assert_eq!(
            tracker_after(&[
                (true, 2, false),
                (true, 0, true),
                (true, 1, true),
                (true, 0, true)
            ])
            .phase(),
            FlightPhase::SystemsActive
        );
    }

    #[test]
    fn reports_only_changes() {
        let mut tracker = FlightPhaseTracker::new();

        assert_eq!(tracker.update(true, 0, 2, true), Some(FlightPhase::SystemsActive));
        assert_eq!(tracker.update(true, 0, 2, true), None);
    }

    #[test]
    fn phase_is_exported_as_its_number() {
        let tracker = tracker_after(&[(true, 2, true)]);
        let mut reader_writer = TestReaderWriter::new();

        write_to_simulator(&tracker, &mut reader_writer);

        assert_eq!(
            FlightPhase::from_number(reader_writer.read_f64("FLIGHT_PHASE")),
            Some(FlightPhase::ReadyForTaxi)
        );
    }

    #[test]
    fn unknown_numbers_are_not_phases() {
        assert_eq!(FlightPhase::from_number(0.), None);
        assert_eq!(FlightPhase::from_number(7.), None);
    }
}

//! Cockpit systems and simplified flight dynamics for a browser based flight
//! simulator. The crate owns the aircraft state and its per frame update; all
//! rendering happens in the host, which drives a [`session::FlightSession`] and
//! reads back its state.
pub mod aircraft;
pub mod apu;
pub mod atc;
pub mod autopilot;
pub mod electrical;
pub mod engine;
pub mod flight;
pub mod flight_phase;
pub mod flight_plan;
pub mod fuel;
pub mod overhead;
pub mod pneumatic;
pub mod session;
pub mod shared;
pub mod simulation;

pub use aircraft::{AircraftType, AircraftTypeTable, ConfigError};
pub use session::{AircraftState, FlightObserver, FlightSession, InputError, SystemSwitch};

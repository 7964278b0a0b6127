//! A flight from initialisation until it is dropped.
//!
//! The session is the only mutator of the [`AircraftState`]. Input events are
//! applied synchronously and completely; [`FlightSession::tick`] then advances
//! everything in a fixed order. Hosts observe the session through
//! [`FlightSession::state`], the exported variables or a [`FlightObserver`].
use std::time::Duration;

use log::{debug, info};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use uom::si::{f64::*, mass::kilogram};

use crate::{
    aircraft::AircraftType,
    apu::{AuxiliaryPowerUnit, AuxiliaryPowerUnitOverheadPanel},
    atc::AtcLog,
    autopilot::{Autopilot, AutopilotChannel, AutopilotTarget, LateralMode, VerticalMode},
    electrical::{ElectricalNetwork, ElectricalOverheadPanel},
    engine::{engine_may_run, Engine, EngineStartPanel, SystemsState, ENGINE_COUNT},
    flight::{Control, Controls, FlightModel, Kinematics},
    flight_phase::{FlightPhase, FlightPhaseTracker},
    flight_plan::{FlightPlan, Waypoint},
    fuel::{FuelOverheadPanel, FuelSystem},
    pneumatic::PneumaticOverheadPanel,
    shared::{Coordinates, UpdateContext},
    simulation::{
        write_to_simulator, FrameClock, SimulationElement, SimulationElementVisitor,
        SimulatorReaderWriter, SimulatorWriter,
    },
};

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("unknown system switch '{0}'")]
    UnknownSwitch(String),
    #[error("unknown control '{0}'")]
    UnknownControl(String),
    #[error("unknown autopilot target '{0}'")]
    UnknownTarget(String),
    #[error("unknown autopilot channel '{0}'")]
    UnknownChannel(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SystemSwitch {
    Battery,
    ExternalPower,
    ApuMaster,
    ApuStart,
    ApuBleed,
    #[strum(serialize = "fuel_pump_1")]
    FuelPump1,
    #[strum(serialize = "fuel_pump_2")]
    FuelPump2,
    Ignition,
    #[strum(serialize = "engine_master_1")]
    EngineMaster1,
    #[strum(serialize = "engine_master_2")]
    EngineMaster2,
}

/// Receives notifications about state changes. Every method defaults to doing nothing.
pub trait FlightObserver {
    /// Whether any engine is running changed.
    fn on_engine_spool_changed(&mut self, _running: bool) {}
    fn on_flameout(&mut self) {}
    fn on_autopilot_channel_changed(&mut self, _channel: AutopilotChannel, _engaged: bool) {}
    fn on_flight_phase_changed(&mut self, _phase: FlightPhase) {}
    fn on_waypoint_sequenced(&mut self, _waypoint: &Waypoint) {}
}

/// Everything the presentation layer needs to render the aircraft.
pub struct AircraftState {
    kinematics: Kinematics,
    controls: Controls,
    autopilot: Autopilot,
    systems: SystemsState,
    engines: [Engine; ENGINE_COUNT],
    fuel: FuelSystem,
}
impl AircraftState {
    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn autopilot(&self) -> &Autopilot {
        &self.autopilot
    }

    pub fn systems(&self) -> &SystemsState {
        &self.systems
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn fuel(&self) -> &FuelSystem {
        &self.fuel
    }

    pub fn running_engines(&self) -> usize {
        self.engines.iter().filter(|engine| engine.is_running()).count()
    }

    pub fn engines_running(&self) -> bool {
        self.running_engines() > 0
    }
}
impl SimulationElement for AircraftState {
    fn accept<T: SimulationElementVisitor>(&self, visitor: &mut T) {
        self.kinematics.accept(visitor);
        self.controls.accept(visitor);
        self.autopilot.accept(visitor);
        self.engines.iter().for_each(|engine| engine.accept(visitor));
        self.fuel.accept(visitor);

        visitor.visit(self);
    }

    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_bool("ENGINES_RUNNING", self.engines_running());
    }
}

pub struct FlightSession {
    aircraft_name: String,
    state: AircraftState,
    electrical_overhead: ElectricalOverheadPanel,
    electrical: ElectricalNetwork,
    apu_overhead: AuxiliaryPowerUnitOverheadPanel,
    apu: AuxiliaryPowerUnit,
    pneumatic_overhead: PneumaticOverheadPanel,
    fuel_overhead: FuelOverheadPanel,
    engine_start: EngineStartPanel,
    model: FlightModel,
    flight_plan: FlightPlan,
    phase: FlightPhaseTracker,
    atc: AtcLog,
    clock: FrameClock,
    elapsed: Duration,
    observers: Vec<Box<dyn FlightObserver>>,
}
impl FlightSession {
    /// Starts a cold and dark aircraft on the ground at `origin`, pointing at
    /// `destination`. A fuel capacity which isn't positive falls back to the
    /// aircraft type's capacity.
    pub fn init_flight(
        aircraft_type: &AircraftType,
        fuel_capacity: Mass,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Self {
        let capacity = if fuel_capacity.get::<kilogram>() > 0. {
            fuel_capacity
        } else {
            aircraft_type.fuel_capacity()
        };
        let heading = origin.bearing_to(&destination);

        let mut autopilot = Autopilot::new();
        autopilot.set_heading_target(heading);

        info!(
            "Initialised {} flight from ({:.4}, {:.4}) to ({:.4}, {:.4}) with {:.0} kg of fuel.",
            aircraft_type.name,
            origin.latitude(),
            origin.longitude(),
            destination.latitude(),
            destination.longitude(),
            capacity.get::<kilogram>()
        );

        Self {
            aircraft_name: aircraft_type.name.clone(),
            state: AircraftState {
                kinematics: Kinematics::new(origin, heading),
                controls: Controls::new(aircraft_type.flaps_stages),
                autopilot,
                systems: SystemsState::default(),
                engines: [Engine::new(1), Engine::new(2)],
                fuel: FuelSystem::new(
                    capacity,
                    aircraft_type.idle_fuel_flow_kg_per_sec,
                    aircraft_type.max_fuel_flow_kg_per_sec,
                ),
            },
            electrical_overhead: ElectricalOverheadPanel::new(),
            electrical: ElectricalNetwork::new(),
            apu_overhead: AuxiliaryPowerUnitOverheadPanel::new(),
            apu: AuxiliaryPowerUnit::new(),
            pneumatic_overhead: PneumaticOverheadPanel::new(),
            fuel_overhead: FuelOverheadPanel::new(),
            engine_start: EngineStartPanel::new(),
            model: FlightModel::new(aircraft_type),
            flight_plan: FlightPlan::new(origin, Waypoint::new("DEST", destination)),
            phase: FlightPhaseTracker::new(),
            atc: AtcLog::new(),
            clock: FrameClock::new(),
            elapsed: Duration::from_secs(0),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn FlightObserver>) {
        self.observers.push(observer);
    }

    pub fn aircraft_name(&self) -> &str {
        &self.aircraft_name
    }

    pub fn state(&self) -> &AircraftState {
        &self.state
    }

    pub fn flight_plan(&self) -> &FlightPlan {
        &self.flight_plan
    }

    pub fn flight_plan_mut(&mut self) -> &mut FlightPlan {
        &mut self.flight_plan
    }

    pub fn flight_phase(&self) -> FlightPhase {
        self.phase.phase()
    }

    pub fn atc_log(&self) -> &AtcLog {
        &self.atc
    }

    pub fn apu_is_available(&self) -> bool {
        self.apu.is_available()
    }

    pub fn is_powered(&self) -> bool {
        self.electrical.is_powered()
    }

    /// Simulated time since the flight was initialised.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Flips a switch and immediately re-evaluates which engines may run.
    pub fn toggle_system(&mut self, switch: SystemSwitch) {
        match switch {
            SystemSwitch::Battery => self.electrical_overhead.toggle_battery(),
            SystemSwitch::ExternalPower => self.electrical_overhead.toggle_external_power(),
            SystemSwitch::ApuMaster => self.apu_overhead.toggle_master(),
            SystemSwitch::ApuStart => self.apu_overhead.toggle_start(),
            SystemSwitch::ApuBleed => self.pneumatic_overhead.toggle_apu_bleed(),
            SystemSwitch::FuelPump1 => self.fuel_overhead.toggle_pump(1),
            SystemSwitch::FuelPump2 => self.fuel_overhead.toggle_pump(2),
            SystemSwitch::Ignition => self.engine_start.toggle_ignition(),
            SystemSwitch::EngineMaster1 => self.engine_start.toggle_master(1),
            SystemSwitch::EngineMaster2 => self.engine_start.toggle_master(2),
        }
        debug!("Toggled {}.", switch);

        self.apu.update_without_delta(
            &self.apu_overhead,
            self.pneumatic_overhead.apu_bleed_is_on(),
        );
        self.apu_overhead.update_after_apu(&self.apu);
        self.electrical
            .update(&self.electrical_overhead, self.apu.is_available());
        self.evaluate_engine_start_gate();
    }

    pub fn toggle_system_by_name(&mut self, name: &str) -> Result<(), InputError> {
        let switch: SystemSwitch = name
            .parse()
            .map_err(|_| InputError::UnknownSwitch(name.to_owned()))?;
        self.toggle_system(switch);

        Ok(())
    }

    /// Returns false when the value was rejected.
    pub fn set_control(&mut self, control: Control, value: f64) -> bool {
        self.state.controls.set(control, value)
    }

    pub fn set_control_by_name(&mut self, name: &str, value: f64) -> Result<bool, InputError> {
        let control: Control = name
            .parse()
            .map_err(|_| InputError::UnknownControl(name.to_owned()))?;

        Ok(self.set_control(control, value))
    }

    pub fn set_autopilot_target(&mut self, target: AutopilotTarget, value: f64) {
        self.state.autopilot.set_target(target, value);
    }

    pub fn set_autopilot_target_by_name(
        &mut self,
        name: &str,
        value: f64,
    ) -> Result<(), InputError> {
        let target: AutopilotTarget = name
            .parse()
            .map_err(|_| InputError::UnknownTarget(name.to_owned()))?;
        self.set_autopilot_target(target, value);

        Ok(())
    }

    /// Engages the channel when an engine is running. Returns false when the
    /// command was ignored because no engine runs.
    pub fn engage_autopilot(&mut self, channel: AutopilotChannel) -> bool {
        if !self.state.engines_running() {
            debug!("Ignored engaging {:?}: no engine is running.", channel);
            return false;
        }

        if self.state.autopilot.engage(channel) {
            info!("Autopilot {:?} engaged.", channel);
            self.notify(|observer| observer.on_autopilot_channel_changed(channel, true));
        }

        true
    }

    pub fn engage_autopilot_by_name(&mut self, name: &str) -> Result<bool, InputError> {
        let channel: AutopilotChannel = name
            .parse()
            .map_err(|_| InputError::UnknownChannel(name.to_owned()))?;

        Ok(self.engage_autopilot(channel))
    }

    pub fn disengage_autopilot(&mut self, channel: AutopilotChannel) {
        if self.state.autopilot.disengage(channel) {
            info!("Autopilot {:?} disengaged.", channel);
            self.notify(|observer| observer.on_autopilot_channel_changed(channel, false));
        }
    }

    pub fn disengage_autopilot_by_name(&mut self, name: &str) -> Result<(), InputError> {
        let channel: AutopilotChannel = name
            .parse()
            .map_err(|_| InputError::UnknownChannel(name.to_owned()))?;
        self.disengage_autopilot(channel);

        Ok(())
    }

    pub fn set_lateral_mode(&mut self, mode: LateralMode) {
        self.state.autopilot.set_lateral_mode(mode);
    }

    pub fn set_vertical_mode(&mut self, mode: VerticalMode) {
        self.state.autopilot.set_vertical_mode(mode);
    }

    /// Refuels or defuels, bounded by the tank capacity. Emptying the tanks
    /// of a running aircraft flames the engines out on the next tick.
    pub fn set_fuel_quantity(&mut self, quantity: Mass) {
        let had_fuel = self.state.fuel.has_fuel_remaining();
        self.state.fuel.set_quantity(quantity);

        if had_fuel && self.state.fuel.is_empty() && self.state.engines_running() {
            info!("Fuel removed, engines flame out.");
            self.notify(|observer| observer.on_flameout());
        }
    }

    pub fn transmit_atc(&mut self, text: &str) {
        self.atc.record(self.elapsed, text);
    }

    /// Advances the session to the given host frame timestamp in milliseconds.
    pub fn frame(&mut self, timestamp_ms: f64) {
        let delta = self.clock.delta_at(timestamp_ms);
        self.tick(delta);
    }

    /// Advances the simulation by `delta`, which is clamped to [`UpdateContext::MAX_DELTA`].
    pub fn tick(&mut self, delta: Duration) {
        let context = UpdateContext::new(delta);
        if context.is_idle() {
            return;
        }
        self.elapsed += context.delta();

        self.update_power(&context);
        self.evaluate_engine_start_gate();
        self.update_guidance();

        let engines_running = self.state.engines_running();
        self.model.update(
            &context,
            &mut self.state.kinematics,
            &self.state.controls,
            &self.state.autopilot,
            engines_running,
        );
        self.sequence_flight_plan();

        let throttle = self.state.controls.throttle();
        let running_engines = self.state.running_engines();
        if self.state.fuel.update(&context, throttle, running_engines) {
            info!("Fuel exhausted, engines flame out.");
            self.notify(|observer| observer.on_flameout());
        }

        self.state
            .engines
            .iter_mut()
            .for_each(|engine| engine.update(&context, throttle));

        self.update_flight_phase();
    }

    /// Writes every exported variable into the host.
    pub fn write_to(&self, host: &mut dyn SimulatorReaderWriter) {
        write_to_simulator(self, host);
    }

    fn systems_state(&self) -> SystemsState {
        SystemsState {
            battery_on: self.electrical_overhead.battery_is_on(),
            external_power_on: self.electrical_overhead.external_power_is_on(),
            apu_master_on: self.apu_overhead.master_is_on(),
            apu_available: self.apu.is_available(),
            apu_bleed_on: self.pneumatic_overhead.apu_bleed_is_on(),
            fuel_pumps_on: self.fuel_overhead.pumps_on(),
            ignition_on: self.engine_start.ignition_is_on(),
            engine_masters_on: self.engine_start.masters_on(),
        }
    }

    fn update_power(&mut self, context: &UpdateContext) {
        let was_available = self.apu.is_available();

        self.apu.update(
            context,
            &self.apu_overhead,
            self.pneumatic_overhead.apu_bleed_is_on(),
            self.electrical.is_powered(),
        );
        self.apu_overhead.update_after_apu(&self.apu);
        self.electrical
            .update(&self.electrical_overhead, self.apu.is_available());

        if !was_available && self.apu.is_available() {
            info!("APU available.");
        }
    }

    fn evaluate_engine_start_gate(&mut self) {
        let systems = self.systems_state();
        self.state.systems = systems;

        let has_fuel_remaining = self.state.fuel.has_fuel_remaining();
        let were_running = self.state.engines_running();

        for engine in self.state.engines.iter_mut() {
            let may_run = engine_may_run(&systems, engine.number(), has_fuel_remaining);
            if engine.set_may_run(may_run) {
                info!(
                    "Engine {} {}.",
                    engine.number(),
                    if may_run { "started" } else { "shut down" }
                );
            }
        }

        let running = self.state.engines_running();
        if running != were_running {
            self.notify(|observer| observer.on_engine_spool_changed(running));
        }

        if !running {
            for channel in self.state.autopilot.disengage_all() {
                info!("Autopilot {:?} disengaged: no engine is running.", channel);
                self.notify(|observer| observer.on_autopilot_channel_changed(channel, false));
            }
        }
    }

    fn update_guidance(&mut self) {
        let autopilot = &mut self.state.autopilot;
        if !autopilot.is_engaged() {
            return;
        }

        if autopilot.lateral_mode() == LateralMode::Lnav {
            let position = self.state.kinematics.position();
            autopilot.set_heading_target(self.flight_plan.bearing_to_active(position));
        }

        if autopilot.vertical_mode() == VerticalMode::Vnav {
            let waypoint = self.flight_plan.active_waypoint();
            if let Some(altitude) = waypoint.altitude() {
                autopilot.set_altitude_target(altitude);
            }
            if let Some(speed) = waypoint.speed() {
                autopilot.set_speed_target(speed);
            }
        }
    }

    fn sequence_flight_plan(&mut self) {
        let position = self.state.kinematics.position();
        if let Some(passed) = self.flight_plan.sequence(position) {
            for observer in self.observers.iter_mut() {
                observer.on_waypoint_sequenced(passed);
            }
        }
    }

    fn update_flight_phase(&mut self) {
        if let Some(phase) = self.phase.update(
            self.electrical.is_powered(),
            self.state.running_engines(),
            ENGINE_COUNT,
            self.state.kinematics.is_on_ground(),
        ) {
            self.notify(|observer| observer.on_flight_phase_changed(phase));
        }
    }

    fn notify<F: Fn(&mut dyn FlightObserver)>(&mut self, notification: F) {
        for observer in self.observers.iter_mut() {
            notification(observer.as_mut());
        }
    }
}
impl SimulationElement for FlightSession {
    fn accept<T: SimulationElementVisitor>(&self, visitor: &mut T) {
        self.electrical_overhead.accept(visitor);
        self.electrical.accept(visitor);
        self.apu_overhead.accept(visitor);
        self.apu.accept(visitor);
        self.pneumatic_overhead.accept(visitor);
        self.fuel_overhead.accept(visitor);
        self.engine_start.accept(visitor);
        self.state.accept(visitor);
        self.flight_plan.accept(visitor);
        self.phase.accept(visitor);
        self.atc.accept(visitor);

        visitor.visit(self);
    }
}

use uom::si::{f64::*, ratio::percent};

use crate::{
    overhead::OnOffPushButton,
    shared::{calculate_towards_target, UpdateContext},
    simulation::{SimulationElement, SimulationElementVisitor, SimulatorWriter},
};

pub const ENGINE_COUNT: usize = 2;

/// The switch positions and availability flags engine start depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SystemsState {
    pub battery_on: bool,
    pub external_power_on: bool,
    pub apu_master_on: bool,
    pub apu_available: bool,
    pub apu_bleed_on: bool,
    pub fuel_pumps_on: [bool; 2],
    pub ignition_on: bool,
    pub engine_masters_on: [bool; ENGINE_COUNT],
}
impl SystemsState {
    pub fn any_fuel_pump_on(&self) -> bool {
        self.fuel_pumps_on.iter().any(|&on| on)
    }

    pub fn any_engine_master_on(&self) -> bool {
        self.engine_masters_on.iter().any(|&on| on)
    }

    pub fn engine_master_on(&self, number: usize) -> bool {
        self.engine_masters_on[number - 1]
    }

    fn start_air_and_fuel_available(&self) -> bool {
        self.any_fuel_pump_on()
            && self.apu_master_on
            && self.apu_available
            && self.apu_bleed_on
            && self.ignition_on
    }
}

/// Whether the systems permit engines to spool up: fuel is pumped, the APU
/// supplies bleed air, ignition is on and at least one engine master is on.
pub fn can_spool_engines(systems: &SystemsState) -> bool {
    systems.start_air_and_fuel_available() && systems.any_engine_master_on()
}

/// Whether the given engine may run. Besides the shared start conditions,
/// its own master must be on and there must be fuel left to burn.
pub fn engine_may_run(systems: &SystemsState, number: usize, has_fuel_remaining: bool) -> bool {
    systems.start_air_and_fuel_available()
        && systems.engine_master_on(number)
        && has_fuel_remaining
}

pub struct EngineStartPanel {
    ignition: OnOffPushButton,
    masters: [OnOffPushButton; ENGINE_COUNT],
}
impl EngineStartPanel {
    pub fn new() -> Self {
        Self {
            ignition: OnOffPushButton::new_off("ENG_IGNITION"),
            masters: [
                OnOffPushButton::new_off("ENG_1_MASTER"),
                OnOffPushButton::new_off("ENG_2_MASTER"),
            ],
        }
    }

    pub fn toggle_ignition(&mut self) {
        self.ignition.toggle();
    }

    pub fn toggle_master(&mut self, number: usize) {
        self.masters[number - 1].toggle();
    }

    pub fn ignition_is_on(&self) -> bool {
        self.ignition.is_on()
    }

    pub fn masters_on(&self) -> [bool; ENGINE_COUNT] {
        [self.masters[0].is_on(), self.masters[1].is_on()]
    }
}
impl SimulationElement for EngineStartPanel {
    fn accept<T: SimulationElementVisitor>(&self, visitor: &mut T) {
        self.ignition.accept(visitor);
        self.masters.iter().for_each(|master| master.accept(visitor));

        visitor.visit(self);
    }
}
impl Default for EngineStartPanel {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Engine {
    number: usize,
    running_id: String,
    n2_id: String,
    running: bool,
    n2: Ratio,
}
impl Engine {
    pub const IDLE_N2_PERCENT: f64 = 58.;
    const SPOOL_RATE_PERCENT_PER_SECOND: f64 = 8.;

    pub fn new(number: usize) -> Engine {
        Engine {
            number,
            running_id: format!("ENG_{}_RUNNING", number),
            n2_id: format!("ENG_{}_N2", number),
            running: false,
            n2: Ratio::new::<percent>(0.),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// Applies the outcome of the start gate. Returns true when the running state changed.
    pub fn set_may_run(&mut self, may_run: bool) -> bool {
        let changed = self.running != may_run;
        self.running = may_run;

        changed
    }

    /// Spools N2 towards idle plus the thrust lever demand while running,
    /// and towards zero otherwise.
    pub fn update(&mut self, context: &UpdateContext, throttle: Ratio) {
        let target = if self.running {
            Self::IDLE_N2_PERCENT
                + throttle.get::<percent>().clamp(0., 100.) / 100. * (100. - Self::IDLE_N2_PERCENT)
        } else {
            0.
        };

        self.n2 = Ratio::new::<percent>(calculate_towards_target(
            self.n2.get::<percent>(),
            target,
            Self::SPOOL_RATE_PERCENT_PER_SECOND,
            context.delta(),
        ));
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn n2(&self) -> Ratio {
        self.n2
    }
}
impl SimulationElement for Engine {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_bool(&self.running_id, self.running);
        writer.write_f64(&self.n2_id, self.n2.get::<percent>());
    }
}


#[cfg(test)]
mod engine_tests {
    use super::*;
    use ntest::assert_about_eq;
    use std::time::Duration;

    fn context(delta: Duration) -> UpdateContext {
        UpdateContext::new(delta)
    }

    #[test]
    fn new_engine_is_not_running() {
        let engine = Engine::new(1);

        assert!(!engine.is_running());
        assert_about_eq!(engine.n2().get::<percent>(), 0.);
    }

    #[test]
    fn reports_running_state_changes() {
        let mut engine = Engine::new(1);

        assert!(engine.set_may_run(true));
        assert!(!engine.set_may_run(true));
        assert!(engine.set_may_run(false));
    }

    #[test]
    fn running_engine_spools_up_to_idle() {
        let mut engine = Engine::new(1);
        engine.set_may_run(true);

        for _ in 0..20 {
            engine.update(&context(Duration::from_secs(1)), Ratio::new::<percent>(0.));
        }

        assert_about_eq!(engine.n2().get::<percent>(), Engine::IDLE_N2_PERCENT);
    }

    #[test]
    fn spool_up_is_rate_limited() {
        let mut engine = Engine::new(1);
        engine.set_may_run(true);

        engine.update(&context(Duration::from_secs(1)), Ratio::new::<percent>(0.));

        assert_about_eq!(engine.n2().get::<percent>(), 8.);
    }

    #[test]
    fn full_throttle_spools_to_one_hundred_percent() {
        let mut engine = Engine::new(1);
        engine.set_may_run(true);

        for _ in 0..20 {
            engine.update(&context(Duration::from_secs(1)), Ratio::new::<percent>(100.));
        }

        assert_about_eq!(engine.n2().get::<percent>(), 100.);
    }

    #[test]
    fn stopped_engine_spools_down() {
        let mut engine = Engine::new(2);
        engine.set_may_run(true);
        for _ in 0..20 {
            engine.update(&context(Duration::from_secs(1)), Ratio::new::<percent>(0.));
        }

        engine.set_may_run(false);
        for _ in 0..20 {
            engine.update(&context(Duration::from_secs(1)), Ratio::new::<percent>(0.));
        }

        assert_about_eq!(engine.n2().get::<percent>(), 0.);
    }
}

use std::time::Duration;

use crate::{
    overhead::{OnOffAvailablePushButton, OnOffPushButton},
    pneumatic::{BleedAirValve, Valve},
    shared::{DelayedTrueLogicGate, UpdateContext},
    simulation::{SimulationElement, SimulationElementVisitor, SimulatorWriter},
};

/// The APU becomes available once it has been starting, without interruption,
/// for [`AuxiliaryPowerUnit::START_DURATION`]. A start requires the master switch,
/// the start push button and electrical power for the starter. Switching the
/// master off shuts the APU down immediately.
pub struct AuxiliaryPowerUnit {
    start_gate: DelayedTrueLogicGate,
    starting: bool,
    available: bool,
    bleed_air_valve: BleedAirValve,
}
impl AuxiliaryPowerUnit {
    pub const START_DURATION: Duration = Duration::from_secs(30);

    pub fn new() -> AuxiliaryPowerUnit {
        AuxiliaryPowerUnit {
            start_gate: DelayedTrueLogicGate::new(Self::START_DURATION),
            starting: false,
            available: false,
            bleed_air_valve: BleedAirValve::new(),
        }
    }

    pub fn update(
        &mut self,
        context: &UpdateContext,
        overhead: &AuxiliaryPowerUnitOverheadPanel,
        apu_bleed_is_on: bool,
        starter_is_powered: bool,
    ) {
        if overhead.master_is_on() {
            if !self.available && overhead.start_is_on() && starter_is_powered {
                self.starting = true;
            } else if !starter_is_powered {
                self.starting = false;
            }
        } else {
            self.starting = false;
            self.available = false;
        }

        self.start_gate.update(context, self.starting);
        if self.start_gate.output() {
            self.starting = false;
            self.available = true;
        }

        self.bleed_air_valve
            .open_when(self.available && apu_bleed_is_on);
    }

    /// Applies switch changes which take effect without time passing:
    /// a master switched off shuts down the APU at once, and the bleed
    /// valve follows its push button.
    pub fn update_without_delta(
        &mut self,
        overhead: &AuxiliaryPowerUnitOverheadPanel,
        apu_bleed_is_on: bool,
    ) {
        if !overhead.master_is_on() {
            self.starting = false;
            self.available = false;
        }

        self.bleed_air_valve
            .open_when(self.available && apu_bleed_is_on);
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_starting(&self) -> bool {
        self.starting
    }

    pub fn bleed_air_valve_is_open(&self) -> bool {
        self.bleed_air_valve.is_open()
    }

    /// Time until the APU becomes available, when starting.
    pub fn remaining_start_time(&self) -> Option<Duration> {
        if self.starting {
            Some(self.start_gate.remaining())
        } else {
            None
        }
    }
}
impl SimulationElement for AuxiliaryPowerUnit {
    fn accept<T: SimulationElementVisitor>(&self, visitor: &mut T) {
        self.bleed_air_valve.accept(visitor);

        visitor.visit(self);
    }

    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_bool("APU_AVAILABLE", self.available);
        writer.write_bool("APU_IS_STARTING", self.starting);
    }
}
impl Default for AuxiliaryPowerUnit {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AuxiliaryPowerUnitOverheadPanel {
    master: OnOffPushButton,
    start: OnOffAvailablePushButton,
}
impl AuxiliaryPowerUnitOverheadPanel {
    pub fn new() -> AuxiliaryPowerUnitOverheadPanel {
        AuxiliaryPowerUnitOverheadPanel {
            master: OnOffPushButton::new_off("APU_MASTER_SW"),
            start: OnOffAvailablePushButton::new_off("APU_START"),
        }
    }

    pub fn toggle_master(&mut self) {
        self.master.toggle();
    }

    pub fn toggle_start(&mut self) {
        self.start.toggle();
    }

    pub fn update_after_apu(&mut self, apu: &AuxiliaryPowerUnit) {
        self.start.set_available(apu.is_available());
        if self.start_is_on()
            && (apu.is_available() || (!self.master_is_on() && !apu.is_starting()))
        {
            self.start.turn_off();
        }
    }

    pub fn master_is_on(&self) -> bool {
        self.master.is_on()
    }

    pub fn start_is_on(&self) -> bool {
        self.start.is_on()
    }

    pub fn start_shows_available(&self) -> bool {
        self.start.shows_available()
    }
}
impl SimulationElement for AuxiliaryPowerUnitOverheadPanel {
    fn accept<T: SimulationElementVisitor>(&self, visitor: &mut T) {
        self.master.accept(visitor);
        self.start.accept(visitor);

        visitor.visit(self);
    }
}
impl Default for AuxiliaryPowerUnitOverheadPanel {
    fn default() -> Self {
        Self::new()
    }
}

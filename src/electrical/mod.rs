//! Electrical power is modelled as a single network which is powered by the
//! batteries, a ground power unit or the APU generator.
use crate::{
    overhead::OnOffPushButton,
    simulation::{SimulationElement, SimulationElementVisitor, SimulatorWriter},
};

pub struct ElectricalOverheadPanel {
    battery: OnOffPushButton,
    external_power: OnOffPushButton,
}
impl ElectricalOverheadPanel {
    pub fn new() -> ElectricalOverheadPanel {
        ElectricalOverheadPanel {
            battery: OnOffPushButton::new_off("ELEC_BAT"),
            external_power: OnOffPushButton::new_off("ELEC_EXT_PWR"),
        }
    }

    pub fn toggle_battery(&mut self) {
        self.battery.toggle();
    }

    pub fn toggle_external_power(&mut self) {
        self.external_power.toggle();
    }

    pub fn battery_is_on(&self) -> bool {
        self.battery.is_on()
    }

    pub fn external_power_is_on(&self) -> bool {
        self.external_power.is_on()
    }
}
impl SimulationElement for ElectricalOverheadPanel {
    fn accept<T: SimulationElementVisitor>(&self, visitor: &mut T) {
        self.battery.accept(visitor);
        self.external_power.accept(visitor);

        visitor.visit(self);
    }
}
impl Default for ElectricalOverheadPanel {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ElectricalNetwork {
    powered: bool,
}
impl ElectricalNetwork {
    pub fn new() -> ElectricalNetwork {
        ElectricalNetwork { powered: false }
    }

    pub fn update(&mut self, overhead: &ElectricalOverheadPanel, apu_generator_available: bool) {
        self.powered = overhead.battery_is_on()
            || overhead.external_power_is_on()
            || apu_generator_available;
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }
}
impl SimulationElement for ElectricalNetwork {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_bool("ELEC_NETWORK_IS_POWERED", self.powered);
    }
}
impl Default for ElectricalNetwork {
    fn default() -> Self {
        Self::new()
    }
}

//! Bleed air is only modelled as far as the APU supplies it for engine start.
use crate::{
    overhead::OnOffPushButton,
    simulation::{SimulationElement, SimulationElementVisitor, SimulatorWriter},
};

pub trait Valve {
    fn is_open(&self) -> bool;
}

pub struct BleedAirValve {
    open: bool,
}
impl BleedAirValve {
    pub fn new() -> Self {
        BleedAirValve { open: false }
    }

    pub fn open_when(&mut self, condition: bool) {
        self.open = condition;
    }
}
impl Valve for BleedAirValve {
    fn is_open(&self) -> bool {
        self.open
    }
}
impl SimulationElement for BleedAirValve {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_bool("APU_BLEED_AIR_VALVE_OPEN", self.open);
    }
}
impl Default for BleedAirValve {
    fn default() -> Self {
        Self::new()
    }
}

pub struct PneumaticOverheadPanel {
    apu_bleed: OnOffPushButton,
}
impl PneumaticOverheadPanel {
    pub fn new() -> Self {
        PneumaticOverheadPanel {
            apu_bleed: OnOffPushButton::new_off("APU_BLEED"),
        }
    }

    pub fn apu_bleed_is_on(&self) -> bool {
        self.apu_bleed.is_on()
    }

    pub fn toggle_apu_bleed(&mut self) {
        self.apu_bleed.toggle();
    }
}
impl SimulationElement for PneumaticOverheadPanel {
    fn accept<T: SimulationElementVisitor>(&self, visitor: &mut T) {
        self.apu_bleed.accept(visitor);

        visitor.visit(self);
    }
}
impl Default for PneumaticOverheadPanel {
    fn default() -> Self {
        Self::new()
    }
}

use uom::si::{f64::*, mass::kilogram, ratio::ratio};

use crate::{
    overhead::OnOffPushButton,
    shared::{lerp, UpdateContext},
    simulation::{SimulationElement, SimulationElementVisitor, SimulatorWriter},
};

pub struct FuelOverheadPanel {
    pumps: [OnOffPushButton; 2],
}
impl FuelOverheadPanel {
    pub fn new() -> Self {
        FuelOverheadPanel {
            pumps: [
                OnOffPushButton::new_off("FUEL_PUMP_1"),
                OnOffPushButton::new_off("FUEL_PUMP_2"),
            ],
        }
    }

    pub fn toggle_pump(&mut self, number: usize) {
        self.pumps[number - 1].toggle();
    }

    pub fn pumps_on(&self) -> [bool; 2] {
        [self.pumps[0].is_on(), self.pumps[1].is_on()]
    }
}
impl SimulationElement for FuelOverheadPanel {
    fn accept<T: SimulationElementVisitor>(&self, visitor: &mut T) {
        self.pumps.iter().for_each(|pump| pump.accept(visitor));

        visitor.visit(self);
    }
}
impl Default for FuelOverheadPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// A single aggregated fuel quantity which running engines burn from.
/// The burn rate per engine scales linearly between idle and full thrust.
pub struct FuelSystem {
    capacity: Mass,
    quantity: Mass,
    idle_flow_kg_per_sec: f64,
    max_flow_kg_per_sec: f64,
}
impl FuelSystem {
    pub fn new(capacity: Mass, idle_flow_kg_per_sec: f64, max_flow_kg_per_sec: f64) -> Self {
        let capacity = Mass::new::<kilogram>(capacity.get::<kilogram>().max(0.));
        FuelSystem {
            capacity,
            quantity: capacity,
            idle_flow_kg_per_sec: idle_flow_kg_per_sec.max(0.),
            max_flow_kg_per_sec: max_flow_kg_per_sec.max(idle_flow_kg_per_sec).max(0.),
        }
    }

    /// Fuel burnt per second by all running engines together.
    pub fn burn_rate_kg_per_sec(&self, throttle: Ratio, running_engines: usize) -> f64 {
        if running_engines == 0 {
            0.
        } else {
            running_engines as f64
                * lerp(
                    self.idle_flow_kg_per_sec,
                    self.max_flow_kg_per_sec,
                    throttle.get::<ratio>(),
                )
        }
    }

    /// Burns fuel for the elapsed time. Returns true when this update emptied the tanks.
    pub fn update(
        &mut self,
        context: &UpdateContext,
        throttle: Ratio,
        running_engines: usize,
    ) -> bool {
        if self.is_empty() {
            return false;
        }

        let burnt =
            self.burn_rate_kg_per_sec(throttle, running_engines) * context.delta_as_secs_f64();
        let remaining = (self.quantity.get::<kilogram>() - burnt).max(0.);
        self.quantity = Mass::new::<kilogram>(remaining);

        self.is_empty()
    }

    /// Refuels or defuels to the given quantity, bounded by the tank capacity.
    pub fn set_quantity(&mut self, quantity: Mass) {
        let kg = quantity.get::<kilogram>();
        if kg.is_nan() {
            return;
        }

        self.quantity = Mass::new::<kilogram>(kg.clamp(0., self.capacity.get::<kilogram>()));
    }

    pub fn quantity(&self) -> Mass {
        self.quantity
    }

    pub fn capacity(&self) -> Mass {
        self.capacity
    }

    pub fn percentage(&self) -> Ratio {
        let capacity = self.capacity.get::<kilogram>();
        if capacity > 0. {
            Ratio::new::<ratio>(self.quantity.get::<kilogram>() / capacity)
        } else {
            Ratio::new::<ratio>(0.)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.get::<kilogram>() <= 0.
    }

    pub fn has_fuel_remaining(&self) -> bool {
        !self.is_empty()
    }
}
impl SimulationElement for FuelSystem {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_f64("FUEL_QUANTITY_KG", self.quantity.get::<kilogram>());
        writer.write_f64("FUEL_CAPACITY_KG", self.capacity.get::<kilogram>());
    }
}

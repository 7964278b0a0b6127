//! Provides the types for driving the flight simulation from a host
//! (a browser animation frame loop, a test, the demo binary) and for
//! exposing its state as named variables.
use std::time::Duration;

use crate::shared::UpdateContext;


/// Converts wall-clock frame timestamps into the elapsed time of a single tick.
///
/// Hosts call [`FrameClock::delta_at`] with the timestamp they receive for each
/// display refresh. The resulting delta is never negative and never exceeds
/// [`UpdateContext::MAX_DELTA`], which keeps the simulation frame-rate independent
/// while tolerating suspended tabs and clocks jumping backwards.
#[derive(Debug, Default)]
pub struct FrameClock {
    last_timestamp_ms: Option<f64>,
}
impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp_ms: None,
        }
    }

    /// Returns the time elapsed since the previous call. The first call,
    /// and any call with a non-finite or earlier timestamp, yields zero.
    pub fn delta_at(&mut self, timestamp_ms: f64) -> Duration {
        if !timestamp_ms.is_finite() {
            return Duration::from_secs(0);
        }

        let elapsed_ms = self
            .last_timestamp_ms
            .map_or(0., |last| timestamp_ms - last);
        self.last_timestamp_ms = Some(timestamp_ms);

        if elapsed_ms <= 0. {
            Duration::from_secs(0)
        } else {
            Duration::from_secs_f64(
                (elapsed_ms / 1000.).min(UpdateContext::MAX_DELTA.as_secs_f64()),
            )
        }
    }

    /// Forgets the previous timestamp, e.g. when the host pauses the loop.
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }
}

/// Trait for reading data from and writing data to a host which polls
/// the simulation by variable name.
pub trait SimulatorReaderWriter {
    fn read(&mut self, name: &str) -> f64;
    fn write(&mut self, name: &str, value: f64);
}

/// Converts a given `f64` representing a boolean value in the host into an actual `bool` value.
pub fn to_bool(value: f64) -> bool {
    (value - 1.).abs() < f64::EPSILON
}

/// Converts a given `bool` value into an `f64` representing that boolean value in the host.
pub fn from_bool(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

pub struct SimulatorWriter<'a> {
    simulator_read_writer: &'a mut dyn SimulatorReaderWriter,
}
impl<'a> SimulatorWriter<'a> {
    pub fn new(simulator_read_writer: &'a mut dyn SimulatorReaderWriter) -> Self {
        Self {
            simulator_read_writer,
        }
    }

    pub fn write_f64(&mut self, name: &str, value: f64) {
        self.simulator_read_writer.write(name, value);
    }

    pub fn write_bool(&mut self, name: &str, value: bool) {
        self.simulator_read_writer.write(name, from_bool(value));
    }
}

/// Trait for an element within the flight simulation.
pub trait SimulationElement {
    /// Accepts a visitor, passing it on to any child elements before visiting itself.
    fn accept<T: SimulationElementVisitor>(&self, visitor: &mut T)
    where
        Self: Sized,
    {
        visitor.visit(self);
    }

    /// Writes data from the flight simulation to a model which can be passed to the host.
    fn write(&self, _writer: &mut SimulatorWriter) {}
}

/// Trait for visitors that visit the flight simulation's elements.
pub trait SimulationElementVisitor {
    fn visit<T: SimulationElement>(&mut self, visited: &T);
}

/// Visits elements in order to pass data from the flight simulation to the host.
pub struct SimulationToSimulatorVisitor<'a, 'b> {
    writer: &'b mut SimulatorWriter<'a>,
}
impl<'a, 'b> SimulationToSimulatorVisitor<'a, 'b> {
    pub fn new(writer: &'b mut SimulatorWriter<'a>) -> Self {
        Self { writer }
    }
}
impl SimulationElementVisitor for SimulationToSimulatorVisitor<'_, '_> {
    fn visit<T: SimulationElement>(&mut self, visited: &T) {
        visited.write(self.writer);
    }
}

/// Writes every element of the given tree into the host.
pub fn write_to_simulator<T: SimulationElement>(
    element: &T,
    simulator_read_writer: &mut dyn SimulatorReaderWriter,
) {
    let mut writer = SimulatorWriter::new(simulator_read_writer);
    let mut visitor = SimulationToSimulatorVisitor::new(&mut writer);
    element.accept(&mut visitor);
}

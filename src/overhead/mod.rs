use crate::simulation::{SimulationElement, SimulatorWriter};

pub struct OnOffPushButton {
    is_on_id: String,
    is_on: bool,
}
impl OnOffPushButton {
    pub fn new_on(name: &str) -> Self {
        Self::new(name, true)
    }

    pub fn new_off(name: &str) -> Self {
        Self::new(name, false)
    }

    fn new(name: &str, is_on: bool) -> Self {
        Self {
            is_on_id: format!("OVHD_{}_PB_IS_ON", name),
            is_on,
        }
    }

    pub fn set_on(&mut self, value: bool) {
        self.is_on = value;
    }

    pub fn toggle(&mut self) {
        self.is_on = !self.is_on;
    }

    pub fn turn_on(&mut self) {
        self.is_on = true;
    }

    pub fn turn_off(&mut self) {
        self.is_on = false;
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn is_off(&self) -> bool {
        !self.is_on
    }
}
impl SimulationElement for OnOffPushButton {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_bool(&self.is_on_id, self.is_on());
    }
}

/// A push button which, besides being on or off, lights up
/// when the system it controls is available.
pub struct OnOffAvailablePushButton {
    is_on_id: String,
    is_available_id: String,
    is_on: bool,
    is_available: bool,
}
impl OnOffAvailablePushButton {
    pub fn new_off(name: &str) -> Self {
        Self {
            is_on_id: format!("OVHD_{}_PB_IS_ON", name),
            is_available_id: format!("OVHD_{}_PB_IS_AVAILABLE", name),
            is_on: false,
            is_available: false,
        }
    }

    pub fn toggle(&mut self) {
        self.is_on = !self.is_on;
    }

    pub fn turn_on(&mut self) {
        self.is_on = true;
    }

    pub fn turn_off(&mut self) {
        self.is_on = false;
    }

    pub fn set_available(&mut self, available: bool) {
        self.is_available = available;
    }

    pub fn shows_available(&self) -> bool {
        self.is_available
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn is_off(&self) -> bool {
        !self.is_on
    }
}
impl SimulationElement for OnOffAvailablePushButton {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_bool(&self.is_on_id, self.is_on());
        writer.write_bool(&self.is_available_id, self.shows_available());
    }
}

#[cfg(test)]
mod on_off_push_button_tests {
    use super::OnOffPushButton;
    use crate::simulation::{test::TestReaderWriter, write_to_simulator};

    #[test]
    fn new_on_push_button_is_on() {
        assert!(OnOffPushButton::new_on("TEST").is_on());
    }

    #[test]
    fn new_off_push_button_is_off() {
        assert!(OnOffPushButton::new_off("TEST").is_off());
    }

    #[test]
    fn toggling_flips_the_state() {
        let mut pb = OnOffPushButton::new_off("TEST");

        pb.toggle();
        assert!(pb.is_on());

        pb.toggle();
        assert!(pb.is_off());
    }

    #[test]
    fn writes_its_state() {
        let pb = OnOffPushButton::new_on("BAT");
        let mut reader_writer = TestReaderWriter::new();

        write_to_simulator(&pb, &mut reader_writer);

        assert!(reader_writer.contains_bool("OVHD_BAT_PB_IS_ON", true));
    }
}

#[cfg(test)]
mod on_off_available_push_button_tests {
    use super::OnOffAvailablePushButton;
    use crate::simulation::{test::TestReaderWriter, write_to_simulator};

    #[test]
    fn new_off_push_button_is_off_and_not_available() {
        let pb = OnOffAvailablePushButton::new_off("TEST");

        assert!(pb.is_off());
        assert!(!pb.shows_available());
    }

    #[test]
    fn availability_is_independent_of_on_state() {
        let mut pb = OnOffAvailablePushButton::new_off("TEST");
        pb.set_available(true);

        assert!(pb.is_off());
        assert!(pb.shows_available());
    }

    #[test]
    fn writes_its_state() {
        let mut pb = OnOffAvailablePushButton::new_off("APU_START");
        pb.turn_on();
        pb.set_available(true);
        let mut reader_writer = TestReaderWriter::new();

        write_to_simulator(&pb, &mut reader_writer);

        assert!(reader_writer.contains_bool("OVHD_APU_START_PB_IS_ON", true));
        assert!(reader_writer.contains_bool("OVHD_APU_START_PB_IS_AVAILABLE", true));
    }
}

//! A short history of radio messages for display. There is no ATC logic behind it.
use std::{collections::VecDeque, time::Duration};

use log::info;

use crate::simulation::{SimulationElement, SimulatorWriter};

#[derive(Clone, Debug, PartialEq)]
pub struct AtcMessage {
    sent_at: Duration,
    text: String,
}
impl AtcMessage {
    /// Simulated time since the flight was initialised.
    pub fn sent_at(&self) -> Duration {
        self.sent_at
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

pub struct AtcLog {
    messages: VecDeque<AtcMessage>,
}
impl AtcLog {
    pub const CAPACITY: usize = 5;

    pub fn new() -> Self {
        Self {
            messages: VecDeque::with_capacity(Self::CAPACITY),
        }
    }

    /// Records a message, dropping the oldest one when the log is full.
    pub fn record(&mut self, sent_at: Duration, text: &str) {
        info!("ATC [{:>6.0}s]: {}", sent_at.as_secs_f64(), text);

        if self.messages.len() == Self::CAPACITY {
            self.messages.pop_front();
        }

        self.messages.push_back(AtcMessage {
            sent_at,
            text: text.to_owned(),
        });
    }

    /// Oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &AtcMessage> {
        self.messages.iter()
    }

    pub fn latest(&self) -> Option<&AtcMessage> {
        self.messages.back()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
impl SimulationElement for AtcLog {
    fn write(&self, writer: &mut SimulatorWriter) {
        writer.write_f64("ATC_MESSAGE_COUNT", self.messages.len() as f64);
    }
}
impl Default for AtcLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod atc_log_tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let log = AtcLog::new();

        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn keeps_messages_in_order_with_their_time() {
        let mut log = AtcLog::new();
        log.record(Duration::from_secs(1), "Cleared for takeoff");
        log.record(Duration::from_secs(90), "Climb flight level 100");

        let texts: Vec<_> = log.messages().map(|message| message.text()).collect();
        assert_eq!(texts, vec!["Cleared for takeoff", "Climb flight level 100"]);
        assert_eq!(log.latest().map(|m| m.sent_at()), Some(Duration::from_secs(90)));
    }

    #[test]
    fn drops_the_oldest_message_when_full() {
        let mut log = AtcLog::new();
        for i in 0..7 {
            log.record(Duration::from_secs(i), &format!("message {}", i));
        }

        assert_eq!(log.len(), AtcLog::CAPACITY);
        assert_eq!(log.messages().next().map(|m| m.text()), Some("message 2"));
        assert_eq!(log.latest().map(|m| m.text()), Some("message 6"));
    }
}

//! Per aircraft type performance data.
//!
//! The table is handed to the simulation already resolved; loading it from
//! wherever the host keeps its assets is the host's business.
use serde::Deserialize;
use thiserror::Error;
use uom::si::{f64::*, mass::kilogram, velocity::knot};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse aircraft type table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("aircraft type '{name}' is invalid: {reason}")]
    InvalidEntry { name: String, reason: &'static str },
    #[error("aircraft type '{0}' is defined more than once")]
    DuplicateType(String),
    #[error("unknown aircraft type '{0}'")]
    UnknownType(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AircraftType {
    pub name: String,
    pub max_speed_kts: f64,
    pub rotation_speed_kts: f64,
    pub fuel_capacity_kg: f64,
    pub acceleration_kts_per_sec: f64,
    pub turn_rate_deg_per_sec: f64,
    pub vertical_acceleration_fpm_per_sec: f64,
    /// Per engine.
    pub idle_fuel_flow_kg_per_sec: f64,
    /// Per engine.
    pub max_fuel_flow_kg_per_sec: f64,
    pub flaps_stages: u8,
}
impl AircraftType {
    pub fn max_speed(&self) -> Velocity {
        Velocity::new::<knot>(self.max_speed_kts)
    }

    pub fn rotation_speed(&self) -> Velocity {
        Velocity::new::<knot>(self.rotation_speed_kts)
    }

    pub fn fuel_capacity(&self) -> Mass {
        Mass::new::<kilogram>(self.fuel_capacity_kg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidEntry {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }

        let positive = [
            (self.max_speed_kts, "max speed must be positive"),
            (self.rotation_speed_kts, "rotation speed must be positive"),
            (self.fuel_capacity_kg, "fuel capacity must be positive"),
            (self.acceleration_kts_per_sec, "acceleration must be positive"),
            (self.turn_rate_deg_per_sec, "turn rate must be positive"),
            (
                self.vertical_acceleration_fpm_per_sec,
                "vertical acceleration must be positive",
            ),
        ];
        if let Some((_, reason)) = positive
            .iter()
            .find(|(value, _)| !(value.is_finite() && *value > 0.))
        {
            return Err(invalid(*reason));
        }

        if self.rotation_speed_kts > self.max_speed_kts {
            return Err(invalid("rotation speed exceeds max speed"));
        }

        if !(self.idle_fuel_flow_kg_per_sec.is_finite() && self.idle_fuel_flow_kg_per_sec >= 0.)
            || !self.max_fuel_flow_kg_per_sec.is_finite()
            || self.max_fuel_flow_kg_per_sec < self.idle_fuel_flow_kg_per_sec
        {
            return Err(invalid("fuel flow must satisfy 0 <= idle <= max"));
        }

        Ok(())
    }
}

pub struct AircraftTypeTable {
    types: Vec<AircraftType>,
}
impl AircraftTypeTable {
    /// The aircraft types available without loading any assets.
    pub fn builtin() -> Self {
        Self {
            types: vec![
                AircraftType {
                    name: "A320".to_owned(),
                    max_speed_kts: 350.,
                    rotation_speed_kts: 145.,
                    fuel_capacity_kg: 18_700.,
                    acceleration_kts_per_sec: 4.,
                    turn_rate_deg_per_sec: 3.,
                    vertical_acceleration_fpm_per_sec: 500.,
                    idle_fuel_flow_kg_per_sec: 0.1,
                    max_fuel_flow_kg_per_sec: 1.1,
                    flaps_stages: 4,
                },
                AircraftType {
                    name: "B737".to_owned(),
                    max_speed_kts: 340.,
                    rotation_speed_kts: 150.,
                    fuel_capacity_kg: 20_800.,
                    acceleration_kts_per_sec: 4.,
                    turn_rate_deg_per_sec: 3.,
                    vertical_acceleration_fpm_per_sec: 500.,
                    idle_fuel_flow_kg_per_sec: 0.11,
                    max_fuel_flow_kg_per_sec: 1.2,
                    flaps_stages: 5,
                },
                AircraftType {
                    name: "A330".to_owned(),
                    max_speed_kts: 330.,
                    rotation_speed_kts: 160.,
                    fuel_capacity_kg: 111_000.,
                    acceleration_kts_per_sec: 3.,
                    turn_rate_deg_per_sec: 2.5,
                    vertical_acceleration_fpm_per_sec: 400.,
                    idle_fuel_flow_kg_per_sec: 0.2,
                    max_fuel_flow_kg_per_sec: 2.6,
                    flaps_stages: 4,
                },
            ],
        }
    }

    /// Loads a JSON array of aircraft types, rejecting invalid or duplicate entries.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let types: Vec<AircraftType> = serde_json::from_str(json)?;

        for (index, aircraft_type) in types.iter().enumerate() {
            aircraft_type.validate()?;

            if types[..index]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&aircraft_type.name))
            {
                return Err(ConfigError::DuplicateType(aircraft_type.name.clone()));
            }
        }

        Ok(Self { types })
    }

    /// Looks up a type by name, ignoring case.
    pub fn get(&self, name: &str) -> Result<&AircraftType, ConfigError> {
        self.types
            .iter()
            .find(|aircraft_type| aircraft_type.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownType(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|aircraft_type| aircraft_type.name.as_str())
    }
}
impl Default for AircraftTypeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod aircraft_type_table_tests {
    use super::*;

    const VALID_JSON: &str = r#"[
        {
            "name": "C172",
            "max_speed_kts": 160,
            "rotation_speed_kts": 55,
            "fuel_capacity_kg": 150,
            "acceleration_kts_per_sec": 2,
            "turn_rate_deg_per_sec": 3,
            "vertical_acceleration_fpm_per_sec": 200,
            "idle_fuel_flow_kg_per_sec": 0.002,
            "max_fuel_flow_kg_per_sec": 0.01,
            "flaps_stages": 3
        }
    ]"#;

    #[test]
    fn builtin_table_contains_every_type() {
        let table = AircraftTypeTable::builtin();

        assert_eq!(table.names().collect::<Vec<_>>(), vec!["A320", "B737", "A330"]);
    }

    #[test]
    fn builtin_types_are_valid() {
        for aircraft_type in AircraftTypeTable::builtin().types.iter() {
            assert!(aircraft_type.validate().is_ok(), "{}", aircraft_type.name);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let table = AircraftTypeTable::builtin();

        assert_eq!(table.get("a320").map(|t| t.flaps_stages).ok(), Some(4));
    }

    #[test]
    fn unknown_type_is_an_error() {
        let table = AircraftTypeTable::builtin();

        assert!(matches!(
            table.get("Concorde"),
            Err(ConfigError::UnknownType(name)) if name == "Concorde"
        ));
    }

    #[test]
    fn loads_types_from_json() {
        let table = AircraftTypeTable::from_json(VALID_JSON).unwrap();

        let c172 = table.get("C172").unwrap();
        assert_eq!(c172.flaps_stages, 3);
        assert!((c172.fuel_capacity_kg - 150.).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            AircraftTypeTable::from_json("[{\"name\": \"A320\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn non_positive_capacity_is_rejected() {
        let json = VALID_JSON.replace("\"fuel_capacity_kg\": 150", "\"fuel_capacity_kg\": 0");

        assert!(matches!(
            AircraftTypeTable::from_json(&json),
            Err(ConfigError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn rotation_speed_above_max_speed_is_rejected() {
        let json = VALID_JSON.replace("\"rotation_speed_kts\": 55", "\"rotation_speed_kts\": 200");

        assert!(matches!(
            AircraftTypeTable::from_json(&json),
            Err(ConfigError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn duplicate_types_are_rejected() {
        let entry = VALID_JSON.trim().trim_start_matches('[').trim_end_matches(']');
        let json = format!("[{},{}]", entry, entry);

        assert!(matches!(
            AircraftTypeTable::from_json(&json),
            Err(ConfigError::DuplicateType(name)) if name == "C172"
        ));
    }

    #[test]
    fn errors_describe_the_problem() {
        let error = AircraftTypeTable::builtin().get("X").unwrap_err();

        assert_eq!(error.to_string(), "unknown aircraft type 'X'");
    }
}

use std::{error::Error, fs, path::PathBuf, time::Duration};

use cockpit::{
    autopilot::{AutopilotChannel, AutopilotTarget, LateralMode},
    flight::Control,
    flight_phase::FlightPhase,
    flight_plan::Waypoint,
    shared::Coordinates,
    AircraftTypeTable, FlightObserver, FlightSession, SystemSwitch,
};
use log::{info, warn};
use structopt::StructOpt;
use uom::si::{
    angle::degree,
    f64::*,
    length::{foot, nautical_mile},
    mass::kilogram,
    velocity::{foot_per_minute, knot},
};

/// Flies a scripted flight from a cold and dark aircraft to cruise.
#[derive(Debug, StructOpt)]
#[structopt(name = "cockpit")]
struct Opt {
    /// Aircraft type to fly
    #[structopt(short, long, default_value = "A320")]
    aircraft: String,

    /// JSON file with aircraft types to use instead of the built-in ones
    #[structopt(long, parse(from_os_str))]
    aircraft_table: Option<PathBuf>,

    /// Departure as "latitude,longitude"
    #[structopt(long, default_value = "51.4700,-0.4543", parse(try_from_str = parse_coordinates))]
    origin: Coordinates,

    /// Destination as "latitude,longitude"
    #[structopt(long, default_value = "47.4647,8.5492", parse(try_from_str = parse_coordinates))]
    destination: Coordinates,

    /// Cruise altitude in feet
    #[structopt(long, default_value = "24000")]
    cruise_altitude: f64,

    /// Minutes to fly after engaging the autopilot
    #[structopt(long, default_value = "20")]
    minutes: u64,

    /// Host frame interval in milliseconds
    #[structopt(long, default_value = "50")]
    frame_ms: u64,

    /// Log debug messages
    #[structopt(short, long)]
    verbose: bool,
}

fn parse_coordinates(value: &str) -> Result<Coordinates, String> {
    let mut parts = value.split(',').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(latitude), Some(longitude), None) => {
            let latitude: f64 = latitude.parse().map_err(|e| format!("{}", e))?;
            let longitude: f64 = longitude.parse().map_err(|e| format!("{}", e))?;
            Ok(Coordinates::new(latitude, longitude))
        }
        _ => Err(format!("expected \"latitude,longitude\", got \"{}\"", value)),
    }
}

struct ConsoleObserver;
impl FlightObserver for ConsoleObserver {
    fn on_engine_spool_changed(&mut self, running: bool) {
        println!("  engines {}", if running { "spooling up" } else { "spooling down" });
    }

    fn on_flameout(&mut self) {
        println!("  FLAMEOUT");
    }

    fn on_autopilot_channel_changed(&mut self, channel: AutopilotChannel, engaged: bool) {
        println!(
            "  {:?} {}",
            channel,
            if engaged { "engaged" } else { "disengaged" }
        );
    }

    fn on_flight_phase_changed(&mut self, phase: FlightPhase) {
        println!("  phase: {}", phase);
    }

    fn on_waypoint_sequenced(&mut self, waypoint: &Waypoint) {
        println!("  passed {}", waypoint.ident());
    }
}

/// Feeds host frames to the session, like a browser animation frame loop would.
struct FrameDriver {
    timestamp_ms: f64,
    frame_ms: f64,
}
impl FrameDriver {
    fn new(frame_ms: u64) -> Self {
        Self {
            timestamp_ms: 0.,
            frame_ms: frame_ms.max(1) as f64,
        }
    }

    /// Runs frames until `condition` holds or `limit` simulated time passed.
    /// Returns whether the condition was met.
    fn run_until<F: Fn(&FlightSession) -> bool>(
        &mut self,
        session: &mut FlightSession,
        limit: Duration,
        condition: F,
    ) -> bool {
        let start = session.elapsed();
        while !condition(session) {
            if session.elapsed() - start >= limit {
                return false;
            }

            self.timestamp_ms += self.frame_ms;
            session.frame(self.timestamp_ms);
        }

        true
    }

    fn run_for(&mut self, session: &mut FlightSession, duration: Duration) {
        let start = session.elapsed();
        self.run_until(session, duration, |session| {
            session.elapsed() - start >= duration
        });
    }
}

fn print_state(session: &FlightSession) {
    let state = session.state();
    let kinematics = state.kinematics();
    println!(
        "[{:>5.0}s] {:<14} TAS {:>5.1} kt  ALT {:>7.0} ft  VS {:>6.0} fpm  \
         HDG {:>5.1}  FUEL {:>7.0} kg  DIST {:>6.1} NM",
        session.elapsed().as_secs_f64(),
        session.flight_phase().to_string(),
        kinematics.true_airspeed().get::<knot>(),
        kinematics.altitude().get::<foot>(),
        kinematics.vertical_speed().get::<foot_per_minute>(),
        kinematics.heading().get::<degree>(),
        state.fuel().quantity().get::<kilogram>(),
        session
            .flight_plan()
            .remaining_distance(kinematics.position())
            .get::<nautical_mile>()
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    let mut builder = env_logger::Builder::from_default_env();
    if opt.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let table = match &opt.aircraft_table {
        Some(path) => AircraftTypeTable::from_json(&fs::read_to_string(path)?)?,
        None => AircraftTypeTable::builtin(),
    };
    let aircraft = table.get(&opt.aircraft)?;

    let mut session = FlightSession::init_flight(
        aircraft,
        aircraft.fuel_capacity(),
        opt.origin,
        opt.destination,
    );
    session.add_observer(Box::new(ConsoleObserver));
    let mut driver = FrameDriver::new(opt.frame_ms);

    println!("Cockpit preparation");
    for switch in &[
        SystemSwitch::Battery,
        SystemSwitch::ApuMaster,
        SystemSwitch::ApuStart,
    ] {
        session.toggle_system(*switch);
    }
    if !driver.run_until(&mut session, Duration::from_secs(60), |s| s.apu_is_available()) {
        return Err("the APU did not become available".into());
    }
    print_state(&session);

    println!("Engine start");
    for switch in &[
        SystemSwitch::ApuBleed,
        SystemSwitch::FuelPump1,
        SystemSwitch::FuelPump2,
        SystemSwitch::Ignition,
        SystemSwitch::EngineMaster1,
        SystemSwitch::EngineMaster2,
    ] {
        session.toggle_system(*switch);
    }
    driver.run_for(&mut session, Duration::from_secs(20));
    print_state(&session);

    println!("Takeoff");
    session.transmit_atc("Cleared for takeoff");
    session.set_control(Control::Flaps, 1.);
    session.set_control(Control::Throttle, 1.);
    let rotation_speed = aircraft.rotation_speed();
    driver.run_until(&mut session, Duration::from_secs(120), |s| {
        s.state().kinematics().true_airspeed() >= rotation_speed
    });
    session.set_control(Control::Trim, 0.6);
    driver.run_until(&mut session, Duration::from_secs(120), |s| {
        s.state().kinematics().altitude() >= Length::new::<foot>(1_500.)
    });
    session.set_control(Control::Gear, 0.);
    session.set_control(Control::Flaps, 0.);
    print_state(&session);

    println!("Climb");
    session.set_autopilot_target(AutopilotTarget::Altitude, opt.cruise_altitude);
    session.set_autopilot_target(AutopilotTarget::Speed, 280.);
    session.set_autopilot_target(AutopilotTarget::VerticalSpeed, 2_000.);
    session.set_lateral_mode(LateralMode::Lnav);
    if !session.engage_autopilot(AutopilotChannel::One) {
        warn!("Autopilot did not engage, continuing manually.");
    }
    session.transmit_atc(&format!("Climb and maintain {:.0} feet", opt.cruise_altitude));

    for _ in 0..opt.minutes {
        driver.run_for(&mut session, Duration::from_secs(60));
        print_state(&session);
    }

    info!("Demo flight finished after {:?}.", session.elapsed());
    println!("ATC log");
    for message in session.atc_log().messages() {
        println!("  [{:>5.0}s] {}", message.sent_at().as_secs_f64(), message.text());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::assert_about_eq;

    #[test]
    fn coordinates_parse_from_latitude_and_longitude() {
        let coordinates = parse_coordinates("47.4647, 8.5492").unwrap();

        assert_about_eq!(coordinates.latitude(), 47.4647);
        assert_about_eq!(coordinates.longitude(), 8.5492);
    }

    #[test]
    fn coordinates_need_exactly_two_numbers() {
        assert!(parse_coordinates("47.4647").is_err());
        assert!(parse_coordinates("1,2,3").is_err());
        assert!(parse_coordinates("north,east").is_err());
    }
}

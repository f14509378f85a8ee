use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{error, info};

use ascent_sim::compare::{self, agreement, CompareOptions};
use ascent_sim::dynamics::State;
use ascent_sim::guidance::{self, GuidanceEvent, NullClock, RealClock, ScriptedVehicle};
use ascent_sim::io::json::FlightSummary;
use ascent_sim::io::{csv as csv_io, json as json_io};
use ascent_sim::sim::{self, EventKind};
use ascent_sim::telemetry::CsvRecorder;
use ascent_sim::vehicle::presets;
use ascent_sim::MissionConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Launch vehicle ascent: trajectory model, flight comparison and ascent guidance replay.")]
struct Cli {
    /// Mission configuration (JSON). Fields left out keep the preset values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Integrate the ascent and print a flight report.
    Simulate {
        /// Analysis horizon in seconds (defaults to the burn time).
        #[arg(long)]
        horizon: Option<f64>,
        /// Output step in seconds.
        #[arg(long)]
        dt: Option<f64>,
        /// Write the trajectory as CSV.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write a JSON flight summary.
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Compare the model against a recorded telemetry CSV.
    Compare {
        recorded: PathBuf,
        #[arg(long, default_value_t = 47_000.0)]
        cutoff: f64,
        /// Write the aligned series as JSON for plotting.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fly the ascent controller against a scripted vehicle.
    Replay {
        script: PathBuf,
        #[arg(long, default_value = "ksp_flight_data.csv")]
        telemetry: PathBuf,
        /// Pace the loop in real time instead of replaying at full speed.
        #[arg(long)]
        realtime: bool,
    },
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => MissionConfig::from_json_file(path)?,
        None => presets::artemis_kerbin(),
    };

    match cli.command {
        Command::Simulate { horizon, dt, out, summary } => {
            if let Some(h) = horizon {
                config.sim.horizon = Some(h);
            }
            if let Some(dt) = dt {
                config.sim.dt = dt;
            }
            config.validate()?;
            let trajectory = sim::simulate(&config)?;
            print_flight_report(&config, &trajectory);
            if let Some(path) = out {
                csv_io::write_trajectory_file(&path, &trajectory)?;
                println!("  Trajectory written to {}", path.display());
            }
            if let Some(path) = summary {
                if let Some(s) = FlightSummary::from_trajectory(&trajectory, &config) {
                    json_io::write_summary_file(&path, &config, &s)?;
                    println!("  Summary written to {}", path.display());
                }
            }
        }
        Command::Compare { recorded, cutoff, out } => {
            let flight = csv_io::read_recorded_flight_file(&recorded)?;
            let trajectory = sim::simulate(&config)?;
            let cmp = compare::compare(&trajectory, &flight, CompareOptions { downrange_cutoff: cutoff });
            print_comparison(&config, &cmp);
            if let Some(path) = out {
                let file = std::fs::File::create(&path)?;
                serde_json::to_writer_pretty(file, &cmp)?;
                println!("  Aligned series written to {}", path.display());
            }
        }
        Command::Replay { script, telemetry, realtime } => {
            let mut vehicle = ScriptedVehicle::from_csv_path(&script)?;
            info!("replaying {} frames from {}", vehicle.frames().len(), script.display());
            let mut recorder = CsvRecorder::create(&telemetry)?;
            let report = if realtime {
                guidance::run_ascent(&config.guidance, &mut vehicle, &mut RealClock, &mut recorder)?
            } else {
                guidance::run_ascent(&config.guidance, &mut vehicle, &mut NullClock::default(), &mut recorder)?
            };
            print_mission_report(&config, &report);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

fn banner(title: &str) {
    println!();
    println!("====================================================================");
    println!("  {}", title);
    println!("====================================================================");
    println!();
}

fn section(title: &str) {
    println!("  {}", title);
    println!("  ──────────────────────────────────────────────────────────────────");
}

fn print_flight_report(config: &MissionConfig, trajectory: &[State]) {
    let v = &config.vehicle;
    banner(&format!("ASCENT SIMULATION — {}", config.name));

    section("Vehicle Parameters");
    println!(
        "  Liftoff mass:  {:>10.0} kg    Propellant:   {:>10.0} kg",
        v.initial_mass, v.propellant_mass
    );
    println!(
        "  Dry mass:      {:>10.0} kg    Mass flow:    {:>10.1} kg/s",
        v.dry_mass(),
        v.mass_flow()
    );
    println!(
        "  Thrust:        {:>10.0} N  -> {:>10.0} N over {:.0} s",
        v.initial_thrust, v.final_thrust, v.burn_time
    );
    println!("  Liftoff TWR:   {:>10.2}", v.liftoff_twr(&config.body));
    println!();

    section("Flight Events");
    for ev in sim::detect_events(trajectory, config) {
        let name = match ev.kind {
            EventKind::Burnout => "BURNOUT".to_string(),
            EventKind::Apogee => "APOGEE".to_string(),
            EventKind::Altitude { label, .. } => label.to_uppercase(),
        };
        println!(
            "  {:<20} t={:>6.1}s   alt={:>8.0}m   x={:>9.0}m   vel={:>7.1}m/s   fpa={:>5.1}°",
            name,
            ev.time,
            ev.state.altitude(),
            ev.state.downrange(),
            ev.state.speed(),
            ev.state.flight_path_angle().to_degrees()
        );
    }
    println!();

    if let Some(s) = FlightSummary::from_trajectory(trajectory, config) {
        section("Performance Summary");
        println!("  Max altitude:  {:>10.0} m   ({:.2} km)", s.max_altitude_m, s.max_altitude_m / 1000.0);
        println!("  Max speed:     {:>10.1} m/s", s.max_speed);
        println!("  Max q:         {:>10.0} Pa at t={:.1} s", s.max_q, s.max_q_time);
        println!("  Final mass:    {:>10.0} kg", s.final_mass);
        println!(
            "  Coast orbit:   apoapsis {:.0} m, periapsis {:.0} m",
            s.orbit.apoapsis, s.orbit.periapsis
        );
        println!();
    }

    section("Trajectory");
    println!(
        "  {:>7}  {:>10}  {:>10}  {:>9}  {:>10}",
        "t (s)", "x (m)", "alt (m)", "vel (m/s)", "mass(kg)"
    );
    println!("  {}", "─".repeat(56));
    let sample_interval = (trajectory.len() / 30).max(1);
    for (i, s) in trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>10.1}  {:>10.1}  {:>9.1}  {:>10.1}",
            s.time, s.downrange(), s.altitude(), s.speed(), s.mass
        );
    }
    println!();
    println!("  Simulation: {} output points, dt={} s", trajectory.len(), config.sim.dt);
    println!("====================================================================");
    println!();
}

fn print_comparison(config: &MissionConfig, cmp: &compare::Comparison) {
    banner(&format!("MODEL vs FLIGHT — {}", config.name));
    section("Agreement (recorded minus model)");
    for (name, pair, unit) in [
        ("Altitude", &cmp.altitude, "m"),
        ("Velocity", &cmp.velocity, "m/s"),
        ("Profile", &cmp.profile, "m"),
    ] {
        match agreement(pair) {
            Some(a) => println!(
                "  {:<10} rms={:>9.1} {:<4} max={:>9.1} {:<4} ({} points)",
                name, a.rms, unit, a.max_abs, unit, a.points
            ),
            None => println!("  {:<10} no overlapping points", name),
        }
    }
    println!();
}

fn print_mission_report(config: &MissionConfig, report: &guidance::MissionReport) {
    banner(&format!("ASCENT GUIDANCE — {}", config.name));
    section("Events");
    for (t, ev) in &report.events {
        let text = match ev {
            GuidanceEvent::Liftoff { thrust, vacuum_thrust } => {
                format!("LIFTOFF (thrust {:.0} N, vacuum {:.0} N)", thrust, vacuum_thrust)
            }
            GuidanceEvent::BoosterJettison => "BOOSTER JETTISON".into(),
            GuidanceEvent::LasJettison => "LAS JETTISON".into(),
            GuidanceEvent::CoreSeparation => "CORE SEPARATION".into(),
            GuidanceEvent::EngineActivated(title) => format!("ENGINE ON: {}", title),
            GuidanceEvent::EngineNotFound(title) => format!("ENGINE NOT FOUND: {}", title),
            GuidanceEvent::OrbitReached { apoapsis, periapsis } => {
                format!("ORBIT (ap {:.0} m, pe {:.0} m)", apoapsis, periapsis)
            }
        };
        println!("  t={:>7.1}s   {}", t, text);
    }
    println!();
    println!("  Control loop: {} ticks, {:.1} s", report.ticks, report.elapsed);
    println!("====================================================================");
    println!();
}

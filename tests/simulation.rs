use approx::assert_relative_eq;

use ascent_sim::compare::{agreement, compare, CompareOptions, RecordedFlight};
use ascent_sim::guidance::{run_ascent, GuidanceParams, NullClock, ScriptFrame, ScriptedVehicle};
use ascent_sim::io::csv::{read_recorded_flight_file, write_trajectory_file};
use ascent_sim::io::json::FlightSummary;
use ascent_sim::sim::{simulate, simulate_on, time_grid};
use ascent_sim::telemetry::CsvRecorder;
use ascent_sim::vehicle::presets;
use ascent_sim::MissionConfig;

fn coarse() -> MissionConfig {
    let mut cfg = presets::artemis_kerbin();
    cfg.sim.dt = 0.5;
    cfg
}

#[test]
fn preset_burnout_state() {
    let cfg = coarse();
    let traj = simulate(&cfg).unwrap();
    let burnout = traj.last().unwrap();
    assert_eq!(burnout.time, 135.0);
    assert!((40_000.0..50_000.0).contains(&burnout.altitude()), "alt {}", burnout.altitude());
    assert!((95_000.0..125_000.0).contains(&burnout.downrange()), "x {}", burnout.downrange());
    assert!((2_400.0..2_900.0).contains(&burnout.speed()), "v {}", burnout.speed());
}

#[test]
fn output_grid_does_not_change_the_solution() {
    let cfg = coarse();
    let coarse_traj = simulate(&cfg).unwrap();
    let sparse = simulate_on(&cfg, &[30.0, 90.0, 135.0]).unwrap();
    for s in &sparse {
        let dense = coarse_traj.iter().find(|d| d.time == s.time).unwrap();
        assert_relative_eq!(s.altitude(), dense.altitude(), max_relative = 1e-2);
        assert_relative_eq!(s.speed(), dense.speed(), max_relative = 1e-2);
    }
}

#[test]
fn model_compared_with_itself_agrees() {
    let cfg = coarse();
    let traj = simulate(&cfg).unwrap();
    let recorded = RecordedFlight::new(
        traj.iter().step_by(10).map(|s| s.time).collect(),
        traj.iter().step_by(10).map(|s| s.altitude()).collect(),
        traj.iter().step_by(10).map(|s| s.speed()).collect(),
        traj.iter().step_by(10).map(|s| s.downrange()).collect(),
    )
    .unwrap();
    let cmp = compare(&traj, &recorded, CompareOptions::default());
    let alt = agreement(&cmp.altitude).unwrap();
    assert!(alt.max_abs < 1e-6);
    assert_eq!(alt.points, recorded.len());
    // The model profile stops short of the cutoff; the recorded one does not.
    assert!(cmp.profile.model.last().unwrap()[0] < 47_000.0);
    assert!(cmp.profile.recorded.last().unwrap()[0] > 47_000.0);
}

#[test]
fn json_config_drives_the_simulation() {
    let cfg = MissionConfig::from_json_str(
        r#"{ "vehicle": { "burn_time": 60.0 }, "sim": { "dt": 1.0, "horizon": 30.0 } }"#,
    )
    .unwrap();
    let traj = simulate(&cfg).unwrap();
    assert_eq!(traj.len(), time_grid(30.0, 1.0).len());
    // Faster propellant flow than the preset.
    assert!(traj.last().unwrap().mass < presets::artemis_kerbin().vehicle.mass_at(30.0));
}

#[test]
fn trajectory_and_summary_files() {
    let cfg = coarse();
    let traj = simulate(&cfg).unwrap();
    let dir = std::env::temp_dir();
    let path = dir.join(format!("ascent-sim-trajectory-{}.csv", std::process::id()));
    write_trajectory_file(&path, &traj).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), traj.len() + 1);
    std::fs::remove_file(&path).ok();

    let summary = FlightSummary::from_trajectory(&traj, &cfg).unwrap();
    assert_eq!(summary.burnout_time, 135.0);
    assert!(summary.max_q > 0.0);
    assert!(summary.max_q_time > 0.0 && summary.max_q_time < 135.0);
    assert!(summary.orbit.is_bound());
    assert!(summary.orbit.periapsis <= summary.burnout_altitude_m + 1.0);
    assert!(summary.orbit.apoapsis >= summary.burnout_altitude_m - 1.0);
}

#[test]
fn recorded_guidance_telemetry_feeds_the_comparator() {
    // Replay the model's own altitude and speed through the controller.
    let cfg = coarse();
    let traj = simulate(&cfg).unwrap();
    let mut frames: Vec<ScriptFrame> = traj
        .iter()
        .map(|s| ScriptFrame {
            time: s.time,
            altitude: s.altitude(),
            speed: s.speed(),
            vertical_speed: s.vel.y,
            horizontal_speed: s.vel.x,
            ..ScriptFrame::default()
        })
        .collect();
    if let Some(last) = frames.last_mut() {
        last.periapsis = 136_000.0;
    }

    let path = std::env::temp_dir().join(format!("ascent-sim-telemetry-{}.csv", std::process::id()));
    let mut recorder = CsvRecorder::create(&path).unwrap();
    let mut vehicle = ScriptedVehicle::new(frames);
    let report = run_ascent(&GuidanceParams::default(), &mut vehicle, &mut NullClock::default(), &mut recorder).unwrap();
    assert_eq!(report.ticks, traj.len() - 1);
    drop(recorder);

    let recorded = read_recorded_flight_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(recorded.len(), report.ticks);

    let cmp = compare(&traj, &recorded, CompareOptions::default());
    let vel = agreement(&cmp.velocity).unwrap();
    assert!(vel.max_abs < 1e-6, "max residual {}", vel.max_abs);
}

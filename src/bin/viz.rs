use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use ascent_sim::compare::{self, CompareOptions, Comparison, RecordedFlight, SeriesPair};
use ascent_sim::io::csv::read_recorded_flight_file;
use ascent_sim::sim;
use ascent_sim::vehicle::presets;
use ascent_sim::MissionConfig;

/// Usage: `ascent-viz [recorded.csv] [mission.json]`
fn main() -> eframe::Result {
    pretty_env_logger::init();
    let mut args = std::env::args().skip(1);
    let recorded_path = args.next();
    let config = match args.next() {
        Some(path) => MissionConfig::from_json_file(&path).unwrap_or_else(|e| {
            log::error!("{}; using the preset mission", e);
            presets::artemis_kerbin()
        }),
        None => presets::artemis_kerbin(),
    };

    let trajectory = sim::simulate(&config).unwrap_or_else(|e| {
        log::error!("{}", e);
        Vec::new()
    });
    let recorded = match recorded_path {
        Some(path) => read_recorded_flight_file(&path).unwrap_or_else(|e| {
            log::error!("{}", e);
            RecordedFlight::default()
        }),
        None => RecordedFlight::default(),
    };
    let comparison = if recorded.is_empty() {
        // Nothing to align against: show the whole model run.
        model_only(&trajectory, CompareOptions::default())
    } else {
        compare::compare(&trajectory, &recorded, CompareOptions::default())
    };

    let app = AscentViz { name: config.name.clone(), comparison };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native("Ascent: model vs flight", options, Box::new(|_| Ok(Box::new(app))))
}

fn model_only(trajectory: &[ascent_sim::dynamics::State], opts: CompareOptions) -> Comparison {
    let pair = |f: &dyn Fn(&ascent_sim::dynamics::State) -> [f64; 2]| SeriesPair {
        model: trajectory.iter().map(f).collect(),
        recorded: Vec::new(),
    };
    let mut profile = pair(&|s| [s.downrange(), s.altitude()]);
    if let Some(i) = profile.model.iter().position(|p| p[0] >= opts.downrange_cutoff) {
        profile.model.truncate(i);
    }
    Comparison {
        altitude: pair(&|s| [s.time, s.altitude()]),
        velocity: pair(&|s| [s.time, s.speed()]),
        profile,
    }
}

struct AscentViz {
    name: String,
    comparison: Comparison,
}

fn series_plot(ui: &mut egui::Ui, id: &str, pair: &SeriesPair, x_label: &str, width: f32, height: f32) {
    let step = (pair.model.len() / 2000).max(1);
    let model: PlotPoints = pair.model.iter().step_by(step).copied().collect();
    let recorded: PlotPoints = pair.recorded.iter().copied().collect();
    Plot::new(id)
        .width(width)
        .height(height)
        .x_axis_label(x_label)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("Model", model));
            plot_ui.points(Points::new("Flight", recorded).radius(2.0));
        });
}

impl eframe::App for AscentViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Mission: {}", self.name));
            let scores: Vec<String> = [
                ("altitude", &self.comparison.altitude),
                ("velocity", &self.comparison.velocity),
                ("profile", &self.comparison.profile),
            ]
            .iter()
            .filter_map(|(name, pair)| {
                compare::agreement(pair).map(|a| format!("{} rms {:.1}", name, a.rms))
            })
            .collect();
            if scores.is_empty() {
                ui.label("No recorded flight loaded");
            } else {
                ui.label(scores.join("  |  "));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Altitude (m)");
                    series_plot(ui, "altitude", &self.comparison.altitude, "Time (s)", half_w, half_h);
                });
                ui.vertical(|ui| {
                    ui.label("Velocity (m/s)");
                    series_plot(ui, "velocity", &self.comparison.velocity, "Time (s)", half_w, half_h);
                });
            });

            ui.vertical(|ui| {
                ui.label("Trajectory Profile (m)");
                series_plot(ui, "profile", &self.comparison.profile, "Downrange (m)", available.x, half_h);
            });
        });
    }
}

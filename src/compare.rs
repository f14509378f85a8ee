use serde::Serialize;

use crate::dynamics::state::State;
use crate::errors::DatasetError;
use crate::telemetry::TelemetrySample;

// ---------------------------------------------------------------------------
// Recorded flight dataset
// ---------------------------------------------------------------------------

/// A previously flown ascent: parallel series of equal length, read whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFlight {
    time: Vec<f64>,
    altitude: Vec<f64>,
    velocity: Vec<f64>,
    displacement: Vec<f64>,
}

impl RecordedFlight {
    pub fn new(
        time: Vec<f64>,
        altitude: Vec<f64>,
        velocity: Vec<f64>,
        displacement: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        let n = time.len();
        if altitude.len() != n || velocity.len() != n || displacement.len() != n {
            return Err(DatasetError::Malformed(format!(
                "series lengths differ: time {}, altitude {}, velocity {}, displacement {}",
                n,
                altitude.len(),
                velocity.len(),
                displacement.len()
            )));
        }
        if time.windows(2).any(|w| w[1] < w[0]) {
            return Err(DatasetError::Malformed("time is not non-decreasing".into()));
        }
        Ok(Self { time, altitude, velocity, displacement })
    }

    /// Collect a dataset from recorder rows.
    pub fn from_samples(samples: &[TelemetrySample]) -> Result<Self, DatasetError> {
        Self::new(
            samples.iter().map(|s| s.time).collect(),
            samples.iter().map(|s| s.altitude).collect(),
            samples.iter().map(|s| s.total_speed).collect(),
            samples.iter().map(|s| s.displacement).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn altitude(&self) -> &[f64] {
        &self.altitude
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    pub fn displacement(&self) -> &[f64] {
        &self.displacement
    }
}

// ---------------------------------------------------------------------------
// Aligned series
// ---------------------------------------------------------------------------

/// Model and recorded points of one plot, `[x, y]` each.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesPair {
    pub model: Vec<[f64; 2]>,
    pub recorded: Vec<[f64; 2]>,
}

/// Everything a renderer needs to overlay model and flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    /// Altitude (m) against time (s).
    pub altitude: SeriesPair,
    /// Total speed (m/s) against time (s).
    pub velocity: SeriesPair,
    /// Altitude (m) against downrange distance (m).
    pub profile: SeriesPair,
}

#[derive(Debug, Clone, Copy)]
pub struct CompareOptions {
    /// Model profile samples at or beyond this downrange distance are dropped.
    pub downrange_cutoff: f64,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { downrange_cutoff: 47_000.0 }
    }
}

/// Align a simulated trajectory with a recorded flight.
///
/// Time series are cut to the time range both cover. The model profile is
/// cropped at the first sample reaching `downrange_cutoff`; the recorded
/// profile is passed through whole.
pub fn compare(trajectory: &[State], recorded: &RecordedFlight, opts: CompareOptions) -> Comparison {
    let (start, end) = match (trajectory.first(), trajectory.last(), recorded.time.first(), recorded.time.last()) {
        (Some(m0), Some(m1), Some(&r0), Some(&r1)) => (m0.time.max(r0), m1.time.min(r1)),
        _ => (f64::INFINITY, f64::NEG_INFINITY),
    };
    let in_range = |t: f64| t >= start && t <= end;

    let model_window: Vec<&State> = trajectory.iter().filter(|s| in_range(s.time)).collect();
    let recorded_idx: Vec<usize> = (0..recorded.len()).filter(|&i| in_range(recorded.time[i])).collect();

    let altitude = SeriesPair {
        model: model_window.iter().map(|s| [s.time, s.altitude()]).collect(),
        recorded: recorded_idx.iter().map(|&i| [recorded.time[i], recorded.altitude[i]]).collect(),
    };
    let velocity = SeriesPair {
        model: model_window.iter().map(|s| [s.time, s.speed()]).collect(),
        recorded: recorded_idx.iter().map(|&i| [recorded.time[i], recorded.velocity[i]]).collect(),
    };
    let profile = SeriesPair {
        model: trajectory
            .iter()
            .take_while(|s| s.downrange() < opts.downrange_cutoff)
            .map(|s| [s.downrange(), s.altitude()])
            .collect(),
        recorded: recorded
            .displacement
            .iter()
            .zip(&recorded.altitude)
            .map(|(&x, &y)| [x, y])
            .collect(),
    };

    Comparison { altitude, velocity, profile }
}

// ---------------------------------------------------------------------------
// Agreement score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Agreement {
    pub rms: f64,
    pub max_abs: f64,
    /// Recorded points that fell inside the model's x range.
    pub points: usize,
}

/// Residuals of the recorded points against the linearly interpolated model.
/// `None` when no recorded point lies within the model's x range. The model
/// series must be sorted by x.
pub fn agreement(pair: &SeriesPair) -> Option<Agreement> {
    let mut sum_sq = 0.0;
    let mut max_abs: f64 = 0.0;
    let mut points = 0;
    for &[x, y] in &pair.recorded {
        let Some(model_y) = interpolate(&pair.model, x) else {
            continue;
        };
        let r = y - model_y;
        sum_sq += r * r;
        max_abs = max_abs.max(r.abs());
        points += 1;
    }
    (points > 0).then(|| Agreement { rms: (sum_sq / points as f64).sqrt(), max_abs, points })
}

fn interpolate(series: &[[f64; 2]], x: f64) -> Option<f64> {
    let first = series.first()?;
    let last = series.last()?;
    if x < first[0] || x > last[0] {
        return None;
    }
    let i = series.partition_point(|p| p[0] < x);
    if i == 0 {
        return Some(first[1]);
    }
    let [x0, y0] = series[i - 1];
    let [x1, y1] = series[i];
    if x1 == x0 {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

pub mod recorder;
pub mod sample;

pub use recorder::{CsvRecorder, MemoryRecorder, TelemetrySink};
pub use sample::{TelemetrySample, HEADERS};

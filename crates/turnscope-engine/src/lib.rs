// Engine module - core computation (segmentation, aggregation, binning, variance)
// This layer sits between raw records (types) and orchestration (runtime)

pub mod binning;
pub mod session;
pub mod stats;
pub mod variance;

pub use binning::{
    DayHourScheme, FilteredBins, HourOfDayScheme, KeyScheme, TraceWindowScheme, bin_sessions,
    dense_hours, diurnal_variation, filter_sparse_bins,
};
pub use session::{SessionSegmenter, aggregate_sessions};
pub use variance::{DayHourGrid, decompose, diurnal_profile};

use turnscope_types::{Record, Result, Segmentation};

// Façade API - stable entry points for the runtime layer

/// Segment records into sessions with the given idle-gap threshold (seconds)
pub fn segment(records: &[Record], gap_threshold: f64) -> Result<Segmentation> {
    SessionSegmenter::new(gap_threshold)?.segment(records)
}

pub mod binner;
pub mod filter;
pub mod keys;

pub use binner::{bin_sessions, dense_hours, diurnal_variation};
pub use filter::{FilteredBins, filter_sparse_bins};
pub use keys::{DayHourScheme, HourOfDayScheme, KeyScheme, TraceWindowScheme};

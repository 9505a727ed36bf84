//! Intra-day vs inter-day variance of a metric laid out on a day x hour grid.

pub mod decompose;
pub mod grid;

pub use decompose::{decompose, diurnal_profile};
pub use grid::DayHourGrid;

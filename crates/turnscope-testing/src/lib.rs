//! Testing infrastructure for turnscope integration tests.
//!
//! - `TraceWorld`: isolated temp directory holding a trace CSV and config
//! - `assertions`: tolerance and JSON-shape assertions
//! - `fixtures`: deterministic synthetic traces and day x hour grids

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::TraceWorld;

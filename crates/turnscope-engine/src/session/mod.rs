pub mod aggregate;
pub mod segmenter;

pub use aggregate::aggregate_sessions;
pub use segmenter::SessionSegmenter;

pub mod bin;
pub mod config;
pub mod error;
pub mod metric;
pub mod record;
pub mod session;
pub mod sweep;
pub mod variance;

pub use bin::*;
pub use config::*;
pub use error::{Error, Result};
pub use metric::*;
pub use record::*;
pub use session::*;
pub use sweep::*;
pub use variance::*;

pub mod config;
pub mod error;
pub mod types;

pub use config::GuardConfig;
pub use error::{Result, WardenError};

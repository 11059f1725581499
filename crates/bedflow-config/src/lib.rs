//! bedflow-config
//!
//! Persistent analysis preferences: target band, forecast tuning, simulator defaults.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, SimulationDefaults, CONFIG_KEYS};

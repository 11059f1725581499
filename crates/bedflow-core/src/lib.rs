//! bedflow-core
//!
//! Occupancy analytics services for bedflow.
//! Depends on bedflow-domain. No CLI, no terminal I/O, no file format parsing.

pub mod aggregation_service;
pub mod compare_service;
pub mod descriptive_service;
pub mod error;
mod forecast_model;
pub mod forecast_service;
pub mod metrics_service;
pub mod public_api;
pub mod report_service;
pub mod selection_service;
pub mod simulation_service;
pub mod storage;
pub mod time;

pub use aggregation_service::*;
pub use compare_service::*;
pub use descriptive_service::*;
pub use error::CoreError;
pub use forecast_service::*;
pub use metrics_service::*;
pub use report_service::*;
pub use selection_service::*;
pub use simulation_service::*;
pub use storage::*;
pub use time::*;

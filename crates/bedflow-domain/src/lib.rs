//! bedflow-domain
//!
//! Pure domain models (movement records, aggregates, metrics, forecasts).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod aggregate;
pub mod common;
pub mod dataset;
pub mod descriptive;
pub mod forecast;
pub mod metrics;
pub mod record;
pub mod selection;

pub use aggregate::*;
pub use common::*;
pub use dataset::*;
pub use descriptive::*;
pub use forecast::*;
pub use metrics::*;
pub use record::*;
pub use selection::*;

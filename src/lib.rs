#![doc(test(attr(deny(warnings))))]

//! bedflow turns daily sector bed-movement tables into occupancy scorecards,
//! prior-year comparisons and short-horizon occupancy forecasts.

pub mod cli;
pub mod core;
pub mod errors;
pub mod utils;

pub use bedflow_config as config;
pub use bedflow_core as services;
pub use bedflow_domain as domain;

/// Initializes global tracing; later calls are no-ops.
pub fn init() {
    utils::init_tracing();
}

pub mod dataset_manager;

pub use dataset_manager::{DatasetManager, LoadMetadata};

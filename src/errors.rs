use bedflow_config::ConfigError;
use bedflow_core::CoreError;
use bedflow_domain::MonthRefError;
use thiserror::Error;

/// Unified error type for dataset, analysis and configuration failures.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dataset not loaded")]
    DatasetNotLoaded,
    #[error("Could not read dataset: {0}")]
    Dataset(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DatasetNotLoaded => AppError::DatasetNotLoaded,
            CoreError::Io(err) => AppError::Storage(err.to_string()),
            CoreError::Validation(message) | CoreError::InvalidOperation(message) => {
                AppError::InvalidInput(message)
            }
            other @ (CoreError::MissingColumn(_)
            | CoreError::InvalidRow { .. }
            | CoreError::Malformed(_)) => AppError::Dataset(other.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => AppError::Storage(io.to_string()),
            ConfigError::Serde(message) => AppError::Config(message),
            other @ (ConfigError::UnknownKey(_) | ConfigError::InvalidValue { .. }) => {
                AppError::InvalidInput(other.to_string())
            }
        }
    }
}

impl From<MonthRefError> for AppError {
    fn from(err: MonthRefError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(AppError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

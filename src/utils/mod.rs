pub mod build_info;

use std::{env, path::PathBuf, sync::Once};

const DEFAULT_DIR_NAME: &str = ".bedflow";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber, writing to stderr so command output stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
            .add_directive("bedflow=info".parse().unwrap_or_else(|_| LevelFilter::INFO.into()));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
        tracing::debug!("bedflow tracing initialized");
    });
}

/// Returns the application data directory, defaulting to `~/.bedflow`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BEDFLOW_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

use bedflow_core::time::{Clock, FixedClock};
use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::CliError;

/// Environment variable pinning "today" for reproducible sessions.
pub const TODAY_ENV: &str = "BEDFLOW_TODAY";

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// `BEDFLOW_TODAY=YYYY-MM-DD` yields a fixed clock, otherwise the system clock.
pub fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match std::env::var(TODAY_ENV) {
        Ok(raw) => {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                CliError::Input(format!("{TODAY_ENV} must be YYYY-MM-DD, got `{raw}`"))
            })?;
            Ok(Box::new(FixedClock(date)))
        }
        Err(_) => Ok(Box::new(SystemClock)),
    }
}

use bedflow_domain::{ForecastOptions, TargetRange, INPATIENT_ORIGIN};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr};

use crate::ConfigError;

/// Stores user-configurable analysis preferences and session metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub targets: TargetRange,
    #[serde(default)]
    pub forecast: ForecastOptions,
    #[serde(default)]
    pub simulation: SimulationDefaults,
    /// Origin label that marks inpatient rows in loaded tables.
    #[serde(default = "Config::default_inpatient_origin")]
    pub inpatient_origin: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_dataset: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    /// Optional directory for relative dataset paths. Defaults to `~/Documents/bedflow`.
    pub default_data_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimulationDefaults {
    pub default_increase_percent: u32,
    /// Increments accepted for the discharge increase.
    pub step_percent: u32,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            default_increase_percent: 10,
            step_percent: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: TargetRange::default(),
            forecast: ForecastOptions::default(),
            simulation: SimulationDefaults::default(),
            inpatient_origin: Self::default_inpatient_origin(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_dataset: None,
            default_data_root: None,
        }
    }
}

pub const CONFIG_KEYS: &[&str] = &[
    "targets.lower",
    "targets.upper",
    "forecast.trend_horizon_days",
    "forecast.trend_interval_width",
    "forecast.closing_interval_width",
    "forecast.yearly_seasonality",
    "forecast.weekly_seasonality",
    "forecast.min_history_days",
    "simulation.default_increase_percent",
    "simulation.step_percent",
    "inpatient_origin",
    "ui_color_enabled",
    "default_data_root",
];

impl Config {
    pub fn default_inpatient_origin() -> String {
        INPATIENT_ORIGIN.into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_default_data_root(&self) -> PathBuf {
        if let Some(path) = &self.default_data_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("bedflow")
    }

    /// Current value of every settable key, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .map(|key| (*key, self.value_of(key).unwrap_or_default()))
            .collect()
    }

    pub fn value_of(&self, key: &str) -> Option<String> {
        let forecast = &self.forecast;
        let value = match key {
            "targets.lower" => self.targets.lower.to_string(),
            "targets.upper" => self.targets.upper.to_string(),
            "forecast.trend_horizon_days" => forecast.trend_horizon_days.to_string(),
            "forecast.trend_interval_width" => forecast.trend_interval_width.to_string(),
            "forecast.closing_interval_width" => forecast.closing_interval_width.to_string(),
            "forecast.yearly_seasonality" => forecast.yearly_seasonality.to_string(),
            "forecast.weekly_seasonality" => match forecast.weekly_seasonality {
                Some(enabled) => enabled.to_string(),
                None => "auto".into(),
            },
            "forecast.min_history_days" => forecast.min_history_days.to_string(),
            "simulation.default_increase_percent" => {
                self.simulation.default_increase_percent.to_string()
            }
            "simulation.step_percent" => self.simulation.step_percent.to_string(),
            "inpatient_origin" => self.inpatient_origin.clone(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "default_data_root" => self.resolve_default_data_root().display().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Updates one key from its textual form. The config is unchanged when the result is invalid.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        let raw = raw.trim();
        match key {
            "targets.lower" => next.targets.lower = parse(key, raw)?,
            "targets.upper" => next.targets.upper = parse(key, raw)?,
            "forecast.trend_horizon_days" => next.forecast.trend_horizon_days = parse(key, raw)?,
            "forecast.trend_interval_width" => {
                next.forecast.trend_interval_width = parse(key, raw)?
            }
            "forecast.closing_interval_width" => {
                next.forecast.closing_interval_width = parse(key, raw)?
            }
            "forecast.yearly_seasonality" => next.forecast.yearly_seasonality = parse(key, raw)?,
            "forecast.weekly_seasonality" => {
                next.forecast.weekly_seasonality = match raw.to_ascii_lowercase().as_str() {
                    "auto" => None,
                    _ => Some(parse(key, raw)?),
                }
            }
            "forecast.min_history_days" => next.forecast.min_history_days = parse(key, raw)?,
            "simulation.default_increase_percent" => {
                next.simulation.default_increase_percent = parse(key, raw)?
            }
            "simulation.step_percent" => next.simulation.step_percent = parse(key, raw)?,
            "inpatient_origin" => next.inpatient_origin = raw.to_string(),
            "ui_color_enabled" => next.ui_color_enabled = parse(key, raw)?,
            "default_data_root" => {
                next.default_data_root = if raw.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(raw))
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };
        let forecast = &self.forecast;

        if !self.targets.is_valid() {
            return invalid("targets", "lower bound must not exceed upper bound");
        }
        for (key, width) in [
            ("forecast.trend_interval_width", forecast.trend_interval_width),
            ("forecast.closing_interval_width", forecast.closing_interval_width),
        ] {
            if !(width > 0.0 && width < 1.0) {
                return invalid(key, "interval width must lie strictly between 0 and 1");
            }
        }
        if forecast.trend_horizon_days == 0 {
            return invalid("forecast.trend_horizon_days", "horizon must be at least one day");
        }
        if forecast.min_history_days < 2 {
            return invalid("forecast.min_history_days", "at least two days are required");
        }
        if self.simulation.step_percent == 0 || self.simulation.step_percent > 100 {
            return invalid("simulation.step_percent", "step must be between 1 and 100");
        }
        if self.simulation.default_increase_percent > 100 {
            return invalid(
                "simulation.default_increase_percent",
                "increase must be between 0 and 100",
            );
        }
        if self.inpatient_origin.trim().is_empty() {
            return invalid("inpatient_origin", "label must not be empty");
        }
        Ok(())
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("`{raw}`: {err}"),
    })
}

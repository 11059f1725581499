//! Core CLI loop, dispatch, and shell context helpers.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bedflow_config::{ConfigError, ConfigManager};
use bedflow_core::{report_service::ReportSettings, time::Clock};
use bedflow_domain::RecordStore;
use bedflow_storage_csv::CsvDatasetReader;
use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;

pub use crate::errors::CliError;
use crate::{core::DatasetManager, errors::AppError, utils::app_data_dir};

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};
use super::system_clock::clock_from_env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir(), clock_from_env()?)
    }

    /// Builds a session whose configuration lives under `base`.
    pub fn with_base_dir(
        mode: CliMode,
        base: PathBuf,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        output::apply_config(&config);

        let reader = CsvDatasetReader::new().with_inpatient_label(config.inpatient_origin.clone());

        let mut context = Self {
            mode,
            registry,
            datasets: DatasetManager::new(Box::new(reader)),
            config_manager,
            config,
            clock,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        };
        context.auto_load_last();
        Ok(context)
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(path) = self.config.last_dataset.clone() else {
            return;
        };
        if !path.exists() {
            return;
        }
        match self.datasets.load(&path) {
            Ok(metadata) => {
                output::success(format!(
                    "Automatically loaded last dataset `{}` ({} rows).",
                    path.display(),
                    metadata.rows
                ));
                self.report_warnings(&metadata.warnings);
            }
            Err(err) => output::warning(format!(
                "Could not reload last dataset `{}`: {}",
                path.display(),
                err
            )),
        }
    }

    pub fn prompt(&self) -> String {
        match self.datasets.current_path() {
            Some(path) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("bedflow [{}]> ", name)
            }
            None => "bedflow> ".to_string(),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        self.confirm_action("Exit shell?", true)
            .map_err(CliError::from)
    }

    /// Asks a yes/no question; script mode always proceeds.
    pub(crate) fn confirm_action(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::DatasetNotLoaded => {
                self.print_error("No dataset loaded. Use `load <csv>` first.");
                self.print_hint("Export the sector movement table as CSV and run `load movements.csv`.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        output::error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        output::hint(message);
    }

    pub(crate) fn report_warnings(&self, warnings: &[String]) {
        for warning in warnings {
            output::warning(warning);
        }
    }

    /// Published record store, or `DatasetNotLoaded`.
    pub(crate) fn store(&self) -> Result<Arc<RecordStore>, CommandError> {
        self.datasets.current().map_err(CommandError::from)
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn settings(&self) -> ReportSettings {
        ReportSettings {
            targets: self.config.targets,
            forecast: self.config.forecast.clone(),
        }
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    /// Installs a reader matching the configured inpatient label.
    pub(crate) fn refresh_reader(&mut self) {
        let reader =
            CsvDatasetReader::new().with_inpatient_label(self.config.inpatient_origin.clone());
        self.datasets.set_reader(Box::new(reader));
    }

    /// Relative paths that do not exist here are looked up under the data root.
    pub(crate) fn resolve_dataset_path(&self, raw: &str) -> PathBuf {
        let path = Path::new(raw);
        if path.is_absolute() || path.exists() {
            return path.to_path_buf();
        }
        let candidate = self.config.resolve_default_data_root().join(path);
        if candidate.exists() {
            candidate
        } else {
            path.to_path_buf()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No dataset loaded. Use `load <csv>` first.")]
    DatasetNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    App(AppError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::DatasetNotLoaded => CommandError::DatasetNotLoaded,
            AppError::InvalidInput(message) => CommandError::InvalidArguments(message),
            other => CommandError::App(other),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::from(AppError::from(err))
    }
}

impl From<bedflow_core::CoreError> for CommandError {
    fn from(err: bedflow_core::CoreError) -> Self {
        CommandError::from(AppError::from(err))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::App(inner) => CliError::App(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: PathBuf,
    today: NaiveDate,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let clock = Box::new(bedflow_core::time::FixedClock(today));
    let mut app = ShellContext::with_base_dir(CliMode::Script, base, clock)?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV: &str = "\
Data,Setor,Origem,Intern.,Saídas,Altas,Paciente/Dia,Leitos-dia,Leitos Ativos
01/03/2024,UTI,Internação,2,1,1,9,10,10
02/03/2024,UTI,Internação,1,2,2,8,10,10
01/03/2023,UTI,Internação,1,1,1,7,10,10
";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
    }

    #[test]
    fn load_publishes_store_and_remembers_path() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("movements.csv");
        fs::write(&csv, CSV).unwrap();
        let line = format!("load \"{}\"", csv.display());

        let app = process_script(dir.path().to_path_buf(), today(), &[line.as_str()]).unwrap();

        assert_eq!(app.datasets.current().unwrap().len(), 3);
        assert_eq!(app.config.last_dataset.as_deref(), Some(csv.as_path()));
        let stored = app.config_manager.load().unwrap();
        assert_eq!(stored.last_dataset, Some(csv));
    }

    #[test]
    fn analysis_without_dataset_reports_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ShellContext::with_base_dir(
            CliMode::Script,
            dir.path().to_path_buf(),
            Box::new(bedflow_core::time::FixedClock(today())),
        )
        .unwrap();

        let err = app.process_line("report 2024 3").unwrap_err();
        assert!(matches!(err, CommandError::DatasetNotLoaded));
    }

    #[test]
    fn bad_month_is_an_argument_error() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("movements.csv");
        fs::write(&csv, CSV).unwrap();
        let line = format!("load \"{}\"", csv.display());
        let mut app = process_script(dir.path().to_path_buf(), today(), &[line.as_str()]).unwrap();

        let err = app.process_line("report 2024 13").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }

    #[test]
    fn config_set_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let app = process_script(
            dir.path().to_path_buf(),
            today(),
            &["config set targets.lower 80"],
        )
        .unwrap();

        assert_eq!(app.config.targets.lower, 80.0);
        assert_eq!(app.config_manager.load().unwrap().targets.lower, 80.0);
    }

    #[test]
    fn exit_stops_processing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = process_script(dir.path().to_path_buf(), today(), &[]).unwrap();
        assert_eq!(app.process_line("exit").unwrap(), LoopControl::Exit);
        assert_eq!(app.process_line("hlep").unwrap(), LoopControl::Continue);
    }
}

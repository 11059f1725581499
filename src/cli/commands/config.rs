use bedflow_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "config [show|set <key> <value>|reset]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change analysis preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(
                    "usage: config set <key> <value>".into(),
                ));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            set_value(context, key, value.trim())
        }
        "reset" => reset(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`. Available: show, set, reset"
        ))),
    }
}

fn show_config(context: &ShellContext) {
    output::section("Configuration");
    for (key, value) in context.config.entries() {
        let shown = if value.is_empty() { "-" } else { value.as_str() };
        output::line(format!("  {key:<38} {shown}"));
    }
    output::line(format!(
        "  {:<38} {}",
        "(file)",
        context.config_manager.config_path().display()
    ));
}

fn set_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    context.config.set(key, value)?;
    context.persist_config()?;

    match key {
        "ui_color_enabled" => output::apply_config(&context.config),
        "inpatient_origin" => {
            context.refresh_reader();
            if context.datasets.is_loaded() {
                output::hint("Reload the dataset to apply the new inpatient label.");
            }
        }
        _ => {}
    }

    let shown = context.config.value_of(key).unwrap_or_default();
    output::success(format!("{key} set to {shown}."));
    Ok(())
}

fn reset(context: &mut ShellContext) -> CommandResult {
    if !context.confirm_action("Restore default preferences?", false)? {
        output::info("Operation cancelled.");
        return Ok(());
    }

    context.config = Config {
        last_dataset: context.config.last_dataset.take(),
        ..Config::default()
    };
    context.persist_config()?;
    output::apply_config(&context.config);
    context.refresh_reader();
    output::success("Preferences restored to defaults.");
    Ok(())
}

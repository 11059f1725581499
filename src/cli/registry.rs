use std::collections::HashMap;

use strsim::levenshtein;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

/// Largest edit distance still offered as a suggestion.
const SUGGESTION_DISTANCE: usize = 3;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Help sections, printed in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandGroup {
    Data,
    Analysis,
    Settings,
    Session,
}

impl CommandGroup {
    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Data => "Data",
            CommandGroup::Analysis => "Occupancy analysis",
            CommandGroup::Settings => "Settings",
            CommandGroup::Session => "Session",
        }
    }
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    pub group: CommandGroup,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            group: CommandGroup::Session,
        }
    }
}

/// Shell commands in registration order, indexed by lowercase name.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files every entry under `group`. A repeated name replaces the earlier entry in place.
    pub fn register_group(&mut self, group: CommandGroup, entries: Vec<CommandEntry>) {
        for mut entry in entries {
            entry.group = group;
            match self.index.get(entry.name) {
                Some(&slot) => self.entries[slot] = entry,
                None => {
                    self.index.insert(entry.name, self.entries.len());
                    self.entries.push(entry);
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.index.get(name).map(|slot| &self.entries[*slot])
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    /// Non-empty groups with their entries, in group order.
    pub fn grouped(&self) -> Vec<(CommandGroup, Vec<&CommandEntry>)> {
        let mut groups: Vec<(CommandGroup, Vec<&CommandEntry>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter_mut().find(|(group, _)| *group == entry.group) {
                Some((_, members)) => members.push(entry),
                None => groups.push((entry.group, vec![entry])),
            }
        }
        groups.sort_by_key(|(group, _)| *group);
        groups
    }

    /// Closest command name to a mistyped `input`, if any is near enough.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .map(|(_, name)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register_group(
            CommandGroup::Session,
            vec![CommandEntry::new("exit", "Leave", "exit", noop)],
        );
        registry.register_group(
            CommandGroup::Data,
            vec![
                CommandEntry::new("load", "Load", "load <path>", noop),
                CommandEntry::new("dataset", "Show", "dataset", noop),
            ],
        );
        registry
    }

    #[test]
    fn groups_follow_declaration_order() {
        let registry = registry();
        let grouped = registry.grouped();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, CommandGroup::Data);
        let names: Vec<_> = grouped[0].1.iter().map(|entry| entry.name).collect();
        assert_eq!(names, ["load", "dataset"]);
        assert_eq!(grouped[1].0, CommandGroup::Session);
    }

    #[test]
    fn replacing_keeps_the_original_slot() {
        let mut registry = registry();
        registry.register_group(
            CommandGroup::Analysis,
            vec![CommandEntry::new("load", "Reload", "load", noop)],
        );
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["exit", "load", "dataset"]);
        let entry = registry.get("load").unwrap();
        assert_eq!(entry.description, "Reload");
        assert_eq!(entry.group, CommandGroup::Analysis);
    }

    #[test]
    fn suggestions_stay_close() {
        let registry = registry();
        assert_eq!(registry.suggest("LAOD"), Some("load"));
        assert_eq!(registry.suggest("datset"), Some("dataset"));
        assert_eq!(registry.suggest("occupancy"), None);
    }
}

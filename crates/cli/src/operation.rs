// Named operations registered as subcommands and dispatched by name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::{ArgMatches, Command};

use crate::output::Console;
use crate::settings::Settings;

/// Everything an operation may touch while it executes.
pub struct Context<'a> {
    pub console: Console<'a>,
    pub settings: Settings,
    /// Absolute location the command runs from (`--path` or the current directory).
    pub location: PathBuf,
}

impl Context<'_> {
    /// Resolve an optional user-supplied path against the working location.
    pub fn resolve(&self, path: Option<&Path>) -> PathBuf {
        match path {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.location.join(path),
            None => self.location.clone(),
        }
    }
}

/// A subcommand: declares its own arguments and runs against the parsed result.
pub trait Operation {
    /// Subcommand name; unique within an [`OperationSet`].
    fn name(&self) -> &'static str;

    /// One-line help shown in the subcommand list.
    fn about(&self) -> &'static str;

    /// Add this operation's arguments to its subcommand.
    fn configure(&self, command: Command) -> Command {
        command
    }

    fn execute(&self, matches: &ArgMatches, ctx: &mut Context<'_>) -> anyhow::Result<()>;
}

/// Lookup table of operations keyed by name.
#[derive(Default)]
pub struct OperationSet {
    operations: BTreeMap<&'static str, Box<dyn Operation>>,
}

impl OperationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `operation`. Fails if an operation with the same name exists.
    pub fn add(&mut self, operation: impl Operation + 'static) -> anyhow::Result<()> {
        let name = operation.name();
        if self.operations.contains_key(name) {
            bail!("an operation named `{name}` is already registered");
        }
        self.operations.insert(name, Box::new(operation));
        Ok(())
    }

    /// Attach one required subcommand per registered operation to `command`.
    pub fn configure(&self, command: Command) -> Command {
        let subcommands = self.operations.values().map(|operation| {
            operation.configure(Command::new(operation.name()).about(operation.about()))
        });
        command.subcommand_required(true).arg_required_else_help(true).subcommands(subcommands)
    }

    /// Execute the operation selected in `matches`.
    pub fn dispatch(&self, matches: &ArgMatches, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let (name, sub_matches) = matches.subcommand().context("no operation was given")?;
        let operation = self
            .operations
            .get(name)
            .with_context(|| format!("unknown operation `{name}`"))?;
        operation.execute(sub_matches, ctx)
    }
}

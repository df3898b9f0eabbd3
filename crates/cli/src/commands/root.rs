// `stax root` — print the enclosing project root.

use clap::{ArgMatches, Command};
use stax_common::project::META_DIR_NAME;

use super::enclosing_project;
use crate::operation::{Context, Operation};

pub struct RootOperation;

impl Operation for RootOperation {
    fn name(&self) -> &'static str {
        "root"
    }

    fn about(&self) -> &'static str {
        "Display the path to the project root directory"
    }

    fn configure(&self, command: Command) -> Command {
        command.long_about(format!(
            "Displays the path to the root directory of the enclosing project. This is the \
             directory that contains the metadata directory \"{META_DIR_NAME}\"."
        ))
    }

    fn execute(&self, _: &ArgMatches, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        if let Some(project) = enclosing_project(ctx)? {
            ctx.console.output(project.root().display())?;
        }
        Ok(())
    }
}

// `stax dismantle` — remove the stax metadata from a project.

use std::path::PathBuf;

use clap::{ArgMatches, Args, Command, FromArgMatches};
use stax_common::project::{dismantle_project, is_project_root, META_DIR_NAME};

use crate::operation::{Context, Operation};

#[derive(Debug, Args)]
pub struct DismantleArgs {
    /// Project directory (defaults to the working location).
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Dismantle without asking for confirmation.
    #[arg(short, long)]
    force: bool,
}

pub struct DismantleOperation;

impl Operation for DismantleOperation {
    fn name(&self) -> &'static str {
        "dismantle"
    }

    fn about(&self) -> &'static str {
        "Remove the stax configuration from a project"
    }

    fn configure(&self, command: Command) -> Command {
        DismantleArgs::augment_args(command).long_about(format!(
            "Removes the stax configuration from the project in the working location (or at \
             PATH), so the directory is no longer a stax project. Everything else in the \
             directory is left untouched; only the \"{META_DIR_NAME}\" subdirectory is deleted."
        ))
    }

    fn execute(&self, matches: &ArgMatches, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        run(DismantleArgs::from_arg_matches(matches)?, ctx)
    }
}

fn run(args: DismantleArgs, ctx: &mut Context<'_>) -> anyhow::Result<()> {
    let root = ctx.resolve(args.path.as_deref());
    if !is_project_root(&root) {
        ctx.console.warn(format!(
            "The given path does not point to a stax project: \"{}\".",
            root.display()
        ));
        return Ok(());
    }

    if !args.force
        && !ctx.console.confirm("This will delete project configurations! Are you sure?")?
    {
        return Ok(());
    }

    dismantle_project(&root)?;
    ctx.console.log(format!("Dismantled stax project at {}", root.display()));
    Ok(())
}

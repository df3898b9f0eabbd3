// `stax init` — turn a directory into a stax project.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgMatches, Args, Command, FromArgMatches};
use stax_common::project::{init_project, META_DIR_NAME};
use stax_common::InitOptions;

use crate::operation::{Context, Operation};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project directory (defaults to the working location).
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Project name (defaults to the directory name).
    #[arg(long)]
    name: Option<String>,

    /// Project author (defaults to `author` from the settings file).
    #[arg(long)]
    author: Option<String>,

    /// Short project description.
    #[arg(long, visible_alias = "description")]
    desc: Option<String>,
}

pub struct InitOperation;

impl Operation for InitOperation {
    fn name(&self) -> &'static str {
        "init"
    }

    fn about(&self) -> &'static str {
        "Create a new stax project"
    }

    fn configure(&self, command: Command) -> Command {
        InitArgs::augment_args(command).long_about(format!(
            "Creates a new stax project in the working location (or at PATH). The content of \
             the directory becomes part of the project. A metadata subdirectory, \"{META_DIR_NAME}\", \
             will be created."
        ))
    }

    fn execute(&self, matches: &ArgMatches, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        run(InitArgs::from_arg_matches(matches)?, ctx)
    }
}

fn run(args: InitArgs, ctx: &mut Context<'_>) -> anyhow::Result<()> {
    let root = ctx.resolve(args.path.as_deref());
    let options = InitOptions {
        name: args.name,
        author: args.author.or_else(|| ctx.settings.author.clone()),
        desc: args.desc,
    };

    let project = init_project(&root, options)
        .with_context(|| format!("failed to initialize project at `{}`", root.display()))?;
    let config = project.config().model()?;
    ctx.console.log(format_human(&project.root().display().to_string(), &config.name));
    Ok(())
}

fn format_human(root: &str, name: &str) -> String {
    format!("Initialized stax project \"{name}\" at {root}")
}

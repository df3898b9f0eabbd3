// `stax info` — summarize the enclosing project.

use std::path::Path;

use clap::{ArgMatches, Command};
use stax_common::ProjectConfig;

use super::enclosing_project;
use crate::operation::{Context, Operation};

pub struct InfoOperation;

impl Operation for InfoOperation {
    fn name(&self) -> &'static str {
        "info"
    }

    fn about(&self) -> &'static str {
        "Show information about the project"
    }

    fn configure(&self, command: Command) -> Command {
        command.long_about(
            "Shows useful information about the enclosing project such as its name, author, \
             creation date and number of modules.",
        )
    }

    fn execute(&self, _: &ArgMatches, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let Some(project) = enclosing_project(ctx)? else {
            return Ok(());
        };
        let config = project.config().model()?;
        ctx.console.output(format_human(project.root(), &config))?;
        Ok(())
    }
}

fn format_human(root: &Path, config: &ProjectConfig) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    [
        format!("Location: {}", root.display()),
        format!("UUID:     {}", config.uuid),
        format!("Name:     {}", config.name),
        format!("Author:   {}", optional(&config.author)),
        format!("Desc:     {}", optional(&config.desc)),
        format!("Created:  {}", config.creation_date.format("%Y-%m-%d")),
        format!("Modules:  {}", config.modules.len()),
    ]
    .join("\n")
}

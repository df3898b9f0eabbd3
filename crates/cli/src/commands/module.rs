// `stax module` — create or update a module record in the enclosing project.

use chrono::Local;
use clap::{ArgMatches, Args, Command, FromArgMatches};

use super::enclosing_project;
use crate::operation::{Context, Operation};

#[derive(Debug, Args)]
pub struct ModuleArgs {
    /// Module name; unique within the project.
    #[arg(value_name = "NAME")]
    name: String,

    /// Short module description.
    #[arg(long, visible_alias = "description")]
    desc: Option<String>,
}

pub struct ModuleOperation;

impl Operation for ModuleOperation {
    fn name(&self) -> &'static str {
        "module"
    }

    fn about(&self) -> &'static str {
        "Create or update a module in the project"
    }

    fn configure(&self, command: Command) -> Command {
        ModuleArgs::augment_args(command).long_about(
            "Records a module in the configuration of the enclosing project. If a module with \
             the same name already exists its creation date and description are replaced; \
             otherwise a new module is appended.",
        )
    }

    fn execute(&self, matches: &ArgMatches, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        run(ModuleArgs::from_arg_matches(matches)?, ctx)
    }
}

fn run(args: ModuleArgs, ctx: &mut Context<'_>) -> anyhow::Result<()> {
    let Some(project) = enclosing_project(ctx)? else {
        return Ok(());
    };

    let updated =
        project.config().upsert_module(&args.name, Local::now().date_naive(), args.desc)?;
    let verb = if updated { "Updated" } else { "Created" };
    ctx.console.log(format!("{verb} module \"{}\"", args.name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::run_in;
    use crate::exit_code::ExitCode;
    use crate::settings::Settings;
    use stax_common::project::init_project;
    use stax_common::{InitOptions, Project};

    #[test]
    fn create_then_update_module() {
        let tmp = tempfile::tempdir().unwrap();
        init_project(tmp.path(), InitOptions::default()).unwrap();
        let sub = tmp.path().join("src");
        std::fs::create_dir(&sub).unwrap();

        let first = run_in(&sub, Settings::default(), "", &["module", "web"]);
        first.result.unwrap();
        assert_eq!(first.out, "Created module \"web\"\n");

        let second = run_in(&sub, Settings::default(), "", &["module", "web", "--desc", "frontend"]);
        second.result.unwrap();
        assert_eq!(second.out, "Updated module \"web\"\n");

        let config = Project::open(tmp.path()).unwrap().config().model().unwrap();
        assert_eq!(config.modules.len(), 1);
        assert_eq!(config.modules[0].desc.as_deref(), Some("frontend"));
    }

    #[test]
    fn empty_module_name_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        init_project(tmp.path(), InitOptions::default()).unwrap();
        let error = run_in(tmp.path(), Settings::default(), "", &["module", ""])
            .result
            .expect_err("empty name should fail");
        assert_eq!(ExitCode::from_error(&error), ExitCode::InvalidArgument);
    }
}

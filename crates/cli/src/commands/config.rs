// `stax config` — print the configuration document as JSON.

use clap::{ArgMatches, Command};
use stax_common::project::META_DIR_NAME;

use super::enclosing_project;
use crate::operation::{Context, Operation};

pub struct ConfigOperation;

impl Operation for ConfigOperation {
    fn name(&self) -> &'static str {
        "config"
    }

    fn about(&self) -> &'static str {
        "Show the configuration model as JSON"
    }

    fn configure(&self, command: Command) -> Command {
        command.long_about(format!(
            "Shows the configuration model inside the \"{META_DIR_NAME}\" metadata directory of \
             the enclosing project, printed as JSON."
        ))
    }

    fn execute(&self, _: &ArgMatches, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        if let Some(project) = enclosing_project(ctx)? {
            let config = project.config().model()?;
            ctx.console.output_json(&config)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::run_in;
    use crate::exit_code::ExitCode;
    use crate::settings::Settings;
    use stax_common::project::init_project;
    use stax_common::{InitOptions, ProjectConfig};

    #[test]
    fn prints_document_that_parses_back() {
        let tmp = tempfile::tempdir().unwrap();
        let project = init_project(tmp.path(), InitOptions::default()).unwrap();
        project.config().upsert_module("web", chrono::Local::now().date_naive(), None).unwrap();

        let outcome = run_in(tmp.path(), Settings::default(), "", &["config"]);
        outcome.result.unwrap();

        let printed: ProjectConfig = serde_json::from_str(&outcome.out).unwrap();
        assert_eq!(printed, project.config().model().unwrap());
        assert!(outcome.out.contains("\n  \"modules\": [\n"));
    }

    #[test]
    fn corrupt_document_is_malformed() {
        let tmp = tempfile::tempdir().unwrap();
        let project = init_project(tmp.path(), InitOptions::default()).unwrap();
        std::fs::write(project.config_path(), "[]").unwrap();

        let error = run_in(tmp.path(), Settings::default(), "", &["config"])
            .result
            .expect_err("corrupt config should fail");
        assert_eq!(ExitCode::from_error(&error), ExitCode::Malformed);
    }
}

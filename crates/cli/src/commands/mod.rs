// Subcommand registry.

use stax_common::project::find_enclosing_project;
use stax_common::Project;

use crate::operation::{Context, OperationSet};

pub mod config;
pub mod dismantle;
pub mod info;
pub mod init;
pub mod module;
pub mod root;

/// Every operation the `stax` binary exposes.
pub fn operations() -> anyhow::Result<OperationSet> {
    let mut set = OperationSet::new();
    set.add(init::InitOperation)?;
    set.add(dismantle::DismantleOperation)?;
    set.add(root::RootOperation)?;
    set.add(info::InfoOperation)?;
    set.add(config::ConfigOperation)?;
    set.add(module::ModuleOperation)?;
    Ok(set)
}

/// Find the project enclosing the working location, warning when there is none.
pub(crate) fn enclosing_project(ctx: &mut Context<'_>) -> anyhow::Result<Option<Project>> {
    let project = find_enclosing_project(&ctx.location)?;
    if project.is_none() {
        ctx.console.warn(format!("No stax project found enclosing \"{}\".", ctx.location.display()));
    }
    Ok(project)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io;
    use std::path::Path;

    use crate::operation::{Context, OperationSet};
    use crate::output::{Console, ConsoleConfig};
    use crate::settings::Settings;

    #[derive(Debug)]
    pub struct Outcome {
        pub result: anyhow::Result<()>,
        pub out: String,
        pub err: String,
    }

    /// Run `argv` (without the program name) against the real registry from `location`.
    pub fn run_in(location: &Path, settings: Settings, input: &str, argv: &[&str]) -> Outcome {
        let set = super::operations().expect("registry should build");
        let matches = set
            .configure(clap::Command::new("stax"))
            .try_get_matches_from(std::iter::once("stax").chain(argv.iter().copied()))
            .expect("arguments should parse");

        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let mut input = io::Cursor::new(input.as_bytes().to_vec());
        let config = ConsoleConfig { formatted: false, ..ConsoleConfig::default() };
        let result = {
            let mut ctx = Context {
                console: Console::new(config, &mut out, &mut err, &mut input),
                settings,
                location: location.to_path_buf(),
            };
            set.dispatch(&matches, &mut ctx)
        };

        Outcome {
            result,
            out: String::from_utf8(out).expect("stdout should be utf-8"),
            err: String::from_utf8(err).expect("stderr should be utf-8"),
        }
    }
}

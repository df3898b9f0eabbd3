// stax CLI entry point.

use std::ffi::OsString;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{CommandFactory, FromArgMatches, Parser};
use stax_common::paths::current_dir;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_code;
mod operation;
mod output;
mod settings;

use exit_code::ExitCode;
use operation::Context;
use output::Console;
use settings::Settings;

#[derive(Debug, Parser)]
#[command(
    name = "stax",
    version = concat!("v", env!("CARGO_PKG_VERSION"), " by ", env!("CARGO_PKG_AUTHORS")),
    about = "Mark directories as projects and manage their module configuration"
)]
struct Cli {
    /// Disable warning messages in console output.
    #[arg(short = 'w', long)]
    no_warnings: bool,

    /// Disable console log messages.
    #[arg(short, long)]
    quiet: bool,

    /// Disable ANSI formatting in console output.
    #[arg(short, long)]
    unformatted: bool,

    /// Run the command from PATH instead of the current working directory.
    #[arg(short, long, value_name = "PATH")]
    path: Option<PathBuf>,
}

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let is_tty = stdout.is_terminal();
    let mut out = stdout.lock();
    let mut err = io::stderr().lock();
    let mut input = io::stdin().lock();
    run(std::env::args_os(), Settings::load(), is_tty, &mut out, &mut err, &mut input).into()
}

fn run<I, T>(
    args: I,
    settings: anyhow::Result<Settings>,
    is_tty: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
    input: &mut dyn BufRead,
) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let operations = match commands::operations() {
        Ok(operations) => operations,
        Err(error) => {
            let _ = writeln!(err, "error: {error:#}");
            return ExitCode::Error;
        }
    };

    let matches = match operations.configure(Cli::command()).try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => return report_parse_error(&error, out, err),
    };
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(error) => return report_parse_error(&error, out, err),
    };

    let (settings, settings_error) = match settings {
        Ok(settings) => (settings, None),
        Err(error) => (Settings::default(), Some(error)),
    };
    let console_config =
        settings.console_config(cli.quiet, cli.no_warnings, cli.unformatted || !is_tty);
    let mut console = Console::new(console_config, out, err, input);
    if let Some(error) = settings_error {
        console.warn(format!("ignoring user settings: {error:#}"));
    }

    let location = match resolve_location(cli.path) {
        Ok(location) => location,
        Err(error) => {
            console.error(format!("{error:#}"));
            return ExitCode::from_error(&error);
        }
    };
    debug!(location = %location.display(), "dispatching operation");

    let mut ctx = Context { console, settings, location };
    match operations.dispatch(&matches, &mut ctx) {
        Ok(()) => ExitCode::Success,
        Err(error) => {
            ctx.console.error(format!("{error:#}"));
            ExitCode::from_error(&error)
        }
    }
}

fn report_parse_error(error: &clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> ExitCode {
    let rendered = error.render();
    if error.use_stderr() {
        let _ = write!(err, "{rendered}");
        ExitCode::Usage
    } else {
        // --help and --version
        let _ = write!(out, "{rendered}");
        ExitCode::Success
    }
}

fn resolve_location(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let cwd = current_dir().context("failed to resolve current working directory")?;
    Ok(match path {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => cwd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stax_common::project::is_project_root;

    struct Finished {
        code: ExitCode,
        out: String,
        err: String,
    }

    fn run_with(settings: anyhow::Result<Settings>, args: &[&str]) -> Finished {
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let mut input = io::empty();
        let argv: Vec<&str> = std::iter::once("stax").chain(args.iter().copied()).collect();
        let code = run(argv, settings, false, &mut out, &mut err, &mut input);
        Finished {
            code,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    fn run_args(args: &[&str]) -> Finished {
        run_with(Ok(Settings::default()), args)
    }

    #[test]
    fn version_flag_prints_version() {
        let finished = run_args(&["--version"]);
        assert_eq!(finished.code, ExitCode::Success);
        assert_eq!(
            finished.out,
            format!("stax v{} by {}\n", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS"))
        );
    }

    #[test]
    fn missing_operation_is_usage_error() {
        let finished = run_args(&[]);
        assert_eq!(finished.code, ExitCode::Usage);
        assert!(finished.err.contains("Usage"));
    }

    #[test]
    fn unknown_operation_is_usage_error() {
        let finished = run_args(&["demolish"]);
        assert_eq!(finished.code, ExitCode::Usage);
    }

    #[test]
    fn path_flag_selects_location() {
        let tmp = tempfile::tempdir().unwrap();
        let location = tmp.path().to_str().unwrap();

        let finished = run_args(&["-p", location, "init"]);
        assert_eq!(finished.code, ExitCode::Success, "stderr: {}", finished.err);
        assert!(is_project_root(tmp.path()));
        assert!(finished.out.contains("Initialized stax project"));
    }

    #[test]
    fn quiet_flag_silences_logs() {
        let tmp = tempfile::tempdir().unwrap();
        let finished = run_args(&["-q", "-p", tmp.path().to_str().unwrap(), "init"]);
        assert_eq!(finished.code, ExitCode::Success);
        assert!(finished.out.is_empty());
    }

    #[test]
    fn second_init_maps_to_already_exists_code() {
        let tmp = tempfile::tempdir().unwrap();
        let location = tmp.path().to_str().unwrap();
        run_args(&["-p", location, "init"]);

        let finished = run_args(&["-p", location, "init"]);
        assert_eq!(finished.code, ExitCode::AlreadyExists);
        assert!(finished.err.starts_with("error: failed to initialize project"));
    }

    #[test]
    fn no_warnings_flag_silences_missing_project_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let finished = run_args(&["-w", "-p", tmp.path().to_str().unwrap(), "dismantle", "-f"]);
        assert_eq!(finished.code, ExitCode::Success);
        assert!(finished.err.is_empty());
    }

    #[test]
    fn broken_settings_only_warn() {
        let tmp = tempfile::tempdir().unwrap();
        let finished = run_with(
            Err(anyhow::anyhow!("failed to parse settings `settings.toml`")),
            &["-p", tmp.path().to_str().unwrap(), "init"],
        );
        assert_eq!(finished.code, ExitCode::Success);
        assert!(finished.err.starts_with("warning: ignoring user settings"));
        assert!(is_project_root(tmp.path()));
    }

    #[test]
    fn resolve_location_joins_relative_path_onto_cwd() {
        let cwd = current_dir().unwrap();
        assert_eq!(resolve_location(None).unwrap(), cwd);
        assert_eq!(resolve_location(Some(PathBuf::from("sub"))).unwrap(), cwd.join("sub"));
    }
}

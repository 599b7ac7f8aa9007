//! Command dispatch for the `cattree` binary.

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::script::{parse_script, Outcome, ScriptRunner};
use crate::config::Settings;
use crate::domain::TreeDisplay;

/// One piece of output from a script run, in the order it is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Script line echoed before it runs
    Echo { line: usize, source: String },
    Outcome(Outcome),
    /// Final tree with its category count
    Tree { size: usize, rendered: String },
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(root) = &cli.root {
        settings.root_name = root.clone();
    }

    match &cli.command {
        Some(Commands::Run { script }) => _run(script.as_deref(), &settings),
        Some(Commands::Config) => _config(&settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `cattree --help`".to_string(),
        )),
    }
}

/// Read a script from `script`, or from stdin when it is absent or `-`.
pub(crate) fn read_script(script: Option<&Path>) -> CliResult<String> {
    match script {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| CliError::io(format!("read script {}", path.display()), e)),
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| CliError::io("read script from stdin", e))?;
            Ok(source)
        }
    }
}

/// Run `source` against a fresh tree, handing every report to `emit`.
///
/// Reports for the lines before a failing command are emitted before the
/// error is returned.
#[instrument(level = "debug", skip(source, emit))]
pub fn run_script(
    source: &str,
    settings: &Settings,
    mut emit: impl FnMut(Report),
) -> CliResult<()> {
    let script = parse_script(source)?;
    let mut runner = ScriptRunner::new(&settings.root_name)?;

    for entry in &script {
        if settings.echo {
            emit(Report::Echo {
                line: entry.line,
                source: entry.source.clone(),
            });
        }
        let outcome = runner
            .run_command(&entry.command)
            .map_err(|source| CliError::Command {
                line: entry.line,
                source,
            })?;
        emit(Report::Outcome(outcome));
    }
    debug!("executed {} commands", script.len());

    if settings.show_tree {
        emit(Report::Tree {
            size: runner.tree().size(runner.root()),
            rendered: runner.tree().to_tree_string(runner.root()).to_string(),
        });
    }
    Ok(())
}

fn print_report(report: Report) {
    match report {
        Report::Echo { line, source } => output::echo(line, &source),
        Report::Outcome(Outcome::Changed(msg)) => output::changed(&msg),
        Report::Outcome(Outcome::Lines(lines)) => lines.iter().for_each(|l| output::info(l)),
        Report::Outcome(Outcome::Miss(msg)) => output::miss(&msg),
        Report::Tree { size, rendered } => {
            output::header(&format!("{} categories", size));
            output::info(rendered.trim_end());
        }
    }
}

#[instrument(skip(settings))]
fn _run(script: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let source = read_script(script)?;
    run_script(&source, settings, print_report)
}

fn _config(settings: &Settings) -> CliResult<()> {
    let rendered = settings
        .to_toml()
        .map_err(|e| CliError::Usage(format!("cannot render settings: {}", e)))?;
    output::info(rendered.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_script_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("animals.cat");
        fs::write(&path, "add cat\nadd dog\n").unwrap();
        assert_eq!(read_script(Some(&path)).unwrap(), "add cat\nadd dog\n");
    }

    #[test]
    fn test_read_script_missing_file_is_noinput() {
        let dir = TempDir::new().unwrap();
        let err = read_script(Some(&dir.path().join("missing.cat"))).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }
}

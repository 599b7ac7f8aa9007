//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Hierarchical category trees: build and query path-addressed categories
#[derive(Parser, Debug)]
#[command(name = "cattree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered on top of the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Name of the root category (overrides settings)
    #[arg(short, long, global = true)]
    pub root: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a category script against a fresh tree
    Run {
        /// Script file, stdin if omitted or "-"
        #[arg(value_hint = ValueHint::FilePath)]
        script: Option<PathBuf>,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_globals() {
        let cli = Cli::try_parse_from(["cattree", "-dd", "run", "demo.cat", "--root", "food"])
            .unwrap();
        assert_eq!(cli.debug, 2);
        assert_eq!(cli.root.as_deref(), Some("food"));
        match cli.command {
            Some(Commands::Run { script }) => assert_eq!(script, Some(PathBuf::from("demo.cat"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}

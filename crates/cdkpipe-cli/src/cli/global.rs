//! Global arguments shared by every invocation.
//!
//! Declared here and flattened into [`super::Cli`] so the logging and output
//! setup only ever needs this struct.

use clap::Args;
use std::path::PathBuf;

/// Global arguments.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    ///
    /// Any occurrence also surfaces the output of every child command.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase verbosity:
    (none)  - Only warnings and errors
    -v      - Info level; print the output of every command
    -vv     - Debug level (detailed diagnostics)
    -vvv    - Trace level (very verbose)"
    )]
    pub verbose: u8,

    /// Disable ANSI colour codes.
    ///
    /// Automatically honoured when `NO_COLOR` is set in the environment
    /// (see <https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Configuration file path.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Whether child command output should be surfaced.
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }
}

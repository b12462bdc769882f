//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names and help
//! text. Everything else about a project comes from the interactive prompts.

use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub use global::GlobalArgs;

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "cdkpipe",
    bin_name = "cdkpipe",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scaffold a CodeCommit repository and a CDK pipeline",
    long_about = "cdkpipe asks a few questions, generates a CDK pipeline project, \
                  creates its CodeCommit repository and, when the git protocol \
                  allows it, pushes and deploys the pipeline.",
    after_help = "EXAMPLES:\n\
        \x20 cdkpipe\n\
        \x20 cdkpipe -v --workspace ~/src\n\
        \x20 cdkpipe --config ./cdkpipe.toml --no-color",
)]
pub struct Cli {
    /// Flags shared with logging and output setup.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Parent directory for the new project.
    #[arg(
        short = 'w',
        long = "workspace",
        value_name = "DIR",
        default_value = ".",
        help = "Directory the project is created in"
    )]
    pub workspace: PathBuf,
}

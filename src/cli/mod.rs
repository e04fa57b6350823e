//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::config::ConfigArgs;
use crate::RunArgs;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function. This is achieved with the `parse` function, which parses the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = gvf_merge::Cli::parse();
/// ```
/// Here is a manual example of setting the command-line input:
/// ```rust
/// # use clap::Parser;
/// use gvf_merge::cli::Command;
///
/// let input = ["gvf-merge", "run", "--annotations", "functions.tsv", "--output-dir", "output", "B.1.1.7.tsv", "P.1.tsv"];
/// let args = gvf_merge::Cli::parse_from(input);
/// match args.command {
///     Command::Run(args) => assert_eq!(args.inputs.len(), 2),
///     Command::Config(_) => unreachable!(),
/// }
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "gvf-merge", author, version)]
#[clap(about = "gvf-merge merges SARS-CoV-2 mutation calls with functional annotations into GVF files.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Merge call sets with functional annotations into GVF files.
    /// ## Examples
    /// ```rust
    /// use gvf_merge::{Cli, cli::Command};
    /// use clap::Parser;
    /// let input = ["gvf-merge", "run", "-a", "functions.tsv", "-o", "output", "-t", "4", "B.1.1.7.tsv"];
    /// let args = Cli::parse_from(input);
    /// assert!(matches!(args.command, Command::Run(ref a) if a.threads == 4));
    /// ```
    #[clap(about = "Merge call sets with functional annotations.")]
    Run(RunArgs),
    #[clap(about = "Write the default lineage and gene configuration.")]
    Config(ConfigArgs),
}

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ValueEnum)]
pub enum Verbosity {
    #[default]
    Info,
    Warn,
    Debug,
    Error,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Convert to lowercase for RUST_LOG env var compatibility
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}

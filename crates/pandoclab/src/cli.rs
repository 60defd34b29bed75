//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pandoclab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (pandoclab.toml)
    #[arg(long, global = true, env = "PANDOCLAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pandoc executable to use instead of PANDOC_PATH or PATH lookup
    #[arg(long, global = true)]
    pub bin: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show version information of the located pandoc
    Version {
        /// Fail unless the version satisfies this range (e.g. ">=2.0, <3")
        #[arg(long)]
        require: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List input and output formats
    Formats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List pandoc releases published on GitHub
    Releases {
        /// Only releases newer than this version
        #[arg(long)]
        since: Option<String>,

        /// Only releases satisfying this range
        #[arg(long)]
        range: Option<String>,

        /// Stop after this many releases
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a release package and extract pandoc from it
    Install {
        /// Release tag (e.g., "2.19.2") or "latest"
        tag: String,

        /// Directory for downloaded packages
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Debian architecture (defaults to the host)
        #[arg(long)]
        arch: Option<String>,

        /// Directory for extracted executables
        #[arg(long)]
        bin_dir: Option<PathBuf>,

        /// Only download the package
        #[arg(long, conflicts_with = "link")]
        no_extract: bool,

        /// Point {bin-dir}/pandoc at the installed version
        #[arg(long)]
        link: bool,

        /// dpkg executable used for extraction
        #[arg(long, default_value = "dpkg")]
        dpkg: PathBuf,
    },

    /// Execute pandoc with arguments
    #[command(trailing_var_arg = true)]
    Exec {
        /// Arguments to pass to pandoc (after --)
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Convert a file (or stdin) and write the result to stdout
    Convert {
        /// Input format
        #[arg(short, long)]
        from: String,

        /// Output format
        #[arg(short, long)]
        to: String,

        /// Input file (stdin when omitted)
        input: Option<PathBuf>,

        /// Extra arguments for pandoc (after --)
        #[arg(last = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
}

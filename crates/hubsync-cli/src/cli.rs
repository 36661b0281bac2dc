//! CLI argument parsing using clap derive
//!
//! Every connection setting can come from a flag or its environment
//! variable; flags win.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};

use hubsync_core::Direction;
use hubsync_remote::ResourceKind;

/// hubsync - Sync a package of apps and drivers with a hub
#[derive(Parser, Debug)]
#[command(name = "hubsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the hub and the package are
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Hub address (host, IP or base URL)
    #[arg(long, env = "HUBITAT", global = true)]
    pub host: Option<String>,

    /// Package directory to sync
    #[arg(short, long, env = "TARGET", global = true)]
    pub package: Option<String>,

    /// Directory containing packages [default: current directory]
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Config file [default: hubsync.toml/.json/.yaml if present]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Synchronize the package with the hub
    ///
    /// Examples:
    ///   hubsync sync                          # Pull hub sources into the package
    ///   hubsync sync -d upload                # Push local sources to the hub
    ///   hubsync sync -d upload --watch        # Push, then push again on every save
    ///   hubsync sync --only drivers --json    # Drivers only, machine-readable
    Sync {
        /// Which side wins: upload or retrieve
        #[arg(short, long, env = "DIRECTION", default_value = "retrieve")]
        direction: Direction,

        /// After uploading, keep watching the package and upload on change
        ///
        /// From the environment, any value except an empty one, `0`,
        /// `false`, `no`, `n` or `off` turns it on.
        #[arg(long, env = "AUTOUPLOAD", value_parser = FalseyValueParser::new())]
        watch: bool,

        /// Only sync one kind (apps or drivers)
        #[arg(long)]
        only: Option<ResourceKind>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List tracked files with their hub ids and local checksums
    Status {
        /// Only list one kind (apps or drivers)
        #[arg(long)]
        only: Option<ResourceKind>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Open tracked files in the hub's code editor
    Open {
        /// File names to open, without extension [default: all]
        names: Vec<String>,

        /// Only open one kind (apps or drivers)
        #[arg(long)]
        only: Option<ResourceKind>,

        /// Print the editor URLs instead of launching a browser
        #[arg(long)]
        print: bool,
    },
}

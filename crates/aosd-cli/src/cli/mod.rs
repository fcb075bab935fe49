//! CLI for aosd.

mod commands;

use anyhow::Result;
use aosd_core::config::{self, AosdConfig};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};

use commands::{run_completions, run_download, run_search};

/// Top-level CLI for the Apple open-source tarball downloader.
#[derive(Debug, Parser)]
#[command(name = "aosdownload")]
#[command(about = "Download Apple open-source tarballs by keyword", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/aosd/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a keyword and download every file of the matched resource.
    Download {
        /// Resource keyword, e.g. "objc4" or "corefoundation". Case and spaces are ignored.
        keyword: String,

        /// Directory under which `<resource>/` is created (default: config or current directory).
        dest: Option<String>,
    },

    /// Show which resources a keyword matches, without downloading.
    Search {
        /// Resource keyword.
        keyword: String,
    },

    /// Print a shell completion script to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Download { keyword, dest } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_download(&cfg, &keyword, dest.as_deref())?;
            }
            CliCommand::Search { keyword } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_search(&cfg, &keyword)?;
            }
            CliCommand::Completions { shell } => run_completions(shell)?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> Result<AosdConfig> {
    let cfg = match path {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;

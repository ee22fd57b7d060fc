//! Operator CLI for inistore configuration files.
//!
//! Thin wrapper over [`inistore::ConfigStore`] for shell scripts and manual
//! poking at device configuration:
//!
//! ```text
//! inistore --file cbm.conf get --section Drive8 Transfer
//! inistore --file cbm.conf set --section Drive8 Transfer parallel
//! inistore --file cbm.conf has --section Drive8 Transfer
//! inistore --file cbm.conf list
//! ```
//!
//! `get` prints the raw value to stdout; a missing entry exits with status 1
//! and prints nothing, so scripts can use `$?` directly.  `set` creates the
//! file, the section and the entry as needed and flushes on success.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use inistore::ConfigStore;

#[derive(Parser)]
#[command(name = "inistore", version, about = "Inspect and edit INI-style configuration files")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long)]
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value of an entry.
    Get {
        /// Section name; omit to address entries before the first header.
        #[arg(short, long)]
        section: Option<String>,
        /// Entry name (exact, case-sensitive).
        entry: String,
    },

    /// Set the value of an entry, creating file, section and entry as needed.
    Set {
        /// Section name; omit to address entries before the first header.
        #[arg(short, long)]
        section: Option<String>,
        /// Entry name (exact, case-sensitive).
        entry: String,
        /// New value.
        value: String,
    },

    /// Exit with status 0 when an entry exists, 1 when it does not.
    Has {
        /// Section name; omit to address entries before the first header.
        #[arg(short, long)]
        section: Option<String>,
        /// Entry name (exact, case-sensitive).
        entry: String,
    },

    /// List all sections and their named entries.
    List,
}

fn main() -> anyhow::Result<ExitCode> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    debug!(file = %cli.file.display(), "operating on configuration file");

    match cli.command {
        Command::Get { section, entry } => {
            let store = open(&cli.file)?;
            match store.get(section.as_deref(), &entry) {
                Some(value) => {
                    println!("{value}");
                    Ok(ExitCode::SUCCESS)
                }
                None => Ok(ExitCode::FAILURE),
            }
        }

        Command::Set {
            section,
            entry,
            value,
        } => {
            let mut store = ConfigStore::create(&cli.file)
                .with_context(|| format!("cannot open or create {}", cli.file.display()))?;
            store.set(section.as_deref(), &entry, &value);
            store
                .close()
                .with_context(|| format!("cannot write {}", cli.file.display()))?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Has { section, entry } => {
            let store = open(&cli.file)?;
            if store.contains(section.as_deref(), &entry) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }

        Command::List => {
            let store = open(&cli.file)?;
            for section in store.sections() {
                if let Some(name) = section.name() {
                    println!("[{name}]");
                }
                for entry in section.entries() {
                    if let Some(name) = entry.name() {
                        println!("{}={}", name, entry.value());
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open(file: &Path) -> anyhow::Result<ConfigStore> {
    ConfigStore::open(file).with_context(|| format!("cannot open {}", file.display()))
}

//! ORMETA Command-Line Inspector
//!
//! Loads an entity configuration file and answers questions about it.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod executor;
mod formatter;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use tracing_subscriber::EnvFilter;

/// ORMETA Command-Line Inspector
#[derive(Parser, Debug)]
#[command(name = "ormeta")]
#[command(version, about = "Inspect ORMETA entity configuration")]
pub struct Args {
    /// Entity configuration file (JSON)
    #[arg(short, long, default_value = "entities.json")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List packages and their entities
    Entities,

    /// Show the derived schema of an entity
    Schema {
        /// Entity name
        entity: String,
    },

    /// Rewrite qualified columns as seen from an entity
    Rewrite {
        /// Entity the scope is compiled against
        entity: String,
        /// Columns such as `orders.total` or `customers.name`
        #[arg(required = true)]
        columns: Vec<String>,
    },

    /// Show the allow-list key of a morph attribute
    MorphKey {
        /// Entity declaring the morph attribute
        entity: String,
        /// Morph attribute name
        attribute: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ormeta=info")),
        )
        .init();

    let args = Args::parse();
    let formatter = formatter::create_formatter(args.format);

    match executor::execute(&args.config, &args.command, &*formatter) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{}", formatter.format_error(&e.to_string()));
            std::process::exit(1);
        }
    }
}

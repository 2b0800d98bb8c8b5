//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use upsell_core::OfferingKey;

#[derive(Debug, Parser)]
#[command(name = "upsell-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Resolve paywall offerings and run purchases against a store fixture")]
pub struct Cli {
    /// JSON store fixture (catalog + scripted purchase behavior)
    #[arg(long, env = "UPSELL_FIXTURE")]
    pub fixture: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the configured offerings and print their buttons
    Offerings,
    /// Resolve, then purchase the product behind an offering
    Buy {
        /// Offering key, e.g. annual_cats
        offering: OfferingKey,
    },
    /// Leave the paywall without purchasing
    Skip,
}

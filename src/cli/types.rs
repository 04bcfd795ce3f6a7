//! Command-line argument types.

use clap::{Parser, Subcommand};

use super::commands::preview::PreviewArgs;
use super::commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "strategic-relay")]
#[command(about = "Relay strategic updates into GitHub issues", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server
    Serve(ServeArgs),

    /// Show the issues a payload would create without sending them
    Preview(PreviewArgs),
}

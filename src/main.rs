//! Strategic relay CLI entry point.

use clap::Parser;

use strategic_relay::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => strategic_relay::cli::commands::serve::execute(args, cli.json).await,
        Commands::Preview(args) => {
            strategic_relay::cli::commands::preview::execute(args, cli.json).await
        }
    };

    if let Err(err) = result {
        strategic_relay::cli::handle_error(err, cli.json);
    }
}

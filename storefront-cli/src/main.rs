//! storefront - terminal storefront for the skincare shop backend
//!
//! Browse the catalog, keep a cart in the local session directory and place
//! orders against the configured API.

mod cli;
mod logger;

use std::process;

use clap::Parser;

#[tokio::main]
async fn main() {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    logger::init_logger(cli.log_dir());

    if let Err(e) = cli.run().await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

mod cli;
mod commands;
mod extractor;
mod mcp;
mod naming;
mod page_range;
mod pdf;
mod preview;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path, json } => {
            commands::info::run(&path, json)?;
        }
        Commands::Preview { path, pages } => {
            commands::preview::run(&path, &pages)?;
        }
        Commands::Extract {
            path,
            pages,
            dest,
            names,
            strict,
            continue_numbering,
            max_name_len,
            json,
        } => {
            let args = commands::extract::ExtractArgs {
                pages: &pages,
                destination: &dest,
                names: &names,
                options: cli::extract_options(strict, continue_numbering, max_name_len),
                json,
            };
            commands::extract::run(&path, args)?;
        }
    }

    Ok(())
}

// stdout carries command output and the MCP transport, so logs go to stderr
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

//! # Stackwright - Tech Stack Architect
//!
//! The main binary: HTTP REST API server and CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! stackwright server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! stackwright validate -f stack.json
//! stackwright validate -f stack.json --remote
//! stackwright stacks
//! stackwright export <id> -o stack.json
//! ```

use clap::Parser;
use stackwright::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // STACKWRIGHT_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("STACKWRIGHT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose {
        "stackwright=debug,stackwright_core=debug,tower_http=debug"
    } else {
        "stackwright=info,stackwright_core=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  ┌─┐┌┬┐┌─┐┌─┐┬┌─┬ ┬┬─┐┬┌─┐┬ ┬┌┬┐
  └─┐ │ ├─┤│  ├┴┐│││├┬┘││ ┬├─┤ │
  └─┘ ┴ ┴ ┴└─┘┴ ┴└┴┘┴└─┴└─┘┴ ┴ ┴

  Tech Stack Architect v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

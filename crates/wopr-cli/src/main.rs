//! WOPR CLI — entry point.
//!
//! Drives the INIT → LOGIN → READY loop against the remote WOPR service.
//! Exit status: 0 on any graceful shutdown (quit, interrupt, end-of-input),
//! 1 when LOGON is rejected or the service cannot be reached.

mod dispatch;
mod helpers;
mod login;
mod machine;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use wopr_client::WoprClient;
use wopr_core::config::load_config;
use wopr_core::session::SessionStore;

use crate::login::StaticGate;
use crate::machine::Wopr;

/// The single name LOGON accepts.
const ACCEPTED_LOGON: &str = "joshua";

/// WOPR terminal client
#[derive(Parser)]
#[command(name = "wopr", version, about, long_about = None)]
struct Cli {
    /// Session file path (defaults to `wopr_session.json` in the working
    /// directory)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let config = load_config(None);
    let store = SessionStore::new(cli.session_file);
    let client = WoprClient::new(&config);
    let gate = StaticGate::new(ACCEPTED_LOGON);

    let mut wopr = match Wopr::new(store, Box::new(client), Box::new(gate)) {
        Ok(wopr) => wopr,
        Err(e) => {
            eprintln!("Failed to start terminal: {e}");
            return ExitCode::FAILURE;
        }
    };

    match wopr.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // User-facing text was already printed where the condition
            // surfaced; here we only pick the exit status.
            debug!(error = %e, "run ended with a fatal condition");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("wopr_core=debug,wopr_client=debug,wopr_cli=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

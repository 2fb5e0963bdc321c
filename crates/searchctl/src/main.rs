mod telemetry;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use searchctl_api::{Outcome, ServiceKind, Targets, Verdict, wait_for_service};
use tracing::error;

#[derive(Parser)]
#[command(
    name = "searchctl",
    about = "searchctl — command-line client for searchctl clusters"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify that a service is ready to use (query by default).
    Status {
        /// Service to check: query, document, or deploy.
        service: Option<ServiceKind>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Status { service } => status(service.unwrap_or(ServiceKind::Query)).await,
    }
}

async fn status(kind: ServiceKind) -> ExitCode {
    let targets = match Targets::from_env() {
        Ok(targets) => targets,
        Err(e) => {
            error!(%e, "invalid target configuration");
            eprintln!("invalid target configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match wait_for_service(kind, &targets).await {
        Ok(verdict) => {
            report(kind, &verdict);
            ExitCode::from(exit_code(&verdict.outcome))
        }
        Err(e) => {
            eprintln!("status check for {kind} service failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn report(kind: ServiceKind, verdict: &Verdict) {
    match &verdict.outcome {
        Outcome::Ready => println!(
            "{kind} service is ready ({} attempt(s), {:.1?})",
            verdict.attempts, verdict.elapsed
        ),
        Outcome::TimedOut => eprintln!(
            "{kind} service did not become ready within {:.1?} ({} attempt(s))",
            verdict.elapsed, verdict.attempts
        ),
        Outcome::Failed(cause) => eprintln!("{kind} service is unreachable: {cause}"),
    }
}

/// 0 ready, 2 timed out, 3 never reachable, 1 anything else.
fn exit_code(outcome: &Outcome) -> u8 {
    match outcome {
        Outcome::Ready => 0,
        Outcome::TimedOut => 2,
        Outcome::Failed(_) => 3,
    }
}

//! Command-line front for the help-desk AI gateway.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use helpdesk_ai_gateway::application::AiGateway;
use helpdesk_ai_gateway::config::{AppConfig, LogFormat, TelemetryConfig};
use helpdesk_ai_gateway::domain::triage::AnalysisRequest;

#[derive(Parser)]
#[command(
    name = "helpdesk-ai-gateway",
    about = "Ticket triage, reply suggestions and free text through the resilient AI gateway",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a ticket (category, priority, confidence)
    Analyze {
        /// Ticket title
        title: String,

        /// Ticket description
        description: Vec<String>,
    },

    /// Classify the sentiment of a message
    Sentiment {
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Suggest a reply for a ticket
    Suggest {
        /// Ticket identifier echoed in the suggestion
        ticket_id: String,

        /// Issue type chosen by the requester (e.g. Hardware, Rede)
        issue_type: String,

        /// Message from the requester
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Send a free-text prompt
    Ask {
        #[arg(required = true)]
        prompt: Vec<String>,
    },

    /// Show availability and endpoint health
    Status,
}

fn init_tracing(telemetry: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&telemetry.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match telemetry.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

async fn run(gateway: &AiGateway, command: Command) -> Result<serde_json::Value, serde_json::Error> {
    let output = match command {
        Command::Analyze { title, description } => {
            let request = AnalysisRequest::new(title, description.join(" "));
            serde_json::to_value(gateway.analyze(&request).await)?
        }
        Command::Sentiment { message } => {
            serde_json::to_value(gateway.analyze_sentiment(&message.join(" ")).await)?
        }
        Command::Suggest {
            ticket_id,
            issue_type,
            message,
        } => serde_json::to_value(
            gateway
                .generate_response_suggestion(&ticket_id, &issue_type, &message.join(" "))
                .await,
        )?,
        Command::Ask { prompt } => json!({ "text": gateway.send_free_text(&prompt.join(" ")).await }),
        Command::Status => {
            let health = gateway.health();
            json!({
                "available": gateway.is_available(),
                "provider": gateway.provider_info(),
                "endpoint": health.key,
                "consecutiveFailures": health.consecutive_failures,
                "breakerOpen": health.breaker_open,
                "msSinceLastCall": health.last_call_at.map(|at| millis(at.elapsed())),
                "cachedAnalyses": gateway.cached_analyses(),
            })
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.telemetry);

    let gateway = match AiGateway::from_config(&config) {
        Ok(gateway) => gateway,
        Err(err) => {
            tracing::error!(error = %err, "failed to build gateway");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(
        endpoint = %gateway.settings().endpoint_key,
        mock_only = gateway.settings().mock_only,
        "gateway ready"
    );

    match run(&gateway, cli.command).await {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize output");
            ExitCode::FAILURE
        }
    }
}

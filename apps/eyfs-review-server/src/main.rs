//! EYFS Policy Review Server
//!
//! Reviews early years policy documents against the EYFS statutory framework
//! (November 2024) using an external completion service, and exports the
//! findings as a Word-compatible narrative report.
//!
//! ## Modes
//!
//! - `serve`: HTTP service with an upload page and a JSON API
//! - `review <path>`: one-shot review of a local file, writing the report to disk
//!
//! Every option can also be set through the environment; a `.env` file in
//! the working directory is loaded first.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use compliance_engine::{AnalysisOrchestrator, AnthropicClient, AnthropicConfig};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod app;
mod error;
mod pages;
mod review;
mod session;
mod state;

use state::AppState;

/// Command-line arguments for the review server
#[derive(Parser, Debug)]
#[command(name = "eyfs-review", version)]
#[command(about = "EYFS policy review against the November 2024 statutory framework")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true, env = "EYFS_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP review service
    Serve(ServeArgs),
    /// Review a single policy file and write the report
    Review(ReviewArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "EYFS_PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "EYFS_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Rate limit: requests per second per IP
    #[arg(long, env = "EYFS_RATE_LIMIT", default_value = "10")]
    rate_limit: u32,

    /// Largest accepted upload request in megabytes
    #[arg(long, env = "EYFS_MAX_UPLOAD_MB", default_value = "25")]
    max_upload_mb: usize,

    #[command(flatten)]
    completion: CompletionArgs,
}

#[derive(Args, Debug)]
struct ReviewArgs {
    /// Policy document to review (.docx, .doc, .pdf or plain text)
    path: PathBuf,

    /// Directory the report is written to
    #[arg(long, env = "EYFS_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    #[command(flatten)]
    completion: CompletionArgs,
}

/// Completion service settings shared by both modes
#[derive(Args, Debug)]
struct CompletionArgs {
    /// API key for the completion service
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Completion service base URL
    #[arg(long, env = "EYFS_COMPLETION_URL")]
    base_url: Option<String>,

    /// Model used for both analysis calls
    #[arg(long, env = "EYFS_MODEL")]
    model: Option<String>,

    /// Maximum tokens per completion
    #[arg(long, env = "EYFS_MAX_TOKENS", default_value = "4096")]
    max_tokens: u32,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long, env = "EYFS_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl CompletionArgs {
    fn into_config(self) -> AnthropicConfig {
        let defaults = AnthropicConfig::default();
        AnthropicConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            api_key: self.api_key,
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
        }
    }

    fn orchestrator(self) -> anyhow::Result<AnalysisOrchestrator> {
        let client = AnthropicClient::new(self.into_config())?;
        info!(model = client.model(), "Completion client ready");
        Ok(AnalysisOrchestrator::with_default_extractor(Arc::new(client)))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Review(args) => {
            let orchestrator = args.completion.orchestrator()?;
            review::run(&args.path, &args.out_dir, &orchestrator).await?;
            Ok(())
        }
    }
}

/// Burst allowance for the per-IP limiter: twice the steady rate
fn burst_size(rate_limit: u32) -> u32 {
    rate_limit.saturating_mul(2)
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    info!("Starting EYFS review server on {}:{}", args.host, args.port);

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(burst_size(args.rate_limit))
            .finish()
            .ok_or_else(|| anyhow!("Rate limit must be greater than zero"))?,
    );

    let max_upload_bytes = args.max_upload_mb * 1024 * 1024;
    let state = Arc::new(
        AppState::new(args.completion.orchestrator()?).with_upload_limit(max_upload_bytes),
    );

    let app = app::router(state).layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Upload limit: {}MB", args.max_upload_mb);

    // Peer addresses are needed for per-IP rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

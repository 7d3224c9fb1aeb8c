//! Strictly Puzzles - MCP server binary
//!
//! Serves the simulator tools over stdio or streamable HTTP.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use rmcp::ServiceExt;
use strictly_puzzles::{
    Cli, Command, PuzzleServer, SessionRegistry, SimulatorConfig, SimulatorTools,
};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    let config = load_config(&cli)?;
    let registry = SessionRegistry::from_config(&config);
    let sweeper = registry.spawn_sweeper(config.sweep_interval());
    let tools = SimulatorTools::new(registry);

    let result = match cli.command {
        Command::Server => run_mcp_server(tools).await,
        Command::Http { port, host } => run_http_server(tools, host, port).await,
    };

    sweeper.abort();
    result
}

/// Logs go to stderr so stdio mode keeps stdout for the protocol.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_puzzles=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file and applies command-line overrides.
#[instrument(skip_all, fields(config_path = %cli.config.display()))]
fn load_config(cli: &Cli) -> Result<SimulatorConfig> {
    let mut config = SimulatorConfig::load(Some(&cli.config))?;
    if let Some(secs) = cli.ttl_secs {
        config = config.with_session_ttl_secs(secs);
    }
    if let Some(secs) = cli.sweep_interval_secs {
        config = config.with_sweep_interval_secs(secs);
    }
    config.validate()?;
    info!(
        ttl_secs = *config.session_ttl_secs(),
        sweep_interval_secs = *config.sweep_interval_secs(),
        max_puzzle_size = *config.max_puzzle_size(),
        "Configuration resolved"
    );
    Ok(config)
}

/// Run the MCP simulator server (stdio mode)
async fn run_mcp_server(tools: SimulatorTools) -> Result<()> {
    info!("Starting Strictly Puzzles MCP server");

    let server = PuzzleServer::with_tools(tools);

    info!("Server ready - connect via MCP protocol");
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

/// Run the MCP simulator server over HTTP
async fn run_http_server(tools: SimulatorTools, host: String, port: u16) -> Result<()> {
    use axum::{Router, body::Body, http::Request};
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager,
        tower::{StreamableHttpServerConfig, StreamableHttpService},
    };
    use std::sync::Arc;
    use tower::ServiceBuilder;

    info!("Starting Strictly Puzzles MCP server on HTTP");

    let session_manager = Arc::new(LocalSessionManager::default());
    let config = StreamableHttpServerConfig::default();
    debug!(?config, "HTTP service configuration");

    // Every MCP connection gets its own handler over the shared registry.
    let http_service = StreamableHttpService::new(
        move || {
            debug!("Creating PuzzleServer instance with shared registry");
            Ok(PuzzleServer::with_tools(tools.clone()))
        },
        session_manager,
        config,
    );

    let app = Router::new().fallback_service(
        ServiceBuilder::new()
            .map_request(|req: Request<Body>| {
                debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
                req
            })
            .service(tower::service_fn(move |req: Request<Body>| {
                let mut service = http_service.clone();
                async move {
                    let uri = req.uri().clone();
                    let result = tower::Service::call(&mut service, req).await;
                    match &result {
                        Ok(resp) => debug!(status = ?resp.status(), uri = %uri, "Response sent"),
                        Err(e) => warn!(error = ?e, uri = %uri, "Request failed"),
                    }
                    result
                }
            })),
    );

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(host = %host, port, "Server ready at http://{}:{}/", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use surfboard_exporter::{
    config::Config,
    errors::AppError,
    ingestor::{CallbackSink, Poller},
    metrics::ExporterMetrics,
    models::{DownstreamChannelReading, UpstreamChannelReading},
    sources::SurfboardClient,
    utils::UrlUtils,
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "surfboard-exporter")]
#[command(version)]
#[command(about = "Prometheus exporter for ARRIS SURFboard cable modem channel statistics")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path (defaults to $CONFIG_FILE, then config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Modem base URL (overrides config file)
    #[arg(short = 'b', long, value_name = "URL")]
    base_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Poll the modem once, print the snapshot as JSON and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.log_level == "trace" {
        format!("surfboard_exporter={},tower_http=trace", cli.log_level)
    } else {
        format!("surfboard_exporter={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SURFboard exporter v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load_from_file(path)?;
            info!("Configuration loaded from: {}", path);
            config
        }
        None => Config::load()?,
    };

    config.apply_env_overrides();
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(base_url) = cli.base_url {
        config.device.base_url = base_url;
    }
    config.validate()?;

    let client = SurfboardClient::new(&config.device).map_err(AppError::from)?;
    info!(
        "Using modem at {}",
        UrlUtils::obfuscate_credentials(client.base_url())
    );

    if cli.once {
        let sink = CallbackSink::new(
            |reading: &UpstreamChannelReading| debug!(?reading, "upstream"),
            |reading: &DownstreamChannelReading| debug!(?reading, "downstream"),
        );
        let poller = Poller::new(Box::new(client), Arc::new(sink), config.poller.interval);
        let snapshot = poller.run_cycle().await.map_err(AppError::from)?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let metrics =
        ExporterMetrics::new(config.metrics.evict_stale_series).map_err(AppError::from)?;
    let poller = Poller::new(
        Box::new(client),
        Arc::new(metrics.clone()),
        config.poller.interval,
    );

    let server = WebServer::new(&config.web, metrics)?;
    let addr = server.addr();

    let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
    let server_handle = tokio::spawn(server.serve_with_signal(ready_tx));
    match ready_rx.await {
        Ok(Ok(())) => info!("Serving metrics on http://{}/metrics", addr),
        Ok(Err(e)) => {
            error!("{}", e);
            return Err(e);
        }
        Err(_) => {
            return Err(AppError::internal("web server exited before reporting readiness").into());
        }
    }

    let poller_handle = tokio::spawn(async move { poller.run().await });

    let result = server_handle.await?;
    poller_handle.abort();
    info!("Shutdown complete");

    result
}

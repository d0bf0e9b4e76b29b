use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shutterlink::{config::Config, services::ImageShareService, web::WebServer};

#[derive(Parser)]
#[command(name = "shutterlink")]
#[command(version)]
#[command(about = "Ephemeral photo sharing service that hands back scannable QR codes")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Public base URL used in QR code links (overrides config file)
    #[arg(short = 'b', long, value_name = "URL")]
    base_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("shutterlink={},tower_http=trace", cli.log_level)
    } else {
        format!("shutterlink={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shutterlink v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(base_url) = cli.base_url {
        config.web.base_url = base_url;
    }

    let image_service = ImageShareService::from_config(&config)?;
    image_service.prepare().await?;
    info!(
        "Upload storage ready at {} (retention {})",
        config.storage.upload_path.display(),
        config.storage.retention
    );

    // Expired uploads are normally evicted opportunistically when images
    // are resolved; a periodic sweep only runs if configured.
    if let Some(raw_interval) = &config.storage.sweep_interval {
        let sweep_interval = humantime::parse_duration(raw_interval).map_err(|e| {
            anyhow::anyhow!("Invalid sweep_interval '{}': {}", raw_interval, e)
        })?;
        tokio::spawn(image_service.clone().start_sweeper(sweep_interval));
    }

    let server = WebServer::new(&config, image_service)?;
    info!("Web server listening on {}:{}", server.host(), server.port());
    server.serve().await
}

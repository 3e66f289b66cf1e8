//! SeaCloud - file storage gateway

use clap::Parser;
use seacloud_server::{run_server, server::ctrl_c, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "seacloud")]
#[command(about = "HTTP gateway for SeaCloud file storage backed by a SeaweedFS filer")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SEACLOUD_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SEACLOUD_PORT")]
    port: u16,

    /// SeaweedFS filer URL
    #[arg(long, default_value = "http://localhost:8888", env = "SEAWEEDFS_FILER_SERVER")]
    filer_url: String,

    /// Filer root segment holding all user files
    #[arg(long, default_value = "buckets", env = "SEAWEEDFS_ROOT")]
    filer_root: String,

    /// Filer request timeout in seconds
    #[arg(long, default_value = "30", env = "FILER_TIMEOUT_SECS")]
    filer_timeout: u64,

    /// Comma-separated CORS origins (empty allows any)
    #[arg(long, default_value = "", env = "ALLOW_ORIGINS")]
    allow_origins: String,

    /// Forward downloads as streams instead of buffering them
    #[arg(long, env = "SEACLOUD_STREAM_DOWNLOADS")]
    stream_downloads: bool,

    /// Maximum request body size in bytes
    #[arg(long, default_value = "104857600", env = "SEACLOUD_MAX_BODY_SIZE")]
    max_body_size: usize,

    /// Enable debug logging
    #[arg(short, long, env = "SEACLOUD_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "seacloud_server={level},seacloud_filer={level},tower_http=debug",
                level = log_level
            )
            .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SeaCloud on {}:{}", args.host, args.port);
    tracing::info!("Filer: {} (root /{})", args.filer_url, args.filer_root);

    if args.stream_downloads {
        tracing::info!("Downloads are streamed from the filer");
    }

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        filer_url: args.filer_url,
        filer_root: args.filer_root,
        filer_timeout_secs: args.filer_timeout,
        stream_downloads: args.stream_downloads,
        max_body_size: args.max_body_size,
        cors_origins: ServerConfig::parse_origins(&args.allow_origins),
        ..Default::default()
    };

    run_server(config, ctrl_c()).await
}

//! WhereAmI-RS server entry point

use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use whereami_rs::{
    config,
    network::HttpClient,
    provider::{PlaceSearchProvider, ProviderLoader},
    web::{create_router, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    let mut config_path: Option<PathBuf> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("error: {} requires a file argument", arg);
                    print_usage();
                    std::process::exit(2);
                }
            },
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-V" | "--version" => {
                println!("whereami-rs {}", whereami_rs::VERSION);
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{}'", other);
                print_usage();
                std::process::exit(2);
            }
        }
    }

    // Load configuration
    let settings = config::load(config_path.as_deref())?;

    // Initialize logging, RUST_LOG wins over the configured level
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting WhereAmI-RS v{}", whereami_rs::VERSION);
    info!(
        "Loaded configuration for instance: {}",
        settings.general.instance_name
    );

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Load provider
    let provider = ProviderLoader::load(&settings, client)?;
    info!("Using place search provider: {}", provider.name());

    // Create application state
    let state = AppState::new(settings.clone(), provider)?;
    info!("Application state initialized");

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
WhereAmI-RS v{}
Resolve an approximate position and nearby place names into a coordinate

USAGE:
    whereami-rs [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    WHEREAMI_SETTINGS_PATH  Path to settings.yml
    WHEREAMI_DEBUG          Enable debug logging (true/false)
    WHEREAMI_PORT           Server port
    WHEREAMI_BIND_ADDRESS   Bind address
    WHEREAMI_API_KEY        Place search provider API key
    WHEREAMI_PROVIDER_URL   Place search provider base URL
    RUST_LOG                Log filter, overrides the debug setting
"#,
        whereami_rs::VERSION
    );
}

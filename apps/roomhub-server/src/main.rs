use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use roomhub::config::RoomhubConfig;
use roomhub::Roomhub;
use runtime::{AppConfig, AppConfigProvider, CliArgs};
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const API_INGRESS: &str = "api_ingress";

/// Roomhub Server - shared-household scheduling backend
#[derive(Parser)]
#[command(name = "roomhub-server")]
#[command(about = "Roomhub Server - shared-household scheduling backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Roomhub Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, cli.port).await,
        Commands::Check => check_config(config, cli.port),
    }
}

/// Ingress settings with the listen address resolved.
///
/// Without an explicit `modules.api_ingress.bind_addr` the server section's
/// `host:port` is used. `--port` always wins over the configured port.
fn ingress_config(provider: &AppConfigProvider, cli_port: Option<u16>) -> Result<ApiIngressConfig> {
    let mut cfg: ApiIngressConfig = provider.module_config(API_INGRESS)?;

    let explicit = provider
        .get_module_config(API_INGRESS)
        .and_then(|v| v.get("bind_addr"))
        .is_some();
    if !explicit {
        let server = &provider.app().server;
        cfg.bind_addr = format!("{}:{}", server.host, server.port);
    } else if let Some(port) = cli_port {
        let mut addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", cfg.bind_addr))?;
        addr.set_port(port);
        cfg.bind_addr = addr.to_string();
    }
    Ok(cfg)
}

async fn run_server(config: AppConfig, cli_port: Option<u16>) -> Result<()> {
    tracing::info!("Initializing modules...");
    let provider = AppConfigProvider::new(config);

    let ingress = ApiIngress::new(ingress_config(&provider, cli_port)?);

    let roomhub = Roomhub::default();
    roomhub.init_from_provider(&provider).await?;

    ingress.register_openapi(roomhub.openapi());
    let router = ingress.build_router(roomhub.register_rest(axum::Router::new())?);

    let listener = ingress.bind().await?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signals");
        }
        on_signal.cancel();
    });

    ingress.serve(listener, router, cancel).await?;
    tracing::info!("Roomhub Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, cli_port: Option<u16>) -> Result<()> {
    tracing::info!("Checking configuration...");
    let provider = AppConfigProvider::new(config);

    let ingress = ingress_config(&provider, cli_port)?;
    ingress
        .bind_addr
        .parse::<SocketAddr>()
        .with_context(|| format!("Invalid bind address '{}'", ingress.bind_addr))?;
    let _: RoomhubConfig = provider.module_config(roomhub::module::MODULE_NAME)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Listening address: {}", ingress.bind_addr);
    println!("{}", provider.app().to_yaml()?);
    Ok(())
}

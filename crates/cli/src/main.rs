use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use autotask_app::config::{load_config, load_config_from_path, validate_config};
use autotask_app::{Application, ApplicationRegistry, CommandLauncher, DemoApplication};
use autotask_tools::{TOOLS_URL_ENV, ToolsClient};
use autotask_types::DEMO_MANIFEST;
use autotask_ui::{UiServer, resolve_bind_address};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "autotask-demo", version, about = "AutoTask demo application")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the demo application and keep it running until Ctrl-C.
    Run {
        /// Port for the UI server, overriding the config file.
        #[arg(long)]
        port: Option<u16>,
        /// Config file to load instead of the default location.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Base URL of the node service, passed on to the UI server.
        #[arg(long)]
        tools_url: Option<String>,
    },
    /// Serve the web frontend. Normally launched by `run`.
    Ui {
        #[arg(long, default_value_t = autotask_app::config::DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        address: String,
        /// Host name shown to browsers.
        #[arg(long, default_value = "localhost")]
        browser_address: String,
        #[arg(long, default_value = "info")]
        log_level: String,
        /// Base URL of the node service.
        #[arg(long)]
        tools_url: Option<String>,
    },
    /// Print the config schema as JSON.
    Schema,
    /// Print the application manifest as JSON.
    Manifest,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = match &cli.command {
        Command::Ui { log_level, .. } => log_level.as_str(),
        _ => "info",
    };
    init_tracing(log_level);

    match cli.command {
        Command::Run { port, config, tools_url } => run_demo(port, config, tools_url).await,
        Command::Ui {
            port,
            address,
            browser_address,
            tools_url,
            ..
        } => serve_ui(port, &address, browser_address, tools_url).await,
        Command::Schema => print_json(&DemoApplication::config_schema()),
        Command::Manifest => print_json(&DEMO_MANIFEST),
    }
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_demo(port: Option<u16>, config_path: Option<PathBuf>, tools_url: Option<String>) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => load_config_from_path(path).with_context(|| format!("failed to load config from {}", path.display()))?,
        None => load_config().context("failed to load config")?,
    };
    if let Some(port) = port {
        config.port = port;
        validate_config(&config)?;
    }

    let registry = ApplicationRegistry::new();
    let mut app = match tools_url {
        Some(url) => DemoApplication::with_launcher(config, registry.clone(), Arc::new(CommandLauncher::ui_server().env(TOOLS_URL_ENV, url))),
        None => DemoApplication::new(config, registry.clone()),
    };
    app.start().await.context("failed to start the demo application")?;
    if let Some(detail) = registry.current() {
        info!("{} is available at {}", detail.name, detail.local_url());
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received");
                break;
            }
            _ = ticker.tick() => {
                if !app.is_running() {
                    warn!("UI server process exited unexpectedly");
                    break;
                }
            }
        }
    }

    app.stop().await.context("failed to stop the demo application")?;
    Ok(())
}

async fn serve_ui(port: u16, address: &str, browser_address: String, tools_url: Option<String>) -> Result<()> {
    log_environment();

    let client = match tools_url {
        Some(url) => ToolsClient::new(&url)?,
        None => ToolsClient::from_env()?,
    };
    debug!(tools_url = %client.base_url(), "node service client ready");

    let bind_address = resolve_bind_address(address, port)?;
    let server = UiServer::new(bind_address, Arc::new(client))
        .with_browser_address(browser_address)
        .start()
        .await?;
    info!("Open {} in your browser", server.browser_url());

    wait_for_shutdown().await?;
    server.stop().await
}

fn log_environment() {
    match std::env::current_dir() {
        Ok(dir) => debug!("Current working directory: {}", dir.display()),
        Err(error) => debug!("Current working directory unavailable: {error}"),
    }
    match std::env::current_exe() {
        Ok(exe) => debug!("Executable: {}", exe.display()),
        Err(error) => debug!("Executable path unavailable: {error}"),
    }
    if let Some(path) = std::env::var_os("PATH") {
        for entry in std::env::split_paths(&path) {
            debug!("PATH entry: {}", entry.display());
        }
    }
}

#[cfg(unix)]
async fn wait_for_shutdown() -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("failed to listen for Ctrl-C")?,
        _ = terminate.recv() => info!("SIGTERM received"),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")
}

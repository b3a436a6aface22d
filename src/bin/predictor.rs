//! Baccarat round-feed prediction bot.
//!
//! Watches a source Telegram channel for round announcements, publishes a
//! suit prediction for the following round, and confirms or refutes it once
//! the next round's result is finalized. Ships with:
//! - CLI arguments and TOML config file support
//! - Structured logging with tracing
//! - A liveness HTTP endpoint
//! - Periodic and daily full-state resets

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::unbounded_channel;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use baccarat_predictor::{
    normalize_channel_id, spawn_reset_timers, BotClient, EngineConfig, Error, PredictionEngine,
    TelegramPublisher, UpdatePoller,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser)]
#[command(name = "predictor")]
#[command(version, about = "Baccarat round-feed prediction bot", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "predictor.toml")]
    config: String,

    /// Bot API token (prefer the env var over config files)
    #[arg(long, env = "BOT_TOKEN")]
    bot_token: Option<String>,

    /// Source channel id, bare or -100-prefixed
    #[arg(long, env = "SOURCE_CHANNEL_ID")]
    source_channel: Option<String>,

    /// Prediction channel id, bare or -100-prefixed (0 disables publishing)
    #[arg(long, env = "PREDICTION_CHANNEL_ID")]
    prediction_channel: Option<String>,

    /// Admin user id (0 disables commands and notifications)
    #[arg(long, env = "ADMIN_ID")]
    admin_id: Option<i64>,

    /// Health endpoint port (0 to disable)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output format (pretty, json, compact)
    #[arg(long)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sample config file
    GenerateConfig {
        /// Output file path
        #[arg(short, long, default_value = "predictor.toml")]
        output: String,
    },
    /// Validate config without running
    ValidateConfig,
    /// Run the bot (default)
    Run,
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot API token (prefer the BOT_TOKEN env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelConfig {
    /// Source channel watched for round announcements
    #[serde(default = "default_channel")]
    pub source: String,
    /// Prediction channel published to ("0" disables publishing)
    #[serde(default = "default_channel")]
    pub prediction: String,
}

fn default_channel() -> String {
    "0".to_string()
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            source: default_channel(),
            prediction: default_channel(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Admin user id (0 disables commands and notifications)
    #[serde(default)]
    pub user_id: i64,
    /// Whether passthrough forwarding to the admin starts enabled
    #[serde(default = "default_forward_messages")]
    pub forward_messages: bool,
}

fn default_forward_messages() -> bool {
    true
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            user_id: 0,
            forward_messages: default_forward_messages(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: pretty, json, compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringConfig {
    /// HTTP port for the liveness endpoint (0 to disable)
    #[serde(default = "default_health_port")]
    pub health_port: u16,
}

fn default_health_port() -> u16 {
    10000
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            health_port: default_health_port(),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output }) = &cli.command {
        let sample = toml::to_string_pretty(&AppConfig::default())?;
        std::fs::write(output, sample)?;
        println!("Sample config written to {output}");
        return Ok(());
    }

    let config = load_config(&cli)?;
    setup_logging(&config, &cli)?;

    // Resolve and validate settings. This is the only place a failure is
    // fatal; everything past startup degrades and logs instead.
    let token = cli
        .bot_token
        .clone()
        .or_else(|| config.telegram.bot_token.clone())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::InvalidConfig("BOT_TOKEN is not set".to_string()))?;

    let source_chat_id =
        normalize_channel_id(cli.source_channel.as_deref().unwrap_or(&config.channels.source));
    if source_chat_id == 0 {
        return Err(Error::InvalidConfig("SOURCE_CHANNEL_ID is missing or invalid".to_string()).into());
    }

    let prediction_chat_id = normalize_channel_id(
        cli.prediction_channel
            .as_deref()
            .unwrap_or(&config.channels.prediction),
    );
    let admin_id = cli.admin_id.unwrap_or(config.admin.user_id);

    info!(
        source_chat_id,
        prediction_chat_id, admin_id, "Configuration loaded"
    );

    if matches!(cli.command, Some(Commands::ValidateConfig)) {
        info!("Configuration is valid");
        return Ok(());
    }

    let client = Arc::new(BotClient::new(&token));

    let me = client
        .get_me()
        .await
        .map_err(|e| format!("Bot authentication failed: {e}"))?;
    info!(username = ?me.username, "Bot authenticated");

    // Channel access checks are advisory: the bot runs either way and the
    // flags show up in /debug.
    let source_channel_ok = check_channel(&client, source_chat_id, "source").await;
    let prediction_channel_ok = if prediction_chat_id != 0 {
        check_channel(&client, prediction_chat_id, "prediction").await
    } else {
        false
    };

    let health_port = cli.port.unwrap_or(config.monitoring.health_port);
    if health_port > 0 {
        tokio::spawn(serve_health(health_port));
    }

    let (sender, receiver) = unbounded_channel();
    spawn_reset_timers(sender.clone());
    tokio::spawn(UpdatePoller::new(client.clone(), sender).run());

    let publisher = TelegramPublisher::new(
        client,
        prediction_chat_id,
        admin_id,
        prediction_channel_ok,
    );
    let engine = PredictionEngine::new(
        EngineConfig {
            source_chat_id,
            prediction_chat_id,
            admin_id,
            forward_to_admin: config.admin.forward_messages,
            source_channel_ok,
            prediction_channel_ok,
        },
        publisher,
    );

    info!("Bot operational, waiting for messages...");
    tokio::select! {
        _ = engine.run(receiver) => {}
        _ = shutdown_signal() => {
            info!("Shutdown signal received, stopping");
        }
    }
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn load_config(cli: &Cli) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config_path = &cli.config;
    if Path::new(config_path).exists() {
        let content = std::fs::read_to_string(config_path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    } else {
        // Env vars and CLI flags cover everything a config file would
        Ok(AppConfig::default())
    }
}

fn setup_logging(config: &AppConfig, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = cli.log_level.as_ref().unwrap_or(&config.logging.level);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(level)
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap())
    });

    let format = cli.log_format.as_ref().unwrap_or(&config.logging.format);
    match format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .compact()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
        }
    }
    Ok(())
}

async fn check_channel(client: &BotClient, chat_id: i64, label: &str) -> bool {
    match client.get_chat(chat_id).await {
        Ok(chat) => {
            info!(chat_id, title = ?chat.title, "Access to {label} channel verified");
            true
        }
        Err(e) => {
            warn!(chat_id, error = %e, "Cannot access {label} channel");
            false
        }
    }
}

async fn serve_health(port: u16) {
    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .route("/health", get(|| async { "OK" }));

    let addr = format!("0.0.0.0:{port}");
    info!(port, "Starting health endpoint");
    match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                warn!(error = %e, "Health server error");
            }
        }
        Err(e) => {
            warn!(error = %e, port, "Failed to bind health port");
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

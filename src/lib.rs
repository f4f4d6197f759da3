pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::path::Path;
use tokio::signal;

use anyhow::Context;
use cli::{Cli, Commands};
pub use config::Config;
use db::Store;
use services::auth_service::RegisterRequest;
use services::{AuthService, SeaOrmAuthService};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Loads the config from `path` if given, otherwise from the default search
/// paths, then applies environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        None => return Config::load(),
        Some(path) if path.exists() => Config::load_from_path(path)?,
        // `init` is allowed to point at a file that doesn't exist yet
        Some(_) => Config::default(),
    };
    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_logging(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Init => {
            let path = cli.config.unwrap_or_else(Config::default_config_path);
            init_config(&path)
        }
        Commands::AddUser {
            name,
            email,
            password,
            role,
        } => add_user(&config, name, email, password, role).await,
        Commands::CheckConfig => check_config(&config),
    }
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let json = config.observability.json_logs;
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json());
    let fmt_layer = (!json).then(tracing_subscriber::fmt::layer);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let mut builder = tracing_loki::builder();
        for (key, value) in &config.observability.loki_labels {
            builder = builder.label(key, value)?;
        }
        let (layer, task) = builder.build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let port = config.server.port;
    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

fn init_config(path: &Path) -> anyhow::Result<()> {
    if Config::create_default_if_missing(path)? {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists, leaving it untouched", path.display());
    }
    Ok(())
}

async fn add_user(
    config: &Config,
    name: String,
    email: String,
    password: String,
    role: String,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone());

    let session = auth
        .register(RegisterRequest {
            name,
            email,
            password,
            role: Some(role),
        })
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!(
        "Created {} account {} ({})",
        session.user.role, session.user.email, session.user.id
    );
    Ok(())
}

fn check_config(config: &Config) -> anyhow::Result<()> {
    config.validate()?;

    let mut masked = config.clone();
    masked.security.jwt_secret = "********".to_string();
    println!("{}", toml::to_string_pretty(&masked)?);
    println!("Configuration OK");
    Ok(())
}

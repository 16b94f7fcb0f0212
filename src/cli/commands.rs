use std::sync::Arc;

use tracing::{error, info};

use super::Commands;
use crate::api;
use crate::config::Config;
use crate::services::NewUser;
use crate::state::SharedState;

pub async fn execute(
    command: Commands,
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve => serve(config, prometheus_handle).await,
        Commands::Init => {
            let created = Config::create_default_if_missing()?;
            if created {
                println!("Config file created. Edit config.toml and run again.");
            } else {
                println!("Config file already exists, nothing to do.");
            }
            Ok(())
        }
        Commands::AddUser {
            username,
            password,
            group,
        } => add_user(config, username, password, group).await,
        Commands::DelUser { username, yes } => del_user(config, &username, yes).await,
        Commands::ListUsers { page } => list_users(config, page).await,
    }
}

async fn serve(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("radman v{} starting...", env!("CARGO_PKG_VERSION"));

    if !config.server.enabled {
        anyhow::bail!("Server is disabled in config.toml (server.enabled = false)");
    }

    let port = config.server.port;
    let shared = Arc::new(SharedState::new(config).await?);
    let state = api::create_app_state(shared, prometheus_handle);

    let app = api::router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server = tokio::spawn(async move {
        info!("Admin console listening at http://0.0.0.0:{}", port);
        if let Err(e) = axum::serve(listener, app).await {
            error!("Web server error: {}", e);
        }
    });

    info!("Running. Press Ctrl+C to stop.");

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }

    server.abort();
    info!("Stopped");

    Ok(())
}

async fn add_user(
    config: Config,
    username: String,
    password: String,
    group: Option<String>,
) -> anyhow::Result<()> {
    let shared = SharedState::new(config).await?;

    let created = shared
        .directory
        .create_user(NewUser {
            username,
            password: password.clone(),
            password_confirm: password,
            groupname: group,
        })
        .await?;

    println!("Created {} in group {}", created.username, created.groupname);
    Ok(())
}

async fn del_user(config: Config, username: &str, yes: bool) -> anyhow::Result<()> {
    if !yes {
        println!("Refusing to delete without --yes.");
        println!("Usage: radman del-user {} --yes", username);
        return Ok(());
    }

    let shared = SharedState::new(config).await?;
    let removed = shared.directory.delete_user(username, true).await?;

    println!("Deleted {} ({} check entries removed)", username, removed);
    Ok(())
}

async fn list_users(config: Config, page: Option<u64>) -> anyhow::Result<()> {
    let shared = SharedState::new(config).await?;
    let listing = shared.directory.list_users(page).await?;

    if listing.users.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }

    println!("{:<40} {:<20} {}", "USERNAME", "GROUP", "PRIORITY");
    println!("{:-<70}", "");
    for user in listing.users {
        println!(
            "{:<40} {:<20} {}",
            user.username,
            user.groupname.as_deref().unwrap_or("-"),
            user.priority.map_or("-".to_string(), |p| p.to_string())
        );
    }
    if listing.total_pages > 1 {
        println!();
        println!("Page {} of {}", page.unwrap_or(1), listing.total_pages);
    }

    Ok(())
}

//! Pulseboard daemon
//!
//! Keeps a cross-platform issue snapshot fresh and answers estimation and
//! story gap queries against it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use pulseboard_core::gaps::category_counts;
use pulseboard_core::models::{DashboardConfig, Platform};
use pulseboard_core::storage::init_data_dir;
use pulseboard_daemon::{AggregationManager, ConfigManager, EventManager, RefreshManager};
use pulseboard_platforms::auth::store_token;
use serde::Serialize;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "pulseboardd")]
#[command(about = "Pulseboard daemon - cross-platform issue dashboard backend", long_about = None)]
struct Args {
    /// Log level (overrides the config file)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh on the configured interval until interrupted
    Run,

    /// Estimate story points for a new story
    Estimate {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Repeatable
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Use only this platform's history (github, azuredevops, jira)
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Estimate from the most similar closed issues instead of the model
        #[arg(long, conflicts_with = "platform")]
        similarity: bool,
    },

    /// Report story gaps for open issues
    Gaps,

    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Store a platform API token in the OS keyring
    Login {
        platform: Platform,

        /// Read from stdin when omitted
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,

    /// Change daemon settings
    Set {
        #[arg(long)]
        log_level: Option<String>,

        #[arg(long)]
        refresh_interval: Option<u64>,
    },

    /// Track a GitHub repository
    Github {
        owner: String,
        repo: String,

        #[arg(long)]
        api_url: Option<String>,
    },

    /// Track an Azure DevOps project
    AzureDevops {
        organization: String,
        project: String,

        #[arg(long)]
        base_url: Option<String>,
    },

    /// Track a Jira project
    Jira {
        base_url: String,
        username: String,
        project_key: String,
    },

    Enable { platform: Platform },

    Disable { platform: Platform },

    /// Restore the default configuration
    Reset,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = ConfigManager::new()?;
    let config = config_manager.get().await;
    let log_level = args.log_level.clone().unwrap_or(config.log_level.clone());
    init_logging(&log_level)?;

    match args.command {
        Command::Run => {
            let refresh_manager = connect(&config);
            run_daemon(&config, &refresh_manager).await
        }
        Command::Estimate {
            title,
            description,
            labels,
            platform,
            similarity,
        } => {
            let refresh_manager = connect(&config);
            refresh_manager.refresh().await?;
            let result = if similarity {
                refresh_manager
                    .estimate_by_similarity(&title, &description, &labels)
                    .await?
            } else if let Some(platform) = platform {
                refresh_manager
                    .estimate_for_platform(platform, &title, &description, &labels)
                    .await?
            } else {
                refresh_manager
                    .estimate(&title, &description, &labels)
                    .await?
            };
            print_json(&result)
        }
        Command::Gaps => {
            let refresh_manager = connect(&config);
            refresh_manager.refresh().await?;
            let reports = refresh_manager.gap_reports().await?;
            for (category, count) in category_counts(&reports) {
                tracing::info!(
                    "{}: {} of {} open issues",
                    category.as_str(),
                    count,
                    reports.len()
                );
            }
            print_json(&reports)
        }
        Command::Config { action } => configure(&config_manager, action).await,
        Command::Login { platform, token } => login(platform, token),
    }
}

fn connect(config: &DashboardConfig) -> RefreshManager {
    if !config.any_enabled() {
        tracing::warn!("No platforms are enabled in the configuration");
    }

    RefreshManager::new(
        AggregationManager::from_config(config),
        Arc::new(EventManager::new()),
    )
}

async fn configure(config_manager: &ConfigManager, action: ConfigAction) -> Result<()> {
    let config = match action {
        ConfigAction::Show => config_manager.get().await,
        ConfigAction::Set {
            log_level,
            refresh_interval,
        } => {
            config_manager
                .update_daemon_config(log_level, refresh_interval)
                .await?
        }
        ConfigAction::Github {
            owner,
            repo,
            api_url,
        } => config_manager.configure_github(owner, repo, api_url).await?,
        ConfigAction::AzureDevops {
            organization,
            project,
            base_url,
        } => {
            config_manager
                .configure_azure_devops(organization, project, base_url)
                .await?
        }
        ConfigAction::Jira {
            base_url,
            username,
            project_key,
        } => {
            config_manager
                .configure_jira(base_url, username, project_key)
                .await?
        }
        ConfigAction::Enable { platform } => {
            config_manager.set_platform_enabled(platform, true).await?
        }
        ConfigAction::Disable { platform } => {
            config_manager.set_platform_enabled(platform, false).await?
        }
        ConfigAction::Reset => config_manager.reset_to_default().await?,
    };
    print_json(&config)
}

fn login(platform: Platform, token: Option<String>) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line
        }
    };
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("No token given for {}", platform);
    }

    store_token(platform, token)?;
    tracing::info!("Stored {} token in the keyring", platform);
    Ok(())
}

fn init_logging(log_level: &str) -> Result<()> {
    let data_dir = init_data_dir()?;
    let log_file_path = data_dir.join("daemon.log");

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    // Stdout carries command output, so logs go to stderr
    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let console_writer = std::io::stderr.with_max_level(tracing::Level::INFO);
    let file_writer = log_file.with_max_level(tracing::Level::DEBUG);

    tracing_subscriber::fmt()
        .with_writer(console_writer.and(file_writer))
        .with_env_filter(log_level)
        .with_ansi(false)
        .init();

    tracing::debug!("Log file: {}", log_file_path.display());
    Ok(())
}

async fn run_daemon(config: &DashboardConfig, refresh_manager: &RefreshManager) -> Result<()> {
    let interval = Duration::from_secs(config.refresh_interval_secs);
    tracing::info!(
        "Pulseboard daemon starting, refreshing every {}s",
        interval.as_secs()
    );

    tokio::select! {
        _ = refresh_manager.run_loop(interval) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutting down...");
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

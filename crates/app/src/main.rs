use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, StoreConfig, SurveyConfig, SurveyLoopService};
use survey_core::model::Rating;
use ui::{App, UiApp, build_app_context};

mod cli;
mod logging;

use crate::cli::{Cli, Command, LogFormatArg};
use crate::logging::{LogConfig, LogFormat, init_logging};

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn survey_loop(&self) -> Arc<SurveyLoopService> {
        self.services.survey_loop()
    }

    fn export_dir(&self) -> PathBuf {
        self.services.export_dir().to_path_buf()
    }
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        with_ansi: cli.log_file.is_none() && io::stderr().is_terminal(),
        log_file: cli.log_file.clone(),
        ..LogConfig::default()
    }
}

/// Layer command-line overrides on top of file + environment configuration.
fn resolve_config(cli: &Cli) -> anyhow::Result<SurveyConfig> {
    let mut config = SurveyConfig::from_env(Some(&cli.secrets))?;
    if let Some(topic) = &cli.topic {
        config = config.with_topic(topic.clone());
    }
    if let Some(size) = cli.sample_size {
        config = config.with_target_sample_size(size);
    }
    if let Some(count) = cli.fetch_count {
        config = config.with_fetch_count(count);
    }
    if let Some(db) = &cli.db {
        config = config.with_store(StoreConfig::Sqlite {
            url: normalize_sqlite_url(db)?,
        });
    }
    if let Some(dir) = &cli.export_dir {
        config = config.with_export_dir(dir.clone());
    }
    config.settings.validate()?;
    Ok(config)
}

fn normalize_sqlite_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("invalid --db value: {raw:?}");
    }
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return Ok(trimmed.to_string());
    }

    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

/// The store creates the database file but not the directory holding it.
fn prepare_sqlite_dir(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid sqlite url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid sqlite url: {db_url}");
    }

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

async fn build_services(config: &SurveyConfig) -> anyhow::Result<AppServices> {
    if let StoreConfig::Sqlite { url } = &config.store {
        prepare_sqlite_dir(url)?;
    }
    let services = AppServices::build(config, Clock::default_clock())
        .await
        .context("starting services")?;
    tracing::info!(
        topic = %config.settings.topic,
        sample_size = config.settings.target_sample_size,
        fetch_count = config.settings.fetch_count,
        store = services.store_backend(),
        "services ready"
    );
    Ok(services)
}

async fn run_preview(services: &AppServices) -> anyhow::Result<()> {
    let survey_loop = services.survey_loop();
    let mut session = survey_loop.start_session();
    survey_loop
        .begin(&mut session, Rating::default())
        .await
        .context("fetching stories")?;

    println!("Topic: {}", survey_loop.settings().topic);
    if session.exposures().is_empty() {
        println!("No usable stories found.");
    }
    for (i, exposure) in session.exposures().iter().enumerate() {
        println!("{:>2}. {}", i + 1, exposure.headline());
        println!("    {}", exposure.summary());
    }
    Ok(())
}

fn run_ui(services: AppServices) {
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // Some window managers default new windows to always-on-top.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Impression Tracker")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let services = build_services(&config).await?;
    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => {
            run_ui(services);
            Ok(())
        }
        Command::Preview => run_preview(&services).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "startup failed");
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}

//! Columbarium console entry point.
//!
//! Resolves configuration (file, environment, flags), initializes
//! logging, builds the API client, and hands control to the TUI.
//! A `check` subcommand validates the configuration and verifies the
//! session without starting the UI.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use cm_api::ApiClient;
use cm_common::error::format_error_human;
use cm_common::{Error, SessionToken};
use cm_config::{resolve_config_path, validate_settings, Settings};
use cm_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use cm_core::registry::descriptor;
use cm_core::tui::{run_tui, App, MutationOutcome, Theme};

/// Columbarium management console
#[derive(Parser)]
#[command(name = "cm-console")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the management server
    #[arg(long, env = "CM_BASE_URL")]
    base_url: Option<String>,

    /// Session token
    #[arg(long, env = "CM_SESSION_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Theme: dark, light, high-contrast, or none
    #[arg(long)]
    theme: Option<String>,

    /// Path to console.toml
    #[arg(long, env = "CM_CONFIG")]
    config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Log output format (human, jsonl)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and verify the session, without starting the UI
    Check,
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(cli.log_level, cli.log_format);
    init_logging(&log_config);

    let result = match cli.command {
        Some(Commands::Check) => run_check(&cli),
        None => run_console(&cli),
    };

    if let Err(err) = result {
        let use_color = std::env::var_os("NO_COLOR").is_none();
        eprintln!("{}", format_error_human(&err, use_color));
        std::process::exit(1);
    }
}

/// Load settings, apply flag/env overrides, and validate them.
fn resolve_settings(cli: &Cli) -> Result<Settings, Error> {
    let (path, source) = resolve_config_path(cli.config.as_deref());
    tracing::debug!(?path, ?source, "Resolved config path");

    let settings = Settings::load_or_default(path.as_deref())?.with_overrides(
        cli.base_url.clone(),
        cli.token.clone(),
        cli.theme.clone(),
    );
    validate_settings(&settings).map_err(|e| Error::Config(e.to_string()))?;
    Ok(settings)
}

fn build_client(settings: &Settings) -> Result<ApiClient, Error> {
    let token = settings
        .token
        .clone()
        .map(SessionToken::new)
        .ok_or(Error::MissingToken)?;
    ApiClient::new(
        settings.base_url.clone(),
        token,
        Duration::from_secs(settings.timeout_secs),
    )
}

/// Validate config and verify the session with one cheap request.
fn run_check(cli: &Cli) -> Result<(), Error> {
    let settings = resolve_settings(cli)?;
    println!("Config OK: base_url={}", settings.base_url);

    let client = build_client(&settings)?;
    let records = (descriptor(cm_api::EntityKind::Users).fetch)(&client)?;
    println!("Session OK: server reachable, {} user(s) visible", records.len());
    Ok(())
}

fn run_console(cli: &Cli) -> Result<(), Error> {
    let settings = resolve_settings(cli)?;
    let client = Arc::new(build_client(&settings)?);

    let theme = if std::env::var_os("NO_COLOR").is_some() {
        Theme::no_color()
    } else {
        Theme::from_name(&settings.theme)
    };
    let mut app = App::new().with_theme(theme);

    // Server calls run on ftui's task pool; errors cross the boundary
    // as strings so Msg stays Clone.
    let load_client = Arc::clone(&client);
    app.set_load_op(Arc::new(move |kind| {
        (descriptor(kind).fetch)(&load_client).map_err(|e| e.to_string())
    }));

    let save_client = Arc::clone(&client);
    app.set_save_op(Arc::new(move |kind, editing, payload| {
        let result = match editing {
            Some(id) => save_client.edit(kind, id, &payload).map(|()| "updated"),
            None => save_client.create_new(kind, &payload).map(|()| "created"),
        };
        result
            .map(|verb| MutationOutcome { verb, affected: 1 })
            .map_err(|e| e.to_string())
    }));

    let delete_client = Arc::clone(&client);
    app.set_delete_op(Arc::new(move |kind, ids| {
        delete_client
            .delete(kind, &ids)
            .map(|()| MutationOutcome {
                verb: "deleted",
                affected: ids.len(),
            })
            .map_err(|e| e.to_string())
    }));

    tracing::info!(
        target: "tui.startup",
        base_url = %settings.base_url,
        theme = %settings.theme,
        "Starting console"
    );

    run_tui(app, ftui::ProgramConfig::fullscreen())
        .map_err(|e| Error::Config(e.to_string()))
}

//! Command line front end
//!
//! `mbk --list-backends` prints the compiled-in catalog. Otherwise the
//! configured backends are started, the selected implementation per
//! capability is reported, and `--show-rewarded` plays one rewarded ad
//! through the default ads backend.

use anyhow::{Context, bail};
use clap::Parser;
use mbk_application::registry::list_backends;
use mbk_domain::events::BackendEvent;
use mbk_domain::value_objects::{CapabilityKind, ProviderKey, ResourceState};
use mbk_infrastructure::config::loader::validate_app_config;
use mbk_infrastructure::config::{AppConfig, ConfigLoader};
use mbk_infrastructure::logging::init_logging;
use mbk_infrastructure::{BackendContext, init_backends};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Upper bound on waiting for the rewarded unit to load or complete
const REWARDED_WAIT: Duration = Duration::from_secs(30);

/// Command line interface for the Multi-Backend Kit
#[derive(Parser, Debug, Default)]
#[command(name = "mbk")]
#[command(about = "Multi-Backend Kit - start backends and exercise them")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend to enable, in registration order (repeatable; replaces `backends.enabled`)
    #[arg(short, long = "backend", value_name = "KEY")]
    pub backends: Vec<String>,

    /// Fallback key for requests naming an unregistered backend
    #[arg(long, value_name = "KEY")]
    pub fallback: Option<String>,

    /// Print the compiled-in backends and exit
    #[arg(long)]
    pub list_backends: bool,

    /// Play one rewarded ad once all providers are ready
    #[arg(long)]
    pub show_rewarded: bool,
}

impl Cli {
    /// Apply command line overrides on top of loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if !self.backends.is_empty() {
            config.backends.enabled.clone_from(&self.backends);
        }
        if let Some(fallback) = &self.fallback {
            config.backends.fallback_key.clone_from(fallback);
        }
    }
}

/// Run the CLI
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.list_backends {
        print!("{}", format_backend_list());
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    validate_app_config(&config)?;
    init_logging(&config.logging)?;

    let context = init_backends(config).await?;
    let events = context.events().subscribe();

    tokio::select! {
        started = context.start() => started.context("Backends failed to start")?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted before backends were ready");
            context.shutdown().await;
            return Ok(());
        }
    }
    print!("{}", format_selection(&context));

    let outcome = if cli.show_rewarded {
        show_rewarded(&context, events).await
    } else {
        Ok(())
    };

    if !context.shutdown().await {
        info!("Background tasks were still running at exit");
    }
    outcome
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    Ok(loader.load()?)
}

/// One line per compiled-in backend family
pub fn format_backend_list() -> String {
    let backends = list_backends();
    let width = backends.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, description) in backends {
        let _ = writeln!(out, "{key:<width$}  {description}");
    }
    out
}

/// Registered keys per capability, default first
pub fn format_selection(context: &BackendContext) -> String {
    let registry = context.registry();
    let mut out = String::new();
    for kind in CapabilityKind::ALL {
        let keys = registry.keys_for(kind);
        if keys.is_empty() {
            let _ = writeln!(out, "{kind}: -");
        } else {
            let keys: Vec<&str> = keys.iter().map(ProviderKey::as_str).collect();
            let _ = writeln!(out, "{kind}: {}", keys.join(", "));
        }
    }
    out
}

async fn show_rewarded(
    context: &BackendContext,
    mut events: broadcast::Receiver<BackendEvent>,
) -> anyhow::Result<()> {
    let ads = context.service().ads(None)?;
    let unit_id = context.config().backends.ads.rewarded_id.clone();

    if !ads.is_rewarded_ready() {
        tokio::time::timeout(REWARDED_WAIT, wait_until_loaded(&mut events, &unit_id))
            .await
            .context("Rewarded ad did not load in time")??;
    }

    let (rewarded_tx, rewarded_rx) = oneshot::channel();
    ads.show_rewarded(
        Box::new(move || {
            let _ = rewarded_tx.send(());
        }),
        CancellationToken::new(),
    )
    .await?;
    tokio::time::timeout(REWARDED_WAIT, rewarded_rx)
        .await
        .context("Rewarded ad did not complete in time")?
        .context("Reward callback was dropped")?;

    println!("Reward granted by {unit_id}");
    Ok(())
}

async fn wait_until_loaded(
    events: &mut broadcast::Receiver<BackendEvent>,
    unit_id: &str,
) -> anyhow::Result<()> {
    loop {
        match events.recv().await {
            Ok(BackendEvent::AdStateChanged {
                unit_id: id,
                state: ResourceState::Loaded,
            }) if id == unit_id => return Ok(()),
            Ok(BackendEvent::AdError {
                unit_id: id,
                message,
                ..
            }) if id == unit_id => bail!("Rewarded ad failed: {message}"),
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
            Err(broadcast::error::RecvError::Closed) => bail!("Event bus closed"),
        }
    }
}

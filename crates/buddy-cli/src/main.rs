//! Buddy CLI
//!
//! Composes a buddy coordinator with one or more mounted views and replays a
//! scenario of app events against them, printing what each view shows.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use buddy_coordinator::{BuddyConfig, BuddyCoordinator, RendererKind, Scenario};
use buddy_render::{select_renderer, BuddySize, BuddyView, Platform, PlaceholderRenderer, Renderer};
use clap::Parser;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

/// Poll interval while waiting for delayed celebrations to fire (in milliseconds).
const SETTLE_POLL_MS: u64 = 50;

/// Longest time to wait for delayed celebrations after the scenario ends.
const SETTLE_TIMEOUT_MS: u64 = 5_000;

/// This build links no native animation engine.
const NATIVE_ENGINE_LINKED: bool = false;

/// Buddy - animated learning companion demo
///
/// Mounts buddy views, replays app events against them, and prints the
/// resulting state.
#[derive(Parser, Debug)]
#[command(name = "buddy")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: buddy.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Scenario file to replay (default: built-in demo session)
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<String>,

    /// Renderer for every view: native, web or placeholder
    #[arg(short, long, value_name = "KIND")]
    renderer: Option<RendererKind>,

    /// Number of buddy views to mount
    #[arg(long, default_value_t = 2)]
    views: usize,

    /// Skip the automatic app-open animation
    #[arg(long)]
    no_auto_open: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Buddy starting");
    tracing::debug!(config = ?args.config, scenario = ?args.scenario, "Arguments");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Runs one demo session:
/// 1. Load config and scenario
/// 2. Pick the renderer
/// 3. Mount the views
/// 4. Fire the app-open animation
/// 5. Replay the scenario and let delayed celebrations land
/// 6. Print the final state
async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(renderer) = args.renderer {
        config.renderer = Some(renderer);
    }
    if args.no_auto_open {
        config.auto_open_animation = false;
    }
    config.validate()?;

    let scenario = match args.scenario.as_deref() {
        Some(path) => Scenario::load_from_file(Path::new(path))?,
        None => Scenario::demo(),
    };

    let kind = config
        .renderer
        .unwrap_or_else(|| select_renderer(Platform::current(), NATIVE_ENGINE_LINKED));
    println!("Renderer: {kind}");
    println!("Scenario: {} events", scenario.event_count());

    let coordinator = BuddyCoordinator::new(config.clone());
    let views = mount_views(kind, args.views, &coordinator);
    let watcher = spawn_trigger_watcher(&coordinator, &views);

    if config.auto_open_animation {
        sleep(config.auto_open_delay()).await;
        coordinator.on_app_open();
    }

    scenario.run(&coordinator).await;
    settle(&coordinator).await;
    watcher.abort();

    print_summary(&coordinator, &views)?;
    Ok(())
}

/// Loads configuration from an explicit file or the current directory.
fn load_config(path: Option<&str>) -> anyhow::Result<BuddyConfig> {
    let config = match path {
        Some(path) => BuddyConfig::load_from_file(Path::new(path))?,
        None => BuddyConfig::load()?,
    };
    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}

/// Mounts `count` views; the first is the hero on the home screen.
fn mount_views(kind: RendererKind, count: usize, coordinator: &BuddyCoordinator) -> Vec<BuddyView> {
    (0..count)
        .map(|index| {
            let size = if index == 0 {
                BuddySize::Hero
            } else {
                BuddySize::Small
            };
            BuddyView::mount(kind, size, coordinator)
        })
        .collect()
}

/// Feeds tap and wink counters to placeholder views as they change.
fn spawn_trigger_watcher(coordinator: &BuddyCoordinator, views: &[BuddyView]) -> JoinHandle<()> {
    let placeholders: Vec<Arc<PlaceholderRenderer>> = views
        .iter()
        .filter_map(|view| match view.renderer() {
            Renderer::Placeholder(placeholder) => Some(Arc::clone(placeholder)),
            _ => None,
        })
        .collect();
    let mut receiver = coordinator.subscribe();

    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let state = receiver.borrow_and_update().clone();
            for placeholder in &placeholders {
                let edges = placeholder.observe_triggers(state.triggers);
                if edges.taps + edges.winks > 0 {
                    tracing::debug!(taps = edges.taps, winks = edges.winks, "Placeholder pulsed");
                }
            }
            tracing::info!(
                mood = %state.mood,
                progress = state.progress,
                streak = state.streak_count,
                thinking = state.is_thinking,
                "Buddy state"
            );
        }
    })
}

/// Waits until no delayed celebration is pending, up to a timeout.
async fn settle(coordinator: &BuddyCoordinator) {
    let mut waited = 0;
    while coordinator.pending_count() > 0 && waited < SETTLE_TIMEOUT_MS {
        sleep(Duration::from_millis(SETTLE_POLL_MS)).await;
        waited += SETTLE_POLL_MS;
    }
    if coordinator.pending_count() > 0 {
        tracing::warn!(
            pending = coordinator.cancel_pending(),
            "Cancelled celebrations that did not fire in time"
        );
    }
}

/// Prints the final state and what every view shows.
fn print_summary(coordinator: &BuddyCoordinator, views: &[BuddyView]) -> anyhow::Result<()> {
    println!();
    println!("Final state:");
    println!("{}", serde_json::to_string_pretty(&coordinator.snapshot())?);

    println!();
    println!("Views ({} registered):", coordinator.controller_count());
    for view in views {
        let (width, height) = view.size().dimensions();
        println!("  {} {width}x{height}: {}", view.id(), view.describe());
    }
    Ok(())
}

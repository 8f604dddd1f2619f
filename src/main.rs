mod acquire;
mod angles;
mod catalog;
mod config;
mod geometry;
mod hardware;
mod present;
mod tracking;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::acquire::Coordinator;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::geometry::{ObserverLocation, VisibilityEngine};
use crate::hardware::{HardwareChannel, LinkState};
use crate::present::Presenter;
use crate::tracking::TrackingLoop;

#[derive(Parser)]
#[command(name = "debris-tracker")]
#[command(about = "Space debris tracking with a servo pointer")]
struct Cli {
    /// Configuration file (built-in defaults apply when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire element sets and run the tracking loop
    Run {
        /// Skip remote acquisition and load the local cache only
        #[arg(long)]
        offline: bool,
        /// Fetch only the first source instead of merging all of them
        #[arg(long)]
        no_combine: bool,
    },
    /// Refresh the element cache and exit
    Fetch {
        /// Fetch only the first source instead of merging all of them
        #[arg(long)]
        no_combine: bool,
    },
    /// Validate a local element file
    Check { path: PathBuf },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error reading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Run {
            offline,
            no_combine,
        } => run(&config, offline, !no_combine),
        Commands::Fetch { no_combine } => fetch(&config, !no_combine),
        Commands::Check { path } => check(&path),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::load_default(),
    }
}

fn run(config: &Config, offline: bool, combine: bool) -> ExitCode {
    println!("Loading debris data...");
    let catalog = if offline {
        load_cache(config)
    } else {
        acquire_or_cache(config, combine)
    };

    if catalog.is_empty() {
        println!("No element data found.");
        println!(
            "Expected .tle files in: {}",
            config.cache.dir.display()
        );
        println!("Run `debris-tracker fetch` while online to populate the cache.");
        return ExitCode::SUCCESS;
    }

    println!("\nLoaded element data summary:");
    for source in catalog.sources() {
        println!("- {}: {} objects", source.label, source.objects.len());
    }
    println!("Total objects loaded: {}", catalog.object_count());

    let mut hardware = HardwareChannel::new(config.serial.clone());
    let state = hardware.connect();
    info!("Hardware link state: {}", state);
    hardware.init_lcd();

    let observer = match resolve_observer(config, &mut hardware) {
        Some(observer) => observer,
        None => {
            eprintln!("Could not determine observer location; tracking cannot start.");
            eprintln!("Set `station.coordinates` in the configuration or connect the GPS.");
            hardware.close();
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Observer location: {:.4}, {:.4}",
        observer.latitude_deg, observer.longitude_deg
    );

    println!("Starting tracking in 3 seconds... (Ctrl+C to stop)");
    thread::sleep(Duration::from_secs(3));

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst)) {
            warn!("Could not install the interrupt handler: {}", e);
        }
    }

    let mut tracker = TrackingLoop::new(
        catalog,
        Box::new(VisibilityEngine::new(observer)),
        hardware,
        Presenter::new(config.tracking.plot_dir.clone()),
        config.tracking.tick,
        stop,
    );
    tracker.run();

    println!(
        "Tracking system shutdown complete ({} observations stored)",
        tracker.presenter().telemetry().len()
    );
    ExitCode::SUCCESS
}

/// The observer comes from, in order: static configuration, the GPS
/// read-back over an open link, or the configured default when the
/// hardware is unreachable. A connected GPS without a fix aborts rather
/// than guessing.
fn resolve_observer(config: &Config, hardware: &mut HardwareChannel) -> Option<ObserverLocation> {
    if let Some(coordinates) = &config.station.coordinates {
        return ObserverLocation::from_coordinates(coordinates);
    }
    match hardware.state() {
        LinkState::Connected => hardware.read_observer_location(),
        _ => ObserverLocation::from_coordinates(&config.station.default_coordinates),
    }
}

fn acquire_or_cache(config: &Config, combine: bool) -> Catalog {
    let coordinator = Coordinator::new(config.cache.dir.clone());
    let catalog = coordinator.acquire(combine);
    if !catalog.is_empty() {
        return catalog;
    }
    if config.cache.use_local_fallback {
        warn!("Remote acquisition failed, falling back to the local cache");
        return load_cache(config);
    }
    catalog
}

fn load_cache(config: &Config) -> Catalog {
    match catalog::load_dir(&config.cache.dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("Cache load failed: {}", e);
            Catalog::new()
        }
    }
}

fn fetch(config: &Config, combine: bool) -> ExitCode {
    let coordinator = Coordinator::new(config.cache.dir.clone());
    let catalog = coordinator.acquire(combine);
    if catalog.is_empty() {
        eprintln!("No element data could be acquired.");
        return ExitCode::FAILURE;
    }
    for source in catalog.sources() {
        println!("{}: {} objects cached", source.label, source.objects.len());
    }
    ExitCode::SUCCESS
}

fn check(path: &Path) -> ExitCode {
    let report = match catalog::load_file(path) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{}: {} valid records, {} rejected",
        path.display(),
        report.objects.len(),
        report.rejected.len()
    );
    for fault in &report.rejected {
        println!("  {}: {}", fault.name, fault.error);
    }

    if report.objects.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

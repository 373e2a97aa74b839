//! `posemu run` - host the position service in the foreground.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::sync::broadcast;

use posemu::config::{PositionSettings, MIN_INTERVAL_SECS};
use posemu::position::{
    BroadcastEventPublisher, Location, PositionEvent, PositionService, PositionServiceOptions,
    PositionSnapshot,
};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `posemu run`. Unset options fall back to the config file.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Bundled location to replay (boston, denver, paris, test)
    #[arg(long, value_parser = parse_location)]
    pub location: Option<Location>,

    /// Directory holding <location>.gpx files
    #[arg(long)]
    pub track_dir: Option<PathBuf>,

    /// Seconds between position samples
    #[arg(long, value_parser = clap::value_parser!(u64).range(MIN_INTERVAL_SECS..))]
    pub interval: Option<u64>,

    /// Enable debug logging (also mirrored to stdout)
    #[arg(long)]
    pub debug: bool,
}

impl RunArgs {
    /// Overlay command-line options on the configured settings.
    pub fn apply(&self, mut settings: PositionSettings) -> PositionSettings {
        if let Some(location) = self.location {
            settings.location = location;
        }
        if let Some(dir) = &self.track_dir {
            settings.track_dir = Some(dir.clone());
        }
        if let Some(interval) = self.interval {
            settings.interval_secs = interval;
        }
        settings
    }
}

fn parse_location(value: &str) -> Result<Location, String> {
    value.parse()
}

/// Run the service until interrupted.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("run");

    let settings = args.apply(runner.config().position.clone());
    let publisher = BroadcastEventPublisher::new(16);
    let events = publisher.subscribe();
    let service = PositionService::from_settings(&settings, Arc::new(publisher));

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let _runtime_guard = runner.runtime().enter();
    runner.runtime().spawn(print_events(events));

    service.activate(PositionServiceOptions {
        use_gpsd: settings.use_gpsd,
    })?;

    println!(
        "Replaying {} every {}s{}",
        service.config().resource,
        settings.interval_secs,
        settings
            .track_dir
            .as_ref()
            .map(|d| format!(" from {}", d.display()))
            .unwrap_or_default()
    );
    println!("Press Ctrl+C to stop.");
    println!();

    let mut last_printed: Option<Arc<PositionSnapshot>> = None;
    while !shutdown.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));

        if let Some(snapshot) = service.snapshot() {
            let seen = matches!(&last_printed, Some(last) if Arc::ptr_eq(last, &snapshot));
            if !seen {
                println!("{}", format_snapshot(&snapshot));
                last_printed = Some(snapshot);
            }
        }
    }

    service.deactivate();
    println!();
    println!("Stopped.");
    Ok(())
}

async fn print_events(mut events: broadcast::Receiver<PositionEvent>) {
    loop {
        match events.recv().await {
            Ok(PositionEvent::Locked) => println!("[{}]", PositionEvent::Locked.topic()),
            Ok(event @ PositionEvent::Changed(_)) => tracing::debug!(topic = event.topic(), "Event"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event printer lagged")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// One display line per snapshot.
pub fn format_snapshot(snapshot: &PositionSnapshot) -> String {
    format!(
        "{} #{:<3} lat={:>10.5} lon={:>10.5} alt={:>7.1}m",
        snapshot.timestamp(),
        snapshot.waypoint_index,
        snapshot.nmea.latitude,
        snapshot.nmea.longitude,
        snapshot.nmea.altitude,
    )
}

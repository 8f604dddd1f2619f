use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::warn;

use crate::geometry::PositionSample;
use crate::present::panel;
use crate::present::snapshot;
use crate::present::telemetry::{TelemetryLog, TelemetryPoint};

/// Presentation boundary: the terminal panel, the telemetry history, and
/// the plot-data artifacts all live behind this.
pub struct Presenter {
    telemetry: TelemetryLog,
    plot_dir: PathBuf,
}

impl Presenter {
    pub fn new(plot_dir: PathBuf) -> Self {
        Self {
            telemetry: TelemetryLog::new(),
            plot_dir,
        }
    }

    pub fn telemetry(&self) -> &TelemetryLog {
        &self.telemetry
    }

    pub fn store(&mut self, point: TelemetryPoint) {
        self.telemetry.push(point);
    }

    pub fn show_tracking(&self, sample: &PositionSample) {
        clear_screen();
        print!(
            "{}",
            panel::render(
                &sample.name,
                sample.altitude_deg,
                sample.azimuth_deg,
                sample.range_km,
                sample.visible,
            )
        );
    }

    pub fn show_no_objects(&self) {
        clear_screen();
        print!("{}", panel::render("No objects", 0.0, 0.0, 0.0, false));
    }

    /// Periodic sky-map artifact. Skipped while no telemetry exists, and a
    /// write failure never disturbs the tracking loop.
    pub fn snapshot_sky_map(&self, now: DateTime<Utc>) {
        if self.telemetry.is_empty() {
            return;
        }
        if let Err(e) = snapshot::write_sky_map(&self.telemetry, &self.plot_dir, now) {
            warn!("Sky map snapshot failed: {}", e);
        }
    }

    /// Final flush on shutdown: sky map plus the full track history.
    pub fn flush_plots(&self, now: DateTime<Utc>) {
        if self.telemetry.is_empty() {
            return;
        }
        if let Err(e) = snapshot::write_sky_map(&self.telemetry, &self.plot_dir, now) {
            warn!("Sky map snapshot failed: {}", e);
        }
        if let Err(e) = snapshot::write_track_history(&self.telemetry, &self.plot_dir, now) {
            warn!("Track history write failed: {}", e);
        }
    }
}

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::angles::{self, ServoAngles};
use crate::catalog::Catalog;
use crate::geometry::{PositionSample, PositionSource};
use crate::hardware::HardwareChannel;
use crate::present::{Presenter, TelemetryPoint};

/// Wall-clock gap between sky-map snapshots, independent of the tick.
const SNAPSHOT_INTERVAL: Duration = Duration::from_secs(60);

/// Drives the whole pipeline once per tick: positions, target selection,
/// angle mapping, hardware commands, telemetry.
pub struct TrackingLoop {
    catalog: Catalog,
    positions: Box<dyn PositionSource>,
    hardware: HardwareChannel,
    presenter: Presenter,
    tick: Duration,
    stop: Arc<AtomicBool>,
}

impl TrackingLoop {
    pub fn new(
        catalog: Catalog,
        positions: Box<dyn PositionSource>,
        hardware: HardwareChannel,
        presenter: Presenter,
        tick: Duration,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            catalog,
            positions,
            hardware,
            presenter,
            tick,
            stop,
        }
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// Runs until the stop flag is raised, then shuts down in order:
    /// final plot artifacts first, serial link last. The flag is only
    /// checked between ticks, so an in-flight tick always completes.
    pub fn run(&mut self) {
        info!(
            "Tracking {} objects across {} sources",
            self.catalog.object_count(),
            self.catalog.sources().len()
        );

        let mut last_snapshot = Instant::now();
        while !self.stop.load(Ordering::SeqCst) {
            self.run_tick(Utc::now());

            if last_snapshot.elapsed() >= SNAPSHOT_INTERVAL {
                self.presenter.snapshot_sky_map(Utc::now());
                last_snapshot = Instant::now();
            }

            thread::sleep(self.tick);
        }

        info!("Stop requested, shutting down");
        self.presenter.flush_plots(Utc::now());
        self.hardware.close();
    }

    /// One tick. Sources are scanned in declared order and the first
    /// visible object (name order within its source) becomes the target;
    /// remaining sources are not computed. With nothing visible the mount
    /// is left alone and only the display is refreshed.
    pub fn run_tick(&mut self, now: DateTime<Utc>) -> Option<PositionSample> {
        for source in self.catalog.sources() {
            let report = self.positions.positions(&source.objects, now);
            if !report.failures.is_empty() {
                warn!(
                    "{} of {} objects failed in {}",
                    report.failures.len(),
                    source.objects.len(),
                    source.label
                );
                for fault in &report.failures {
                    debug!("  {}: {}", fault.name, fault.error);
                }
            }

            if let Some(sample) = report.visible.into_values().next() {
                self.track(&sample, now);
                return Some(sample);
            }
        }

        self.presenter.show_no_objects();
        self.hardware.update_lcd(ServoAngles::rest(), false);
        None
    }

    fn track(&mut self, sample: &PositionSample, now: DateTime<Utc>) {
        let servo = angles::to_servo(sample.altitude_deg, sample.azimuth_deg);
        self.presenter.show_tracking(sample);
        self.hardware.move_servos(servo);
        self.hardware.update_lcd(servo, true);
        self.presenter.store(TelemetryPoint {
            timestamp: now,
            object: sample.name.clone(),
            altitude_deg: sample.altitude_deg,
            azimuth_deg: sample.azimuth_deg,
            range_km: sample.range_km,
        });
    }
}

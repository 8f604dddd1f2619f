use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::present::telemetry::TelemetryLog;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Polar plot data: where in the sky each stored observation sat.
#[derive(Serialize)]
struct SkyMapPoint<'a> {
    object: &'a str,
    azimuth_deg: f64,
    altitude_deg: f64,
}

/// Writes the sky-map artifact: `skymap_<timestamp>.json` under `dir`.
pub fn write_sky_map(
    log: &TelemetryLog,
    dir: &Path,
    when: DateTime<Utc>,
) -> Result<PathBuf, SnapshotError> {
    let points: Vec<SkyMapPoint> = log
        .iter()
        .map(|p| SkyMapPoint {
            object: &p.object,
            azimuth_deg: p.azimuth_deg,
            altitude_deg: p.altitude_deg,
        })
        .collect();
    write_artifact(dir, "skymap", when, &points)
}

/// Writes the full time-series artifact: `track_<timestamp>.json`.
pub fn write_track_history(
    log: &TelemetryLog,
    dir: &Path,
    when: DateTime<Utc>,
) -> Result<PathBuf, SnapshotError> {
    let points: Vec<_> = log.iter().collect();
    write_artifact(dir, "track", when, &points)
}

fn write_artifact<T: Serialize>(
    dir: &Path,
    prefix: &str,
    when: DateTime<Utc>,
    payload: &T,
) -> Result<PathBuf, SnapshotError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{}.json", prefix, when.format("%Y%m%d_%H%M%S")));
    fs::write(&path, serde_json::to_string_pretty(payload)?)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::telemetry::TelemetryPoint;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample_log() -> TelemetryLog {
        let mut log = TelemetryLog::new();
        log.push(TelemetryPoint {
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            object: "COSMOS 2251 DEB".to_string(),
            altitude_deg: 30.0,
            azimuth_deg: 125.0,
            range_km: 500.0,
        });
        log
    }

    #[test]
    fn sky_map_file_is_timestamped_and_parseable() {
        let dir = TempDir::new().unwrap();
        let when = Utc.with_ymd_and_hms(2026, 3, 1, 12, 34, 56).unwrap();
        let path = write_sky_map(&sample_log(), dir.path(), when).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "skymap_20260301_123456.json"
        );
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed[0]["object"], "COSMOS 2251 DEB");
        assert_eq!(parsed[0]["azimuth_deg"], 125.0);
    }

    #[test]
    fn track_history_keeps_timestamps() {
        let dir = TempDir::new().unwrap();
        let when = Utc.with_ymd_and_hms(2026, 3, 1, 12, 34, 56).unwrap();
        let path = write_track_history(&sample_log(), dir.path(), when).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "track_20260301_123456.json"
        );
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed[0]["range_km"], 500.0);
        assert!(parsed[0]["timestamp"].is_string());
    }

    #[test]
    fn the_plot_directory_is_created_on_demand() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("plots").join("today");
        let when = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let path = write_sky_map(&sample_log(), &nested, when).unwrap();
        assert!(path.exists());
    }
}

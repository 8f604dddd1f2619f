use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Most recent observations kept for the plot artifacts.
pub const TELEMETRY_CAPACITY: usize = 1000;

/// One stored tracking observation, in true-sky degrees.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryPoint {
    pub timestamp: DateTime<Utc>,
    pub object: String,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// Bounded history of tracked positions. Once full, the oldest entry is
/// evicted for every new one.
#[derive(Debug)]
pub struct TelemetryLog {
    points: VecDeque<TelemetryPoint>,
}

impl TelemetryLog {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TELEMETRY_CAPACITY),
        }
    }

    pub fn push(&mut self, point: TelemetryPoint) {
        if self.points.len() == TELEMETRY_CAPACITY {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TelemetryPoint> {
        self.points.iter()
    }
}

impl Default for TelemetryLog {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::warn;

use crate::catalog::OrbitModel;
use crate::geometry::{topocentric, GeometryError, ObserverLocation};

/// One object's sky position for the current tick.
#[derive(Debug, Clone)]
pub struct PositionSample {
    pub name: String,
    /// True altitude clamped to zero for display; `visible` is decided
    /// before the clamp.
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
    pub visible: bool,
}

impl PositionSample {
    /// Classifies a sample from true topocentric angles. Visibility is
    /// strict: an object sitting exactly on the horizon is not visible.
    pub fn from_topocentric(name: &str, altitude_deg: f64, azimuth_deg: f64, range_km: f64) -> Self {
        Self {
            name: name.to_string(),
            visible: altitude_deg > 0.0,
            altitude_deg: altitude_deg.max(0.0),
            azimuth_deg,
            range_km,
        }
    }
}

/// An object whose position could not be computed this tick.
#[derive(Debug)]
pub struct GeometryFault {
    pub name: String,
    pub error: GeometryError,
}

/// Visible samples for one catalog source, plus the objects that failed.
#[derive(Default)]
pub struct PositionReport {
    pub visible: BTreeMap<String, PositionSample>,
    pub failures: Vec<GeometryFault>,
}

/// Source of per-tick sky positions. The tracking loop only sees this
/// trait, so tests can feed it synthetic geometry.
pub trait PositionSource {
    fn positions(&self, objects: &BTreeMap<String, OrbitModel>, now: DateTime<Utc>)
        -> PositionReport;
}

/// Propagation-backed position source for a fixed observer.
pub struct VisibilityEngine {
    observer: ObserverLocation,
}

impl VisibilityEngine {
    pub fn new(observer: ObserverLocation) -> Self {
        Self { observer }
    }
}

impl PositionSource for VisibilityEngine {
    /// One pass over a source's objects. A failing object is logged,
    /// recorded, and skipped; the rest of the pass carries on.
    fn positions(
        &self,
        objects: &BTreeMap<String, OrbitModel>,
        now: DateTime<Utc>,
    ) -> PositionReport {
        let mut report = PositionReport::default();
        for (name, model) in objects {
            match topocentric(model, &self.observer, now) {
                Ok(look) => {
                    let sample = PositionSample::from_topocentric(
                        name,
                        look.altitude_deg,
                        look.azimuth_deg,
                        look.range_km,
                    );
                    if sample.visible {
                        report.visible.insert(name.clone(), sample);
                    }
                }
                Err(error) => {
                    warn!("Position computation failed for {}: {}", name, error);
                    report.failures.push(GeometryFault {
                        name: name.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}

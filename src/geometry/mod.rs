mod observer;
mod propagation;
mod visibility;

pub use observer::ObserverLocation;
pub use propagation::{topocentric, GeometryError};
pub use visibility::{PositionSample, PositionSource, VisibilityEngine};

#[cfg(test)]
pub use visibility::PositionReport;

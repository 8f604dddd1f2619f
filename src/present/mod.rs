mod panel;
mod presenter;
mod snapshot;
mod telemetry;

pub use presenter::Presenter;
pub use telemetry::TelemetryPoint;

mod controller;

pub use controller::TrackingLoop;

//! Sky-to-servo angle remapping.
//!
//! The pointer is built from two 0-180 degree hobby servos. Azimuth is
//! compressed from the 0-360 compass range and altitude is stretched from
//! the 0-90 elevation range, so both axes land on the same servo scale.

/// A servo command pair, both axes in [0, 180].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoAngles {
    pub azimuth: u8,
    pub altitude: u8,
}

impl ServoAngles {
    /// Park position, also used for the idle display.
    pub fn rest() -> Self {
        Self {
            azimuth: 0,
            altitude: 0,
        }
    }
}

/// Maps true-sky degrees to the servo frame.
///
/// Altitude below the horizon clamps to servo 0. An object that is above
/// the horizon but would round to 0 is bumped to at least 1, so servo 0
/// always means "below horizon" and nothing else.
pub fn to_servo(altitude_deg: f64, azimuth_deg: f64) -> ServoAngles {
    let azimuth = interp(azimuth_deg, 360.0, 180.0).round_ties_even() as u8;

    let clamped = altitude_deg.max(0.0);
    let mut altitude = interp(clamped, 90.0, 180.0).round_ties_even() as u8;
    if altitude_deg > 0.0 && altitude == 0 {
        altitude = ((clamped * 2.0).round_ties_even() as u8).max(1);
    }

    ServoAngles { azimuth, altitude }
}

/// Linear map from [0, domain] onto [0, range], clamped at both ends.
fn interp(value: f64, domain: f64, range: f64) -> f64 {
    (value.clamp(0.0, domain) / domain) * range
}

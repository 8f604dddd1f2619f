//! Text frames spoken over the serial link to the pointer controller.

use crate::angles::ServoAngles;
use crate::geometry::ObserverLocation;

/// Marker word of a GPS read-back line.
pub const GPS_MARKER: &str = "Latitude";

/// `SERVO,<azimuth>,<altitude>` moves both axes.
pub fn servo_frame(angles: ServoAngles) -> String {
    format!("SERVO,{},{}\n", angles.azimuth, angles.altitude)
}

/// `LCD,<azimuth>,<altitude>,<Visible|Not visible>` refreshes the display.
pub fn lcd_frame(angles: ServoAngles, visible: bool) -> String {
    let visibility = if visible { "Visible" } else { "Not visible" };
    format!("LCD,{},{},{}\n", angles.azimuth, angles.altitude, visibility)
}

/// `LCD_INIT` clears and prepares the display.
pub fn lcd_init_frame() -> &'static str {
    "LCD_INIT\n"
}

/// Parses a GPS read-back line of the form `Latitude <lat> ... <lon>`:
/// latitude is the first token after the marker, longitude the last token
/// of the line. A line without the marker, an unparseable number, and the
/// all-zero no-fix sentinel all come back as `None`.
pub fn parse_gps_line(line: &str) -> Option<ObserverLocation> {
    let rest = line.split_once(GPS_MARKER)?.1;
    let lat: f64 = rest.split_whitespace().next()?.parse().ok()?;
    let lon: f64 = rest.split_whitespace().last()?.parse().ok()?;
    if lat == 0.0 && lon == 0.0 {
        return None;
    }
    Some(ObserverLocation::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_match_the_controller_firmware() {
        let angles = ServoAngles {
            azimuth: 62,
            altitude: 60,
        };
        assert_eq!(servo_frame(angles), "SERVO,62,60\n");
        assert_eq!(lcd_frame(angles, true), "LCD,62,60,Visible\n");
        assert_eq!(
            lcd_frame(ServoAngles::rest(), false),
            "LCD,0,0,Not visible\n"
        );
        assert_eq!(lcd_init_frame(), "LCD_INIT\n");
    }

    #[test]
    fn gps_line_yields_the_observer() {
        let observer = parse_gps_line("Latitude 17.39 Longitude 78.32").unwrap();
        assert_eq!(observer.latitude_deg, 17.39);
        assert_eq!(observer.longitude_deg, 78.32);
    }

    #[test]
    fn gps_line_tolerates_extra_noise_words() {
        let observer = parse_gps_line("fix ok Latitude -33.9 deg Longitude 18.4").unwrap();
        assert_eq!(observer.latitude_deg, -33.9);
        assert_eq!(observer.longitude_deg, 18.4);
    }

    #[test]
    fn unrecognized_lines_are_rejected() {
        assert!(parse_gps_line("no fix yet").is_none());
        assert!(parse_gps_line("").is_none());
        assert!(parse_gps_line("Latitude pending Longitude pending").is_none());
    }

    #[test]
    fn the_no_fix_sentinel_is_rejected() {
        assert!(parse_gps_line("Latitude 0.0 Longitude 0.0").is_none());
        assert!(parse_gps_line("Latitude 0.0 Longitude 78.32").is_some());
    }
}

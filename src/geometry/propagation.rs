use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::OrbitModel;
use crate::geometry::ObserverLocation;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("epoch conversion failed: {0}")]
    Epoch(String),
    #[error("propagation failed: {0}")]
    Propagation(String),
}

/// Topocentric look angles from the observer to an object.
#[derive(Debug, Clone, Copy)]
pub struct Topocentric {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// Computes where the object sits in the observer's sky at `when`.
///
/// SGP4 output is in the TEME frame; rotate it by sidereal time into
/// ECEF, difference against the observer, and project onto the local
/// east/north/up frame.
pub fn topocentric(
    model: &OrbitModel,
    observer: &ObserverLocation,
    when: DateTime<Utc>,
) -> Result<Topocentric, GeometryError> {
    let minutes = model
        .elements
        .datetime_to_minutes_since_epoch(&when.naive_utc())
        .map_err(|e| GeometryError::Epoch(e.to_string()))?;

    let prediction = model
        .constants
        .propagate(minutes)
        .map_err(|e| GeometryError::Propagation(e.to_string()))?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&when.naive_utc()));

    let sat_ecef = teme_to_ecef(prediction.position, sidereal);
    let obs_ecef = observer.position_ecef_km();

    let dr = [
        sat_ecef[0] - obs_ecef[0],
        sat_ecef[1] - obs_ecef[1],
        sat_ecef[2] - obs_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let enu = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
    let azimuth_deg = enu.0.atan2(enu.1).to_degrees().rem_euclid(360.0);
    let altitude_deg = if range_km > 0.0 {
        (enu.2 / range_km).asin().to_degrees()
    } else {
        0.0
    };

    Ok(Topocentric {
        altitude_deg,
        azimuth_deg,
        range_km,
    })
}

fn teme_to_ecef(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ElementSet, OrbitModel};
    use chrono::TimeZone;

    fn iss_model() -> OrbitModel {
        let record = ElementSet::parse(
            "ISS (ZARYA)",
            "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927",
            "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537",
        )
        .unwrap();
        OrbitModel::from_record(record).unwrap()
    }

    #[test]
    fn look_angles_stay_in_their_domains() {
        let model = iss_model();
        let observer = ObserverLocation::new(28.4089, -80.6044);
        // Close to the element epoch, where SGP4 is well behaved.
        let when = Utc.with_ymd_and_hms(2008, 9, 20, 12, 30, 0).unwrap();

        let look = topocentric(&model, &observer, when).unwrap();
        assert!((-90.0..=90.0).contains(&look.altitude_deg));
        assert!((0.0..360.0).contains(&look.azimuth_deg));
        // Anywhere from overhead to the far side of the planet.
        assert!(look.range_km > 300.0 && look.range_km < 14_000.0);
    }

    #[test]
    fn propagation_is_deterministic() {
        let model = iss_model();
        let observer = ObserverLocation::new(28.4089, -80.6044);
        let when = Utc.with_ymd_and_hms(2008, 9, 20, 12, 30, 0).unwrap();

        let a = topocentric(&model, &observer, when).unwrap();
        let b = topocentric(&model, &observer, when).unwrap();
        assert_eq!(a.altitude_deg, b.altitude_deg);
        assert_eq!(a.azimuth_deg, b.azimuth_deg);
        assert_eq!(a.range_km, b.range_km);
    }

    #[test]
    fn enu_projection_points_up_for_an_overhead_object() {
        // Observer at the equator, object directly above it.
        let enu = ecef_to_enu([1000.0, 0.0, 0.0], 0.0, 0.0);
        assert!(enu.0.abs() < 1e-9);
        assert!(enu.1.abs() < 1e-9);
        assert!((enu.2 - 1000.0).abs() < 1e-9);
    }
}

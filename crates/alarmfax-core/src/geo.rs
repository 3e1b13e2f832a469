//! Gauss-Krüger to WGS84 conversion.
//!
//! German dispatch centers print grid coordinates (Rechtswert/Hochwert) on
//! the Bessel ellipsoid with the Potsdam datum. The conversion runs in two
//! steps: grid to Potsdam geographic coordinates, then a three-parameter
//! datum shift to WGS84.

use crate::error::GeoError;

// Bessel 1841
const BESSEL_SEMI_MAJOR: f64 = 6_377_397.155;
const BESSEL_FLATTENING: f64 = 3.342773182e-3;

// WGS84
const WGS84_FLATTENING: f64 = 3.35281066474748e-3;

// Potsdam -> WGS84, meters
const DATUM_SHIFT_X: f64 = 587.0;
const DATUM_SHIFT_Y: f64 = 16.0;
const DATUM_SHIFT_Z: f64 = 393.0;

// Area covered by the grid, degrees
const MIN_EAST: f64 = 5.0;
const MAX_EAST: f64 = 16.0;
const MIN_NORTH: f64 = 46.0;
const MAX_NORTH: f64 = 56.0;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Convert a Gauss-Krüger position (`easting` with zone prefix, `northing`) to WGS84.
pub fn gauss_krueger_to_wgs84(easting: f64, northing: f64) -> Result<LatLng, GeoError> {
    let potsdam = gauss_krueger_to_potsdam(easting, northing)?;
    Ok(potsdam_to_wgs84(potsdam))
}

fn gauss_krueger_to_potsdam(easting: f64, northing: f64) -> Result<LatLng, GeoError> {
    let pole = BESSEL_SEMI_MAJOR / (1.0 - BESSEL_FLATTENING);
    let e2 = (2.0 * BESSEL_FLATTENING - BESSEL_FLATTENING * BESSEL_FLATTENING)
        / ((1.0 - BESSEL_FLATTENING) * (1.0 - BESSEL_FLATTENING));
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let e8 = e4 * e4;
    let rho = 180.0 / std::f64::consts::PI;

    // Meridian arc
    let k0 = pole / rho
        * (1.0 - 3.0 * e2 / 4.0 + 45.0 * e4 / 64.0 - 175.0 * e6 / 256.0
            + 11025.0 * e8 / 16384.0);
    let k2 = rho * (3.0 * e2 / 8.0 - 3.0 * e4 / 16.0 + 213.0 * e6 / 2048.0 - 255.0 * e8 / 4096.0);
    let k4 = rho * (21.0 * e4 / 256.0 - 21.0 * e6 / 256.0 + 533.0 * e8 / 8192.0);
    let k6 = rho * (151.0 * e6 / 6144.0 - 453.0 * e8 / 12288.0);

    // Footpoint latitude
    let sig = northing / k0;
    let sig_rad = sig / rho;
    let foot = sig
        + k2 * (2.0 * sig_rad).sin()
        + k4 * (4.0 * sig_rad).sin()
        + k6 * (6.0 * sig_rad).sin();
    let foot_rad = foot / rho;

    let t1 = foot_rad.tan();
    let t2 = t1.powi(2);
    let t4 = t1.powi(4);
    let c1 = foot_rad.cos();
    let eta = e2 * c1.powi(2);

    // Transverse radius of curvature
    let n1 = pole / (1.0 + eta).sqrt();
    let n2 = n1.powi(2);
    let n3 = n1.powi(3);
    let n4 = n1.powi(4);
    let n5 = n1.powi(5);
    let n6 = n1.powi(6);

    // Offset from the zone's central meridian
    let zone = (easting / 1e6).trunc();
    let meridian = zone * 3.0;
    let dl1 = easting - (zone * 1e6 + 500_000.0);
    let dl2 = dl1.powi(2);
    let dl3 = dl1.powi(3);
    let dl4 = dl1.powi(4);
    let dl5 = dl1.powi(5);
    let dl6 = dl1.powi(6);

    let b2 = -t1 * (1.0 + eta) / (2.0 * n2);
    let b4 = t1 * (5.0 + 3.0 * t2 + 6.0 * eta * (1.0 - t2)) / (24.0 * n4);
    let b6 = -t1 * (61.0 + 90.0 * t2 + 45.0 * t4) / (720.0 * n6);

    let l1 = 1.0 / (n1 * c1);
    let l3 = -(1.0 + 2.0 * t2 + eta) / (6.0 * n3 * c1);
    let l5 = (5.0 + 28.0 * t2 + 24.0 * t4) / (120.0 * n5 * c1);

    let latitude = foot + rho * (b2 * dl2 + b4 * dl4 + b6 * dl6);
    let longitude = meridian + rho * (l1 * dl1 + l3 * dl3 + l5 * dl5);

    let in_range = (MIN_EAST..=MAX_EAST).contains(&longitude)
        && (MIN_NORTH..=MAX_NORTH).contains(&latitude);
    if !in_range {
        return Err(GeoError::OutOfRange {
            latitude,
            longitude,
        });
    }

    Ok(LatLng {
        latitude,
        longitude,
    })
}

fn potsdam_to_wgs84(potsdam: LatLng) -> LatLng {
    let bessel_e2 = 2.0 * BESSEL_FLATTENING - BESSEL_FLATTENING * BESSEL_FLATTENING;
    let wgs84_e2 = 2.0 * WGS84_FLATTENING - WGS84_FLATTENING * WGS84_FLATTENING;
    let rho = 180.0 / std::f64::consts::PI;

    let lat = potsdam.latitude / rho;
    let lng = potsdam.longitude / rho;

    // Cartesian, Potsdam datum
    let n = BESSEL_SEMI_MAJOR / (1.0 - bessel_e2 * lat.sin() * lat.sin()).sqrt();
    let x = n * lat.cos() * lng.cos() + DATUM_SHIFT_X;
    let y = n * lat.cos() * lng.sin() + DATUM_SHIFT_Y;
    let z = (1.0 - bessel_e2) * n * lat.sin() + DATUM_SHIFT_Z;

    let b = (x * x + y * y).sqrt();
    let latitude = rho * ((z / b) / (1.0 - wgs84_e2)).atan();
    let longitude = if x > 0.0 {
        rho * (y / x).atan()
    } else if x < 0.0 && y > 0.0 {
        rho * (y / x).atan() + 180.0
    } else if x < 0.0 && y < 0.0 {
        rho * (y / x).atan() - 180.0
    } else {
        0.0
    };

    LatLng {
        latitude,
        longitude,
    }
}

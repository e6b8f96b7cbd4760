use crate::types::{EquatorialCoordinate, HorizontalCoordinate};

pub const DEGREES_PER_HOUR: f64 = 15.0;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Wraps into (-180, 180].
pub fn normalize_signed(angle: f64) -> f64 {
    let a = normalize_angle(angle);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hms {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

const MILLIS_PER_UNIT: u64 = 3_600_000;

/// Splits a non-negative value into whole units, minutes and seconds, rounded
/// to the millisecond before carrying so seconds never read 60.
fn sexagesimal(value: f64) -> (u64, u32, f64) {
    let millis = (value * MILLIS_PER_UNIT as f64).round() as u64;
    let whole = millis / MILLIS_PER_UNIT;
    let minutes = (millis / 60_000 % 60) as u32;
    let seconds = (millis % 60_000) as f64 / 1000.0;
    (whole, minutes, seconds)
}

pub fn to_hms(degrees: f64) -> Hms {
    let (hours, minutes, seconds) = sexagesimal(normalize_angle(degrees) / DEGREES_PER_HOUR);
    Hms {
        hours: (hours % 24) as u32,
        minutes,
        seconds,
    }
}

pub fn to_dms(degrees: f64) -> Dms {
    let (whole, minutes, seconds) = sexagesimal(degrees.abs());
    Dms {
        negative: degrees < 0.0,
        degrees: whole as u32,
        minutes,
        seconds,
    }
}

/// Horizontal position for a given local sidereal time (degrees).
pub fn equatorial_to_horizontal(
    object: &EquatorialCoordinate,
    latitude: f64,
    local_sidereal: f64,
) -> HorizontalCoordinate {
    let hour_angle = normalize_signed(local_sidereal - object.right_ascension);
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(object.declination);
    let ha_rad = deg_to_rad(hour_angle);

    let sin_alt = lat_rad.sin() * dec_rad.sin() + lat_rad.cos() * dec_rad.cos() * ha_rad.cos();
    let altitude = rad_to_deg(sin_alt.clamp(-1.0, 1.0).asin());

    let sin_az = -dec_rad.cos() * ha_rad.sin();
    let cos_az = dec_rad.sin() * lat_rad.cos() - dec_rad.cos() * lat_rad.sin() * ha_rad.cos();
    let azimuth = normalize_angle(rad_to_deg(sin_az.atan2(cos_az)));

    HorizontalCoordinate { azimuth, altitude }
}

/// Relative air mass through a homogeneous spherical atmosphere whose
/// scale height ratio is `scale` (750 for the usual surface value).
pub fn airmass(altitude: f64, scale: f64) -> f64 {
    let a = scale * deg_to_rad(altitude).sin();
    (a * a + 2.0 * scale + 1.0).sqrt() - a
}

/// Great-circle separation in degrees (Vincenty form, stable at 0° and 180°).
pub fn angular_separation(a: &EquatorialCoordinate, b: &EquatorialCoordinate) -> f64 {
    let (d1, d2) = (deg_to_rad(a.declination), deg_to_rad(b.declination));
    let dra = deg_to_rad(b.right_ascension - a.right_ascension);

    let x = d2.cos() * dra.sin();
    let y = d1.cos() * d2.sin() - d1.sin() * d2.cos() * dra.cos();
    let z = d1.sin() * d2.sin() + d1.cos() * d2.cos() * dra.cos();
    rad_to_deg((x * x + y * y).sqrt().atan2(z))
}

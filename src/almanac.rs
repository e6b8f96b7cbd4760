//! Built-in low-precision ephemeris.
//!
//! Solar and lunar positions use the truncated mean-element series (good to
//! a few arcminutes for the Sun and ~0.3° for the Moon), which is plenty for
//! rise/set times to the minute and for visibility tables.

use log::trace;

use crate::angles::{self, deg_to_rad, normalize_angle, normalize_signed, rad_to_deg};
use crate::ephemeris::{Ephemeris, STAR_STANDARD_HORIZON};
use crate::error::{Result, VsqueryError};
use crate::types::{
    EquatorialCoordinate, HorizontalCoordinate, JulianInstant, ObserverPosition,
    RectangularPosition, RiseTransitSet,
};

pub const J2000_JD: f64 = 2_451_545.0;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Coarse scan step for event search, 10 minutes.
const SCAN_STEP: f64 = 1.0 / 144.0;
/// Events are searched in the day following the query instant.
const SEARCH_SPAN: f64 = 1.0;
const REFINE_ITERATIONS: usize = 32;

fn centuries_since_j2000(jd: JulianInstant) -> f64 {
    (jd.value() - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

fn mean_obliquity(t: f64) -> f64 {
    23.439291 - 0.0130042 * t
}

/// Greenwich mean sidereal time in degrees.
pub fn greenwich_sidereal_time(jd: JulianInstant) -> f64 {
    let d = jd.value() - J2000_JD;
    let t = d / DAYS_PER_JULIAN_CENTURY;
    normalize_angle(
        280.46061837 + 360.98564736629 * d + 0.000387933 * t * t - t * t * t / 38_710_000.0,
    )
}

pub fn local_sidereal_time(jd: JulianInstant, observer: &ObserverPosition) -> f64 {
    normalize_angle(greenwich_sidereal_time(jd) + observer.longitude)
}

fn ecliptic_to_equatorial(longitude: f64, latitude: f64, obliquity: f64) -> EquatorialCoordinate {
    let (sin_lon, cos_lon) = deg_to_rad(longitude).sin_cos();
    let (sin_lat, cos_lat) = deg_to_rad(latitude).sin_cos();
    let (sin_eps, cos_eps) = deg_to_rad(obliquity).sin_cos();

    let ra = (sin_lon * cos_eps - sin_lat / cos_lat * sin_eps).atan2(cos_lon);
    let dec = (sin_lat * cos_eps + cos_lat * sin_eps * sin_lon).clamp(-1.0, 1.0).asin();
    EquatorialCoordinate {
        right_ascension: normalize_angle(rad_to_deg(ra)),
        declination: rad_to_deg(dec),
    }
}

/// Apparent ecliptic longitude of the Sun in degrees.
fn solar_longitude(t: f64) -> f64 {
    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
    let m = deg_to_rad(357.52911 + 35999.05029 * t - 0.0001537 * t * t);
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();
    let omega = deg_to_rad(125.04 - 1934.136 * t);
    normalize_angle(l0 + c - 0.00569 - 0.00478 * omega.sin())
}

struct LunarArguments {
    /// Mean elongation.
    d: f64,
    /// Sun's mean anomaly.
    m: f64,
    /// Moon's mean anomaly.
    m_prime: f64,
    /// Argument of latitude.
    f: f64,
}

impl LunarArguments {
    fn at(t: f64) -> Self {
        Self {
            d: deg_to_rad(normalize_angle(297.8501921 + 445267.1114034 * t)),
            m: deg_to_rad(normalize_angle(357.5291092 + 35999.0502909 * t)),
            m_prime: deg_to_rad(normalize_angle(134.9633964 + 477198.8675055 * t)),
            f: deg_to_rad(normalize_angle(93.272095 + 483202.0175233 * t)),
        }
    }
}

struct LunarEcliptic {
    longitude: f64,
    latitude: f64,
    distance_km: f64,
}

fn lunar_ecliptic(t: f64) -> LunarEcliptic {
    let LunarArguments { d, m, m_prime, f } = LunarArguments::at(t);
    let l_prime = 218.3164477 + 481267.88123421 * t;

    let longitude = l_prime
        + 6.289 * m_prime.sin()
        + 1.274 * (2.0 * d - m_prime).sin()
        + 0.658 * (2.0 * d).sin()
        + 0.214 * (2.0 * m_prime).sin()
        - 0.186 * m.sin()
        - 0.114 * (2.0 * f).sin();

    let latitude =
        5.128 * f.sin() + 0.281 * (m_prime + f).sin() + 0.278 * (m_prime - f).sin();

    let distance_km = 385_000.56
        - 20_905.355 * m_prime.cos()
        - 3_699.111 * (2.0 * d - m_prime).cos()
        - 2_955.968 * (2.0 * d).cos()
        - 569.925 * (2.0 * m_prime).cos()
        + 48.888 * m.cos()
        - 3.149 * (2.0 * f).cos()
        + 246.158 * (2.0 * d - 2.0 * m_prime).cos()
        - 152.138 * (2.0 * d - m - m_prime).cos()
        - 170.733 * (2.0 * d + m_prime).cos()
        - 204.586 * (2.0 * d - m).cos()
        - 129.620 * (m_prime - m).cos()
        + 108.743 * d.cos()
        + 104.755 * (m_prime + m).cos();

    LunarEcliptic {
        longitude: normalize_angle(longitude),
        latitude,
        distance_km,
    }
}

fn ensure_finite(jd: JulianInstant, subject: &str) -> Result<()> {
    if jd.value().is_finite() {
        Ok(())
    } else {
        Err(VsqueryError::ephemeris(subject, format!("non-finite instant {}", jd.value())))
    }
}

/// Shrinks `[lo, hi]` around the sign change of `f`.
fn bisect<F>(f: &F, mut lo: JulianInstant, mut hi: JulianInstant) -> JulianInstant
where
    F: Fn(JulianInstant) -> f64,
{
    let lo_positive = f(lo) > 0.0;
    for _ in 0..REFINE_ITERATIONS {
        let mid = JulianInstant((lo.value() + hi.value()) / 2.0);
        if (f(mid) > 0.0) == lo_positive {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    JulianInstant((lo.value() + hi.value()) / 2.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Almanac;

impl Almanac {
    pub fn new() -> Self {
        Almanac
    }

    pub fn solar_position(&self, jd: JulianInstant) -> EquatorialCoordinate {
        let t = centuries_since_j2000(jd);
        ecliptic_to_equatorial(solar_longitude(t), 0.0, mean_obliquity(t))
    }

    pub fn lunar_position(&self, jd: JulianInstant) -> EquatorialCoordinate {
        let t = centuries_since_j2000(jd);
        let moon = lunar_ecliptic(t);
        ecliptic_to_equatorial(moon.longitude, moon.latitude, mean_obliquity(t))
    }

    /// First rise, upper transit and set in the day after `jd` for a body
    /// whose position is given by `position`.
    pub fn next_rst<P>(
        &self,
        jd: JulianInstant,
        observer: &ObserverPosition,
        horizon: f64,
        position: P,
    ) -> RiseTransitSet
    where
        P: Fn(JulianInstant) -> EquatorialCoordinate,
    {
        let lst = |t: JulianInstant| local_sidereal_time(t, observer);
        let altitude = |t: JulianInstant| {
            angles::equatorial_to_horizontal(&position(t), observer.latitude, lst(t)).altitude
                - horizon
        };
        let hour_angle = |t: JulianInstant| normalize_signed(lst(t) - position(t).right_ascension);

        let steps = (SEARCH_SPAN / SCAN_STEP).ceil() as usize;
        let (mut rise, mut transit, mut set) = (None, None, None);

        let mut t0 = jd;
        let mut a0 = altitude(t0);
        let mut h0 = hour_angle(t0);
        let starts_above = a0 > 0.0;

        for i in 1..=steps {
            let t1 = jd + i as f64 * SCAN_STEP;
            let a1 = altitude(t1);
            let h1 = hour_angle(t1);

            if rise.is_none() && a0 <= 0.0 && a1 > 0.0 {
                rise = Some(bisect(&altitude, t0, t1));
            }
            if set.is_none() && a0 > 0.0 && a1 <= 0.0 {
                set = Some(bisect(&altitude, t0, t1));
            }
            // the hour angle wraps from +180 to -180 at lower culmination
            if transit.is_none() && h0 < 0.0 && h1 >= 0.0 && h1 - h0 < 180.0 {
                transit = Some(bisect(&hour_angle, t0, t1));
            }
            if rise.is_some() && transit.is_some() && set.is_some() {
                break;
            }
            t0 = t1;
            a0 = a1;
            h0 = h1;
        }

        trace!(
            "rst from {:.5} horizon {}: rise={:?} transit={:?} set={:?}",
            jd.value(),
            horizon,
            rise,
            transit,
            set
        );

        match (rise, set) {
            (None, None) if starts_above => RiseTransitSet::Circumpolar { transit },
            (None, None) => RiseTransitSet::NeverRises,
            _ => RiseTransitSet::Events { rise, transit, set },
        }
    }
}

impl Ephemeris for Almanac {
    fn solar_rst(
        &self,
        jd: JulianInstant,
        observer: &ObserverPosition,
        horizon: f64,
    ) -> Result<RiseTransitSet> {
        ensure_finite(jd, "sun")?;
        Ok(self.next_rst(jd, observer, horizon, |t| self.solar_position(t)))
    }

    fn lunar_rst(
        &self,
        jd: JulianInstant,
        observer: &ObserverPosition,
        horizon: f64,
    ) -> Result<RiseTransitSet> {
        ensure_finite(jd, "moon")?;
        Ok(self.next_rst(jd, observer, horizon, |t| self.lunar_position(t)))
    }

    fn object_rst(
        &self,
        jd: JulianInstant,
        observer: &ObserverPosition,
        object: &EquatorialCoordinate,
    ) -> Result<RiseTransitSet> {
        ensure_finite(jd, "object")?;
        Ok(self.next_rst(jd, observer, STAR_STANDARD_HORIZON, |_| *object))
    }

    fn solar_equatorial(&self, jd: JulianInstant) -> Result<EquatorialCoordinate> {
        ensure_finite(jd, "sun")?;
        Ok(self.solar_position(jd))
    }

    fn lunar_equatorial(&self, jd: JulianInstant) -> Result<EquatorialCoordinate> {
        ensure_finite(jd, "moon")?;
        Ok(self.lunar_position(jd))
    }

    fn lunar_geocentric(&self, jd: JulianInstant) -> Result<RectangularPosition> {
        ensure_finite(jd, "moon")?;
        let moon = lunar_ecliptic(centuries_since_j2000(jd));
        let (sin_lon, cos_lon) = deg_to_rad(moon.longitude).sin_cos();
        let (sin_lat, cos_lat) = deg_to_rad(moon.latitude).sin_cos();
        Ok(RectangularPosition {
            x: moon.distance_km * cos_lat * cos_lon,
            y: moon.distance_km * cos_lat * sin_lon,
            z: moon.distance_km * sin_lat,
        })
    }

    fn lunar_disk(&self, jd: JulianInstant) -> Result<f64> {
        ensure_finite(jd, "moon")?;
        let LunarArguments { d, m, m_prime, .. } =
            LunarArguments::at(centuries_since_j2000(jd));
        let phase_angle = 180.0 - rad_to_deg(d) - 6.289 * m_prime.sin() + 2.100 * m.sin()
            - 1.274 * (2.0 * d - m_prime).sin()
            - 0.658 * (2.0 * d).sin()
            - 0.214 * (2.0 * m_prime).sin()
            - 0.110 * d.sin();
        Ok((1.0 + deg_to_rad(phase_angle).cos()) / 2.0)
    }

    fn horizontal(
        &self,
        object: &EquatorialCoordinate,
        observer: &ObserverPosition,
        jd: JulianInstant,
    ) -> Result<HorizontalCoordinate> {
        ensure_finite(jd, "horizontal position")?;
        Ok(angles::equatorial_to_horizontal(
            object,
            observer.latitude,
            local_sidereal_time(jd, observer),
        ))
    }
}

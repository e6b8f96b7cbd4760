use std::ops::{Add, Sub};
use std::time::Duration;

use crate::error::{Result, VsqueryError};

/// Bad Soden am Taunus.
pub const DEFAULT_LATITUDE: f64 = 50.146146;
pub const DEFAULT_LONGITUDE: f64 = 8.498569;
/// 0.01 day, about 14.4 minutes.
pub const DEFAULT_STEP: f64 = 0.01;
pub const DEFAULT_AIRMASS_SCALE: f64 = 750.0;
pub const DEFAULT_RESOLVER_URL: &str = "http://cdsweb.u-strasbg.fr/cgi-bin/nph-sesame/-oI/A";
pub const DEFAULT_RESOLVER_TIMEOUT_SECS: u64 = 10;

/// Continuous time axis (Julian Day, UT) used for all ephemeris arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct JulianInstant(pub f64);

impl JulianInstant {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Add<f64> for JulianInstant {
    type Output = JulianInstant;

    fn add(self, days: f64) -> JulianInstant {
        JulianInstant(self.0 + days)
    }
}

impl Sub for JulianInstant {
    type Output = f64;

    fn sub(self, other: JulianInstant) -> f64 {
        self.0 - other.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverPosition {
    pub latitude: f64,
    /// East positive.
    pub longitude: f64,
}

impl ObserverPosition {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(VsqueryError::invalid_argument(
                "latitude",
                format!("{} is outside [-90, 90]", latitude),
            ));
        }
        if !(-180.0..=360.0).contains(&longitude) {
            return Err(VsqueryError::invalid_argument(
                "longitude",
                format!("{} is outside [-180, 360]", longitude),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Local calendar date and time of day; seconds keep their fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialCoordinate {
    /// Degrees in [0, 360].
    pub right_ascension: f64,
    /// Degrees in [-90, 90].
    pub declination: f64,
}

impl EquatorialCoordinate {
    /// Checked constructor; `None` when either angle is outside its range (NaN included).
    pub fn new(right_ascension: f64, declination: f64) -> Option<Self> {
        let ra_ok = (0.0..=360.0).contains(&right_ascension);
        let dec_ok = (-90.0..=90.0).contains(&declination);
        (ra_ok && dec_ok).then_some(Self {
            right_ascension,
            declination,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoordinate {
    /// Degrees from north through east.
    pub azimuth: f64,
    pub altitude: f64,
}

/// Geocentric rectangular position in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangularPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RectangularPosition {
    pub fn distance(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Outcome of a rise/transit/set query for one body and one horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiseTransitSet {
    /// The body crosses the horizon; any single event may be missing from the
    /// searched period (e.g. a moonset falling on the next day).
    Events {
        rise: Option<JulianInstant>,
        transit: Option<JulianInstant>,
        set: Option<JulianInstant>,
    },
    /// Always above the horizon.
    Circumpolar { transit: Option<JulianInstant> },
    /// Always below the horizon.
    NeverRises,
}

impl RiseTransitSet {
    pub fn regular(rise: JulianInstant, transit: JulianInstant, set: JulianInstant) -> Self {
        RiseTransitSet::Events {
            rise: Some(rise),
            transit: Some(transit),
            set: Some(set),
        }
    }

    pub fn rise(&self) -> Option<JulianInstant> {
        match self {
            RiseTransitSet::Events { rise, .. } => *rise,
            _ => None,
        }
    }

    pub fn set(&self) -> Option<JulianInstant> {
        match self {
            RiseTransitSet::Events { set, .. } => *set,
            _ => None,
        }
    }

    pub fn transit(&self) -> Option<JulianInstant> {
        match self {
            RiseTransitSet::Events { transit, .. } | RiseTransitSet::Circumpolar { transit } => {
                *transit
            }
            RiseTransitSet::NeverRises => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, RiseTransitSet::NeverRises)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilitySample {
    pub instant: JulianInstant,
    pub azimuth: f64,
    pub altitude: f64,
    pub airmass: f64,
    pub lunar_separation: f64,
}

/// Half-open interval `[start, end)` on the Julian axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightWindow {
    pub start: JulianInstant,
    pub end: JulianInstant,
}

/// The Sun's three horizon variants for the session night.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiseSetContext {
    /// Standard horizon, -0.8333°.
    pub standard: RiseTransitSet,
    /// Amateur astronomical twilight, -15°.
    pub amateur: RiseTransitSet,
    /// Astronomical twilight, -18°.
    pub professional: RiseTransitSet,
}

impl RiseSetContext {
    /// Night shared by every object: sunset to the following sunrise.
    ///
    /// Midnight sun, or a sunrise that precedes the sunset, yields no window;
    /// polar night samples the full day after `anchor`.
    pub fn night_window(&self, anchor: JulianInstant) -> Option<NightWindow> {
        match self.standard {
            RiseTransitSet::Events {
                rise: Some(rise),
                set: Some(set),
                ..
            } if rise > set => Some(NightWindow {
                start: set,
                end: rise,
            }),
            RiseTransitSet::NeverRises => Some(NightWindow {
                start: anchor,
                end: anchor + 1.0,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonReport {
    pub events: RiseTransitSet,
    /// Illuminated fraction of the disk, 0..1.
    pub disk: f64,
    /// Earth–Moon distance in km.
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub date: Option<String>,
    /// Sampling step in Julian days.
    pub step: f64,
    pub airmass_scale: f64,
    pub resolver_url: String,
    pub resolver_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            date: None,
            step: DEFAULT_STEP,
            airmass_scale: DEFAULT_AIRMASS_SCALE,
            resolver_url: DEFAULT_RESOLVER_URL.to_string(),
            resolver_timeout: Duration::from_secs(DEFAULT_RESOLVER_TIMEOUT_SECS),
        }
    }
}

impl SessionConfig {
    pub fn observer(&self) -> Result<ObserverPosition> {
        ObserverPosition::new(self.latitude, self.longitude)
    }
}

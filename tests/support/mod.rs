#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;

use vsquery::{
    EquatorialCoordinate, Ephemeris, HorizontalCoordinate, JulianInstant, NameService,
    ObserverPosition, RectangularPosition, Result, RiseTransitSet, VsqueryError,
};

/// 2017-06-30 00:00 UTC.
pub const JD_2017_06_30: f64 = 2_457_934.5;

/// Sunset 2017-06-30 19:30 UTC, 21:30 in Berlin.
pub const SUNSET: f64 = JD_2017_06_30 + 0.8125;
/// Sunrise 2017-07-01 03:00 UTC.
pub const SUNRISE: f64 = JD_2017_06_30 + 1.125;

pub fn jd(value: f64) -> JulianInstant {
    JulianInstant::new(value)
}

/// Ephemeris with canned answers; altitude is a function of the instant only.
pub struct StubEphemeris {
    pub standard: RiseTransitSet,
    pub amateur: RiseTransitSet,
    pub professional: RiseTransitSet,
    pub moon: RiseTransitSet,
    pub object: RiseTransitSet,
    pub moon_position: EquatorialCoordinate,
    pub altitude: fn(JulianInstant) -> f64,
    /// `horizontal` fails at or after this instant.
    pub fail_from: Option<f64>,
    pub horizontal_calls: Cell<usize>,
}

fn half_night_altitude(t: JulianInstant) -> f64 {
    // above the horizon during the first part of the night
    if t.value() < SUNSET + 0.145 {
        35.0
    } else {
        -5.0
    }
}

impl Default for StubEphemeris {
    fn default() -> Self {
        Self {
            standard: RiseTransitSet::regular(
                jd(SUNRISE),
                jd(JD_2017_06_30 + 0.475),
                jd(SUNSET),
            ),
            amateur: RiseTransitSet::regular(
                jd(SUNRISE - 0.08),
                jd(JD_2017_06_30 + 0.475),
                jd(SUNSET + 0.08),
            ),
            professional: RiseTransitSet::Circumpolar {
                transit: Some(jd(JD_2017_06_30 + 0.475)),
            },
            moon: RiseTransitSet::Events {
                rise: Some(jd(JD_2017_06_30 + 0.45)),
                transit: Some(jd(JD_2017_06_30 + 0.75)),
                set: None,
            },
            object: RiseTransitSet::regular(
                jd(JD_2017_06_30 + 0.55),
                jd(JD_2017_06_30 + 0.80),
                jd(JD_2017_06_30 + 1.05),
            ),
            moon_position: EquatorialCoordinate {
                right_ascension: 160.0,
                declination: 10.0,
            },
            altitude: half_night_altitude,
            fail_from: None,
            horizontal_calls: Cell::new(0),
        }
    }
}

impl Ephemeris for StubEphemeris {
    fn solar_rst(
        &self,
        _jd: JulianInstant,
        _observer: &ObserverPosition,
        horizon: f64,
    ) -> Result<RiseTransitSet> {
        Ok(if horizon <= -18.0 {
            self.professional
        } else if horizon <= -15.0 {
            self.amateur
        } else {
            self.standard
        })
    }

    fn lunar_rst(
        &self,
        _jd: JulianInstant,
        _observer: &ObserverPosition,
        _horizon: f64,
    ) -> Result<RiseTransitSet> {
        Ok(self.moon)
    }

    fn object_rst(
        &self,
        _jd: JulianInstant,
        _observer: &ObserverPosition,
        object: &EquatorialCoordinate,
    ) -> Result<RiseTransitSet> {
        if object.declination < -80.0 {
            return Ok(RiseTransitSet::NeverRises);
        }
        Ok(self.object)
    }

    fn solar_equatorial(&self, _jd: JulianInstant) -> Result<EquatorialCoordinate> {
        Ok(EquatorialCoordinate {
            right_ascension: 99.0,
            declination: 23.2,
        })
    }

    fn lunar_equatorial(&self, _jd: JulianInstant) -> Result<EquatorialCoordinate> {
        Ok(self.moon_position)
    }

    fn lunar_geocentric(&self, _jd: JulianInstant) -> Result<RectangularPosition> {
        Ok(RectangularPosition {
            x: 300_000.0,
            y: 200_000.0,
            z: 0.0,
        })
    }

    fn lunar_disk(&self, _jd: JulianInstant) -> Result<f64> {
        Ok(0.42)
    }

    fn horizontal(
        &self,
        _object: &EquatorialCoordinate,
        _observer: &ObserverPosition,
        jd: JulianInstant,
    ) -> Result<HorizontalCoordinate> {
        self.horizontal_calls.set(self.horizontal_calls.get() + 1);
        if self.fail_from.is_some_and(|from| jd.value() >= from) {
            return Err(VsqueryError::ephemeris("object", "stub failure"));
        }
        Ok(HorizontalCoordinate {
            azimuth: 180.0,
            altitude: (self.altitude)(jd),
        })
    }
}

/// Canned name-service replies keyed by object name; unknown names fail.
#[derive(Default)]
pub struct StubNameService {
    pub replies: HashMap<String, String>,
    pub queries: Cell<usize>,
}

impl StubNameService {
    pub fn with_reply(mut self, name: &str, reply: &str) -> Self {
        self.replies.insert(name.to_string(), reply.to_string());
        self
    }
}

impl NameService for StubNameService {
    fn query(&self, name: &str) -> Result<String> {
        self.queries.set(self.queries.get() + 1);
        self.replies
            .get(name)
            .cloned()
            .ok_or_else(|| VsqueryError::unresolvable(name, "stub has no reply"))
    }
}

pub const M42_REPLY: &str = "# M42\t#Q1530384
#=S0=Simbad (via url):    1
%@ 1507548
%I.0 M  42
%C.0 HII
%J 83.822083 -5.391111 = 05:35:17.30 -05:23:28.0
%J.E [20000.00 20000.00 90] D 2003yCat.2246....0C
#B 1507548
";

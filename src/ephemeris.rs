//! Capability interface for everything positional: the session and the
//! sampler only ever ask an [`Ephemeris`] and never compute celestial
//! mechanics themselves.

use crate::angles;
use crate::error::Result;
use crate::types::{
    EquatorialCoordinate, HorizontalCoordinate, JulianInstant, ObserverPosition,
    RectangularPosition, RiseTransitSet,
};

/// Sun's upper limb on the horizon, with refraction.
pub const SOLAR_STANDARD_HORIZON: f64 = -0.8333;
pub const AMATEUR_TWILIGHT_HORIZON: f64 = -15.0;
pub const PROFESSIONAL_TWILIGHT_HORIZON: f64 = -18.0;
pub const LUNAR_STANDARD_HORIZON: f64 = 0.125;
pub const STAR_STANDARD_HORIZON: f64 = -0.5667;

pub trait Ephemeris {
    /// Next solar rise, transit and set after `jd` for a horizon at `horizon` degrees.
    fn solar_rst(
        &self,
        jd: JulianInstant,
        observer: &ObserverPosition,
        horizon: f64,
    ) -> Result<RiseTransitSet>;

    fn lunar_rst(
        &self,
        jd: JulianInstant,
        observer: &ObserverPosition,
        horizon: f64,
    ) -> Result<RiseTransitSet>;

    /// Next events after `jd` for a fixed equatorial position.
    fn object_rst(
        &self,
        jd: JulianInstant,
        observer: &ObserverPosition,
        object: &EquatorialCoordinate,
    ) -> Result<RiseTransitSet>;

    fn solar_equatorial(&self, jd: JulianInstant) -> Result<EquatorialCoordinate>;

    fn lunar_equatorial(&self, jd: JulianInstant) -> Result<EquatorialCoordinate>;

    fn lunar_geocentric(&self, jd: JulianInstant) -> Result<RectangularPosition>;

    /// Illuminated fraction of the lunar disk, 0..1.
    fn lunar_disk(&self, jd: JulianInstant) -> Result<f64>;

    fn horizontal(
        &self,
        object: &EquatorialCoordinate,
        observer: &ObserverPosition,
        jd: JulianInstant,
    ) -> Result<HorizontalCoordinate>;

    fn airmass(&self, altitude: f64, scale: f64) -> f64 {
        angles::airmass(altitude, scale)
    }

    fn angular_separation(&self, a: &EquatorialCoordinate, b: &EquatorialCoordinate) -> f64 {
        angles::angular_separation(a, b)
    }
}

//! Night-long visibility sampling for one object.

use log::debug;

use crate::ephemeris::Ephemeris;
use crate::error::Result;
use crate::types::{
    EquatorialCoordinate, JulianInstant, NightWindow, ObserverPosition, VisibilitySample,
};

/// Raw sampling instants `start, start + step, ...` strictly before `end`.
///
/// A step that is not strictly positive (or not finite) produces no instants.
#[derive(Debug, Clone)]
pub struct TimeAxis {
    start: JulianInstant,
    end: JulianInstant,
    step: Option<f64>,
    index: u64,
}

impl TimeAxis {
    pub fn new(window: NightWindow, step: f64) -> Self {
        let step = (step > 0.0 && step.is_finite()).then_some(step);
        match step {
            Some(step) => debug!(
                "{} raw sampling steps of {} d",
                ((window.end - window.start) / step).ceil().max(0.0),
                step
            ),
            None => debug!("sampling step is not positive, skipping the night"),
        }
        Self {
            start: window.start,
            end: window.end,
            step,
            index: 0,
        }
    }
}

impl Iterator for TimeAxis {
    type Item = JulianInstant;

    fn next(&mut self) -> Option<JulianInstant> {
        let step = self.step?;
        // multiply rather than accumulate so long nights do not drift
        let instant = self.start + self.index as f64 * step;
        if instant < self.end {
            self.index += 1;
            Some(instant)
        } else {
            None
        }
    }
}

/// Lazily yields the samples of `object` with altitude above 0°.
///
/// An ephemeris failure is yielded once and ends the sequence.
pub struct NightSampler<'a, E: ?Sized> {
    ephemeris: &'a E,
    object: EquatorialCoordinate,
    observer: ObserverPosition,
    airmass_scale: f64,
    axis: TimeAxis,
    failed: bool,
}

impl<'a, E: Ephemeris + ?Sized> NightSampler<'a, E> {
    pub fn new(
        ephemeris: &'a E,
        object: EquatorialCoordinate,
        observer: ObserverPosition,
        window: NightWindow,
        step: f64,
        airmass_scale: f64,
    ) -> Self {
        Self {
            ephemeris,
            object,
            observer,
            airmass_scale,
            axis: TimeAxis::new(window, step),
            failed: false,
        }
    }

    fn sample(&self, instant: JulianInstant) -> Result<Option<VisibilitySample>> {
        let position = self.ephemeris.horizontal(&self.object, &self.observer, instant)?;
        if position.altitude <= 0.0 {
            return Ok(None);
        }
        let moon = self.ephemeris.lunar_equatorial(instant)?;
        Ok(Some(VisibilitySample {
            instant,
            azimuth: position.azimuth,
            altitude: position.altitude,
            airmass: self.ephemeris.airmass(position.altitude, self.airmass_scale),
            lunar_separation: self.ephemeris.angular_separation(&self.object, &moon),
        }))
    }
}

impl<E: Ephemeris + ?Sized> Iterator for NightSampler<'_, E> {
    type Item = Result<VisibilitySample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some(instant) = self.axis.next() {
            match self.sample(instant) {
                Ok(Some(sample)) => return Some(Ok(sample)),
                Ok(None) => continue,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

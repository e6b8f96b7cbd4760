//! One invocation: date, Sun, Moon, then every object in argument order.

use chrono::TimeZone;
use log::{debug, info, warn};

use crate::date::{self, local_to_julian};
use crate::ephemeris::{
    Ephemeris, AMATEUR_TWILIGHT_HORIZON, LUNAR_STANDARD_HORIZON, PROFESSIONAL_TWILIGHT_HORIZON,
    SOLAR_STANDARD_HORIZON,
};
use crate::error::{Result, VsqueryError};
use crate::ordering::order_events;
use crate::report::Presenter;
use crate::resolver::{CoordinateResolver, NameService};
use crate::sampler::NightSampler;
use crate::types::{
    CalendarDateTime, JulianInstant, MoonReport, NightWindow, ObserverPosition, RiseSetContext,
    SessionConfig,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    /// Objects whose coordinates resolved and whose report completed.
    pub reported: usize,
    /// Tokens that failed, in argument order.
    pub failed: Vec<String>,
    pub samples: usize,
}

pub struct Session<'a, E: ?Sized, S, P, Tz> {
    config: &'a SessionConfig,
    ephemeris: &'a E,
    resolver: CoordinateResolver<S>,
    presenter: P,
    tz: Tz,
}

impl<'a, E, S, P, Tz> Session<'a, E, S, P, Tz>
where
    E: Ephemeris + ?Sized,
    S: NameService,
    P: Presenter,
    Tz: TimeZone,
{
    pub fn new(
        config: &'a SessionConfig,
        ephemeris: &'a E,
        resolver: CoordinateResolver<S>,
        presenter: P,
        tz: Tz,
    ) -> Self {
        Self {
            config,
            ephemeris,
            resolver,
            presenter,
            tz,
        }
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Runs the whole session with `now` as the local system time.
    ///
    /// Per-object failures are reported and counted; only observer, Sun,
    /// Moon and output errors abort.
    pub fn run(&mut self, now: &CalendarDateTime, objects: &[String]) -> Result<SessionSummary> {
        let observer = self.config.observer()?;
        let (date, instant) = self.session_date(now)?;
        self.presenter.header(&observer, instant, &date)?;

        let anchor = local_to_julian(&date.at_anchor(), &self.tz)?;
        debug!("session anchored at JD {:.6}", anchor.value());

        let context = self.sun(anchor, &observer)?;
        self.moon(anchor, &observer)?;
        let window = self.night_window(&context, anchor, &observer)?;
        match window {
            Some(w) => debug!("night window [{:.6}, {:.6})", w.start.value(), w.end.value()),
            None => debug!("no night window"),
        }

        let mut summary = SessionSummary::default();
        for token in objects {
            match self.object(token, anchor, &observer, window) {
                Ok(samples) => {
                    summary.reported += 1;
                    summary.samples += samples;
                }
                Err(e) if e.is_object_scoped() => {
                    warn!("{}", e);
                    self.presenter.object_failure(token, &e)?;
                    summary.failed.push(token.clone());
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "session done: {} reported, {} failed",
            summary.reported,
            summary.failed.len()
        );
        Ok(summary)
    }

    /// Normalized session date and its Julian instant; an unusable date
    /// falls back to `now`.
    fn session_date(&mut self, now: &CalendarDateTime) -> Result<(CalendarDateTime, JulianInstant)> {
        let requested = self.config.date.as_deref().unwrap_or("");
        let parsed = date::normalize(requested, now)
            .and_then(|d| local_to_julian(&d, &self.tz).map(|jd| (d, jd)));
        match parsed {
            Ok(pair) => Ok(pair),
            Err(e @ VsqueryError::InvalidDate { .. }) => {
                warn!("{}, falling back to the current date", e);
                self.presenter.date_fallback(&e)?;
                Ok((*now, local_to_julian(now, &self.tz)?))
            }
            Err(e) => Err(e),
        }
    }

    fn sun(&mut self, anchor: JulianInstant, observer: &ObserverPosition) -> Result<RiseSetContext> {
        let context = RiseSetContext {
            standard: self.ephemeris.solar_rst(anchor, observer, SOLAR_STANDARD_HORIZON)?,
            amateur: self.ephemeris.solar_rst(anchor, observer, AMATEUR_TWILIGHT_HORIZON)?,
            professional: self
                .ephemeris
                .solar_rst(anchor, observer, PROFESSIONAL_TWILIGHT_HORIZON)?,
        };
        self.presenter.sun(&context, &order_events(&context.standard))?;
        Ok(context)
    }

    fn moon(&mut self, anchor: JulianInstant, observer: &ObserverPosition) -> Result<()> {
        let moon = MoonReport {
            events: self.ephemeris.lunar_rst(anchor, observer, LUNAR_STANDARD_HORIZON)?,
            disk: self.ephemeris.lunar_disk(anchor)?,
            distance_km: self.ephemeris.lunar_geocentric(anchor)?.distance(),
        };
        self.presenter.moon(&moon, &order_events(&moon.events))
    }

    fn night_window(
        &self,
        context: &RiseSetContext,
        anchor: JulianInstant,
        observer: &ObserverPosition,
    ) -> Result<Option<NightWindow>> {
        if let Some(window) = context.night_window(anchor) {
            return Ok(Some(window));
        }
        // at high latitudes the next sunrise can fall before the evening's sunset
        let Some(set) = context.standard.set() else {
            return Ok(None);
        };
        let after_set = self.ephemeris.solar_rst(set, observer, SOLAR_STANDARD_HORIZON)?;
        Ok(after_set
            .rise()
            .filter(|rise| *rise > set)
            .map(|rise| NightWindow {
                start: set,
                end: rise,
            }))
    }

    /// Reports one object; returns the number of table rows.
    fn object(
        &mut self,
        token: &str,
        anchor: JulianInstant,
        observer: &ObserverPosition,
        window: Option<NightWindow>,
    ) -> Result<usize> {
        let coord = self.resolver.resolve(token)?;
        self.presenter.object_header(token, &coord)?;

        let events = self.ephemeris.object_rst(anchor, observer, &coord)?;
        self.presenter.object_events(&events, &order_events(&events))?;
        if !events.is_visible() {
            return Ok(0);
        }

        let Some(window) = window else {
            self.presenter.no_night()?;
            return Ok(0);
        };

        self.presenter.table_header(&window)?;
        let ephemeris = self.ephemeris;
        let sampler = NightSampler::new(
            ephemeris,
            coord,
            *observer,
            window,
            self.config.step,
            self.config.airmass_scale,
        );
        let mut rows = 0;
        for sample in sampler {
            self.presenter.table_row(&sample?)?;
            rows += 1;
        }
        Ok(rows)
    }
}

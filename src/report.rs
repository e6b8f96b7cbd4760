//! Presentation of session results.
//!
//! The session hands structured results to a [`Presenter`]; [`TextReport`]
//! renders them as the plain-text report written by the command line tool.

use std::io::Write;

use chrono::TimeZone;

use crate::angles::{to_dms, to_hms};
use crate::date::julian_to_local;
use crate::error::{Result, VsqueryError};
use crate::ordering::EventKind;
use crate::types::{
    CalendarDateTime, EquatorialCoordinate, JulianInstant, MoonReport, NightWindow,
    ObserverPosition, RiseSetContext, RiseTransitSet, VisibilitySample,
};

pub type OrderedEvents = [(EventKind, JulianInstant)];

pub trait Presenter {
    fn header(
        &mut self,
        observer: &ObserverPosition,
        instant: JulianInstant,
        date: &CalendarDateTime,
    ) -> Result<()>;

    /// The requested date was rejected and the current date is used instead.
    fn date_fallback(&mut self, error: &VsqueryError) -> Result<()>;

    fn sun(&mut self, context: &RiseSetContext, ordered: &OrderedEvents) -> Result<()>;

    fn moon(&mut self, moon: &MoonReport, ordered: &OrderedEvents) -> Result<()>;

    fn object_header(&mut self, token: &str, coord: &EquatorialCoordinate) -> Result<()>;

    fn object_events(&mut self, events: &RiseTransitSet, ordered: &OrderedEvents) -> Result<()>;

    /// The Sun does not set, so there is no table to sample.
    fn no_night(&mut self) -> Result<()>;

    fn table_header(&mut self, window: &NightWindow) -> Result<()>;

    fn table_row(&mut self, sample: &VisibilitySample) -> Result<()>;

    fn object_failure(&mut self, token: &str, error: &VsqueryError) -> Result<()>;
}

pub fn format_calendar(date: &CalendarDateTime) -> String {
    format!(
        "{}-{:02}-{:02} {:02}:{:02}:{:02}",
        date.year,
        date.month,
        date.day,
        date.hour,
        date.minute,
        date.second.trunc() as u32
    )
}

/// Report on `out`; diagnostics (failed objects, date fallback) go to `diag`.
pub struct TextReport<W, D, Tz> {
    out: W,
    diag: D,
    tz: Tz,
}

impl<W: Write, D: Write, Tz: TimeZone> TextReport<W, D, Tz> {
    pub fn new(out: W, diag: D, tz: Tz) -> Self {
        Self { out, diag, tz }
    }

    pub fn into_inner(self) -> (W, D) {
        (self.out, self.diag)
    }

    fn local(&self, jd: JulianInstant) -> String {
        julian_to_local(jd, &self.tz)
            .map(|date| format_calendar(&date))
            .unwrap_or_else(|| "----".to_string())
    }

    fn events(&mut self, ordered: &OrderedEvents) -> Result<()> {
        for &(kind, jd) in ordered {
            let line = format!("{} {:<14}: {}", kind.symbol(), kind.label(), self.local(jd));
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn degenerate(&mut self, body: &str, events: &RiseTransitSet) -> Result<()> {
        match events {
            RiseTransitSet::Circumpolar { .. } => writeln!(
                self.out,
                "{} is circumpolar, that is it remains the whole day above the horizon",
                body
            )?,
            RiseTransitSet::NeverRises => writeln!(
                self.out,
                "{} remains the whole day below the horizon",
                body
            )?,
            RiseTransitSet::Events { .. } => {}
        }
        Ok(())
    }

    fn twilight(&self, events: &RiseTransitSet, boundary: Option<JulianInstant>, depth: f64) -> String {
        match events {
            RiseTransitSet::Circumpolar { .. } => format!("none (sun stays above {}°)", depth),
            RiseTransitSet::NeverRises => format!("none (sun stays below {}°)", depth),
            RiseTransitSet::Events { .. } => boundary
                .map(|jd| self.local(jd))
                .unwrap_or_else(|| "----".to_string()),
        }
    }
}

impl<W: Write, D: Write, Tz: TimeZone> Presenter for TextReport<W, D, Tz> {
    fn header(
        &mut self,
        observer: &ObserverPosition,
        instant: JulianInstant,
        date: &CalendarDateTime,
    ) -> Result<()> {
        writeln!(self.out, "##### observer #")?;
        writeln!(
            self.out,
            "(lat,lng)       : ({:.6},{:.6})",
            observer.latitude, observer.longitude
        )?;
        writeln!(self.out, "##### date #####")?;
        writeln!(self.out, "julian          : {:.6}", instant.value())?;
        writeln!(self.out, "calendar (LT)   : {}", format_calendar(date))?;
        Ok(())
    }

    fn date_fallback(&mut self, error: &VsqueryError) -> Result<()> {
        writeln!(self.diag, "{}, use local system date/time", error)?;
        Ok(())
    }

    fn sun(&mut self, context: &RiseSetContext, ordered: &OrderedEvents) -> Result<()> {
        writeln!(self.out, "##### sun ######")?;
        self.degenerate("sun", &context.standard)?;
        self.events(ordered)?;

        let (amateur, professional) = (&context.amateur, &context.professional);
        let lines = [
            ("twilight amateur astro. begin     ", self.twilight(amateur, amateur.set(), -15.0)),
            ("twilight professional astro. begin", self.twilight(professional, professional.set(), -18.0)),
            ("twilight professional astro. end  ", self.twilight(professional, professional.rise(), -18.0)),
            ("twilight amateur astro. end       ", self.twilight(amateur, amateur.rise(), -15.0)),
        ];
        for (label, value) in lines {
            writeln!(self.out, "{}: {}", label, value)?;
        }
        Ok(())
    }

    fn moon(&mut self, moon: &MoonReport, ordered: &OrderedEvents) -> Result<()> {
        writeln!(self.out, "##### moon #####")?;
        self.degenerate("moon", &moon.events)?;
        self.events(ordered)?;
        writeln!(
            self.out,
            "disk            : {:.6} (illuminated fraction of the moons disk, value between 0 and 1)",
            moon.disk
        )?;
        writeln!(self.out, "lunar earth dist: {:.3} km", moon.distance_km)?;
        Ok(())
    }

    fn object_header(&mut self, token: &str, coord: &EquatorialCoordinate) -> Result<()> {
        let hms = to_hms(coord.right_ascension);
        let dms = to_dms(coord.declination);
        writeln!(self.out, "#### object {} ####", token)?;
        writeln!(
            self.out,
            "(ra, dec) : ({:.6}, {:.6}) ({}:{}:{:.3}, {}{}:{}:{:.3}) J2000",
            coord.right_ascension,
            coord.declination,
            hms.hours,
            hms.minutes,
            hms.seconds,
            if dms.negative { '-' } else { '+' },
            dms.degrees,
            dms.minutes,
            dms.seconds
        )?;
        Ok(())
    }

    fn object_events(&mut self, events: &RiseTransitSet, ordered: &OrderedEvents) -> Result<()> {
        self.degenerate("object", events)?;
        self.events(ordered)
    }

    fn no_night(&mut self) -> Result<()> {
        writeln!(self.out, "\nthe sun does not set, no visibility table")?;
        Ok(())
    }

    fn table_header(&mut self, _window: &NightWindow) -> Result<()> {
        writeln!(
            self.out,
            "\nairmass\tazimuth\taltitude  date\t     time\tmoon separation"
        )?;
        Ok(())
    }

    fn table_row(&mut self, sample: &VisibilitySample) -> Result<()> {
        let when = self.local(sample.instant);
        writeln!(
            self.out,
            "{:2.2} \t{:4.2} \t{:4.2}\t{}\t{:.6} (degrees)",
            sample.airmass, sample.azimuth, sample.altitude, when, sample.lunar_separation
        )?;
        Ok(())
    }

    fn object_failure(&mut self, _token: &str, error: &VsqueryError) -> Result<()> {
        writeln!(self.diag, "{}", error)?;
        Ok(())
    }
}

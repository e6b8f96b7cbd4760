pub mod almanac;
pub mod angles;
pub mod date;
pub mod ephemeris;
pub mod error;
pub mod ordering;
pub mod report;
pub mod resolver;
pub mod sampler;
pub mod session;
pub mod types;

pub use almanac::{greenwich_sidereal_time, local_sidereal_time, Almanac};

pub use angles::{
    airmass, angular_separation, deg_to_rad, equatorial_to_horizontal, normalize_angle,
    normalize_signed, rad_to_deg, to_dms, to_hms, Dms, Hms,
};

pub use date::{julian_from_utc, julian_to_local, julian_to_utc, local_to_julian, normalize};

pub use ephemeris::{
    Ephemeris, AMATEUR_TWILIGHT_HORIZON, LUNAR_STANDARD_HORIZON, PROFESSIONAL_TWILIGHT_HORIZON,
    SOLAR_STANDARD_HORIZON, STAR_STANDARD_HORIZON,
};

pub use error::{Result, VsqueryError};

pub use ordering::{order_events, EventKind};

pub use report::{format_calendar, Presenter, TextReport};

pub use resolver::{parse_direct, CoordinateResolver, NameService, ReplyParser, SesameClient};

pub use sampler::{NightSampler, TimeAxis};

pub use session::{Session, SessionSummary};

pub use types::{
    CalendarDateTime, EquatorialCoordinate, HorizontalCoordinate, JulianInstant, MoonReport,
    NightWindow, ObserverPosition, RectangularPosition, RiseSetContext, RiseTransitSet,
    SessionConfig, VisibilitySample,
};

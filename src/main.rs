use std::io;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use env_logger::Env;
use log::debug;

use vsquery::types::{
    DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_RESOLVER_TIMEOUT_SECS, DEFAULT_RESOLVER_URL,
    DEFAULT_STEP,
};
use vsquery::{
    Almanac, CalendarDateTime, CoordinateResolver, SesameClient, Session, SessionConfig,
    TextReport,
};

#[derive(Parser)]
#[command(name = "vsquery", version)]
#[command(about = "Sun and Moon rise/set, twilight and night visibility tables for celestial objects")]
struct Cli {
    /// Latitude coordinate in decimal degree
    #[arg(short = 'a', long, default_value_t = DEFAULT_LATITUDE, allow_negative_numbers = true)]
    latitude: f64,

    /// Longitude coordinate in decimal degree, east positive
    #[arg(short = 'o', long, default_value_t = DEFAULT_LONGITUDE, allow_negative_numbers = true)]
    longitude: f64,

    /// Date in format yyyy-mm-dd, e.g. '2017-06-30' [default: current date and time]
    #[arg(short = 'd', long)]
    date: Option<String>,

    /// Visibility table step as a fraction of a day
    #[arg(short = 's', long, default_value_t = DEFAULT_STEP, allow_negative_numbers = true)]
    step: f64,

    /// Name resolver timeout in seconds
    #[arg(short = 't', long, default_value_t = DEFAULT_RESOLVER_TIMEOUT_SECS)]
    timeout: u64,

    /// Name resolver endpoint; the object name is sent as its query string
    #[arg(long, default_value = DEFAULT_RESOLVER_URL)]
    resolver_url: String,

    /// Object name (e.g. M42) or "ra dec" in decimal degrees; options may follow
    #[arg(value_name = "OBJECT")]
    objects: Vec<String>,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            latitude: self.latitude,
            longitude: self.longitude,
            date: self.date.clone(),
            step: self.step,
            resolver_url: self.resolver_url.clone(),
            resolver_timeout: Duration::from_secs(self.timeout),
            ..SessionConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.session_config();
    config.observer()?;

    let service = SesameClient::new(&config.resolver_url, config.resolver_timeout)?;
    let report = TextReport::new(io::stdout().lock(), io::stderr().lock(), Local);
    let ephemeris = Almanac::new();
    let mut session = Session::new(
        &config,
        &ephemeris,
        CoordinateResolver::new(service),
        report,
        Local,
    );

    let now = CalendarDateTime::from(Local::now().naive_local());
    let summary = session
        .run(&now, &cli.objects)
        .context("visibility session failed")?;
    debug!(
        "{} objects reported, {} rows, failed: {:?}",
        summary.reported, summary.samples, summary.failed
    );
    Ok(())
}

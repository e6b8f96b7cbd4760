//! Object coordinate resolution.
//!
//! A token is first read as a literal `"ra dec"` pair in degrees; anything
//! else is treated as an object name and looked up through a [`NameService`],
//! whose plain-text reply is scanned for the first coordinate line of a
//! recognized provider.

use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::Url;

use crate::error::{Result, VsqueryError};
use crate::types::EquatorialCoordinate;

/// Provider headers in a Sesame reply (`#=N=NED`, `#=S0=Simbad`, ...).
pub const DEFAULT_PROVIDER_MARKERS: &[&str] = &["=NED", "=Simbad"];

/// Prefix of the J2000 decimal-degree coordinate record.
pub const COORDINATE_MARKER: &str = "%J ";

const USER_AGENT: &str = concat!("vsquery/", env!("CARGO_PKG_VERSION"));

/// Source of raw name-resolution replies.
pub trait NameService {
    fn query(&self, name: &str) -> Result<String>;
}

/// HTTP client for the CDS Sesame resolver.
pub struct SesameClient {
    client: Client,
    base_url: Url,
}

impl SesameClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| VsqueryError::invalid_argument("resolver-url", e.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                VsqueryError::invalid_argument("resolver", format!("cannot build HTTP client: {}", e))
            })?;
        Ok(Self { client, base_url })
    }

    pub fn query_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(name));
        url
    }
}

impl NameService for SesameClient {
    fn query(&self, name: &str) -> Result<String> {
        let url = self.query_url(name);
        debug!("querying {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| VsqueryError::unresolvable(name, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(VsqueryError::unresolvable(
                name,
                format!("HTTP error {} for {}", response.status(), url),
            ));
        }

        response
            .text()
            .map_err(|e| VsqueryError::unresolvable(name, format!("failed to read reply: {}", e)))
    }
}

/// Literal `"ra dec"` in degrees: exactly two fields, both fully numeric and in range.
pub fn parse_direct(token: &str) -> Option<EquatorialCoordinate> {
    let mut fields = token.split_whitespace();
    let (ra, dec) = (fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }
    EquatorialCoordinate::new(ra.parse().ok()?, dec.parse().ok()?)
}

/// Start of a number: a digit, or `-` immediately followed by a digit.
fn starts_number(bytes: &[u8], i: usize) -> bool {
    match bytes[i] {
        b'0'..=b'9' => true,
        b'-' => bytes.get(i + 1).is_some_and(u8::is_ascii_digit),
        _ => false,
    }
}

/// First two numeric tokens of `text`, left to right.
fn leading_pair(text: &str) -> Option<(f64, f64)> {
    let bytes = text.as_bytes();
    let mut values = [0.0; 2];
    let mut found = 0;
    let mut i = 0;

    while i < bytes.len() && found < 2 {
        if !starts_number(bytes, i) {
            i += 1;
            continue;
        }
        let start = i;
        if bytes[i] == b'-' {
            i += 1;
        }
        let mut seen_point = false;
        while i < bytes.len() {
            match bytes[i] {
                b'0'..=b'9' => i += 1,
                b'.' if !seen_point => {
                    seen_point = true;
                    i += 1;
                }
                _ => break,
            }
        }
        values[found] = text[start..i].parse().ok()?;
        found += 1;
    }

    (found == 2).then_some((values[0], values[1]))
}

/// Scans a name-service reply for provider coordinates.
#[derive(Debug, Clone)]
pub struct ReplyParser {
    markers: Vec<String>,
}

impl Default for ReplyParser {
    fn default() -> Self {
        Self::with_markers(DEFAULT_PROVIDER_MARKERS.iter().copied())
    }
}

impl ReplyParser {
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    fn is_provider_header(&self, line: &str) -> bool {
        line.contains("#=") && self.markers.iter().any(|m| line.contains(m.as_str()))
    }

    /// Once a provider header has been seen, the first coordinate record
    /// holding two in-range numbers wins.
    pub fn extract(&self, reply: &str) -> Option<EquatorialCoordinate> {
        let mut in_provider = false;
        for line in reply.lines() {
            in_provider |= self.is_provider_header(line);
            if !in_provider {
                continue;
            }
            let Some(pos) = line.find(COORDINATE_MARKER) else {
                continue;
            };
            if let Some((ra, dec)) = leading_pair(&line[pos..]) {
                if let Some(coord) = EquatorialCoordinate::new(ra, dec) {
                    return Some(coord);
                }
                debug!("coordinate record out of range: ({}, {})", ra, dec);
            }
        }
        None
    }
}

pub struct CoordinateResolver<S> {
    service: S,
    parser: ReplyParser,
}

impl<S: NameService> CoordinateResolver<S> {
    pub fn new(service: S) -> Self {
        Self::with_parser(service, ReplyParser::default())
    }

    pub fn with_parser(service: S, parser: ReplyParser) -> Self {
        Self { service, parser }
    }

    pub fn resolve(&self, token: &str) -> Result<EquatorialCoordinate> {
        if let Some(coord) = parse_direct(token) {
            debug!("'{}' is a literal coordinate pair", token);
            return Ok(coord);
        }

        let reply = self.service.query(token.trim())?;
        let coord = self.parser.extract(&reply).ok_or_else(|| {
            VsqueryError::unresolvable(token, "no coordinates in name-service reply")
        })?;
        info!(
            "resolved '{}' to ({}, {})",
            token, coord.right_ascension, coord.declination
        );
        Ok(coord)
    }
}

// src/geo.rs

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use url::Url;

/// Query parameters that map providers use to carry a `lat,lng` pair.
const COORDINATE_PARAMS: &[&str] = &["q", "query", "ll", "destination"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    fn checked(lat: f64, lng: f64) -> Option<Self> {
        ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng))
            .then_some(Coordinates { lat, lng })
    }
}

fn place_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!3d(-?\d+(?:\.\d+)?)!4d(-?\d+(?:\.\d+)?)").unwrap())
}

fn viewport_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@(-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?)").unwrap())
}

fn bare_pair() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").unwrap())
}

fn from_captures(re: &Regex, haystack: &str) -> Option<Coordinates> {
    re.captures_iter(haystack).find_map(|caps| {
        let lat = caps.get(1)?.as_str().parse().ok()?;
        let lng = caps.get(2)?.as_str().parse().ok()?;
        Coordinates::checked(lat, lng)
    })
}

fn from_query(link: &str) -> Option<Coordinates> {
    let url = Url::parse(link)
        .or_else(|_| Url::parse(&format!("https://{link}")))
        .ok()?;

    url.query_pairs().find_map(|(key, value)| {
        if COORDINATE_PARAMS.contains(&&*key) {
            from_captures(bare_pair(), &value)
        } else {
            None
        }
    })
}

/// Pull a latitude/longitude pair out of a pasted map link.
///
/// Place markers (`!3d..!4d..`) win over the viewport centre (`@lat,lng`),
/// which wins over query parameters. Out-of-range pairs are skipped.
pub fn extract_coordinates(link: &str) -> Option<Coordinates> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    from_captures(place_marker(), link)
        .or_else(|| from_captures(viewport_marker(), link))
        .or_else(|| from_query(link))
        .or_else(|| from_captures(bare_pair(), link))
}

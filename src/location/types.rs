//! Core types for the location subsystem.

use crate::error::SolarError;
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

/// A validated point on the Earth's surface.
///
/// Latitude is north-positive, longitude is **east-positive**: Sydney is
/// (-33.86, 151.20), New York is (40.64, -74.02).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, SolarError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if valid {
            Ok(Self { latitude, longitude })
        } else {
            Err(SolarError::InvalidCoordinate { latitude, longitude })
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}°{}, {:.4}°{}", self.latitude.abs(), ns, self.longitude.abs(), ew)
    }
}

/// A named place with its coordinate and civil time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub coordinate: GeoCoordinate,
    pub tz: Tz,
}

impl Place {
    pub fn display_line(&self) -> String {
        format!("{} ({}) {}", self.name, self.coordinate, self.tz)
    }
}

/// Parse an IANA zone name.
pub fn parse_timezone(name: &str) -> Result<Tz, SolarError> {
    name.parse().map_err(|_| SolarError::UnknownTimezone(name.to_string()))
}

//! Location resolver: turns the user's location inputs into a [`Place`].
//!
//! Location priority: place name > lat/lon > configured default place.
//! Zone priority: explicit zone > the place's own zone > configured default > UTC.

use super::builtin::builtin_lookup;
use super::types::{parse_timezone, GeoCoordinate, Place};
use crate::config::Config;
use crate::error::SolarError;

/// Raw location inputs, as given on the command line or in a query string.
#[derive(Debug, Clone, Default)]
pub struct LocationQuery {
    pub place: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tz: Option<String>,
}

impl LocationQuery {
    pub fn resolve(&self, config: &Config) -> Result<Place, SolarError> {
        let explicit_tz = self.tz.as_deref().map(parse_timezone).transpose()?;

        let mut place = if let Some(name) = self.place.as_deref() {
            builtin_lookup(name)?
        } else if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            let coordinate = GeoCoordinate::new(lat, lon)?;
            Place {
                name: format!("{:.4}, {:.4}", lat, lon),
                coordinate,
                tz: config.timezone()?.unwrap_or(chrono_tz::UTC),
            }
        } else if let Some(name) = config.default_place.as_deref() {
            builtin_lookup(name)?
        } else {
            return Err(SolarError::MissingLocation);
        };

        if let Some(tz) = explicit_tz {
            place.tz = tz;
        }
        Ok(place)
    }
}

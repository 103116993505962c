//! Built-in place table: the reference locations plus a few polar ones.

use super::types::{GeoCoordinate, Place};
use crate::error::SolarError;
use chrono_tz::Tz;
use serde::Serialize;

struct BuiltinPlace {
    names: &'static [&'static str], // canonical + aliases
    lat: f64,
    lon: f64,
    tz: Tz,
}

// Longitudes are east-positive.
const BUILTIN_PLACES: &[BuiltinPlace] = &[
    BuiltinPlace {
        names: &["sydney"],
        lat: -33.86,
        lon: 151.20,
        tz: chrono_tz::Australia::Sydney,
    },
    BuiltinPlace {
        names: &["stockholm"],
        lat: 59.33,
        lon: 18.067,
        tz: chrono_tz::Europe::Stockholm,
    },
    BuiltinPlace {
        names: &["new york", "nyc", "new york city"],
        lat: 40.642,
        lon: -74.017,
        tz: chrono_tz::America::New_York,
    },
    BuiltinPlace {
        names: &["tromso", "tromsø", "tromsoe"],
        lat: 69.6492,
        lon: 18.9553,
        tz: chrono_tz::Europe::Oslo,
    },
    BuiltinPlace {
        names: &["longyearbyen", "svalbard"],
        lat: 78.2232,
        lon: 15.6267,
        tz: chrono_tz::Arctic::Longyearbyen,
    },
    BuiltinPlace {
        names: &["mcmurdo", "mcmurdo station"],
        lat: -77.8419,
        lon: 166.6863,
        tz: chrono_tz::Antarctica::McMurdo,
    },
    BuiltinPlace {
        names: &["quito"],
        lat: -0.1807,
        lon: -78.4678,
        tz: chrono_tz::America::Guayaquil,
    },
];

/// Case-insensitive lookup over names and aliases.
pub fn builtin_lookup(query: &str) -> Result<Place, SolarError> {
    let q = query.trim().to_lowercase();
    let entry = BUILTIN_PLACES
        .iter()
        .find(|p| p.names.iter().any(|n| *n == q))
        .ok_or_else(|| SolarError::UnknownPlace(query.to_string()))?;
    Ok(Place {
        name: entry.names[0].to_string(),
        coordinate: GeoCoordinate::new(entry.lat, entry.lon)?,
        tz: entry.tz,
    })
}

/// A place entry for the public place list.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceInfo {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub tz: String,
}

pub fn builtin_places() -> Vec<PlaceInfo> {
    BUILTIN_PLACES
        .iter()
        .map(|p| PlaceInfo {
            name: p.names[0].to_string(),
            lat: p.lat,
            lon: p.lon,
            tz: p.tz.name().to_string(),
        })
        .collect()
}

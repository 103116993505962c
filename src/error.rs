//! Error taxonomy for the calculator, the resolver and the outer layers.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between a request and a solar event time.
///
/// A day on which the sun never reaches the target altitude is *not* an
/// error; see [`crate::solar::Crossing`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolarError {
    #[error("invalid coordinate: latitude {latitude} (expected -90..=90), longitude {longitude} (expected -180..=180)")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid solar altitude {0} (expected -90..=90 degrees)")]
    InvalidAltitude(f64),

    #[error("{event} does not occur within {days} days of the requested moment")]
    EventNeverOccurs { event: String, days: u32 },

    #[error("{0} is outside the supported calendar range")]
    OutOfRange(NaiveDate),

    #[error("unknown timezone '{0}' (use an IANA name such as Europe/Stockholm)")]
    UnknownTimezone(String),

    #[error("unknown place '{0}'")]
    UnknownPlace(String),

    #[error("no location given: name a place or pass both lat and lon")]
    MissingLocation,

    #[error("invalid date or time '{0}'")]
    InvalidDate(String),

    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T, E = SolarError> = std::result::Result<T, E>;

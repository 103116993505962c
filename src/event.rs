//! Solar events and the altitudes that define them.
//!
//! Every event is a crossing of one solar altitude in one direction:
//! sunrise is the sun's upper limb coming up through the refracted horizon,
//! civil dusk is the sun's centre going down through -6°, and so on.

use crate::error::SolarError;
use crate::solar::Crossing;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Atmospheric refraction (34') plus the solar semidiameter (16'), rounded.
pub const ATMOSPHERIC_REFRACTION: f64 = 0.833;

/// Refraction-adjusted altitude of the sun's centre at sunrise and sunset.
pub const HORIZON_ALTITUDE: f64 = -ATMOSPHERIC_REFRACTION;

pub const CIVIL_TWILIGHT: f64 = -6.0;
pub const NAUTICAL_TWILIGHT: f64 = -12.0;
pub const ASTRONOMICAL_TWILIGHT: f64 = -18.0;

/// Which way the sun is moving through the target altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Morning crossing (dawn, sunrise).
    Rising,
    /// Evening crossing (sunset, dusk).
    Setting,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Rising => write!(f, "rising"),
            Direction::Setting => write!(f, "setting"),
        }
    }
}

/// A signed solar altitude in degrees; negative is below the horizon.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct AltitudeTarget(f64);

impl AltitudeTarget {
    pub const HORIZON: AltitudeTarget = AltitudeTarget(HORIZON_ALTITUDE);

    /// Rejects altitudes the sun cannot occupy, including NaN.
    pub fn new(degrees: f64) -> Result<Self, SolarError> {
        if degrees.is_finite() && (-90.0..=90.0).contains(&degrees) {
            Ok(Self(degrees))
        } else {
            Err(SolarError::InvalidAltitude(degrees))
        }
    }

    pub fn degrees(self) -> f64 {
        self.0
    }
}

/// Twilight depth used for dawn and dusk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Twilight {
    #[default]
    Civil,
    Nautical,
    Astronomical,
}

impl Twilight {
    pub fn altitude(self) -> f64 {
        match self {
            Twilight::Civil => CIVIL_TWILIGHT,
            Twilight::Nautical => NAUTICAL_TWILIGHT,
            Twilight::Astronomical => ASTRONOMICAL_TWILIGHT,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Twilight::Civil => "civil",
            Twilight::Nautical => "nautical",
            Twilight::Astronomical => "astronomical",
        }
    }
}

impl FromStr for Twilight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "civil" => Ok(Twilight::Civil),
            "nautical" => Ok(Twilight::Nautical),
            "astronomical" => Ok(Twilight::Astronomical),
            _ => Err(format!("Unknown twilight '{}'. Use civil, nautical or astronomical.", s)),
        }
    }
}

/// A named solar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarEvent {
    Sunrise,
    Sunset,
    Dawn(Twilight),
    Dusk(Twilight),
}

impl SolarEvent {
    /// Dawn, sunrise, sunset and dusk in their usual order through a day.
    pub fn principal(twilight: Twilight) -> [SolarEvent; 4] {
        [
            SolarEvent::Dawn(twilight),
            SolarEvent::Sunrise,
            SolarEvent::Sunset,
            SolarEvent::Dusk(twilight),
        ]
    }

    pub fn target(self) -> AltitudeTarget {
        match self {
            SolarEvent::Sunrise | SolarEvent::Sunset => AltitudeTarget::HORIZON,
            SolarEvent::Dawn(t) | SolarEvent::Dusk(t) => AltitudeTarget(t.altitude()),
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            SolarEvent::Sunrise | SolarEvent::Dawn(_) => Direction::Rising,
            SolarEvent::Sunset | SolarEvent::Dusk(_) => Direction::Setting,
        }
    }
}

impl fmt::Display for SolarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolarEvent::Sunrise => write!(f, "sunrise"),
            SolarEvent::Sunset => write!(f, "sunset"),
            SolarEvent::Dawn(t) => write!(f, "{}-dawn", t.label()),
            SolarEvent::Dusk(t) => write!(f, "{}-dusk", t.label()),
        }
    }
}

impl FromStr for SolarEvent {
    type Err = String;

    /// Accepts `sunrise`, `sunset`, `dawn`, `dusk` (civil) and the
    /// qualified `<twilight>-dawn` / `<twilight>-dusk` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "sunrise" => return Ok(SolarEvent::Sunrise),
            "sunset" => return Ok(SolarEvent::Sunset),
            "dawn" => return Ok(SolarEvent::Dawn(Twilight::Civil)),
            "dusk" => return Ok(SolarEvent::Dusk(Twilight::Civil)),
            _ => {}
        }
        let unknown = || format!("Unknown event '{}'. Use sunrise, sunset, dawn, dusk or e.g. nautical-dusk.", s);
        let (depth, kind) = lower.split_once('-').ok_or_else(unknown)?;
        let twilight: Twilight = depth.parse().map_err(|_| unknown())?;
        match kind {
            "dawn" => Ok(SolarEvent::Dawn(twilight)),
            "dusk" => Ok(SolarEvent::Dusk(twilight)),
            _ => Err(unknown()),
        }
    }
}

impl Serialize for SolarEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SolarEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The state of the solar day, judged at the refracted horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayState {
    /// Sun rises and sets.
    Normal,
    /// Sun never sets.
    MidnightSun,
    /// Sun never rises.
    PolarNight,
}

impl DayState {
    pub fn from_crossings(sunrise: &Crossing, sunset: &Crossing) -> Self {
        match (sunrise, sunset) {
            (Crossing::Occurs(_), _) | (_, Crossing::Occurs(_)) => DayState::Normal,
            (Crossing::AlwaysAbove, _) => DayState::MidnightSun,
            (Crossing::AlwaysBelow, _) => DayState::PolarNight,
        }
    }
}

impl fmt::Display for DayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayState::Normal => write!(f, "Normal"),
            DayState::MidnightSun => write!(f, "MidnightSun"),
            DayState::PolarNight => write!(f, "PolarNight"),
        }
    }
}

/// All principal events of one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DayEvents {
    pub date: NaiveDate,
    pub state: DayState,
    pub twilight: Twilight,
    /// Local solar noon (UTC). Always defined.
    pub solar_noon: DateTime<Utc>,
    pub dawn: Crossing,
    pub sunrise: Crossing,
    pub sunset: Crossing,
    pub dusk: Crossing,
    /// Seconds between sunrise and sunset, when both occur.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_length_seconds: Option<i64>,
}

//! Serializable reports shared by the CLI and the HTTP API.
//!
//! The core works in UTC; reports add the place's local wall-clock view.

use crate::error::{Result, SolarError};
use crate::event::{DayState, SolarEvent, Twilight};
use crate::location::Place;
use crate::resolver::Resolver;
use crate::solar::Crossing;
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

#[derive(Debug, Clone, Serialize)]
pub struct LocationInfo {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub formatted_coords: String,
}

impl From<&Place> for LocationInfo {
    fn from(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            latitude: place.coordinate.latitude(),
            longitude: place.coordinate.longitude(),
            timezone: place.tz.name().to_string(),
            formatted_coords: place.coordinate.to_string(),
        }
    }
}

/// One upcoming event.
#[derive(Debug, Clone, Serialize)]
pub struct NextEvent {
    pub event: SolarEvent,
    pub utc: DateTime<Utc>,
    pub local: String,
    pub in_minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextReport {
    pub location: LocationInfo,
    pub at: String,
    pub events: Vec<NextEvent>,
}

/// A crossing as seen on the local clock.
#[derive(Debug, Clone, Serialize)]
pub struct EventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

impl EventTime {
    fn from_crossing(crossing: Crossing, tz: Tz) -> Self {
        match crossing {
            Crossing::Occurs(t) => Self {
                utc: Some(t),
                local: Some(format_local(t, tz)),
                note: None,
            },
            Crossing::AlwaysAbove => Self {
                utc: None,
                local: None,
                note: Some("sun stays above this altitude all day"),
            },
            Crossing::AlwaysBelow => Self {
                utc: None,
                local: None,
                note: Some("sun stays below this altitude all day"),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    pub location: LocationInfo,
    pub date: NaiveDate,
    pub state: DayState,
    pub twilight: Twilight,
    pub solar_noon: EventTime,
    pub dawn: EventTime,
    pub sunrise: EventTime,
    pub sunset: EventTime,
    pub dusk: EventTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_length_seconds: Option<i64>,
}

pub fn format_local(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(LOCAL_FORMAT).to_string()
}

/// Next occurrence of each of `events` after `at`, soonest first.
pub fn next_report(place: &Place, resolver: &Resolver, at: DateTime<Utc>, events: &[SolarEvent]) -> Result<NextReport> {
    let at_local = at.with_timezone(&place.tz);
    let mut upcoming = events
        .iter()
        .map(|&event| {
            let utc = resolver.next(&at_local, event)?;
            Ok(NextEvent {
                event,
                utc,
                local: format_local(utc, place.tz),
                in_minutes: (utc - at).num_minutes(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    upcoming.sort_by_key(|e| e.utc);

    Ok(NextReport {
        location: LocationInfo::from(place),
        at: format_local(at, place.tz),
        events: upcoming,
    })
}

/// Every principal event on the local calendar day `date` at `place`.
pub fn day_report(place: &Place, resolver: &Resolver, date: NaiveDate) -> Result<DayReport> {
    let tz = place.tz;
    let day = resolver.day_events(date, &tz)?;
    Ok(DayReport {
        location: LocationInfo::from(place),
        date,
        state: day.state,
        twilight: day.twilight,
        solar_noon: EventTime::from_crossing(Crossing::Occurs(day.solar_noon), tz),
        dawn: EventTime::from_crossing(day.dawn, tz),
        sunrise: EventTime::from_crossing(day.sunrise, tz),
        sunset: EventTime::from_crossing(day.sunset, tz),
        dusk: EventTime::from_crossing(day.dusk, tz),
        day_length_seconds: day.day_length_seconds,
    })
}

/// Human-readable summary of a [`NextReport`], for stderr.
pub fn render_timeline(report: &NextReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {} ({}) {}\n  from {}\n",
        report.location.name, report.location.formatted_coords, report.location.timezone, report.at
    ));
    for e in &report.events {
        let label = e.event.to_string();
        out.push_str(&format!(
            "  {:<18} {}  (in {}h {:02}m)\n",
            label,
            e.local,
            e.in_minutes / 60,
            e.in_minutes % 60
        ));
    }
    out
}

/// Parse a comma-separated event list. Bare `dawn`/`dusk` take `twilight`;
/// an empty or missing list means all four principal events.
pub fn parse_event_list(list: Option<&str>, twilight: Twilight) -> std::result::Result<Vec<SolarEvent>, String> {
    let Some(list) = list.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(SolarEvent::principal(twilight).to_vec());
    };
    list.split(',')
        .map(|name| match name.trim().to_lowercase().as_str() {
            "dawn" => Ok(SolarEvent::Dawn(twilight)),
            "dusk" => Ok(SolarEvent::Dusk(twilight)),
            other => other.parse(),
        })
        .collect()
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| SolarError::InvalidDate(s.to_string()))
}

/// Parse a moment: RFC 3339 with offset, or a local `YYYY-MM-DD[ HH:MM[:SS]]`
/// (also with a `T` separator) interpreted in `tz`.
pub fn parse_moment(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date(s).ok().map(|d| d.and_time(NaiveTime::MIN)))
        .ok_or_else(|| SolarError::InvalidDate(s.to_string()))?;
    local_to_utc(naive, tz).ok_or_else(|| SolarError::InvalidDate(s.to_string()))
}

/// Local wall-clock time to UTC. Ambiguous times take the earlier instant;
/// times inside a DST gap move forward by the length of the gap.
pub fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => {
            // Read the skipped wall time with the offset in force a day earlier.
            let before = tz.offset_from_utc_datetime(&naive.checked_sub_signed(Duration::days(1))?).fix();
            let utc = naive.checked_sub_signed(Duration::seconds(i64::from(before.local_minus_utc())))?;
            Some(utc.and_utc())
        }
    }
}

/// Midnight at the start of `date` in `tz`, as UTC.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    local_to_utc(date.and_time(NaiveTime::MIN), tz)
}

//! Solar position calculator based on the NOAA low-precision solar series.
//!
//! Given a calendar day, a place and a target altitude, finds the UTC
//! instant at which the sun crosses that altitude, or reports that it
//! stays above or below it all day. Accuracy is well under a minute for
//! dates within a few centuries of J2000.

use crate::error::{Result, SolarError};
use crate::event::{AltitudeTarget, Direction};
use crate::location::GeoCoordinate;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::Serialize;
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;
const J2000: f64 = 2451545.0;
const DAYS_PER_CENTURY: f64 = 36525.0;
const MINUTES_PER_DAY: f64 = 1440.0;
/// Minutes after UTC midnight at which the mean sun transits longitude 0.
const GREENWICH_NOON_MINUTES: f64 = 720.0;

/// Outcome of looking for an altitude crossing on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossing {
    /// The sun crosses the target at this instant.
    Occurs(DateTime<Utc>),
    /// The sun stays above the target all day (polar day for the horizon).
    AlwaysAbove,
    /// The sun stays below the target all day (polar night for the horizon).
    AlwaysBelow,
}

impl Crossing {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Crossing::Occurs(t) => Some(*t),
            Crossing::AlwaysAbove | Crossing::AlwaysBelow => None,
        }
    }

    pub fn occurs(&self) -> bool {
        matches!(self, Crossing::Occurs(_))
    }
}

/// Solar position at a specific instant.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SolarPosition {
    pub altitude: f64,
    pub azimuth: f64,
    pub declination: f64,
    /// Apparent minus mean solar time, in minutes.
    pub equation_of_time: f64,
}

/// Julian Date of a UTC date-time, sub-second precision included.
pub fn julian_date(dt: &NaiveDateTime) -> f64 {
    let (mut y, mut m) = (dt.year() as f64, dt.month() as f64);
    if m <= 2.0 {
        y -= 1.0;
        m += 12.0;
    }
    let day_fraction = (dt.num_seconds_from_midnight() as f64 + dt.nanosecond() as f64 * 1e-9) / 86400.0;

    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + dt.day() as f64 + day_fraction + b - 1524.5
}

fn julian_century(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_CENTURY
}

/// Wrap an angle into [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// The two quantities every crossing needs, at one instant.
#[derive(Debug, Clone, Copy)]
struct SunCoordinates {
    declination: f64,
    equation_of_time: f64,
}

fn sun_coordinates(t: f64) -> SunCoordinates {
    let mean_longitude = normalize_degrees(280.46646 + t * (36000.76983 + t * 0.0003032));
    let mean_anomaly = normalize_degrees(357.52911 + t * (35999.05029 - t * 0.0001537));
    let eccentricity = 0.016708634 - t * (0.000042037 + t * 0.0000001267);

    let m = mean_anomaly * DEG;
    let centre = m.sin() * (1.914602 - t * (0.004817 + t * 0.000014))
        + (2.0 * m).sin() * (0.019993 - t * 0.000101)
        + (3.0 * m).sin() * 0.000289;

    // Longitude of the Moon's ascending node, for the nutation terms.
    let omega = (125.04 - 1934.136 * t) * DEG;
    let apparent_longitude = mean_longitude + centre - 0.00569 - 0.00478 * omega.sin();

    let mean_obliquity = 23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0;
    let obliquity = (mean_obliquity + 0.00256 * omega.cos()) * DEG;

    let declination = (obliquity.sin() * (apparent_longitude * DEG).sin()).asin() / DEG;

    let y = (obliquity / 2.0).tan().powi(2);
    let l0 = mean_longitude * DEG;
    let eot = y * (2.0 * l0).sin() - 2.0 * eccentricity * m.sin()
        + 4.0 * eccentricity * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * eccentricity * eccentricity * (2.0 * m).sin();

    SunCoordinates { declination, equation_of_time: 4.0 * eot / DEG }
}

/// Hour angle (degrees, >= 0) at which the sun's centre sits at `altitude`.
fn hour_angle(latitude: f64, declination: f64, altitude: f64) -> Result<f64, Crossing> {
    let (lat, dec) = (latitude * DEG, declination * DEG);
    let cos_h = ((altitude * DEG).sin() - lat.sin() * dec.sin()) / (lat.cos() * dec.cos());
    if cos_h > 1.0 {
        Err(Crossing::AlwaysBelow)
    } else if cos_h < -1.0 {
        Err(Crossing::AlwaysAbove)
    } else {
        Ok(cos_h.acos() / DEG)
    }
}

fn instant_after_midnight(midnight: NaiveDateTime, minutes: f64) -> Result<DateTime<Utc>> {
    midnight
        .and_utc()
        .checked_add_signed(Duration::nanoseconds((minutes * 60e9).round() as i64))
        .ok_or(SolarError::OutOfRange(midnight.date()))
}

/// Minutes after UTC midnight of local apparent noon, before refinement.
fn noon_estimate(longitude: f64) -> f64 {
    GREENWICH_NOON_MINUTES - 4.0 * longitude
}

/// Sun coordinates `minutes` after the given Julian midnight.
fn sun_at(jd_midnight: f64, minutes: f64) -> SunCoordinates {
    sun_coordinates(julian_century(jd_midnight + minutes / MINUTES_PER_DAY))
}

/// Find the crossing of `target` on the UTC calendar day `date`.
///
/// The returned instant is an offset from that day's UTC midnight and may
/// fall on the neighbouring UTC date for places far from Greenwich; it is
/// always the crossing belonging to the solar day centred on `date`'s noon
/// at `coordinate`. Fails only when that instant falls outside chrono's range.
pub fn crossing_on(
    date: NaiveDate,
    coordinate: GeoCoordinate,
    target: AltitudeTarget,
    direction: Direction,
) -> Result<Crossing> {
    let midnight = date.and_time(NaiveTime::MIN);
    let jd_midnight = julian_date(&midnight);
    let noon = noon_estimate(coordinate.longitude());

    // First pass at noon, second pass at the first estimate of the event.
    let mut minutes = noon;
    for _ in 0..2 {
        let sun = sun_at(jd_midnight, minutes);
        let h = match hour_angle(coordinate.latitude(), sun.declination, target.degrees()) {
            Ok(h) => h,
            Err(none) => return Ok(none),
        };
        let offset = match direction {
            Direction::Rising => -4.0 * h,
            Direction::Setting => 4.0 * h,
        };
        minutes = noon - sun.equation_of_time + offset;
    }

    Ok(Crossing::Occurs(instant_after_midnight(midnight, minutes)?))
}

/// Local apparent noon (solar transit) for `date` at `coordinate`.
pub fn solar_noon(date: NaiveDate, coordinate: GeoCoordinate) -> Result<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    let jd_midnight = julian_date(&midnight);
    let noon = noon_estimate(coordinate.longitude());

    let mut minutes = noon;
    for _ in 0..2 {
        minutes = noon - sun_at(jd_midnight, minutes).equation_of_time;
    }
    instant_after_midnight(midnight, minutes)
}

/// Compute the solar position for a UTC instant.
pub fn solar_position(instant: &DateTime<Utc>, coordinate: GeoCoordinate) -> SolarPosition {
    let dt = instant.naive_utc();
    let sun = sun_coordinates(julian_century(julian_date(&dt)));

    let minutes = (dt.num_seconds_from_midnight() as f64 + dt.nanosecond() as f64 * 1e-9) / 60.0;
    let true_solar_time = minutes + sun.equation_of_time + 4.0 * coordinate.longitude();
    let hour_angle = normalize_degrees(true_solar_time / 4.0) - 180.0;

    let lat = coordinate.latitude() * DEG;
    let dec = sun.declination * DEG;
    let ha = hour_angle * DEG;

    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * ha.cos();
    let alt = sin_alt.asin();

    let azimuth = if lat.cos().abs() > 1e-10 && alt.cos().abs() > 1e-10 {
        let cos_az = (dec.sin() - alt.sin() * lat.sin()) / (alt.cos() * lat.cos());
        let az = cos_az.clamp(-1.0, 1.0).acos() / DEG;
        if hour_angle > 0.0 { 360.0 - az } else { az }
    } else if sun.declination > 0.0 {
        180.0
    } else {
        0.0
    };

    SolarPosition {
        altitude: alt / DEG,
        azimuth: normalize_degrees(azimuth),
        declination: sun.declination,
        equation_of_time: sun.equation_of_time,
    }
}

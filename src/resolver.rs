//! The Resolver: next occurrence of a solar event after a given moment.
//!
//! A moment belongs to a calendar day in its own zone. The resolver asks the
//! calculator for that day's crossing and, if it is missing or not strictly
//! later than the moment, moves on one day at a time until it finds one.
//!
//! The search starts one day *before* the moment's local date. A zone whose
//! civil offset is far from local solar time (UTC+14 in the mid-Pacific, or
//! plain UTC near the date line) can have the previous day's crossing land
//! after the moment; starting on the moment's own date would skip it and
//! return an event almost two days away.

use crate::error::{Result, SolarError};
use crate::event::{AltitudeTarget, DayEvents, DayState, Direction, SolarEvent, Twilight};
use crate::location::GeoCoordinate;
use crate::solar::{self, Crossing};
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::{debug, trace};

/// Calendar days searched past the moment's own date before giving up.
pub const DEFAULT_SEARCH_DAYS: u32 = 366;

/// Solar event resolver for one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolver {
    coordinate: GeoCoordinate,
    search_days: u32,
    twilight: Twilight,
}

impl Resolver {
    pub fn new(coordinate: GeoCoordinate) -> Self {
        Self { coordinate, search_days: DEFAULT_SEARCH_DAYS, twilight: Twilight::default() }
    }

    /// Validate raw degrees (east-positive longitude) and build a resolver.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self::new(GeoCoordinate::new(latitude, longitude)?))
    }

    /// Bound the forward search. Zero still evaluates the moment's own day.
    pub fn with_search_days(mut self, days: u32) -> Self {
        self.search_days = days;
        self
    }

    /// Twilight depth used by [`Resolver::day_events`].
    pub fn with_twilight(mut self, twilight: Twilight) -> Self {
        self.twilight = twilight;
        self
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    pub fn search_days(&self) -> u32 {
        self.search_days
    }

    /// Crossing on the UTC-anchored calendar day `date`.
    pub fn crossing_on(&self, date: NaiveDate, target: AltitudeTarget, direction: Direction) -> Result<Crossing> {
        solar::crossing_on(date, self.coordinate, target, direction)
    }

    /// Crossing for the calendar day that contains `moment` in its own zone.
    pub fn crossing_for_day<Tz: TimeZone>(&self, moment: &DateTime<Tz>, event: SolarEvent) -> Result<Crossing> {
        self.crossing_on_local_day(moment.date_naive(), &moment.timezone(), event.target(), event.direction())
    }

    /// Crossing whose instant falls on the local calendar day `date` in `tz`.
    ///
    /// The UTC-anchored day can hand back a crossing from the local day
    /// before or after, so the neighbouring days are tried as well. When
    /// none lands on `date` the sun stays on one side of `target` for the
    /// whole local day.
    pub fn crossing_on_local_day<Tz: TimeZone>(
        &self,
        date: NaiveDate,
        tz: &Tz,
        target: AltitudeTarget,
        direction: Direction,
    ) -> Result<Crossing> {
        let own = self.crossing_on(date, target, direction);
        let neighbours = [date.pred_opt(), date.succ_opt()]
            .into_iter()
            .flatten()
            .filter_map(|d| self.crossing_on(d, target, direction).ok());
        let on_date = std::iter::once(own.clone())
            .filter_map(|c| c.ok())
            .chain(neighbours)
            .filter_map(|c| c.instant())
            .filter(|at| at.with_timezone(tz).date_naive() == date)
            .min();

        match (on_date, own?) {
            (Some(at), _) => Ok(Crossing::Occurs(at)),
            (None, marker @ (Crossing::AlwaysAbove | Crossing::AlwaysBelow)) => Ok(marker),
            (None, Crossing::Occurs(_)) => {
                trace!(%date, altitude = target.degrees(), ?direction, "crossing skips this local day");
                Ok(self.side_of(target, local_noon(date, tz)))
            }
        }
    }

    /// Which side of `target` the sun is on at `instant`.
    fn side_of(&self, target: AltitudeTarget, instant: DateTime<Utc>) -> Crossing {
        if solar::solar_position(&instant, self.coordinate).altitude > target.degrees() {
            Crossing::AlwaysAbove
        } else {
            Crossing::AlwaysBelow
        }
    }

    /// Next occurrence of `event` strictly after `now`.
    pub fn next<Tz: TimeZone>(&self, now: &DateTime<Tz>, event: SolarEvent) -> Result<DateTime<Utc>> {
        self.search(now, event.target(), event.direction())
            .ok_or_else(|| self.never_occurs(event.to_string()))
    }

    /// Next crossing of an arbitrary altitude strictly after `now`.
    pub fn next_crossing<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        target: AltitudeTarget,
        direction: Direction,
    ) -> Result<DateTime<Utc>> {
        self.search(now, target, direction)
            .ok_or_else(|| self.never_occurs(crossing_label(target, direction)))
    }

    fn never_occurs(&self, event: String) -> SolarError {
        SolarError::EventNeverOccurs { event, days: self.search_days }
    }

    fn search<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        target: AltitudeTarget,
        direction: Direction,
    ) -> Option<DateTime<Utc>> {
        let now_utc = now.with_timezone(&Utc);
        let local_date = now.date_naive();
        let last = local_date
            .checked_add_days(Days::new(u64::from(self.search_days)))
            .unwrap_or(NaiveDate::MAX);

        let mut date = local_date.pred_opt().unwrap_or(local_date);
        let mut days_without_crossing = 0u32;
        loop {
            // A crossing outside chrono's range can never be returned.
            let crossing = self.crossing_on(date, target, direction).ok();
            trace!(%date, ?crossing, "evaluated day");
            match crossing {
                Some(Crossing::Occurs(at)) if at > now_utc => {
                    if days_without_crossing > 1 {
                        debug!(
                            days_without_crossing,
                            %at,
                            altitude = target.degrees(),
                            ?direction,
                            "skipped polar days"
                        );
                    }
                    return Some(at);
                }
                Some(Crossing::Occurs(_)) | None => {}
                Some(Crossing::AlwaysAbove | Crossing::AlwaysBelow) => days_without_crossing += 1,
            }
            if date >= last {
                debug!(%now_utc, search_days = self.search_days, "search bound reached");
                return None;
            }
            date = date.succ_opt()?;
        }
    }

    /// Dawn, sunrise, sunset, dusk and solar noon for the local calendar day
    /// `date` in `tz`.
    pub fn day_events<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> Result<DayEvents> {
        let crossing = |event: SolarEvent| self.crossing_on_local_day(date, tz, event.target(), event.direction());
        let dawn = crossing(SolarEvent::Dawn(self.twilight))?;
        let sunrise = crossing(SolarEvent::Sunrise)?;
        let sunset = crossing(SolarEvent::Sunset)?;
        let dusk = crossing(SolarEvent::Dusk(self.twilight))?;

        // Near the polar transitions a local day can hold a sunset before its sunrise.
        let day_length_seconds = match (sunrise, sunset) {
            (Crossing::Occurs(rise), Crossing::Occurs(set)) if set > rise => Some((set - rise).num_seconds()),
            _ => None,
        };

        Ok(DayEvents {
            date,
            state: DayState::from_crossings(&sunrise, &sunset),
            twilight: self.twilight,
            solar_noon: self.solar_noon_on_local_day(date, tz)?,
            dawn,
            sunrise,
            sunset,
            dusk,
            day_length_seconds,
        })
    }

    /// Solar transit falling on the local day `date`; the UTC-anchored
    /// transit when a short DST day holds none.
    fn solar_noon_on_local_day<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> Result<DateTime<Utc>> {
        let found = [Some(date), date.pred_opt(), date.succ_opt()]
            .into_iter()
            .flatten()
            .filter_map(|d| solar::solar_noon(d, self.coordinate).ok())
            .find(|at| at.with_timezone(tz).date_naive() == date);
        match found {
            Some(at) => Ok(at),
            None => solar::solar_noon(date, self.coordinate),
        }
    }
}

/// Local noon of `date` in `tz`, as UTC; UTC noon if the zone skips it.
fn local_noon<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let noon = date.and_time(NaiveTime::MIN) + Duration::hours(12);
    tz.from_local_datetime(&noon)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| noon.and_utc())
}

/// Event name for a crossing, falling back to the raw altitude.
fn crossing_label(target: AltitudeTarget, direction: Direction) -> String {
    let twilights = [Twilight::Civil, Twilight::Nautical, Twilight::Astronomical];
    twilights
        .into_iter()
        .flat_map(SolarEvent::principal)
        .find(|e| e.target() == target && e.direction() == direction)
        .map(|e| e.to_string())
        .unwrap_or_else(|| format!("{} crossing of {}°", direction, target.degrees()))
}

// ─── Free-function surface ───────────────────────────────────────

/// Sunrise on the calendar day containing `moment` (in its own zone).
pub fn compute_sunrise_for_day<Tz: TimeZone>(moment: &DateTime<Tz>, lat: f64, lon: f64) -> Result<Crossing> {
    Resolver::from_degrees(lat, lon)?.crossing_for_day(moment, SolarEvent::Sunrise)
}

/// Sunset on the calendar day containing `moment` (in its own zone).
pub fn compute_sunset_for_day<Tz: TimeZone>(moment: &DateTime<Tz>, lat: f64, lon: f64) -> Result<Crossing> {
    Resolver::from_degrees(lat, lon)?.crossing_for_day(moment, SolarEvent::Sunset)
}

pub fn next_sunrise<Tz: TimeZone>(moment: &DateTime<Tz>, lat: f64, lon: f64) -> Result<DateTime<Utc>> {
    Resolver::from_degrees(lat, lon)?.next(moment, SolarEvent::Sunrise)
}

pub fn next_sunset<Tz: TimeZone>(moment: &DateTime<Tz>, lat: f64, lon: f64) -> Result<DateTime<Utc>> {
    Resolver::from_degrees(lat, lon)?.next(moment, SolarEvent::Sunset)
}

/// Next morning crossing of `altitude_deg` (e.g. [`crate::CIVIL_TWILIGHT`]).
pub fn next_dawn<Tz: TimeZone>(moment: &DateTime<Tz>, lat: f64, lon: f64, altitude_deg: f64) -> Result<DateTime<Utc>> {
    let target = AltitudeTarget::new(altitude_deg)?;
    Resolver::from_degrees(lat, lon)?.next_crossing(moment, target, Direction::Rising)
}

/// Next evening crossing of `altitude_deg` (e.g. [`crate::CIVIL_TWILIGHT`]).
pub fn next_dusk<Tz: TimeZone>(moment: &DateTime<Tz>, lat: f64, lon: f64, altitude_deg: f64) -> Result<DateTime<Utc>> {
    let target = AltitudeTarget::new(altitude_deg)?;
    Resolver::from_degrees(lat, lon)?.next_crossing(moment, target, Direction::Setting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CIVIL_TWILIGHT;
    use chrono::{Datelike, Timelike};
    use chrono_tz::Tz;

    const SVALBARD: (f64, f64) = (78.2232, 15.6267);

    fn local(tz: Tz, y: i32, m: u32, d: u32, h: u32) -> DateTime<Tz> {
        tz.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_returns_todays_event_when_still_ahead() {
        let midnight = local(chrono_tz::Australia::Sydney, 2014, 11, 1, 0);
        let sunrise = next_sunrise(&midnight, -33.86, 151.20).unwrap();
        let day = compute_sunrise_for_day(&midnight, -33.86, 151.20).unwrap();
        assert_eq!(Some(sunrise), day.instant());
    }

    #[test]
    fn test_rolls_over_when_todays_event_has_passed() {
        let evening = local(chrono_tz::Australia::Sydney, 2014, 11, 1, 21);
        let sunrise = next_sunrise(&evening, -33.86, 151.20).unwrap();
        let local_sunrise = sunrise.with_timezone(&chrono_tz::Australia::Sydney);
        assert_eq!(local_sunrise.day(), 2);
        assert!(sunrise > evening);
    }

    #[test]
    fn test_nanosecond_boundary() {
        let tz = chrono_tz::Europe::Stockholm;
        let start = local(tz, 2015, 7, 1, 0);
        let sunset = next_sunset(&start, 59.33, 18.067).unwrap();

        let just_before = sunset - Duration::nanoseconds(1);
        assert_eq!(next_sunset(&just_before, 59.33, 18.067).unwrap(), sunset);

        let exactly = sunset;
        let after_exact = next_sunset(&exactly, 59.33, 18.067).unwrap();
        assert!(after_exact > sunset, "the crossing itself is not strictly after itself");

        let just_after = sunset + Duration::nanoseconds(1);
        let following = next_sunset(&just_after, 59.33, 18.067).unwrap();
        assert_eq!(following, after_exact);
        let gap = following - sunset;
        assert!(gap > Duration::hours(23) && gap < Duration::hours(25), "gap was {}", gap);
    }

    #[test]
    fn test_look_back_keeps_next_event_within_a_day() {
        // Kiritimati runs UTC+14 at 157°W: civil midnight is mid-morning of
        // the previous solar day.
        let tz: Tz = "Pacific/Kiritimati".parse().unwrap();
        let now = local(tz, 2025, 3, 1, 0);
        let sunset = next_sunset(&now, 1.87, -157.4).unwrap();
        let wait = sunset - now.with_timezone(&Utc);
        println!("Kiritimati: now {} -> sunset {}", now, sunset.with_timezone(&tz));
        assert!(wait > Duration::zero() && wait < Duration::hours(24), "waited {}", wait);
        assert_eq!(sunset.with_timezone(&tz).day(), 1);
    }

    #[test]
    fn test_midnight_sun_skips_to_first_sunset() {
        let tz = chrono_tz::Arctic::Longyearbyen;
        let now = local(tz, 2025, 6, 21, 12);
        let day = compute_sunset_for_day(&now, SVALBARD.0, SVALBARD.1).unwrap();
        assert_eq!(day, Crossing::AlwaysAbove);

        let sunset = next_sunset(&now, SVALBARD.0, SVALBARD.1).unwrap().with_timezone(&tz);
        println!("Longyearbyen first sunset after solstice: {}", sunset);
        assert_eq!(sunset.month(), 8);
        assert!((23..=26).contains(&sunset.day()));
    }

    #[test]
    fn test_polar_night_dawn_comes_before_sunrise() {
        let tz = chrono_tz::Arctic::Longyearbyen;
        let now = local(tz, 2025, 12, 21, 12);
        let sunrise = next_sunrise(&now, SVALBARD.0, SVALBARD.1).unwrap().with_timezone(&tz);
        let dawn = next_dawn(&now, SVALBARD.0, SVALBARD.1, CIVIL_TWILIGHT).unwrap().with_timezone(&tz);
        assert_eq!((sunrise.year(), sunrise.month()), (2026, 2));
        assert_eq!((dawn.year(), dawn.month()), (2026, 1));
        assert!(dawn < sunrise);
    }

    #[test]
    fn test_search_bound_is_enforced() {
        let now = local(chrono_tz::Arctic::Longyearbyen, 2025, 12, 1, 12);
        let resolver = Resolver::from_degrees(SVALBARD.0, SVALBARD.1).unwrap().with_search_days(30);
        let err = resolver.next(&now, SolarEvent::Sunrise).unwrap_err();
        assert_eq!(err, SolarError::EventNeverOccurs { event: "sunrise".into(), days: 30 });
    }

    #[test]
    fn test_pole_never_sees_horizon_crossing() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let err = next_sunrise(&now, 90.0, 0.0).unwrap_err();
        assert!(matches!(err, SolarError::EventNeverOccurs { days: DEFAULT_SEARCH_DAYS, .. }));
        assert!(next_sunset(&now, -90.0, 0.0).is_err());
    }

    #[test]
    fn test_invalid_inputs_rejected_before_search() {
        let now = Utc::now();
        assert!(matches!(next_sunrise(&now, 95.0, 0.0), Err(SolarError::InvalidCoordinate { .. })));
        assert!(matches!(compute_sunset_for_day(&now, 0.0, 200.0), Err(SolarError::InvalidCoordinate { .. })));
        assert_eq!(next_dusk(&now, 10.0, 10.0, -120.0), Err(SolarError::InvalidAltitude(-120.0)));
    }

    #[test]
    fn test_crossing_label_names_known_events() {
        let civil = AltitudeTarget::new(CIVIL_TWILIGHT).unwrap();
        assert_eq!(crossing_label(civil, Direction::Rising), "civil-dawn");
        assert_eq!(crossing_label(AltitudeTarget::HORIZON, Direction::Setting), "sunset");
        let odd = AltitudeTarget::new(-4.0).unwrap();
        assert_eq!(crossing_label(odd, Direction::Setting), "setting crossing of -4°");
    }

    #[test]
    fn test_custom_altitude_dusk_between_sunset_and_civil_dusk() {
        let now = local(chrono_tz::America::New_York, 2015, 7, 1, 0);
        let (lat, lon) = (40.642, -74.017);
        let sunset = next_sunset(&now, lat, lon).unwrap();
        let golden = next_dusk(&now, lat, lon, -3.0).unwrap();
        let civil = next_dusk(&now, lat, lon, CIVIL_TWILIGHT).unwrap();
        assert!(sunset < golden && golden < civil);
    }

    #[test]
    fn test_day_events_normal_day() {
        let resolver = Resolver::from_degrees(-33.86, 151.20).unwrap();
        let events = resolver
            .day_events(NaiveDate::from_ymd_opt(2014, 11, 1).unwrap(), &chrono_tz::Australia::Sydney)
            .unwrap();
        assert_eq!(events.state, DayState::Normal);
        let (dawn, rise, set, dusk) = (
            events.dawn.instant().unwrap(),
            events.sunrise.instant().unwrap(),
            events.sunset.instant().unwrap(),
            events.dusk.instant().unwrap(),
        );
        assert!(dawn < rise && rise < events.solar_noon && events.solar_noon < set && set < dusk);
        // 05:55 -> 19:23 local
        let length = events.day_length_seconds.unwrap();
        assert!((length - (13 * 3600 + 28 * 60)).abs() < 120, "day length {}", length);
    }

    #[test]
    fn test_day_events_polar_states() {
        let resolver = Resolver::from_degrees(SVALBARD.0, SVALBARD.1).unwrap();
        let tz = chrono_tz::Arctic::Longyearbyen;
        let summer = resolver.day_events(NaiveDate::from_ymd_opt(2025, 6, 21).unwrap(), &tz).unwrap();
        assert_eq!(summer.state, DayState::MidnightSun);
        assert_eq!(summer.day_length_seconds, None);

        let winter = resolver
            .with_twilight(Twilight::Astronomical)
            .day_events(NaiveDate::from_ymd_opt(2025, 12, 21).unwrap(), &tz)
            .unwrap();
        assert_eq!(winter.state, DayState::PolarNight);
        assert_eq!(winter.twilight, Twilight::Astronomical);
        assert_eq!(winter.sunrise, Crossing::AlwaysBelow);
    }

    #[test]
    fn test_day_crossing_stays_on_the_moments_calendar_day() {
        // UTC+14 at 157°W: the UTC-anchored sunset is the next evening locally.
        let tz: Tz = "Pacific/Kiritimati".parse().unwrap();
        let noon = local(tz, 2025, 3, 1, 12);
        let sunset = compute_sunset_for_day(&noon, 1.87, -157.4).unwrap().instant().unwrap();
        let sunrise = compute_sunrise_for_day(&noon, 1.87, -157.4).unwrap().instant().unwrap();
        println!("Kiritimati 2025-03-01: {} .. {}", sunrise.with_timezone(&tz), sunset.with_timezone(&tz));
        assert_eq!(sunrise.with_timezone(&tz).date_naive(), noon.date_naive());
        assert_eq!(sunset.with_timezone(&tz).date_naive(), noon.date_naive());
        assert!(sunrise < sunset);

        // Plain UTC next to the date line: the UTC-anchored sunrise is the evening before.
        let utc_noon = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let sunrise = compute_sunrise_for_day(&utc_noon, 0.0, 179.9).unwrap().instant().unwrap();
        assert_eq!(sunrise.date_naive(), utc_noon.date_naive());
        assert_eq!(sunrise.hour(), 18);
    }

    #[test]
    fn test_day_events_follow_the_local_calendar() {
        let tz: Tz = "Pacific/Kiritimati".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let resolver = Resolver::from_degrees(1.87, -157.4).unwrap();
        let events = resolver.day_events(date, &tz).unwrap();

        let on_date = |c: Crossing| c.instant().unwrap().with_timezone(&tz).date_naive();
        for crossing in [events.dawn, events.sunrise, events.sunset, events.dusk] {
            assert_eq!(on_date(crossing), date);
        }
        assert_eq!(events.solar_noon.with_timezone(&tz).date_naive(), date);
        // Twelve hours and a few minutes of daylight on the equator.
        let length = events.day_length_seconds.unwrap();
        assert!((12 * 3600..12 * 3600 + 15 * 60).contains(&length), "day length {}", length);
    }

    #[test]
    fn test_calendar_range_ends_do_not_panic() {
        let first = DateTime::<Utc>::MIN_UTC;
        let day = compute_sunrise_for_day(&first, 0.0, 179.0);
        assert!(matches!(day, Err(SolarError::OutOfRange(_))), "{:?}", day);
        if let Ok(t) = next_sunrise(&first, 0.0, 179.0) {
            assert!(t > first);
        }

        let last = DateTime::<Utc>::MAX_UTC;
        let day = compute_sunset_for_day(&last, 0.0, -179.0);
        assert!(matches!(day, Ok(_) | Err(SolarError::OutOfRange(_))), "{:?}", day);
        assert!(matches!(next_sunset(&last, 0.0, -179.0), Err(SolarError::EventNeverOccurs { .. })));
        assert!(Resolver::from_degrees(0.0, 0.0).unwrap().day_events(last.date_naive(), &Utc).is_ok());
    }
}

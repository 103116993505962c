use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use sunclock::{next_sunrise, next_sunset, Crossing, Resolver, SolarError, SolarEvent};

/// Sunrise drifts by a few minutes a day at mid latitudes.
const DRIFT: i64 = 5;

fn sample_moments() -> Vec<DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
    (0..24).map(|i| start + Duration::days(15 * i) + Duration::minutes(97 * i)).collect()
}

fn sample_coordinates() -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    for lat in [-58.0, -41.5, -20.0, 0.0, 12.3, 35.0, 51.5, 59.9] {
        for lon in [-179.5, -122.4, -3.7, 0.0, 18.1, 77.2, 151.2, 179.9] {
            out.push((lat, lon));
        }
    }
    out
}

#[test]
fn test_next_events_within_a_day_and_strictly_after() {
    let limit = Duration::hours(24) + Duration::minutes(DRIFT);
    for (lat, lon) in sample_coordinates() {
        for now in sample_moments() {
            for (name, got) in [("sunrise", next_sunrise(&now, lat, lon)), ("sunset", next_sunset(&now, lat, lon))] {
                let t = got.unwrap_or_else(|e| panic!("{} at ({}, {}) from {}: {}", name, lat, lon, now, e));
                assert!(t > now, "{} at ({}, {}) from {} not after: {}", name, lat, lon, now, t);
                assert!(t - now <= limit, "{} at ({}, {}) from {} too far: {}", name, lat, lon, now, t);
            }
        }
    }
}

#[test]
fn test_advancing_past_an_event_finds_the_next_one() {
    for (lat, lon) in sample_coordinates() {
        for now in sample_moments().into_iter().step_by(5) {
            let first = next_sunrise(&now, lat, lon).unwrap();
            let second = next_sunrise(&(first + Duration::nanoseconds(1)), lat, lon).unwrap();
            assert_ne!(first, second);
            assert!(second - first > Duration::hours(23), "({}, {}): {} then {}", lat, lon, first, second);

            let again = next_sunrise(&(first - Duration::nanoseconds(1)), lat, lon).unwrap();
            assert_eq!(again, first);
        }
    }
}

#[test]
fn test_monotonic_in_the_moment() {
    let (lat, lon) = (48.85, 2.35);
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let mut previous = next_sunset(&start, lat, lon).unwrap();
    for step in 1..200 {
        let now = start + Duration::minutes(53 * step);
        let t = next_sunset(&now, lat, lon).unwrap();
        assert!(t >= previous, "from {}: {} < {}", now, t, previous);
        previous = t;
    }
}

#[test]
fn test_local_zone_does_not_change_the_instant() {
    let utc = Utc.with_ymd_and_hms(2025, 5, 10, 6, 30, 0).unwrap();
    let tokyo = utc.with_timezone(&chrono_tz::Asia::Tokyo);
    let lima = utc.with_timezone(&chrono_tz::America::Lima);
    let (lat, lon) = (-12.05, -77.04);
    let a = next_sunset(&utc, lat, lon).unwrap();
    assert_eq!(a, next_sunset(&tokyo, lat, lon).unwrap());
    assert_eq!(a, next_sunset(&lima, lat, lon).unwrap());
}

#[test]
fn test_polar_day_then_first_sunset() {
    let resolver = Resolver::from_degrees(78.2232, 15.6267).unwrap();
    let solstice = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
    assert_eq!(
        resolver
            .crossing_on(solstice, SolarEvent::Sunset.target(), SolarEvent::Sunset.direction())
            .unwrap(),
        Crossing::AlwaysAbove
    );

    let now = chrono_tz::Arctic::Longyearbyen.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
    let sunset = resolver.next(&now, SolarEvent::Sunset).unwrap();
    let local = sunset.with_timezone(&chrono_tz::Arctic::Longyearbyen);
    assert_eq!(local.format("%m").to_string(), "08");
}

#[test]
fn test_pole_never_crosses_the_horizon() {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    for lat in [90.0, -90.0] {
        let err = next_sunrise(&now, lat, 0.0).unwrap_err();
        assert!(matches!(err, SolarError::EventNeverOccurs { .. }), "{:?}", err);
    }
}

//! Sunrise, sunset and twilight times for any place and time zone.
//!
//! The core is two layers: [`solar`] finds the instant the sun crosses an
//! altitude on a given calendar day, and [`resolver`] turns that into "the
//! next occurrence after this moment". Longitudes are east-positive.
//!
//! ```no_run
//! use chrono::TimeZone;
//! use chrono_tz::Australia::Sydney;
//!
//! let midnight = Sydney.with_ymd_and_hms(2014, 11, 1, 0, 0, 0).unwrap();
//! let sunrise = sunclock::next_sunrise(&midnight, -33.86, 151.20)?;
//! println!("{}", sunrise.with_timezone(&Sydney)); // 05:55 local
//! # Ok::<(), sunclock::SolarError>(())
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod location;
pub mod report;
pub mod resolver;
pub mod server;
pub mod solar;

pub use error::{Result, SolarError};
pub use event::{
    AltitudeTarget, DayEvents, DayState, Direction, SolarEvent, Twilight, ASTRONOMICAL_TWILIGHT, CIVIL_TWILIGHT,
    HORIZON_ALTITUDE, NAUTICAL_TWILIGHT,
};
pub use location::GeoCoordinate;
pub use resolver::{
    compute_sunrise_for_day, compute_sunset_for_day, next_dawn, next_dusk, next_sunrise, next_sunset, Resolver,
};
pub use solar::Crossing;

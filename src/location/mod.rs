//! Where the observer stands: validated coordinates, zones and built-in places.

pub mod builtin;
pub mod resolver;
pub mod types;

pub use builtin::{builtin_lookup, builtin_places, PlaceInfo};
pub use resolver::LocationQuery;
pub use types::{parse_timezone, GeoCoordinate, Place};

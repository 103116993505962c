use crate::config::Config;
use crate::resolver::Resolver;
use crate::GeoCoordinate;

pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn resolver(&self, coordinate: GeoCoordinate) -> Resolver {
        Resolver::new(coordinate)
            .with_search_days(self.config.search_days)
            .with_twilight(self.config.twilight)
    }
}

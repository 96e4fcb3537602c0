pub mod date_range;
pub mod error;
pub mod record;
pub mod series;
pub mod site;

pub use error::{Result, WeatherError};
pub use record::{DailyWeatherRecord, WeatherObservation};
pub use series::WeatherSeries;
pub use site::Site;

use crate::{
    error::FetchError,
    model::{Units, WeatherRecord},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Abstraction over the weather backend.
///
/// The coordinator only ever sees this trait, so tests can drive it with a
/// scripted double instead of a live HTTP client. Callers trim the city and
/// reject empty input before calling `fetch`.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, city: &str, units: Units) -> Result<WeatherRecord, FetchError>;
}

//! Core library for the `weathercast` lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind a provider abstraction
//! - The request coordinator publishing observable lookup state
//!
//! It is used by `weathercast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod provider;

pub use config::Config;
pub use coordinator::WeatherCoordinator;
pub use error::FetchError;
pub use model::{RequestState, Units, WeatherRecord};
pub use provider::{OpenWeatherProvider, WeatherProvider};

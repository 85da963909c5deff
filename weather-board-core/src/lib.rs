//! Core library for the `weather-board` CLI.
//!
//! This crate defines:
//! - Request building for the weather/favorites service
//! - Shaping of service records into display-ready views
//! - Data access over HTTP, with a geolocation fallback
//! - Favorites board state and configuration handling
//!
//! It is used by `weather-board-cli`, but can also be reused by other front ends.

pub mod board;
pub mod client;
pub mod config;
pub mod direction;
pub mod error;
pub mod location;
pub mod model;
pub mod request;
pub mod shaper;

pub use board::FavoritesBoard;
pub use client::WeatherClient;
pub use config::Config;
pub use direction::CompassDirection;
pub use error::WeatherError;
pub use location::{FixedLocator, LocationError, Locator, UnavailableLocator};
pub use model::{CityId, Coordinates, FavoritesList, RawWeatherRecord, WeatherView};
pub use request::{RequestMode, RequestSpec, build_request};
pub use shaper::{shape_weather, shape_weathers};

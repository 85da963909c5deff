use reqwest::Method;
use std::fmt;

use crate::{
    error::{Result, WeatherError},
    model::Coordinates,
};

/// What to ask the weather service for.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestMode {
    ByGeolocation(Coordinates),
    Favorites,
    ByName(String),
    DeleteById(String),
}

impl RequestMode {
    /// Parse a mode from the service's short tag (`geo`, `fav`, `name`, `del`).
    ///
    /// A `geo` payload is written `lat,lon`.
    pub fn from_tag(tag: &str, payload: Option<&str>) -> Result<Self> {
        let payload = payload.unwrap_or_default();

        match tag.trim().to_lowercase().as_str() {
            "geo" => {
                let (lat, lon) = payload.split_once(',').ok_or_else(|| {
                    WeatherError::invalid(format!("expected 'lat,lon', got '{payload}'"))
                })?;
                let lat = parse_degrees(lat)?;
                let lon = parse_degrees(lon)?;
                Ok(RequestMode::ByGeolocation(Coordinates::new(lat, lon)))
            }
            "fav" => Ok(RequestMode::Favorites),
            "name" => Ok(RequestMode::ByName(payload.to_string())),
            "del" => Ok(RequestMode::DeleteById(payload.to_string())),
            other => Err(WeatherError::invalid(format!("unknown request mode '{other}'"))),
        }
    }
}

fn parse_degrees(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| WeatherError::invalid(format!("'{}' is not a coordinate", value.trim())))
}

/// Path (relative to the service endpoint) and method for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub path: String,
    pub method: Method,
}

impl fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Map a mode and its payload onto the service's HTTP API.
pub fn build_request(mode: &RequestMode) -> Result<RequestSpec> {
    let (path, method) = match mode {
        RequestMode::ByGeolocation(coords) => {
            if !coords.is_finite() {
                return Err(WeatherError::invalid(format!("coordinates {coords} are not finite")));
            }
            (
                format!(
                    "/weather/coordinates?lat={}&lon={}",
                    encode(&coords.latitude.to_string()),
                    encode(&coords.longitude.to_string()),
                ),
                Method::GET,
            )
        }
        RequestMode::Favorites => ("/favourites".to_string(), Method::GET),
        RequestMode::ByName(name) => {
            let name = non_blank(name, "city name")?;
            (format!("/weather/city?q={}", encode(name)), Method::GET)
        }
        RequestMode::DeleteById(id) => {
            let id = non_blank(id, "city id")?;
            (format!("/favourites?id={}", encode(id)), Method::DELETE)
        }
    };

    Ok(RequestSpec { path, method })
}

fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::invalid(format!("{what} is empty")));
    }
    Ok(trimmed)
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

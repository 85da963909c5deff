use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::direction::CompassDirection;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.latitude, self.longitude)
    }
}

/// Identifier the service assigns to a city. Sent back verbatim when
/// deleting a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CityId(String);

impl CityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Number(n) => CityId(n.to_string()),
            Repr::Text(s) => CityId(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWind {
    pub speed: f64,
    pub deg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawClouds {
    pub all: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCoord {
    pub lat: f64,
    pub lon: f64,
}

/// One city exactly as the weather service returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWeatherRecord {
    pub id: CityId,
    pub name: String,
    pub weather: Vec<RawCondition>,
    pub main: RawMain,
    pub wind: RawWind,
    pub clouds: RawClouds,
    pub coord: RawCoord,
}

/// Response of the favorites endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FavoritesList {
    pub cnt: u32,
    #[serde(default)]
    pub list: Vec<RawWeatherRecord>,
}

impl FavoritesList {
    /// `cnt` is advisory; only the records in `list` can be shown.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Metres per second.
    pub speed: f64,
    pub direction: CompassDirection,
}

/// Display-ready weather for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherView {
    pub id: CityId,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Degrees Celsius, rounded.
    pub temp: i32,
    pub wind: Wind,
    /// Cloud cover in percent.
    pub clouds: f64,
    /// hPa.
    pub pressure: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    pub coordinates: Coordinates,
}

impl WeatherView {
    pub fn icon_url(&self) -> String {
        format!("http://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_id_accepts_number_or_string() {
        let from_number: CityId = serde_json::from_str("498817").unwrap();
        let from_text: CityId = serde_json::from_str("\"498817\"").unwrap();

        assert_eq!(from_number, from_text);
        assert_eq!(from_number.as_str(), "498817");
    }

    #[test]
    fn favorites_list_without_entries() {
        let list: FavoritesList = serde_json::from_str(r#"{"cnt": 0}"#).unwrap();
        assert!(list.is_empty());
        assert!(list.list.is_empty());
    }

    #[test]
    fn coordinates_display_as_pair() {
        assert_eq!(Coordinates::new(59.93, 30.24).to_string(), "[59.93, 30.24]");
    }

    #[test]
    fn record_ignores_unknown_fields() {
        let json = r#"{
            "id": 2643743, "name": "London", "dt": 1700000000, "cod": 200,
            "weather": [
                {"id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d"}
            ],
            "main": {"temp": 9.6, "feels_like": 7.1, "pressure": 1012, "humidity": 81},
            "wind": {"speed": 4.1, "deg": 240},
            "clouds": {"all": 100},
            "coord": {"lat": 51.5085, "lon": -0.1257}
        }"#;

        let record: RawWeatherRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "London");
        assert_eq!(record.weather[0].icon, "04d");
        assert_eq!(record.main.pressure, 1012.0);
    }
}

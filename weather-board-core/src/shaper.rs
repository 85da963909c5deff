use crate::{
    direction::CompassDirection,
    error::{Result, WeatherError},
    model::{Coordinates, FavoritesList, RawWeatherRecord, WeatherView, Wind},
};

/// Reshape one service record into the display model.
pub fn shape_weather(record: &RawWeatherRecord) -> Result<WeatherView> {
    let condition = record.weather.first().ok_or_else(|| {
        WeatherError::MalformedRecord(format!(
            "record for '{}' ({}) has no weather conditions",
            record.name, record.id
        ))
    })?;

    Ok(WeatherView {
        id: record.id.clone(),
        name: record.name.clone(),
        description: condition.description.clone(),
        icon: condition.icon.clone(),
        temp: record.main.temp.round() as i32,
        wind: Wind {
            speed: record.wind.speed,
            direction: CompassDirection::from_degrees(record.wind.deg),
        },
        clouds: record.clouds.all,
        pressure: record.main.pressure,
        humidity: record.main.humidity,
        coordinates: Coordinates::new(record.coord.lat, record.coord.lon),
    })
}

/// Shape every favorite, keeping the service's order.
pub fn shape_weathers(favorites: &FavoritesList) -> Result<Vec<WeatherView>> {
    favorites.list.iter().map(shape_weather).collect()
}

//! Terminal rendering of shaped weather views.

use std::fmt::Write;

use weather_board_core::WeatherView;

pub const NO_FAVORITES: &str = "No favorite cities yet.";

fn details(view: &WeatherView, out: &mut String) {
    let _ = writeln!(out, "  Wind:        {} m/s, {}", view.wind.speed, view.wind.direction);
    let _ = writeln!(out, "  Cloudiness:  {} %", view.clouds);
    let _ = writeln!(out, "  Pressure:    {} hpa", view.pressure);
    let _ = writeln!(out, "  Humidity:    {} %", view.humidity);
    let _ = writeln!(out, "  Coordinates: {}", view.coordinates);
}

/// Block shown for the weather at the current location.
pub fn local_weather(view: &WeatherView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.name);
    let _ = writeln!(out, "  {}°C, {}", view.temp, view.description);
    let _ = writeln!(out, "  Icon:        {}", view.icon_url());
    details(view, &mut out);
    out
}

/// One entry of the favorites board. The id is what `remove` expects.
pub fn favorite_item(view: &WeatherView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}°C  (id {})", view.name, view.temp, view.id);
    let _ = writeln!(out, "  {}", view.description);
    let _ = writeln!(out, "  Icon:        {}", view.icon_url());
    details(view, &mut out);
    out
}

pub fn favorites(views: &[WeatherView]) -> String {
    if views.is_empty() {
        return format!("{NO_FAVORITES}\n");
    }

    views.iter().map(favorite_item).collect::<Vec<_>>().join("\n")
}

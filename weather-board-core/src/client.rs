use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    error::{Result, WeatherError},
    location::{Locator, resolve_coordinates},
    model::{Coordinates, FavoritesList, RawWeatherRecord},
    request::{RequestMode, RequestSpec, build_request},
};

/// Client for the weather/favorites service.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    endpoint: String,
    fallback: Coordinates,
    http: Client,
}

impl WeatherClient {
    pub fn new(endpoint: impl Into<String>, fallback: Coordinates) -> Self {
        Self::with_http(endpoint, fallback, Client::new())
    }

    pub fn with_http(endpoint: impl Into<String>, fallback: Coordinates, http: Client) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            endpoint,
            fallback,
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Weather at the device position, or at the fallback position when the
    /// locator fails or takes longer than `timeout`.
    pub async fn fetch_local_weather(
        &self,
        locator: &dyn Locator,
        timeout: Duration,
    ) -> Result<RawWeatherRecord> {
        let coords = resolve_coordinates(locator, self.fallback, timeout).await;
        self.fetch_weather_at(coords).await
    }

    pub async fn fetch_weather_at(&self, coords: Coordinates) -> Result<RawWeatherRecord> {
        let res = self.send(&RequestMode::ByGeolocation(coords)).await?;
        decode(res).await
    }

    pub async fn fetch_favorites(&self) -> Result<FavoritesList> {
        let res = self.send(&RequestMode::Favorites).await?;
        decode(res).await
    }

    /// Look a city up by name. The service also stores it as a favorite.
    pub async fn fetch_by_name(&self, name: &str) -> Result<RawWeatherRecord> {
        let res = self.send(&RequestMode::ByName(name.to_string())).await?;

        if !res.status().is_success() {
            tracing::warn!(status = %res.status(), name, "city lookup rejected");
            return Err(WeatherError::CityNotFound { name: name.trim().to_string() });
        }

        decode(res).await
    }

    /// Remove a favorite and return how many are left.
    pub async fn delete_favorite(&self, id: &str) -> Result<u64> {
        let res = self.send(&RequestMode::DeleteById(id.to_string())).await?;
        let value: serde_json::Value = decode(res).await?;

        remaining_count(&value).ok_or_else(|| {
            WeatherError::MalformedRecord(format!(
                "expected remaining favorites count, got {}",
                truncate_body(&value.to_string())
            ))
        })
    }

    async fn send(&self, mode: &RequestMode) -> Result<Response> {
        let RequestSpec { path, method } = build_request(mode)?;
        let url = format!("{}{}", self.endpoint, path);

        tracing::debug!(%method, %url, "sending weather service request");

        let res = self.http.request(method, url.as_str()).send().await?;

        tracing::debug!(status = %res.status(), %url, "weather service responded");
        Ok(res)
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(WeatherError::Status {
            status,
            body: truncate_body(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// The delete endpoint answers with a bare count, as a number or a string.
fn remaining_count(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

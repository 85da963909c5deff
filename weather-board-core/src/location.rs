//! Device location lookup with a bounded wait and a fixed fallback.

use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;

use crate::model::Coordinates;

/// Used whenever the device location cannot be determined.
pub const DEFAULT_COORDINATES: Coordinates = Coordinates::new(59.9344574, 30.2441396);

pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location service unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
}

#[async_trait]
pub trait Locator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// A locator that already knows the answer, or knows there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator {
    coords: Option<Coordinates>,
}

impl FixedLocator {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.coords.ok_or(LocationError::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocator;

#[async_trait]
impl Locator for UnavailableLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// Ask `locator` for the current position, waiting at most `timeout`.
///
/// Never fails: denial, unavailability and timeouts all yield `fallback`.
pub async fn resolve_coordinates(
    locator: &dyn Locator,
    fallback: Coordinates,
    timeout: Duration,
) -> Coordinates {
    let outcome = match tokio::time::timeout(timeout, locator.locate()).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    };

    match outcome {
        Ok(coords) if coords.is_finite() => coords,
        Ok(coords) => {
            tracing::warn!(%coords, "locator returned non-finite coordinates, using fallback");
            fallback
        }
        Err(err) => {
            tracing::warn!(error = %err, %fallback, "falling back to default location");
            fallback
        }
    }
}

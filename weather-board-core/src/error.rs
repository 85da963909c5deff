use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

const INVALID_PARAMETERS: &str = "Enter valid parameters.";
const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors raised while building, sending or decoding weather service requests.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request could not be built from the given mode and payload.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The service rejected a by-name lookup.
    #[error("city \"{name}\" was not found")]
    CityNotFound { name: String },

    /// The service answered with a record that breaks its own contract.
    #[error("malformed weather record: {0}")]
    MalformedRecord(String),

    #[error("weather service responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to reach weather service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode weather service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WeatherError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    /// Static text suitable for showing to the user.
    ///
    /// Only the request and lookup failures are told apart; every other
    /// failure gets the same generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRequest(_) => INVALID_PARAMETERS.to_string(),
            Self::CityNotFound { name } => format!("Could not find \"{name}\"."),
            Self::MalformedRecord(_) | Self::Status { .. } | Self::Http(_) | Self::Decode(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

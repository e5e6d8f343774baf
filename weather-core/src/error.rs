use reqwest::StatusCode;

/// Errors produced while fetching and decoding current conditions.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Invalid coordinates ({lat}, {lon}): latitude must be within -90..=90 and longitude within -180..=180")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `weather configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,

    /// The request URL carries the API key, so it is stripped before wrapping.
    #[error("Network error")]
    Network(#[from] reqwest::Error),

    #[error("OpenWeather request failed with status {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Failed to parse OpenWeather JSON")]
    Decode(#[from] serde_json::Error),
}

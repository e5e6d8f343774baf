//! Human-readable observations derived from an [`OpenWeatherResponse`].
//!
//! Everything here is pure: the binary decides where the text goes.

use std::fmt;

use crate::model::{OpenWeatherResponse, Units};

/// 16-point compass rose, clockwise from north.
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Condition ids below this belong to groups 2xx-7xx (thunderstorm through atmosphere).
const ALERT_CONDITION_ID: i64 = 800;

/// Roughly half a mile, in metres.
const LOW_VISIBILITY_METRES: i64 = 805;

/// Temperature ranges in Fahrenheit, each with a canned sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComfortBucket {
    Deadly,
    Cold,
    JustRight,
    Warm,
    Hot,
    Unknown,
}

impl ComfortBucket {
    pub fn from_fahrenheit(temp: f64) -> Self {
        match temp {
            t if t < 0.0 => Self::Deadly,
            t if t < 50.0 => Self::Cold,
            t if t < 85.0 => Self::JustRight,
            t if t < 100.0 => Self::Warm,
            t if t >= 100.0 => Self::Hot,
            _ => Self::Unknown,
        }
    }

    pub fn sentence(&self) -> &'static str {
        match self {
            Self::Deadly => "Oof yeah stay inside or you know, you might die.",
            Self::Cold => "Brrr... It's a bit cold outside.",
            Self::JustRight => "The temperature outside is just right.",
            Self::Warm => "Yeah it's a bit warm out.",
            Self::Hot => "Alright yeah it's hot, where is the AC?",
            Self::Unknown => "It's something outside. Idk?",
        }
    }
}

/// Index into [`COMPASS_POINTS`] for a bearing in degrees.
pub fn compass_index(deg: f64) -> usize {
    let normalized = deg.rem_euclid(360.0);
    ((normalized + 11.25) / 22.5) as usize % COMPASS_POINTS.len()
}

pub fn compass_point(deg: f64) -> &'static str {
    COMPASS_POINTS[compass_index(deg)]
}

/// Naive alert heuristic: anything that is not clear sky or clouds.
pub fn is_alert_condition(condition_id: i64) -> bool {
    condition_id < ALERT_CONDITION_ID
}

pub fn is_low_visibility(visibility: Option<i64>) -> bool {
    visibility.is_some_and(|v| v < LOW_VISIBILITY_METRES)
}

pub fn temperature_lines(resp: &OpenWeatherResponse, units: Units) -> Vec<String> {
    vec![
        format!("You're location is {}", resp.name),
        format!(
            "The temperature outside is {:.2}{} ",
            resp.main.temp,
            units.temperature_suffix()
        ),
    ]
}

pub fn comfort_line(resp: &OpenWeatherResponse, units: Units) -> String {
    ComfortBucket::from_fahrenheit(units.to_fahrenheit(resp.main.temp))
        .sentence()
        .to_string()
}

pub fn condition_and_alert_lines(resp: &OpenWeatherResponse, units: Units) -> Vec<String> {
    let condition = resp.primary_condition();
    let description = condition.map(|c| c.description.as_str()).unwrap_or("unknown");

    let mut lines = vec![
        format!("The weather condition outside is: {description}"),
        format!(
            "The wind direction and speed is {:.2}{} {}",
            resp.wind.speed,
            units.speed_suffix(),
            compass_point(resp.wind.deg)
        ),
    ];

    if let Some(c) = condition.filter(|c| is_alert_condition(c.id)) {
        lines.push(format!(
            "ALERT! THERE IS A {} OUTSIDE. \
             \nAlso alerts cost $125 a month so this is what you get instead sorry.\
             \nBut if it was free it's just another JSON object",
            c.description.to_uppercase()
        ));
    }

    if is_low_visibility(resp.visibility) {
        lines.push("ALERT: LOW VISIBILITY".to_string());
    }

    lines
}

pub fn detail_lines(resp: &OpenWeatherResponse, units: Units) -> Vec<String> {
    let t = units.temperature_suffix();
    let fmt_time = |dt: Option<chrono::DateTime<chrono::FixedOffset>>| {
        dt.map(|d| d.format("%H:%M (UTC%:z)").to_string())
            .unwrap_or_else(|| "n/a".to_string())
    };

    let mut lines = vec![
        format!("Feels like: {:.2}{t}", resp.main.feels_like),
        format!("Low / high: {:.2}{t} / {:.2}{t}", resp.main.temp_min, resp.main.temp_max),
        format!("Humidity: {}%", resp.main.humidity),
        format!("Pressure: {} hPa", resp.main.pressure),
        format!("Cloud cover: {}%", resp.clouds.all),
    ];

    if let Some(v) = resp.visibility {
        lines.push(format!("Visibility: {v} m"));
    }

    lines.push(format!("Sunrise: {}", fmt_time(resp.sunrise())));
    lines.push(format!("Sunset: {}", fmt_time(resp.sunset())));
    lines.push(format!(
        "Observed at: {}",
        resp.observed_at()
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "n/a".to_string())
    ));

    if let Some(country) = resp.sys.country.as_deref() {
        lines.push(format!("Country: {country}"));
    }

    lines
}

/// All printable observations, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub temperature: Vec<String>,
    pub comfort: String,
    pub conditions: Vec<String>,
    pub details: Option<Vec<String>>,
}

impl Report {
    pub fn from_response(resp: &OpenWeatherResponse, units: Units) -> Self {
        Self {
            temperature: temperature_lines(resp, units),
            comfort: comfort_line(resp, units),
            conditions: condition_and_alert_lines(resp, units),
            details: None,
        }
    }

    pub fn with_details(mut self, resp: &OpenWeatherResponse, units: Units) -> Self {
        self.details = Some(detail_lines(resp, units));
        self
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.temperature {
            writeln!(f, "{line}")?;
        }
        write!(f, "{}\n\n", self.comfort)?;
        for line in &self.conditions {
            writeln!(f, "{line}")?;
        }
        if let Some(details) = &self.details {
            writeln!(f)?;
            for line in details {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

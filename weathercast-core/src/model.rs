use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Unit system passed through to the provider's `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial]
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_speed_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// Snapshot of one successful lookup.
///
/// Only built from a 2xx response body that parsed cleanly; a partial or
/// malformed body becomes a [`crate::FetchError`] instead of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location_name: String,
    pub country_code: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: String,
    pub icon_code: String,
}

impl WeatherRecord {
    /// URL of the provider's 2x condition icon.
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.icon_code)
    }

    /// Condition description with its first letter uppercased
    /// ("clear sky" -> "Clear sky").
    pub fn condition_title(&self) -> String {
        let mut chars = self.condition.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Multi-line human-readable summary. Temperature is truncated toward
    /// zero, matching the screen rendering this tool replaces.
    pub fn format_summary(&self, units: Units) -> String {
        format!(
            "{}, {}\n{}{}  {}\nHumidity: {}%\nWind: {} {}\nIcon: {}",
            self.location_name,
            self.country_code,
            self.temperature_c as i64,
            units.temperature_suffix(),
            self.condition_title(),
            self.humidity_pct,
            self.wind_speed_mps,
            units.wind_speed_suffix(),
            self.icon_url(),
        )
    }
}

/// Observable lifecycle of the current lookup, published as one value so
/// loading, result and error can never be read in an inconsistent mix.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Loaded(WeatherRecord),
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Loaded(_) | RequestState::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> WeatherRecord {
        WeatherRecord {
            location_name: "London".to_string(),
            country_code: "GB".to_string(),
            temperature_c: 18.2,
            humidity_pct: 60,
            wind_speed_mps: 3.1,
            condition: "clear sky".to_string(),
            icon_code: "01d".to_string(),
        }
    }

    #[test]
    fn units_as_str_roundtrip() {
        for units in Units::all() {
            let parsed = Units::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn units_parsing_is_case_insensitive() {
        assert_eq!(Units::try_from("Imperial").expect("should parse"), Units::Imperial);
    }

    #[test]
    fn unknown_units_error() {
        let err = Units::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown units"));
    }

    #[test]
    fn icon_url_is_derived_from_the_icon_code() {
        assert_eq!(
            london().icon_url(),
            "https://openweathermap.org/img/wn/01d@2x.png"
        );
    }

    #[test]
    fn condition_title_uppercases_the_first_letter() {
        assert_eq!(london().condition_title(), "Clear sky");
    }

    #[test]
    fn summary_truncates_the_temperature_toward_zero() {
        let summary = london().format_summary(Units::Metric);
        assert!(summary.contains("London, GB"));
        assert!(summary.contains("18°C"));
        assert!(summary.contains("Humidity: 60%"));
        assert!(summary.contains("Wind: 3.1 m/s"));

        let mut cold = london();
        cold.temperature_c = -3.7;
        assert!(cold.format_summary(Units::Metric).contains("-3°C"));
    }

    #[test]
    fn summary_uses_imperial_suffixes_when_asked() {
        let summary = london().format_summary(Units::Imperial);
        assert!(summary.contains("18°F"));
        assert!(summary.contains("mph"));
    }

    #[test]
    fn request_state_starts_idle_and_classifies_itself() {
        assert_eq!(RequestState::default(), RequestState::Idle);
        assert!(RequestState::Loading.is_loading());
        assert!(!RequestState::Loading.is_terminal());
        assert!(RequestState::Loaded(london()).is_terminal());
        assert!(RequestState::Failed("boom".to_string()).is_terminal());
    }
}

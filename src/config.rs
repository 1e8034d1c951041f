use std::env;

use crate::series::{AlertThresholds, ThresholdRange};

#[derive(Debug, Clone)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

/// One named display-range preset: how far back the window reaches and how
/// many grid steps the trailing rolling mean covers at that zoom level.
/// Explicit ("custom") windows carry their own rolling window, or none.
#[derive(Debug, Clone, Copy)]
pub struct RangePreset {
    pub name: &'static str,
    pub duration_minutes: i64,
    pub rolling_window: Option<u32>,
}

/// Lookup table replacing one-code-path-per-range selection: wider windows
/// get longer smoothing so the chart stays readable at every zoom level.
pub const RANGE_PRESETS: &[RangePreset] = &[
    RangePreset {
        name: "1h",
        duration_minutes: 60,
        rolling_window: Some(5),
    },
    RangePreset {
        name: "6h",
        duration_minutes: 360,
        rolling_window: Some(10),
    },
    RangePreset {
        name: "24h",
        duration_minutes: 1440,
        rolling_window: Some(15),
    },
    RangePreset {
        name: "7d",
        duration_minutes: 10_080,
        rolling_window: Some(60),
    },
    RangePreset {
        name: "30d",
        duration_minutes: 43_200,
        rolling_window: Some(180),
    },
];

/// Find a preset by name (case-insensitive).
#[must_use]
pub fn find_preset(name: &str) -> Option<&'static RangePreset> {
    RANGE_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone)]
pub struct Config {
    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Rate limiting
    pub disable_rate_limiting: bool,
    pub rate_limit_metadata_per_second: u64,
    pub rate_limit_metadata_burst: u32,
    pub rate_limit_data_per_second: u64,
    pub rate_limit_data_burst: u32,

    // Alerting
    pub alert_thresholds: AlertThresholds,
    pub alert_sound: Option<String>,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a threshold pair is inverted.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            // API settings
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            // Rate limiting
            disable_rate_limiting: env::var("DISABLE_RATE_LIMITING")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            rate_limit_metadata_per_second: env::var("RATE_LIMIT_METADATA_PER_SECOND")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            rate_limit_metadata_burst: env::var("RATE_LIMIT_METADATA_BURST")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            rate_limit_data_per_second: env::var("RATE_LIMIT_DATA_PER_SECOND")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            rate_limit_data_burst: env::var("RATE_LIMIT_DATA_BURST")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),

            // Alerting
            alert_thresholds: AlertThresholds {
                temperature: ThresholdRange {
                    low: env::var("TEMP_ALERT_LOW")
                        .unwrap_or_else(|_| "10".to_string())
                        .parse()
                        .unwrap_or(10.0),
                    high: env::var("TEMP_ALERT_HIGH")
                        .unwrap_or_else(|_| "35".to_string())
                        .parse()
                        .unwrap_or(35.0),
                },
                humidity: ThresholdRange {
                    low: env::var("HUMIDITY_ALERT_LOW")
                        .unwrap_or_else(|_| "20".to_string())
                        .parse()
                        .unwrap_or(20.0),
                    high: env::var("HUMIDITY_ALERT_HIGH")
                        .unwrap_or_else(|_| "70".to_string())
                        .parse()
                        .unwrap_or(70.0),
                },
            },
            alert_sound: env::var("ALERT_SOUND").ok(),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        };

        let t = &config.alert_thresholds;
        if t.temperature.low > t.temperature.high {
            return Err(ConfigError::Invalid("TEMP_ALERT_LOW exceeds TEMP_ALERT_HIGH"));
        }
        if t.humidity.low > t.humidity.high {
            return Err(ConfigError::Invalid(
                "HUMIDITY_ALERT_LOW exceeds HUMIDITY_ALERT_HIGH",
            ));
        }

        Ok(config)
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

//! Site and API configuration.
//!
//! The calculator always queries a single fixed point. Its coordinates, the
//! requested parameter codes and the endpoint are grouped in [`SiteConfig`] so
//! tests (and users, via `.env` or flags) can substitute them.
//!
//! Resolution order: built-in defaults, then environment (`.env` is loaded via
//! `dotenvy`), then CLI flags applied by the caller.

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://power.larc.nasa.gov/api/temporal/daily/point";
pub const DEFAULT_COMMUNITY: &str = "SB";
pub const DEFAULT_LATITUDE: f64 = -22.805694;
pub const DEFAULT_LONGITUDE: f64 = -50.481333;
pub const DEFAULT_PARAMETERS: [&str; 2] = ["T2M_MAX", "T2M_MIN"];
/// Base temperature (°C) below which a day contributes no degree-days.
pub const DEFAULT_BASE_TEMP_C: f64 = 20.0;

const ENV_BASE_URL: &str = "GDD_BASE_URL";
const ENV_COMMUNITY: &str = "GDD_COMMUNITY";
const ENV_LATITUDE: &str = "GDD_LATITUDE";
const ENV_LONGITUDE: &str = "GDD_LONGITUDE";
const ENV_PARAMETERS: &str = "GDD_PARAMETERS";
const ENV_BASE_TEMP: &str = "GDD_BASE_TEMP";
const ENV_TIMEOUT: &str = "GDD_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub base_url: String,
    pub community: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Parameter codes sent to the API (joined with `,`).
    pub parameters: Vec<String>,
    pub base_temp_c: f64,
    /// Request timeout; `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            community: DEFAULT_COMMUNITY.to_string(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            parameters: DEFAULT_PARAMETERS.iter().map(|p| p.to_string()).collect(),
            base_temp_c: DEFAULT_BASE_TEMP_C,
            timeout: None,
        }
    }
}

impl SiteConfig {
    /// Defaults overridden by process environment (after loading `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `GDD_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url.trim().to_string();
        }
        if let Some(community) = lookup(ENV_COMMUNITY) {
            config.community = community.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_LATITUDE) {
            config.latitude = parse_f64(ENV_LATITUDE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LONGITUDE) {
            config.longitude = parse_f64(ENV_LONGITUDE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PARAMETERS) {
            config.parameters = raw
                .split(',')
                .map(|p| p.trim().to_ascii_uppercase())
                .filter(|p| !p.is_empty())
                .collect();
        }
        if let Some(raw) = lookup(ENV_BASE_TEMP) {
            config.base_temp_c = parse_f64(ENV_BASE_TEMP, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("{ENV_TIMEOUT}='{raw}' is not a whole number of seconds: {e}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Comma-joined parameter list, as sent in the `parameters` query field.
    pub fn parameters_subset(&self) -> String {
        self.parameters.join(",")
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::Config(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::Config(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        if !self.base_temp_c.is_finite() {
            return Err(AppError::Config("base temperature must be finite".to_string()));
        }
        if self.parameters.is_empty() {
            return Err(AppError::Config("at least one parameter code is required".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(AppError::Config("base URL is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_f64(key: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| AppError::Config(format!("{key}='{raw}' is not a number: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_fixed_site() {
        let config = SiteConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.parameters_subset(), "T2M_MAX,T2M_MIN");
        assert_eq!(config.base_temp_c, 20.0);
    }

    #[test]
    fn environment_overrides_location_and_parameters() {
        let config = SiteConfig::from_lookup(lookup_from(&[
            ("GDD_LATITUDE", "10.5"),
            ("GDD_LONGITUDE", " -47.25 "),
            ("GDD_PARAMETERS", "t2m_max, T2M_MIN,T2M"),
            ("GDD_HTTP_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.latitude, 10.5);
        assert_eq!(config.longitude, -47.25);
        assert_eq!(config.parameters_subset(), "T2M_MAX,T2M_MIN,T2M");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let err = SiteConfig::from_lookup(lookup_from(&[("GDD_LATITUDE", "95")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn rejects_non_numeric_base_temp() {
        let err = SiteConfig::from_lookup(lookup_from(&[("GDD_BASE_TEMP", "warm")])).unwrap_err();
        assert!(err.to_string().contains("GDD_BASE_TEMP"));
    }
}

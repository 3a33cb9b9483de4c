use crate::error::{config_error, env_error, CalendarResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default base URL of the schedule service
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Optional file overriding the feature flags
pub const FEATURES_FILE: &str = "config/features.toml";

/// Prefix the web front end used for the same settings
const LEGACY_PREFIX: &str = "REACT_APP_";

/// Runtime configuration, built once at startup and shared by reference
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the schedule service
    pub api_url: Url,
    pub app_name: String,
    pub app_version: String,
    pub university_name: String,
    pub system_branding: String,
    /// Feature flags for the create/edit/delete affordances
    pub enable_create: bool,
    pub enable_edit: bool,
    pub enable_delete: bool,
    pub default_view: String,
    pub theme: String,
    pub debug: bool,
    /// Timezone used for "today" and for creation timestamps
    pub timezone: Tz,
    pub request_timeout: Duration,
}

/// Feature flag overrides read from `config/features.toml`
#[derive(Debug, Default, Deserialize)]
struct FeatureOverrides {
    enable_create: Option<bool>,
    enable_edit: Option<bool>,
    enable_delete: Option<bool>,
}

impl Config {
    /// Load configuration from the environment and the optional features file
    pub fn load() -> CalendarResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        config.apply_feature_file(Path::new(FEATURES_FILE))?;
        Ok(config)
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Every key is also tried with the `REACT_APP_` prefix the browser
    /// front end used, so existing deployment files keep working.
    pub fn from_lookup<F>(lookup: F) -> CalendarResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&format!("{}{}", LEGACY_PREFIX, key)))
                .filter(|value| !value.trim().is_empty())
        };
        let string_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        // Flags are on unless explicitly switched off
        let enabled = |key: &str| get(key).map_or(true, |v| v != "false");

        let api_url_raw = string_or("CALENDAR_API_URL", DEFAULT_API_URL);
        let mut api_url = Url::parse(&api_url_raw)
            .map_err(|e| config_error(&format!("Invalid CALENDAR_API_URL '{}': {}", api_url_raw, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(config_error(&format!(
                "CALENDAR_API_URL '{}' cannot be used as a base URL",
                api_url_raw
            )));
        }
        // Keep any path prefix when joining "schedules" onto the base
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        let timezone_raw = string_or("TIMEZONE", "UTC");
        let timezone = timezone_raw
            .parse::<Tz>()
            .map_err(|_| env_error(&format!("TIMEZONE ({})", timezone_raw)))?;

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| env_error(&format!("REQUEST_TIMEOUT_SECS ({})", raw)))?,
            None => Duration::from_secs(10),
        };

        Ok(Config {
            api_url,
            app_name: string_or("APP_NAME", "Redwood Digital University Calendar"),
            app_version: string_or("APP_VERSION", "1.0.0"),
            university_name: string_or("UNIVERSITY_NAME", "Redwood Digital University"),
            system_branding: string_or("SYSTEM_BRANDING", "Powered by CanopyAI"),
            enable_create: enabled("ENABLE_CREATE"),
            enable_edit: enabled("ENABLE_EDIT"),
            enable_delete: enabled("ENABLE_DELETE"),
            default_view: string_or("DEFAULT_VIEW", "month"),
            theme: string_or("THEME", "default"),
            debug: get("DEBUG").is_some_and(|v| v == "true"),
            timezone,
            request_timeout,
        })
    }

    /// Merge feature flag overrides from a TOML file, if it exists
    pub fn apply_feature_file(&mut self, path: &Path) -> CalendarResult<()> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let overrides: FeatureOverrides = toml::from_str(&content)?;
        if let Some(value) = overrides.enable_create {
            self.enable_create = value;
        }
        if let Some(value) = overrides.enable_edit {
            self.enable_edit = value;
        }
        if let Some(value) = overrides.enable_delete {
            self.enable_delete = value;
        }

        Ok(())
    }

    /// URL of the schedules collection
    pub fn schedules_url(&self) -> CalendarResult<Url> {
        self.api_url
            .join("schedules")
            .map_err(|e| config_error(&format!("Failed to build schedules URL: {}", e)))
    }

    /// URL of a single schedule
    pub fn schedule_url(&self, sid: &str) -> CalendarResult<Url> {
        let mut url = self.schedules_url()?;
        url.path_segments_mut()
            .map_err(|_| config_error("Schedule service URL cannot have path segments"))?
            .push(sid);
        Ok(url)
    }
}

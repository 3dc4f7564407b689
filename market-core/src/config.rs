use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::provider::ProviderId;

const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_HANDLE: &str = "demo_brand";

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Base URLs of the upstream services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub ipapi: String,
    pub nominatim: String,
    pub openweather: String,
    pub weatherapi: String,
    pub socialblade: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ipapi: "https://ipapi.co".to_string(),
            nominatim: "https://nominatim.openstreetmap.org".to_string(),
            openweather: "https://api.openweathermap.org".to_string(),
            weatherapi: "https://api.weatherapi.com".to_string(),
            socialblade: "https://api.socialblade.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every upstream at the same base URL, e.g. a local mock server.
    pub fn all_at(base: &str) -> Self {
        Self {
            ipapi: base.to_string(),
            nominatim: base.to_string(),
            openweather: base.to_string(),
            weatherapi: base.to_string(),
            socialblade: base.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Optional default weather provider id, e.g. "openweather" or "weatherapi".
    pub default_provider: Option<String>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Handle used for social stats when a request carries none. An empty
    /// string leaves `social` out of such contexts.
    #[serde(default = "default_handle")]
    pub default_handle: Option<String>,

    /// Upper bound on every upstream request.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Fixed seed for the synthetic generators. Unset means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_handle() -> Option<String> {
    Some(DEFAULT_HANDLE.to_string())
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            providers: HashMap::new(),
            default_handle: default_handle(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            seed: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Return the default weather provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No default provider configured.\n\
                 Hint: run `market configure <provider>` (e.g. `market configure openweather`) first."
            )
        })?;

        let id = ProviderId::try_from(s.as_str())?;
        if !id.is_weather() {
            return Err(anyhow!("Default provider '{id}' is not a weather provider."));
        }
        Ok(id)
    }

    /// The weather provider to use live: the default if it has a key,
    /// otherwise the first weather provider that does.
    pub fn weather_provider(&self) -> Option<(ProviderId, &str)> {
        let preferred = self
            .default_provider_id()
            .ok()
            .filter(|id| self.is_provider_configured(*id));

        preferred
            .into_iter()
            .chain(ProviderId::weather().iter().copied())
            .find_map(|id| self.provider_api_key(id).map(|key| (id, key)))
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Store default weather provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "market-context", "market-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay API keys and the seed from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, so tests can pass a map instead of
    /// touching the real environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for id in ProviderId::all() {
            if let Some(key) = lookup(id.env_var()).filter(|k| is_usable_key(k)) {
                self.providers
                    .insert(id.as_str().to_string(), ProviderConfig { api_key: key });
            }
        }

        if let Some(raw) = lookup("MARKET_CONTEXT_SEED") {
            let seed = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("MARKET_CONTEXT_SEED must be an integer, got '{raw}'"))?;
            self.seed = Some(seed);
        }

        Ok(())
    }

    /// Convenience helper: set/replace a provider API key and, for weather
    /// providers, set the default if none is set yet.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_provider.is_none() && provider_id.is_weather() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns a usable API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id)
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| is_usable_key(key))
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}

/// Empty keys and template placeholders like `your-openweathermap-api-key-here`
/// count as missing.
fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !(key.starts_with("your-") && key.ends_with("-here"))
}

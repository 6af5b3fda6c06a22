use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::render::RenderOptions;

/// Setup guidance shown when the API key cannot be found.
const API_KEY_SETUP: &str = "How to set up your API key:\n\
    1. Export it in your shell: export GOOGLE_API_KEY=\"your-api-key-here\"\n\
    2. Or create a .env file next to config.toml containing GOOGLE_API_KEY=your-api-key-here\n\
    Never hard-code your API key in config.toml or in the source code.";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub nextchapter: AppConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
}

/// Application-wide settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Gemini generateContent settings
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_retry_delays_secs")]
    pub retry_delays_secs: Vec<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_delays_secs: default_retry_delays_secs(),
        }
    }
}

impl GeminiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delays(&self) -> Vec<Duration> {
        self.retry_delays_secs
            .iter()
            .map(|secs| Duration::from_secs(*secs))
            .collect()
    }
}

/// Result cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            capacity: default_cache_capacity(),
        }
    }
}

/// Visualization settings
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_height_px")]
    pub height_px: u32,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_font_color")]
    pub font_color: String,
    #[serde(default = "default_stabilization_iterations")]
    pub stabilization_iterations: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            height_px: default_height_px(),
            background: default_background(),
            font_color: default_font_color(),
            stabilization_iterations: default_stabilization_iterations(),
        }
    }
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            height_px: self.height_px,
            background: self.background.clone(),
            font_color: self.font_color.clone(),
            stabilization_iterations: self.stabilization_iterations,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_attempts() -> usize {
    3
}

fn default_retry_delays_secs() -> Vec<u64> {
    vec![2, 5, 10]
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_capacity() -> usize {
    128
}

fn default_height_px() -> u32 {
    750
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_font_color() -> String {
    "#000000".to_string()
}

fn default_stabilization_iterations() -> u32 {
    200
}

fn default_http_port() -> u16 {
    8501
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in NEXTCHAPTER_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (built-in defaults if absent)
    ///
    /// Runs before the logger exists; use [`Config::locate`] afterwards to
    /// report where the settings came from.
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config = match Self::locate() {
            Some(path) => Self::from_file(&path)?,
            None => Config::default(),
        };

        config.validate()?;

        Ok(config)
    }

    /// The file `load` reads, or `None` when built-in defaults apply
    pub fn locate() -> Option<PathBuf> {
        match std::env::var("NEXTCHAPTER_CONFIG") {
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => {
                let path = PathBuf::from("config.toml");
                path.exists().then_some(path)
            }
        }
    }

    fn from_file(path: &PathBuf) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.gemini.max_attempts == 0 {
            anyhow::bail!("gemini.max_attempts must be at least 1");
        }

        if self.gemini.timeout_secs == 0 {
            anyhow::bail!("gemini.timeout_secs must be greater than 0");
        }

        if self.cache.capacity == 0 {
            anyhow::bail!("cache.capacity must be greater than 0");
        }

        if self.http_server.port == 0 {
            anyhow::bail!("http_server.port must be greater than 0");
        }

        url::Url::parse(&self.gemini.base_url)
            .with_context(|| format!("gemini.base_url is not a valid URL: {}", self.gemini.base_url))?;

        Ok(())
    }

    /// Read the Gemini API key from the environment.
    ///
    /// A missing or empty key is fatal; the error carries setup instructions.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.gemini.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            Ok(_) => anyhow::bail!(
                "Environment variable {} is empty.\n{}",
                self.gemini.api_key_env,
                API_KEY_SETUP
            ),
            Err(_) => anyhow::bail!(
                "Environment variable {} not set.\n{}",
                self.gemini.api_key_env,
                API_KEY_SETUP
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
        let originals: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(k, _)| (k.to_string(), std::env::var(k).ok()))
            .collect();
        for (k, v) in vars {
            match v {
                Some(v) => std::env::set_var(k, v),
                None => std::env::remove_var(k),
            }
        }
        f();
        for (k, v) in originals {
            match v {
                Some(v) => std::env::set_var(&k, v),
                None => std::env::remove_var(&k),
            }
        }
    }

    #[test]
    fn test_config_load_from_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[gemini]
model = "gemini-test"
max_attempts = 5
retry_delays_secs = [1, 1]

[cache]
ttl_secs = 60

[http_server]
port = 9000
"#,
        )
        .unwrap();

        with_env(
            &[("NEXTCHAPTER_CONFIG", config_path.to_str())],
            || {
                let config = Config::load();
                assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
                let config = config.unwrap();
                assert_eq!(config.gemini.model, "gemini-test");
                assert_eq!(config.gemini.max_attempts, 5);
                assert_eq!(config.gemini.retry_delays(), vec![Duration::from_secs(1); 2]);
                assert_eq!(config.cache.ttl_secs, 60);
                assert_eq!(config.cache.capacity, 128);
                assert_eq!(config.http_server.port, 9000);
                assert_eq!(config.render.height_px, 750);
            },
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.gemini.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.gemini.timeout(), Duration::from_secs(60));
        assert_eq!(config.gemini.max_attempts, 3);
        assert_eq!(config.gemini.retry_delays_secs, vec![2, 5, 10]);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_locate_prefers_env_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_env(&[("NEXTCHAPTER_CONFIG", Some("custom.toml"))], || {
            assert_eq!(Config::locate(), Some(PathBuf::from("custom.toml")));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_env(&[("NEXTCHAPTER_CONFIG", Some("nonexistent.toml"))], || {
            assert!(Config::load().is_err());
        });
    }

    #[test]
    fn test_config_rejects_zero_attempts() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[gemini]\nmax_attempts = 0\n").unwrap();

        with_env(&[("NEXTCHAPTER_CONFIG", config_path.to_str())], || {
            let err = Config::load().unwrap_err();
            assert!(err.to_string().contains("max_attempts"));
        });
    }

    #[test]
    fn test_api_key_missing() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let mut config = Config::default();
        config.gemini.api_key_env = "NEXTCHAPTER_TEST_MISSING_KEY".to_string();

        with_env(&[("NEXTCHAPTER_TEST_MISSING_KEY", None)], || {
            let err = config.api_key().unwrap_err().to_string();
            assert!(err.contains("NEXTCHAPTER_TEST_MISSING_KEY"));
            assert!(err.contains("How to set up your API key"));
        });
    }

    #[test]
    fn test_api_key_empty() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let mut config = Config::default();
        config.gemini.api_key_env = "NEXTCHAPTER_TEST_EMPTY_KEY".to_string();

        with_env(&[("NEXTCHAPTER_TEST_EMPTY_KEY", Some("   "))], || {
            let err = config.api_key().unwrap_err().to_string();
            assert!(err.contains("is empty"));
        });
    }

    #[test]
    fn test_api_key_present() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let mut config = Config::default();
        config.gemini.api_key_env = "NEXTCHAPTER_TEST_PRESENT_KEY".to_string();

        with_env(&[("NEXTCHAPTER_TEST_PRESENT_KEY", Some("secret"))], || {
            assert_eq!(config.api_key().unwrap(), "secret");
        });
    }
}

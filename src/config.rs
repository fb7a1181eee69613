use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Debug runs keep the browser window visible.
    #[serde(default)]
    pub debug: bool,
    pub driver: DriverConfig,
    pub waits: WaitConfig,
    pub urls: Vec<String>,
    pub telegram: TelegramConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Name of the browser to launch; must be a key of `browsers`.
    pub browser: String,
    pub browsers: HashMap<String, BrowserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserProfile {
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Seconds plural element lookups keep polling before settling for what is there.
    pub implicit_wait: u64,
    /// Seconds explicit waits (appear/disappear/presence/clickable) may block.
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub dir: String,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl DriverConfig {
    /// Launch arguments for the selected browser. Debug runs strip any
    /// headless switch so the window stays visible.
    pub fn launch_args(&self, debug: bool) -> Result<Vec<String>, ConfigError> {
        let profile = self.browsers.get(&self.browser).ok_or_else(|| {
            ConfigError::Message(format!("Unsupported browser: {}", self.browser))
        })?;

        let mut args = profile.args.clone();
        if debug {
            args.retain(|arg| arg != "--headless" && !arg.starts_with("--headless="));
        }
        Ok(args)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git, holds the bot token)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "SCOUT_"
            .add_source(Environment::with_prefix("SCOUT").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate driver configuration
        if !self.driver.browsers.contains_key(&self.driver.browser) {
            return Err(ConfigError::Message(format!(
                "Unsupported browser: {}",
                self.driver.browser
            )));
        }

        // Validate wait configuration
        if self.waits.timeout == 0 {
            return Err(ConfigError::Message(
                "waits.timeout must be greater than 0".into(),
            ));
        }

        // Validate target URLs
        if self.urls.is_empty() {
            return Err(ConfigError::Message(
                "at least one product URL must be configured".into(),
            ));
        }
        for url in &self.urls {
            if Url::parse(url).is_err() {
                return Err(ConfigError::Message(format!("Invalid product URL: {}", url)));
            }
        }

        // Validate Telegram configuration
        if self.telegram.token.is_empty() {
            return Err(ConfigError::Message("telegram.token must be set".into()));
        }
        if self.telegram.chat_id.is_empty() {
            return Err(ConfigError::Message("telegram.chat_id must be set".into()));
        }
        if Url::parse(&self.telegram.api_base).is_err() {
            return Err(ConfigError::Message(
                "Invalid telegram.api_base URL format".into(),
            ));
        }

        // Validate logging configuration
        if self.logging.dir.is_empty() {
            return Err(ConfigError::Message("logging.dir must be set".into()));
        }

        Ok(())
    }
}

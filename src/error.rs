use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("page load timed out after {attempts} readiness checks: {url}")]
    LoadTimeout { url: String, attempts: u32 },

    #[error("timed out after {timeout_secs}s waiting for {condition}: {selector}")]
    WaitTimeout {
        condition: &'static str,
        selector: String,
        timeout_secs: u64,
    },

    #[error("invalid selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("stale element handle: {0}")]
    StaleElement(u64),

    #[error("slider value {value} is out of range [{min}, {max}]")]
    SliderValueOutOfRange { value: f64, min: f64, max: f64 },

    #[error("unsupported browser: {0}")]
    UnsupportedBrowser(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

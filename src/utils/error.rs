use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnleashError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Strategy '{name}' error: {message}")]
    StrategyError { name: String, message: String },

    #[error("Context is missing field: {field}")]
    MissingContextError { field: String },

    #[error("Cache error: {message}")]
    CacheError { message: String },

    #[error("Unexpected response from {endpoint}: HTTP {status}")]
    UnexpectedStatusError { endpoint: String, status: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Evaluation,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl UnleashError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            UnleashError::HttpError(_) | UnleashError::UnexpectedStatusError { .. } => {
                ErrorCategory::Network
            }
            UnleashError::ConfigError { .. }
            | UnleashError::InvalidConfigValueError { .. }
            | UnleashError::MissingConfigError { .. } => ErrorCategory::Configuration,
            UnleashError::StrategyError { .. } | UnleashError::MissingContextError { .. } => {
                ErrorCategory::Evaluation
            }
            UnleashError::IoError(_)
            | UnleashError::SerializationError(_)
            | UnleashError::CacheError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 評估錯誤會回退到預設值
            ErrorCategory::Evaluation => ErrorSeverity::Low,
            // 網路錯誤下次輪詢會重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            UnleashError::HttpError(_) | UnleashError::UnexpectedStatusError { .. } => {
                format!("Could not talk to the Unleash server: {}", self)
            }
            UnleashError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            UnleashError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the Unleash server URL is reachable and the API token header is correct",
            ErrorCategory::Configuration => "Review the command line flags or the TOML configuration file",
            ErrorCategory::Evaluation => "Check the strategy parameters and the context passed to is_enabled",
            ErrorCategory::Storage => "Check that the cache directory exists and is writable",
        }
    }

    pub(crate) fn strategy(name: &str, message: impl Into<String>) -> Self {
        UnleashError::StrategyError {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn missing_context(field: &str) -> Self {
        UnleashError::MissingContextError {
            field: field.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UnleashError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("{service} API returned {status}: {body}")]
    ApiStatusError {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("git {command} failed with exit code {code:?}")]
    GitCommandError { command: String, code: Option<i32> },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown repository: {name}")]
    UnknownRepoError { name: String },

    #[error("Preflight check failed: {message}")]
    PreflightError { message: String },

    #[error("Background worker terminated: {message}")]
    WorkerTerminatedError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Subprocess,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BridgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::ApiError(_) | BridgeError::ApiStatusError { .. } => ErrorCategory::Network,
            BridgeError::GitCommandError { .. } => ErrorCategory::Subprocess,
            BridgeError::ConfigError { .. }
            | BridgeError::InvalidConfigValueError { .. }
            | BridgeError::MissingConfigError { .. }
            | BridgeError::UnknownRepoError { .. } => ErrorCategory::Configuration,
            BridgeError::IoError(_)
            | BridgeError::SerializationError(_)
            | BridgeError::YamlError(_)
            | BridgeError::PreflightError { .. }
            | BridgeError::WorkerTerminatedError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可重試
            BridgeError::ApiError(_) | BridgeError::ApiStatusError { .. } => ErrorSeverity::Medium,
            BridgeError::GitCommandError { .. } => ErrorSeverity::High,
            BridgeError::UnknownRepoError { .. } => ErrorSeverity::Low,
            BridgeError::ConfigError { .. }
            | BridgeError::InvalidConfigValueError { .. }
            | BridgeError::MissingConfigError { .. }
            | BridgeError::YamlError(_)
            | BridgeError::PreflightError { .. } => ErrorSeverity::Critical,
            BridgeError::IoError(_)
            | BridgeError::SerializationError(_)
            | BridgeError::WorkerTerminatedError { .. } => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BridgeError::ApiError(e) => format!("Could not reach a remote API: {}", e),
            BridgeError::ApiStatusError {
                service, status, ..
            } => {
                format!("The {} API rejected a request (HTTP {})", service, status)
            }
            BridgeError::GitCommandError { command, .. } => {
                format!("A git operation failed: git {}", command)
            }
            BridgeError::YamlError(e) => format!("The configuration file is not valid YAML: {}", e),
            BridgeError::PreflightError { message } => {
                format!("The environment is missing a required tool: {}", message)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and that the configured access tokens are still valid"
            }
            ErrorCategory::Subprocess => {
                "Inspect the git output above; the local mirror may need to be removed and re-cloned"
            }
            ErrorCategory::Configuration => {
                "Review the YAML configuration file against the documented schema"
            }
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

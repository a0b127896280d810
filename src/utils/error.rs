use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API_KEY environment variable is not set.")]
    MissingApiKey,

    #[error("Generation API returned {status}: {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Prompt was blocked by the generation API: {reason}")]
    PromptBlocked { reason: String },

    #[error("Generation API returned no text")]
    EmptyResponse,

    #[error("PDF export failed: {message}")]
    PdfError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Upstream,
    System,
}

impl ScriptError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScriptError::MissingApiKey
            | ScriptError::MissingConfigError { .. }
            | ScriptError::InvalidConfigValueError { .. }
            | ScriptError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ScriptError::ValidationError { .. } => ErrorCategory::Input,
            ScriptError::ApiError(_)
            | ScriptError::UpstreamError { .. }
            | ScriptError::PromptBlocked { .. }
            | ScriptError::EmptyResponse => ErrorCategory::Upstream,
            ScriptError::IoError(_)
            | ScriptError::SerializationError(_)
            | ScriptError::PdfError { .. } => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("設定錯誤: {}", self),
            ErrorCategory::Input => format!("輸入錯誤: {}", self),
            ErrorCategory::Upstream => format!("生成服務錯誤: {}", self),
            ErrorCategory::System => format!("系統錯誤: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScriptError::MissingApiKey => "Set API_KEY or pass --api-key",
            ScriptError::UpstreamError { status, .. } if *status == 429 => {
                "The provider is rate limiting requests, wait and try again"
            }
            ScriptError::UpstreamError { .. } | ScriptError::ApiError(_) => {
                "Check network access and the configured model name"
            }
            ScriptError::PromptBlocked { .. } => "Rephrase the topic and try again",
            ScriptError::EmptyResponse => "Try again, the model returned nothing",
            ScriptError::ValidationError { .. } => "Provide both a topic and a host name",
            ScriptError::MissingConfigError { .. }
            | ScriptError::InvalidConfigValueError { .. }
            | ScriptError::ConfigValidationError { .. } => {
                "Check the command line flags and the TOML config file"
            }
            ScriptError::IoError(_) => "Check file permissions and the output path",
            ScriptError::SerializationError(_) | ScriptError::PdfError { .. } => {
                "Run again with --verbose and inspect the logs"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;

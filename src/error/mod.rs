use std::fmt::Display;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

use crate::tfcloud::http::ApiError;

/// The unified error type for tfc-trigger
#[derive(Error, Debug)]
pub enum TfcError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Workspace listing failed: {message}")]
    Listing {
        code: u16,
        message: String,
        organization: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Run creation failed: {message}")]
    Trigger {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Invalid event: {message}")]
    Event {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] {message}")]
    Other {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TfcError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::config_with_code(ErrorCode::CONFIG_GENERIC, message, None)
    }

    /// Create a configuration error with specific code and offending field
    pub fn config_with_code(code: u16, message: impl Into<String>, field: Option<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            field,
            source: None,
        }
    }

    /// Create a listing error for an organization
    pub fn listing(code: u16, message: impl Into<String>, organization: Option<String>) -> Self {
        Self::Listing {
            code,
            message: message.into(),
            organization,
            source: None,
        }
    }

    /// Create a run creation error
    pub fn trigger(code: u16, message: impl Into<String>) -> Self {
        Self::Trigger {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create an event error with specific code
    pub fn event(code: u16, message: impl Into<String>) -> Self {
        Self::Event {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a generic other error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            code: ErrorCode::OTHER_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a failed listing call
    pub fn from_listing(organization: &str, err: ApiError) -> Self {
        let code = match &err {
            ApiError::Status { .. } => ErrorCode::LISTING_HTTP_STATUS,
            ApiError::Transport { .. } => ErrorCode::LISTING_TRANSPORT,
            ApiError::Decode { .. } => ErrorCode::LISTING_MALFORMED,
            ApiError::Encode { .. } => ErrorCode::LISTING_GENERIC,
        };
        Self::listing(code, err.to_string(), Some(organization.to_string())).with_source(err)
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Listing { source: src, .. }
            | Self::Trigger { source: src, .. }
            | Self::Event { source: src, .. }
            | Self::Other { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Listing { message, .. }
            | Self::Trigger { message, .. }
            | Self::Event { message, .. }
            | Self::Other { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Trigger { .. } => 2,
            Self::Config { .. } => 3,
            Self::Listing { .. } => 4,
            Self::Event { .. } => 5,
            Self::Other { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Listing { code, .. }
            | Self::Trigger { code, .. }
            | Self::Event { code, .. }
            | Self::Other { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, field, .. } => match field {
                Some(f) => format!("Configuration problem with '{}': {}", f, message),
                None => format!("Configuration problem: {}", message),
            },
            Self::Listing {
                message,
                organization,
                ..
            } => match organization {
                Some(org) => format!(
                    "Unable to list workspaces of organization '{}': {}",
                    org, message
                ),
                None => format!("Unable to list workspaces: {}", message),
            },
            Self::Trigger { message, .. } => format!("Unable to trigger runs: {}", message),
            Self::Event { message, .. } => format!("Invalid event: {}", message),
            Self::Other { message, .. } => message.clone(),
        }
    }
}

/// Type alias for Results using TfcError
pub type Result<T> = std::result::Result<T, TfcError>;

/// Type alias for application Results (using anyhow for flexibility)
pub type AppResult<T> = anyhow::Result<T>;

impl From<std::io::Error> for TfcError {
    fn from(err: std::io::Error) -> Self {
        TfcError::Other {
            code: ErrorCode::OTHER_IO,
            message: "I/O operation failed".to_string(),
            source: None,
        }
        .with_source(err)
    }
}

impl From<toml::de::Error> for TfcError {
    fn from(err: toml::de::Error) -> Self {
        TfcError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "Invalid TOML syntax", None)
            .with_source(err)
    }
}

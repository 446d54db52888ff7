//! Error types for presenter resolution.
//!
//! Gaps in a presenter's configuration (an include name with no association
//! map entry, a name the current user may not list) are never errors: they
//! simply drop out of the resolved output. Errors are reserved for setup
//! defects that a request cannot recover from:
//!
//! - 1xxx: Configuration errors (unknown condition, invalid config file)
//! - 2xxx: Authorization errors (no policy for a model, unknown policy action)
//! - 3xxx: Request parameter errors
//!
//! ```rust
//! use prax_presenter_core::{ErrorCode, PresenterError};
//!
//! let err = PresenterError::policy_not_found("Category");
//! assert_eq!(err.code(), ErrorCode::PolicyNotFound);
//! assert_eq!(err.code().code(), "PP2001");
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for presenter operations.
pub type PresenterResult<T> = Result<T, PresenterError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Configuration errors (1xxx)
    /// A named condition is not defined by the presenter (PP1001).
    UnknownCondition = 1001,
    /// The configuration could not be parsed (PP1002).
    InvalidConfiguration = 1002,
    /// The configuration file could not be read (PP1003).
    ConfigurationIo = 1003,

    // Authorization errors (2xxx)
    /// No policy is registered for a model (PP2001).
    PolicyNotFound = 2001,
    /// A policy does not define the requested action (PP2002).
    UnknownPolicyAction = 2002,
    /// The authorization oracle failed (PP2003).
    AuthorizationFailed = 2003,

    // Parameter errors (3xxx)
    /// Request parameters could not be read (PP3001).
    InvalidParameters = 3001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "PP2001").
    pub fn code(&self) -> String {
        format!("PP{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnknownCondition => "Unknown collection condition",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::ConfigurationIo => "Configuration file unreadable",
            Self::PolicyNotFound => "Policy not found",
            Self::UnknownPolicyAction => "Unknown policy action",
            Self::AuthorizationFailed => "Authorization failed",
            Self::InvalidParameters => "Invalid request parameters",
        }
    }

    /// Whether the error stems from the request rather than application setup.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidParameters)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur while presenting a record set.
#[derive(Error, Debug)]
pub enum PresenterError {
    /// A collection declares a named condition the presenter does not define.
    #[error("collection `{collection}` declares unknown condition `{condition}`")]
    UnknownCondition {
        /// Collection whose entry declares the condition.
        collection: String,
        /// Name of the missing condition.
        condition: String,
    },

    /// The configuration could not be parsed.
    #[error("invalid presenter configuration: {source}")]
    InvalidConfiguration {
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration file could not be read.
    #[error("failed to read presenter configuration: {path}")]
    ConfigurationIo {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The authorization oracle has no policy for a model.
    #[error("no policy registered for model `{model}`")]
    PolicyNotFound {
        /// Model name that was looked up.
        model: String,
    },

    /// A policy does not define the requested action.
    #[error("policy for `{model}` does not define action `{action}`")]
    UnknownPolicyAction {
        /// Model whose policy was consulted.
        model: String,
        /// Requested action.
        action: String,
    },

    /// The authorization oracle failed for another reason.
    #[error("authorization failed: {message}")]
    Authorization {
        /// Failure description.
        message: String,
        /// Source error reported by the oracle, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request parameters could not be read.
    #[error("invalid presenter parameters: {message}")]
    InvalidParameters {
        /// Failure description.
        message: String,
    },
}

impl PresenterError {
    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownCondition { .. } => ErrorCode::UnknownCondition,
            Self::InvalidConfiguration { .. } => ErrorCode::InvalidConfiguration,
            Self::ConfigurationIo { .. } => ErrorCode::ConfigurationIo,
            Self::PolicyNotFound { .. } => ErrorCode::PolicyNotFound,
            Self::UnknownPolicyAction { .. } => ErrorCode::UnknownPolicyAction,
            Self::Authorization { .. } => ErrorCode::AuthorizationFailed,
            Self::InvalidParameters { .. } => ErrorCode::InvalidParameters,
        }
    }

    // ============== Constructor Functions ==============

    /// Create an unknown condition error.
    pub fn unknown_condition(collection: impl Into<String>, condition: impl Into<String>) -> Self {
        Self::UnknownCondition {
            collection: collection.into(),
            condition: condition.into(),
        }
    }

    /// Create a policy not found error.
    pub fn policy_not_found(model: impl Into<String>) -> Self {
        Self::PolicyNotFound {
            model: model.into(),
        }
    }

    /// Create an unknown policy action error.
    pub fn unknown_policy_action(model: impl Into<String>, action: impl Into<String>) -> Self {
        Self::UnknownPolicyAction {
            model: model.into(),
            action: action.into(),
        }
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
            source: None,
        }
    }

    /// Create an authorization error wrapping the oracle's own error.
    pub fn authorization_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Authorization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameters error.
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Whether this error was caused by the authorization oracle.
    pub fn is_authorization_error(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::PolicyNotFound
                | ErrorCode::UnknownPolicyAction
                | ErrorCode::AuthorizationFailed
        )
    }
}

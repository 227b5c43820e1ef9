//! Error types for hostgen
//!
//! Every error is terminal for a run. Nothing here is downgraded to a
//! warning.

use std::fmt;
use thiserror::Error;

/// Result type alias for hostgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Where in the configuration an error originated
///
/// Attached to every resolution and derivation error so the operator can
/// find the offending entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The selector key as written in the configuration
    pub selector: String,
    /// The hostname key under that selector
    pub hostname: String,
}

impl Location {
    /// Create a new location
    pub fn new(selector: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            hostname: hostname.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "selector `{}`, host `{}`", self.selector, self.hostname)
    }
}

/// Core error type for hostgen
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration tree does not have the expected shape
    #[error("Config shape error at {context}: {message}")]
    ConfigShape {
        /// Path to the offending node (e.g. a selector key)
        context: String,
        /// What was expected
        message: String,
    },

    /// A selector did not resolve to any local network
    #[error("Selector resolution failed ({location}): {message}")]
    SelectorResolution {
        location: Location,
        message: String,
    },

    /// An item has a shape or combination that is not supported
    #[error("Unsupported item ({location}): {message}")]
    UnsupportedItem {
        location: Location,
        message: String,
    },

    /// A field has neither an explicit item nor a default seed
    #[error("Missing identity ({location}): no value for `{field}` and no default seed")]
    MissingIdentity {
        location: Location,
        /// Field name (mac, ip4 or ip6)
        field: &'static str,
    },

    /// A literal item failed to parse as a MAC/IPv4/IPv6 value
    #[error("Malformed literal ({location}): `{literal}`: {message}")]
    MalformedLiteral {
        location: Location,
        literal: String,
        message: String,
    },

    /// Network snapshot errors
    #[error("Network snapshot error: {0}")]
    Snapshot(String),

    /// Record writer errors
    #[error("Record writer error: {0}")]
    Writer(String),

    /// Configuration errors outside the host tree (registry, options)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a config shape error
    pub fn config_shape(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigShape {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a selector resolution error
    pub fn selector_resolution(location: &Location, message: impl Into<String>) -> Self {
        Self::SelectorResolution {
            location: location.clone(),
            message: message.into(),
        }
    }

    /// Create an unsupported item error
    pub fn unsupported_item(location: &Location, message: impl Into<String>) -> Self {
        Self::UnsupportedItem {
            location: location.clone(),
            message: message.into(),
        }
    }

    /// Create a missing identity error
    pub fn missing_identity(location: &Location, field: &'static str) -> Self {
        Self::MissingIdentity {
            location: location.clone(),
            field,
        }
    }

    /// Create a malformed literal error
    pub fn malformed_literal(
        location: &Location,
        literal: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedLiteral {
            location: location.clone(),
            literal: literal.into(),
            message: message.into(),
        }
    }

    /// Create a snapshot error
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Create a writer error
    pub fn writer(msg: impl Into<String>) -> Self {
        Self::Writer(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error was caused by the user's input rather than the
    /// environment
    ///
    /// The CLI maps input errors and runtime errors to different exit codes.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigShape { .. }
                | Self::SelectorResolution { .. }
                | Self::UnsupportedItem { .. }
                | Self::MissingIdentity { .. }
                | Self::MalformedLiteral { .. }
                | Self::Config(_)
                | Self::Yaml(_)
        )
    }

    /// The configuration location attached to this error, if any
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::SelectorResolution { location, .. }
            | Self::UnsupportedItem { location, .. }
            | Self::MissingIdentity { location, .. }
            | Self::MalformedLiteral { location, .. } => Some(location),
            _ => None,
        }
    }
}

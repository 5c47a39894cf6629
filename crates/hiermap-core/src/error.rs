//! Error types for hiermap.

use crate::tree::NodeId;
use thiserror::Error;

/// Errors raised by tree construction, option loading and view operations.
///
/// Geometry problems (zero sizes, too little space, queries before layout)
/// are not errors; they surface as nodes without layout or `None` results.
#[derive(Debug, Error)]
pub enum Error {
    /// Options failed validation.
    #[error("invalid option `{field}`: {reason}")]
    InvalidOption {
        /// Option name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Records or options could not be decoded from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Options could not be decoded from TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A node handle does not belong to the tree.
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),

    /// No node carries the given identity key.
    #[error("no node with key '{0}'")]
    KeyNotFound(String),

    /// A structural edit would break the single-root tree shape.
    #[error("invalid tree structure: {0}")]
    Structure(String),

    /// Two nodes share the same identity key.
    #[error("duplicate node key '{0}'")]
    DuplicateKey(String),

    /// The tree nests deeper than the configured recursion limit.
    #[error("tree depth exceeds limit of {limit}")]
    DepthLimit {
        /// Maximum permitted depth
        limit: usize,
    },
}

/// Result alias for hiermap operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_display() {
        let err = Error::InvalidOption {
            field: "gap_size",
            reason: "must not be negative".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid option `gap_size`: must not be negative"
        );
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_depth_limit_display() {
        let err = Error::DepthLimit { limit: 512 };
        assert_eq!(err.to_string(), "tree depth exceeds limit of 512");
    }

    #[test]
    fn test_key_errors_display() {
        assert_eq!(
            Error::KeyNotFound("a".into()).to_string(),
            "no node with key 'a'"
        );
        assert_eq!(
            Error::DuplicateKey("b".into()).to_string(),
            "duplicate node key 'b'"
        );
    }
}

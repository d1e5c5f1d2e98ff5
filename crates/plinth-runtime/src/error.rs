//! The stable error taxonomy of the dispatch layer.
//!
//! Every failure the runtime returns is one of the [`ApiError`] variants
//! below, and every variant maps to exactly one wire [`ErrorCode`].
//! Validation errors are raised before any component is touched; component
//! errors are wrapped with the operation that failed but keep their kind.

use thiserror::Error;

use plinth_core::file::FileError;
use plinth_core::state::StateError;

/// Capability kinds, used in registry-related error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Hello,
    Configuration,
    State,
    TransactionalState,
    PubSub,
    File,
    Lock,
    Sequencer,
    Delegated,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Hello => "hello",
            Capability::Configuration => "configuration",
            Capability::State => "state",
            Capability::TransactionalState => "transactional state",
            Capability::PubSub => "pub/sub",
            Capability::File => "file",
            Capability::Lock => "lock",
            Capability::Sequencer => "sequencer",
            Capability::Delegated => "delegated runtime",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable wire-level status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    FailedPrecondition,
    InvalidArgument,
    Aborted,
    NotFound,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FailedPrecondition => "FAILED_PRECONDITION",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::Aborted => "ABORTED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by every runtime operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The capability has zero configured components.
    #[error("no {capability} components configured")]
    NotConfigured { capability: Capability },

    /// The named store is not in the capability's registry.
    #[error("{capability} store [{name}] is not supported")]
    UnknownStore { capability: Capability, name: String },

    /// A required request field is empty.
    #[error("{field} is empty in request for store [{store}]")]
    EmptyField {
        field: &'static str,
        store: String,
    },

    /// A lock lease with a non-positive expiry.
    #[error("expire must be positive in request for store [{store}]")]
    InvalidExpire { store: String },

    /// A nested request message was absent.
    #[error("request can't be nil")]
    MissingRequest,

    /// A key contains the reserved namespacing separator.
    #[error("key '{key}' must not contain '{separator}'")]
    ReservedSeparator { key: String, separator: &'static str },

    /// A state transaction step names an unknown operation.
    #[error("operation type '{operation_type}' is not supported")]
    UnsupportedOperationType { operation_type: String },

    /// A delegated call was rejected as malformed by the sister runtime.
    #[error("{reason}")]
    InvalidArgument { reason: String },

    /// An envelope or payload could not be encoded or decoded.
    #[error("serialization failed: {reason}")]
    Serialization { reason: String },

    /// Concurrent state update conflict.
    #[error("{operation} failed: {reason}")]
    EtagMismatch {
        operation: &'static str,
        reason: String,
    },

    /// Malformed etag.
    #[error("{operation} failed: {reason}")]
    EtagInvalid {
        operation: &'static str,
        reason: String,
    },

    /// Any other component failure.
    #[error("{operation} failed: {reason}")]
    Component {
        operation: &'static str,
        reason: String,
    },

    /// A send or receive failed mid-stream.
    #[error("stream error: {reason}")]
    Stream { reason: String },

    /// A component reported the addressed resource as absent.
    #[error("{operation} failed: {reason}")]
    NotFound {
        operation: &'static str,
        reason: String,
    },
}

impl ApiError {
    /// The stable wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::NotConfigured { .. } => ErrorCode::FailedPrecondition,
            ApiError::UnknownStore { .. }
            | ApiError::EmptyField { .. }
            | ApiError::InvalidExpire { .. }
            | ApiError::MissingRequest
            | ApiError::ReservedSeparator { .. }
            | ApiError::UnsupportedOperationType { .. }
            | ApiError::InvalidArgument { .. }
            | ApiError::Serialization { .. }
            | ApiError::EtagInvalid { .. } => ErrorCode::InvalidArgument,
            ApiError::EtagMismatch { .. } => ErrorCode::Aborted,
            ApiError::NotFound { .. } => ErrorCode::NotFound,
            ApiError::Component { .. } | ApiError::Stream { .. } => ErrorCode::Internal,
        }
    }

    /// Wrap a state-component error, preserving the etag kind.
    pub fn from_state(operation: &'static str, err: StateError) -> Self {
        match err {
            StateError::EtagMismatch { .. } => ApiError::EtagMismatch {
                operation,
                reason: err.to_string(),
            },
            StateError::EtagInvalid { .. } => ApiError::EtagInvalid {
                operation,
                reason: err.to_string(),
            },
            StateError::Internal(reason) => ApiError::Component { operation, reason },
        }
    }

    /// Wrap a file-component error through the fixed error-kind map.
    pub fn from_file(operation: &'static str, err: FileError) -> Self {
        match err {
            FileError::NotFound(_) => ApiError::NotFound {
                operation,
                reason: err.to_string(),
            },
            FileError::Internal(reason) => ApiError::Component { operation, reason },
        }
    }

    /// Wrap any other component failure as `INTERNAL`.
    pub fn component(operation: &'static str, err: impl std::fmt::Display) -> Self {
        ApiError::Component {
            operation,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_the_taxonomy() {
        let cases = [
            (
                ApiError::NotConfigured {
                    capability: Capability::Lock,
                },
                ErrorCode::FailedPrecondition,
            ),
            (
                ApiError::UnknownStore {
                    capability: Capability::State,
                    name: "redis".into(),
                },
                ErrorCode::InvalidArgument,
            ),
            (
                ApiError::EmptyField {
                    field: "key",
                    store: "s".into(),
                },
                ErrorCode::InvalidArgument,
            ),
            (
                ApiError::EtagMismatch {
                    operation: "save state",
                    reason: "conflict".into(),
                },
                ErrorCode::Aborted,
            ),
            (
                ApiError::NotFound {
                    operation: "stat file",
                    reason: "missing".into(),
                },
                ErrorCode::NotFound,
            ),
            (
                ApiError::Stream {
                    reason: "reset".into(),
                },
                ErrorCode::Internal,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code, "wrong code for {err}");
        }
    }

    #[test]
    fn state_errors_keep_their_kind() {
        let err = ApiError::from_state(
            "save state",
            StateError::EtagMismatch {
                key: "k".into(),
                reason: "stale".into(),
            },
        );
        assert_eq!(err.code(), ErrorCode::Aborted);

        let err = ApiError::from_state(
            "save state",
            StateError::EtagInvalid {
                reason: "garbage".into(),
            },
        );
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let err = ApiError::from_state("save state", StateError::Internal("boom".into()));
        assert_eq!(err.code(), ErrorCode::Internal);
    }

    #[test]
    fn file_not_found_maps_through_the_kind_map() {
        let err = ApiError::from_file("stat file", FileError::NotFound("a.txt".into()));
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.to_string().contains("a.txt"));
    }

    #[test]
    fn unknown_store_message_names_the_store() {
        let err = ApiError::UnknownStore {
            capability: Capability::PubSub,
            name: "p".into(),
        };
        assert!(err.to_string().contains("[p]"));
    }
}

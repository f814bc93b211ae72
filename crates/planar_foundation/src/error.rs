//! Error types for the Planar binding.
//!
//! Uses `thiserror` for ergonomic error definition. Handle and index errors
//! are local programming errors (a handle used after destroy, a double
//! destroy) and surface synchronously at the call site; failures reported by
//! the native engine pass through verbatim as [`ErrorKind::ForeignCall`].

use thiserror::Error;

use crate::handle::RawHandle;

/// Result alias used throughout the binding.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Planar operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an invalid-handle error (stale or null handle presented to a
    /// checked operation).
    #[must_use]
    pub fn invalid_handle(handle: impl Into<RawHandle>) -> Self {
        Self::new(ErrorKind::InvalidHandle(handle.into()))
    }

    /// Creates an unknown-handle error (handle not present in the ownership
    /// index when removal was requested).
    #[must_use]
    pub fn unknown_handle(handle: impl Into<RawHandle>) -> Self {
        Self::new(ErrorKind::UnknownHandle(handle.into()))
    }

    /// Creates a foreign-call error, propagating a failure reported by the
    /// native engine.
    #[must_use]
    pub fn foreign_call(call: &'static str, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ForeignCall {
            call,
            detail: detail.into(),
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A stale or null handle was presented to a checked operation.
    ///
    /// The operation did not mutate any state. The handle's bit pattern is
    /// intact; the entity behind it is gone (or never existed).
    #[error("invalid handle: {0}")]
    InvalidHandle(RawHandle),

    /// A handle was not present in the ownership index when removal was
    /// requested. This is the double-destroy signal.
    #[error("unknown handle: {0}")]
    UnknownHandle(RawHandle),

    /// The native engine reported failure for a call.
    ///
    /// Passed through unchanged; native calls here are synchronous and
    /// in-process, so no retry is attempted.
    #[error("foreign call {call} failed: {detail}")]
    ForeignCall {
        /// Name of the native entry point.
        call: &'static str,
        /// Failure detail as reported by the engine.
        detail: String,
    },

    /// Invariant breach inside the binding itself (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

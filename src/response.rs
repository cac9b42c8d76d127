//! Uniform outcome envelope returned by every repository operation.

use serde::{Deserialize, Serialize};

/// Outcome of a repository operation.
///
/// A plain data contract meant to cross process boundaries, so it serializes
/// with camelCase keys: `message`, `data`, `errors`, `isSuccess`.
///
/// A successful response never carries errors; a failed one always carries at
/// least one. The constructors below are the only way the crate builds a
/// response, which keeps that rule in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    /// Human-readable outcome summary.
    pub message: String,
    /// Payload on success, absent for failures, deletions and batch writes.
    pub data: Option<T>,
    /// Ordered error descriptions; `None` on success.
    pub errors: Option<Vec<String>>,
    /// Outcome flag.
    pub is_success: bool,
}

impl<T> Response<T> {
    /// Success carrying a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            errors: None,
            is_success: true,
        }
    }

    /// Success with nothing to echo back.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            errors: None,
            is_success: true,
        }
    }

    /// Failure with the given errors. Falls back to the message when `errors` is empty.
    pub fn fail(message: impl Into<String>, errors: Vec<String>) -> Self {
        let message = message.into();
        let errors = if errors.is_empty() {
            vec![message.clone()]
        } else {
            errors
        };

        Self {
            message,
            data: None,
            errors: Some(errors),
            is_success: false,
        }
    }

    /// Failure whose single error entry describes `err`.
    pub fn from_error(message: impl Into<String>, err: &dyn std::error::Error) -> Self {
        Self::fail(message, vec![err.to_string()])
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Error entries, empty on success.
    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Maps the payload, keeping status, message and errors.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            message: self.message,
            data: self.data.map(f),
            errors: self.errors,
            is_success: self.is_success,
        }
    }
}

// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use thiserror::Error;

/// The error type for proxysign operations.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    key_hash: Option<String>,
    fields: Vec<String>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The key assigned to the request is not a valid `access:secret:region` string.
    CredentialFormat,

    /// The key pool has no key to hand out.
    KeyUnavailable,

    /// The request payload contains disallowed fields or fails field checks.
    Validation,

    /// Hashing or HMAC computation failed.
    ///
    /// This never happens with correct inputs and indicates a defect.
    Signing,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors (serialization, header construction, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            key_hash: None,
            fields: Vec::new(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Redacted identifier of the key that caused this error, if any.
    pub fn key_hash(&self) -> Option<&str> {
        self.key_hash.as_deref()
    }

    /// Names of the payload fields that failed validation.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Check if this error is caused by the user's key or payload rather than by us.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::CredentialFormat | ErrorKind::Validation
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a credential format error.
    ///
    /// Only the redacted `key_hash` is kept, never the key itself.
    pub fn credential_format(key_hash: impl Into<String>) -> Self {
        let mut err = Self::new(
            ErrorKind::CredentialFormat,
            "the key assigned to this request is invalid",
        );
        err.key_hash = Some(key_hash.into());
        err
    }

    /// Create a key unavailable error
    pub fn key_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyUnavailable, message)
    }

    /// Create a validation error naming every offending field.
    pub fn validation(message: impl Into<String>, fields: Vec<String>) -> Self {
        let mut err = Self::new(ErrorKind::Validation, message);
        err.fields = fields;
        err
    }

    /// Create a signing error
    pub fn signing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Signing, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::CredentialFormat => write!(f, "invalid credential format"),
            ErrorKind::KeyUnavailable => write!(f, "no key available"),
            ErrorKind::Validation => write!(f, "invalid request payload"),
            ErrorKind::Signing => write!(f, "signing failed"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_format_keeps_only_hash() {
        let err = Error::credential_format("aws-1a2b3c");

        assert_eq!(err.kind(), ErrorKind::CredentialFormat);
        assert_eq!(err.key_hash(), Some("aws-1a2b3c"));
        assert!(err.is_user_error());
        assert_eq!(
            err.to_string(),
            "the key assigned to this request is invalid"
        );
    }

    #[test]
    fn test_validation_carries_fields() {
        let err = Error::validation(
            "unsupported fields",
            vec!["foo".to_string(), "logit_bias".to_string()],
        );

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.fields(), ["foo", "logit_bias"]);
        assert!(err.is_user_error());
    }

    #[test]
    fn test_signing_is_not_user_error() {
        let err = Error::signing("hmac failed");
        assert!(!err.is_user_error());
        assert_eq!(err.kind().to_string(), "signing failed");
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for Catalog operations
//!
//! This module defines the error types used throughout the catalog layer.
//! A missing object is never an error here: lookups return `Ok(None)` and
//! only genuine access failures surface as [`CatalogError`].

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur during Catalog operations
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum CatalogError {
    /// Failed to connect to the database
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Metadata query failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Requested table was not found by a catalog source
    #[error("Table '{0}' not found in schema '{1}'")]
    TableNotFound(String, String),

    /// Invalid schema name provided
    #[error("Invalid schema name: {0}")]
    InvalidSchema(String),

    /// Failed to serialize or deserialize schema data
    #[error("Failed to serialize schema data: {0}")]
    SerializationError(String),

    /// Invalid catalog configuration
    #[error("Invalid catalog configuration: {0}")]
    ConfigurationError(String),

    /// Permission denied for requested operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The caller's progress monitor requested cancellation
    #[error("Operation canceled")]
    Canceled,
}

impl CatalogError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, CatalogError::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::TableNotFound("users".into(), "myapp".into());
        assert_eq!(err.to_string(), "Table 'users' not found in schema 'myapp'");

        let err = CatalogError::ConnectionFailed("refused".into());
        assert_eq!(err.to_string(), "Failed to connect to database: refused");

        assert_eq!(CatalogError::Canceled.to_string(), "Operation canceled");
    }

    #[test]
    fn test_is_canceled() {
        assert!(CatalogError::Canceled.is_canceled());
        assert!(!CatalogError::QueryFailed("x".into()).is_canceled());
    }

    #[test]
    fn test_error_serializes() {
        let json = serde_json::to_string(&CatalogError::PermissionDenied("pg_catalog".into()))
            .unwrap();
        assert!(json.contains("PermissionDenied"));
    }
}

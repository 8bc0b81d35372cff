// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Error types for semantic analysis
//!
//! Names that cannot be found are not errors: lookups return `Ok(None)`.
//! Errors here are metadata access failures, cancellation, and ambiguity
//! under [`ResolutionPolicy::Strict`](crate::ResolutionPolicy::Strict).

use thiserror::Error;
use unified_sql_lsp_catalog::CatalogError;

/// Result type alias for semantic operations
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Errors that can occur during semantic analysis
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// The metadata provider failed while answering a lookup
    #[error("Metadata access failed: {0}")]
    Catalog(CatalogError),

    /// The caller's progress monitor requested cancellation
    #[error("Semantic analysis canceled")]
    Canceled,

    /// Column reference is ambiguous (matches several visible columns)
    #[error("Ambiguous column reference: {0} (found in {1:?})")]
    AmbiguousColumn(String, Vec<String>),

    /// Source name resolves to different sources on both sides of a join
    #[error("Ambiguous source reference: {0} (found in {1:?})")]
    AmbiguousSource(String, Vec<String>),
}

impl From<CatalogError> for SemanticError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Canceled => SemanticError::Canceled,
            other => SemanticError::Catalog(other),
        }
    }
}

impl SemanticError {
    /// Whether this error came from the metadata provider
    pub fn is_access_failure(&self) -> bool {
        matches!(self, SemanticError::Catalog(_))
    }
}

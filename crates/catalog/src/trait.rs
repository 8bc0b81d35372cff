// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait for database schema sources
//!
//! This module defines the async Catalog trait implemented by live schema
//! sources. Analysis does not call it directly; a source is loaded once into
//! a [`CatalogSnapshot`](crate::CatalogSnapshot).

use unified_sql_lsp_ir::{ColumnMetadata, TableMetadata};

use crate::error::CatalogResult;

/// Catalog trait for database schema sources
///
/// # Examples
///
/// ```rust,ignore
/// use unified_sql_lsp_catalog::{Catalog, CatalogError};
///
/// async fn list_user_tables(catalog: &impl Catalog) -> Result<Vec<String>, CatalogError> {
///     let tables = catalog.list_tables().await?;
///     Ok(tables.into_iter()
///         .filter(|t| t.schema == "users")
///         .map(|t| t.name)
///         .collect())
/// }
/// ```
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// List all tables in the database
    ///
    /// Returns metadata for all tables accessible to the current connection,
    /// including views. A source may leave `columns` empty and serve them
    /// through [`Catalog::get_columns`] instead.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ConnectionFailed` if database connection fails.
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>>;

    /// Get column metadata for a specific table
    ///
    /// # Arguments
    ///
    /// * `table` - Table name (may include schema qualifier like "schema.table")
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TableNotFound` if the table doesn't exist.
    /// Returns `CatalogError::PermissionDenied` if access is denied.
    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>>;
}

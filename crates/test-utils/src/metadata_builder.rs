// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builder for in-memory metadata providers

use std::sync::Arc;

use unified_sql_lsp_catalog::{CatalogSnapshot, MetadataProvider, TableMetadata};
use unified_sql_lsp_ir::Dialect;

use crate::mock_catalog::standard_tables;

/// Builds a [`CatalogSnapshot`] without going through an async catalog
///
/// # Examples
///
/// ```
/// use unified_sql_lsp_ir::Dialect;
/// use unified_sql_lsp_test_utils::MetadataBuilder;
///
/// let snapshot = MetadataBuilder::new(Dialect::PostgreSQL)
///     .with_standard_schema()
///     .build();
/// assert!(snapshot.table("myapp", "users").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    dialect: Dialect,
    tables: Vec<TableMetadata>,
    catalog_name: Option<String>,
    default_schema: Option<String>,
}

impl MetadataBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            tables: Vec::new(),
            catalog_name: None,
            default_schema: None,
        }
    }

    /// Add the standard test schema (users, orders and products in `myapp`)
    ///
    /// `myapp` also becomes the default schema.
    pub fn with_standard_schema(mut self) -> Self {
        self.tables.extend(standard_tables());
        self.default_schema.get_or_insert_with(|| "myapp".to_string());
        self
    }

    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_tables(mut self, tables: impl IntoIterator<Item = TableMetadata>) -> Self {
        self.tables.extend(tables);
        self
    }

    pub fn with_catalog_name(mut self, name: impl Into<String>) -> Self {
        self.catalog_name = Some(name.into());
        self
    }

    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    pub fn build(self) -> CatalogSnapshot {
        let mut snapshot = CatalogSnapshot::from_tables(self.dialect, self.tables);
        if let Some(name) = self.catalog_name {
            snapshot = snapshot.with_catalog_name(name);
        }
        if let Some(schema) = self.default_schema {
            snapshot = snapshot.with_default_schema(schema);
        }
        snapshot
    }

    /// Build and share as a provider
    pub fn build_provider(self) -> Arc<dyn MetadataProvider> {
        Arc::new(self.build())
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock catalog implementation for testing
//!
//! Provides an in-memory async catalog with builder pattern for easy test setup

use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use unified_sql_lsp_catalog::{
    Catalog, CatalogError, CatalogResult, ColumnMetadata, DataType, TableMetadata, TableType,
};

/// In-memory mock catalog for testing
///
/// Tables can be listed without their columns to exercise callers that fetch
/// columns separately.
#[derive(Debug, Default)]
pub struct MockCatalog {
    tables: IndexMap<String, TableMetadata>,
    lazy_columns: bool,
    column_requests: AtomicUsize,
}

impl MockCatalog {
    /// Create a new empty mock catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the catalog
    pub fn add_table(mut self, table: TableMetadata) -> Self {
        let key = format!("{}.{}", table.schema, table.name);
        self.tables.insert(key, table);
        self
    }

    /// List tables without columns; `get_columns` serves them
    pub fn with_lazy_columns(mut self) -> Self {
        self.lazy_columns = true;
        self
    }

    /// Get a table by `schema.table` or plain table name
    pub fn get_table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables
            .get(name)
            .or_else(|| self.tables.values().find(|t| t.name == name))
    }

    /// Number of `get_columns` calls served so far
    pub fn column_requests(&self) -> usize {
        self.column_requests.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl Catalog for MockCatalog {
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        Ok(self
            .tables
            .values()
            .map(|table| {
                let mut table = table.clone();
                if self.lazy_columns {
                    table.columns.clear();
                }
                table
            })
            .collect())
    }

    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        self.column_requests.fetch_add(1, Ordering::Relaxed);
        if let Some(table_metadata) = self.get_table(table) {
            Ok(table_metadata.columns.clone())
        } else {
            Err(CatalogError::TableNotFound(table.to_string(), "mock".to_string()))
        }
    }
}

/// Builder for creating mock catalogs with a fluent API
#[derive(Default)]
pub struct MockCatalogBuilder {
    catalog: MockCatalog,
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the standard test schema (users, orders and products in `myapp`)
    pub fn with_standard_schema(mut self) -> Self {
        for table in standard_tables() {
            self.catalog = self.catalog.add_table(table);
        }
        self
    }

    /// Add a custom table
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.catalog = self.catalog.add_table(table);
        self
    }

    pub fn with_lazy_columns(mut self) -> Self {
        self.catalog = self.catalog.with_lazy_columns();
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        self.catalog
    }
}

/// Tables of the standard test schema
///
/// `users` also carries a composite `address` column and a `tags` array.
pub fn standard_tables() -> Vec<TableMetadata> {
    let address = DataType::Struct {
        name: "address".to_string(),
        fields: vec![
            ColumnMetadata::new("street", DataType::Text),
            ColumnMetadata::new("City", DataType::Text),
            ColumnMetadata::new("zip", DataType::Integer),
        ],
    };

    vec![
        TableMetadata::new("users", "myapp")
            .with_columns(vec![
                ColumnMetadata::new("id", DataType::BigInt).with_nullable(false),
                ColumnMetadata::new("email", DataType::Varchar(Some(255))).with_nullable(false),
                ColumnMetadata::new("name", DataType::Varchar(Some(100))).with_nullable(true),
                ColumnMetadata::new("address", address).with_nullable(true),
                ColumnMetadata::new("tags", DataType::Array(Box::new(DataType::Text)))
                    .with_nullable(true),
                ColumnMetadata::new("created_at", DataType::Timestamp).with_nullable(true),
            ])
            .with_comment("User account information"),
        TableMetadata::new("orders", "myapp")
            .with_columns(vec![
                ColumnMetadata::new("id", DataType::BigInt).with_nullable(false),
                ColumnMetadata::new("user_id", DataType::BigInt).with_nullable(false),
                ColumnMetadata::new("total", DataType::Decimal).with_nullable(true),
                ColumnMetadata::new("status", DataType::Varchar(Some(50))).with_nullable(false),
                ColumnMetadata::new("created_at", DataType::Timestamp).with_nullable(true),
            ])
            .with_type(TableType::Table),
        TableMetadata::new("products", "myapp")
            .with_columns(vec![
                ColumnMetadata::new("id", DataType::BigInt).with_nullable(false),
                ColumnMetadata::new("name", DataType::Varchar(Some(255))).with_nullable(false),
                ColumnMetadata::new("price", DataType::Decimal).with_nullable(false),
                ColumnMetadata::new("stock", DataType::Integer).with_nullable(true),
            ]),
        TableMetadata::new("active_users", "myapp")
            .with_columns(vec![
                ColumnMetadata::new("id", DataType::BigInt),
                ColumnMetadata::new("email", DataType::Varchar(Some(255))),
            ])
            .with_type(TableType::View),
    ]
}

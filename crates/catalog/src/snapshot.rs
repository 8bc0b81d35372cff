// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog Snapshot
//!
//! In-memory [`MetadataProvider`] built from [`TableMetadata`] records.
//!
//! A snapshot is either assembled directly from records (tests, static
//! schemas) or fetched once from an async [`Catalog`] source. Lookups against
//! it are synchronous and never fail with access errors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use unified_sql_lsp_catalog::CatalogSnapshot;
//! use unified_sql_lsp_ir::Dialect;
//!
//! let snapshot = CatalogSnapshot::load(&live_catalog, Dialect::PostgreSQL).await?;
//! ```

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, instrument};
use unified_sql_lsp_ir::{ColumnMetadata, DataKind, DataType, Dialect, TableMetadata};

use crate::error::CatalogResult;
use crate::object::{DbObject, DbObjectRef, HasAttributes, HasChildren, ObjectKind, TypedObject};
use crate::progress::{ProgressMonitor, VoidProgressMonitor, check_canceled};
use crate::provider::MetadataProvider;
use crate::r#trait::Catalog;

/// Immutable in-memory catalog
#[derive(Debug)]
pub struct CatalogSnapshot {
    dialect: Dialect,
    catalog_name: Option<String>,
    default_schema: Option<String>,
    schemas: IndexMap<String, DbObjectRef>,
}

impl CatalogSnapshot {
    /// Build a snapshot from table records, grouped by schema in first-seen order
    pub fn from_tables(dialect: Dialect, tables: Vec<TableMetadata>) -> Self {
        let mut grouped: IndexMap<String, Vec<TableMetadata>> = IndexMap::new();
        for table in tables {
            grouped.entry(table.schema.clone()).or_default().push(table);
        }

        let mut types = TypeInterner::default();
        let schemas = grouped
            .into_iter()
            .map(|(schema, tables)| {
                let tables = tables
                    .into_iter()
                    .map(|table| {
                        let object = SnapshotTable::build(&schema, table, &mut types);
                        (object.name().to_string(), object)
                    })
                    .collect();
                let object = DbObjectRef::new(SnapshotSchema {
                    name: schema.clone(),
                    tables,
                });
                (schema, object)
            })
            .collect();

        Self {
            dialect,
            catalog_name: None,
            default_schema: None,
            schemas,
        }
    }

    /// Fetch every table of a catalog source into a snapshot
    ///
    /// Tables listed without columns have them fetched individually.
    #[instrument(skip(catalog))]
    pub async fn load(catalog: &dyn Catalog, dialect: Dialect) -> CatalogResult<Self> {
        let mut tables = catalog.list_tables().await?;
        for table in tables.iter_mut().filter(|t| t.columns.is_empty()) {
            debug!(table = %table.name, "fetching columns");
            table.columns = catalog.get_columns(&table.name).await?;
        }
        debug!(tables = tables.len(), "catalog snapshot loaded");
        Ok(Self::from_tables(dialect, tables))
    }

    /// Name the single catalog this snapshot represents
    ///
    /// Three-part names must then match it.
    pub fn with_catalog_name(mut self, name: impl Into<String>) -> Self {
        self.catalog_name = Some(name.into());
        self
    }

    /// Schema searched first for unqualified table names
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    pub fn schemas(&self) -> impl Iterator<Item = &DbObjectRef> {
        self.schemas.values()
    }

    /// Exact-name table accessor
    pub fn table(&self, schema: &str, name: &str) -> Option<DbObjectRef> {
        self.schemas
            .get(schema)
            .and_then(|s| s.as_container())
            .and_then(|s| s.child(&VoidProgressMonitor, name).ok().flatten())
    }

    fn pick<'a, I>(&self, name: &str, items: I, case_sensitive: bool) -> Option<DbObjectRef>
    where
        I: IntoIterator<Item = &'a DbObjectRef>,
        I::IntoIter: Clone,
    {
        if case_sensitive {
            let unquoted = self.dialect.unquoted_identifier(name);
            return items.into_iter().find(|o| o.name() == unquoted).cloned();
        }
        self.dialect
            .find_by_identifier(name, items, |o| o.name())
            .cloned()
    }

    fn find_table_in_schema(
        &self,
        progress: &dyn ProgressMonitor,
        schema: &DbObjectRef,
        name: &str,
        case_sensitive: bool,
    ) -> CatalogResult<Option<DbObjectRef>> {
        let Some(container) = schema.as_container() else {
            return Ok(None);
        };
        let tables = container.children(progress)?;
        Ok(self.pick(name, &tables, case_sensitive))
    }

    fn find_unqualified_table(
        &self,
        progress: &dyn ProgressMonitor,
        name: &str,
        case_sensitive: bool,
    ) -> CatalogResult<Option<DbObjectRef>> {
        let default = self
            .default_schema
            .as_ref()
            .and_then(|schema| self.schemas.get(schema));
        if let Some(schema) = default {
            if let Some(table) = self.find_table_in_schema(progress, schema, name, case_sensitive)? {
                return Ok(Some(table));
            }
        }

        for schema in self.schemas.values() {
            if let Some(table) = self.find_table_in_schema(progress, schema, name, case_sensitive)? {
                return Ok(Some(table));
            }
        }
        Ok(None)
    }

    fn catalog_matches(&self, name: &str, case_sensitive: bool) -> bool {
        match &self.catalog_name {
            None => true,
            Some(catalog) if case_sensitive => self.dialect.unquoted_identifier(name) == *catalog,
            Some(catalog) => self.dialect.matches_identifier(name, catalog),
        }
    }
}

impl MetadataProvider for CatalogSnapshot {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn find_by_qualified_name(
        &self,
        progress: &dyn ProgressMonitor,
        container: Option<&DbObjectRef>,
        path: &[String],
        case_sensitive: bool,
    ) -> CatalogResult<Option<DbObjectRef>> {
        check_canceled(progress)?;

        if let Some(container) = container {
            let mut current = container.clone();
            for part in path {
                let Some(children) = current.as_container() else {
                    return Ok(None);
                };
                let children = children.children(progress)?;
                match self.pick(part, &children, case_sensitive) {
                    Some(next) => current = next,
                    None => return Ok(None),
                }
            }
            return Ok(Some(current));
        }

        match path {
            [table] => self.find_unqualified_table(progress, table, case_sensitive),
            [schema, table] => match self.pick(schema, self.schemas.values(), case_sensitive) {
                Some(schema) => self.find_table_in_schema(progress, &schema, table, case_sensitive),
                None => Ok(None),
            },
            [catalog, schema, table] if self.catalog_matches(catalog, case_sensitive) => {
                match self.pick(schema, self.schemas.values(), case_sensitive) {
                    Some(schema) => {
                        self.find_table_in_schema(progress, &schema, table, case_sensitive)
                    }
                    None => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }
}

/// Shares one data type object per spelled type name
#[derive(Default)]
struct TypeInterner {
    types: HashMap<String, DbObjectRef>,
}

impl TypeInterner {
    fn intern(&mut self, data_type: &DataType) -> DbObjectRef {
        let name = data_type.type_name();
        if let Some(existing) = self.types.get(&name) {
            return existing.clone();
        }

        let component = data_type.element_type().map(|e| self.intern(e));
        let fields = data_type
            .fields()
            .iter()
            .map(|field| SnapshotColumn::build(&name, field.clone(), self))
            .collect();
        let object = DbObjectRef::new(SnapshotDataType {
            name: name.clone(),
            data_type: data_type.clone(),
            component,
            fields,
        });
        self.types.insert(name, object.clone());
        object
    }
}

#[derive(Debug)]
struct SnapshotSchema {
    name: String,
    tables: IndexMap<String, DbObjectRef>,
}

impl DbObject for SnapshotSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Schema
    }

    fn as_container(&self) -> Option<&dyn HasChildren> {
        Some(self)
    }
}

impl HasChildren for SnapshotSchema {
    fn children(&self, _progress: &dyn ProgressMonitor) -> CatalogResult<Vec<DbObjectRef>> {
        Ok(self.tables.values().cloned().collect())
    }

    fn child(
        &self,
        _progress: &dyn ProgressMonitor,
        name: &str,
    ) -> CatalogResult<Option<DbObjectRef>> {
        Ok(self.tables.get(name).cloned())
    }
}

#[derive(Debug)]
struct SnapshotTable {
    schema: String,
    name: String,
    comment: Option<String>,
    kind: ObjectKind,
    columns: Vec<DbObjectRef>,
}

impl SnapshotTable {
    fn build(schema: &str, table: TableMetadata, types: &mut TypeInterner) -> DbObjectRef {
        let path = format!("{}.{}", schema, table.name);
        let kind = if table.table_type.is_view() {
            ObjectKind::View
        } else {
            ObjectKind::Table
        };
        let columns = table
            .columns
            .into_iter()
            .map(|column| SnapshotColumn::build(&path, column, types))
            .collect();

        DbObjectRef::new(SnapshotTable {
            schema: schema.to_string(),
            name: table.name,
            comment: table.comment,
            kind,
            columns,
        })
    }
}

impl DbObject for SnapshotTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn description(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    fn as_entity(&self) -> Option<&dyn HasAttributes> {
        Some(self)
    }
}

impl HasAttributes for SnapshotTable {
    fn attributes(&self, _progress: &dyn ProgressMonitor) -> CatalogResult<Vec<DbObjectRef>> {
        Ok(self.columns.clone())
    }

    fn attribute(
        &self,
        _progress: &dyn ProgressMonitor,
        name: &str,
    ) -> CatalogResult<Option<DbObjectRef>> {
        Ok(self.columns.iter().find(|c| c.name() == name).cloned())
    }
}

#[derive(Debug)]
struct SnapshotColumn {
    owner: String,
    column: ColumnMetadata,
    data_type: DbObjectRef,
}

impl SnapshotColumn {
    fn build(owner: &str, column: ColumnMetadata, types: &mut TypeInterner) -> DbObjectRef {
        let data_type = types.intern(&column.data_type);
        DbObjectRef::new(SnapshotColumn {
            owner: owner.to_string(),
            column,
            data_type,
        })
    }
}

impl DbObject for SnapshotColumn {
    fn name(&self) -> &str {
        &self.column.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Column
    }

    fn description(&self) -> Option<&str> {
        self.column.comment.as_deref()
    }

    fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner, self.column.name)
    }

    fn as_typed(&self) -> Option<&dyn TypedObject> {
        Some(self)
    }
}

impl TypedObject for SnapshotColumn {
    fn data_kind(&self) -> DataKind {
        self.column.data_type.data_kind()
    }

    fn type_name(&self) -> String {
        self.column.data_type.type_name()
    }

    fn declared_type(&self) -> Option<DbObjectRef> {
        Some(self.data_type.clone())
    }
}

#[derive(Debug)]
struct SnapshotDataType {
    name: String,
    data_type: DataType,
    component: Option<DbObjectRef>,
    fields: Vec<DbObjectRef>,
}

impl DbObject for SnapshotDataType {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::DataType
    }

    fn as_entity(&self) -> Option<&dyn HasAttributes> {
        match self.data_type {
            DataType::Struct { .. } => Some(self),
            _ => None,
        }
    }

    fn as_typed(&self) -> Option<&dyn TypedObject> {
        Some(self)
    }
}

impl HasAttributes for SnapshotDataType {
    fn attributes(&self, _progress: &dyn ProgressMonitor) -> CatalogResult<Vec<DbObjectRef>> {
        Ok(self.fields.clone())
    }

    fn attribute(
        &self,
        _progress: &dyn ProgressMonitor,
        name: &str,
    ) -> CatalogResult<Option<DbObjectRef>> {
        Ok(self.fields.iter().find(|f| f.name() == name).cloned())
    }
}

impl TypedObject for SnapshotDataType {
    fn data_kind(&self) -> DataKind {
        self.data_type.data_kind()
    }

    fn type_name(&self) -> String {
        self.name.clone()
    }

    fn component_type(&self, _progress: &dyn ProgressMonitor) -> CatalogResult<Option<DbObjectRef>> {
        Ok(self.component.clone())
    }
}

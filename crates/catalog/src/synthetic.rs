// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Synthetic metadata
//!
//! Object graph fabricated from the names a query text references, used when
//! no connection is available. The graph has five levels:
//!
//! ```text
//! data source -> catalogs -> schemas -> tables -> columns
//! ```
//!
//! Every catalog holds every known schema name, every schema every known
//! table name and every table every known column name. Children are built on
//! first access and kept for the node's lifetime, so repeated lookups return
//! the same objects.

use std::sync::{Arc, OnceLock};

use indexmap::{IndexMap, IndexSet};
use unified_sql_lsp_ir::DataKind;

use crate::error::CatalogResult;
use crate::object::{DbObject, DbObjectRef, HasAttributes, HasChildren, ObjectKind, TypedObject};
use crate::progress::ProgressMonitor;

pub const DUMMY_DATA_SOURCE_NAME: &str = "DummyDataSource";
pub const DEFAULT_CATALOG_NAME: &str = "dummyCatalog";
pub const DEFAULT_SCHEMA_NAME: &str = "dummySchema";

/// Level of a synthetic object in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticLevel {
    DataSource,
    Catalog,
    Schema,
    Table,
    Column,
}

impl SyntheticLevel {
    fn child(&self) -> Option<SyntheticLevel> {
        match self {
            SyntheticLevel::DataSource => Some(SyntheticLevel::Catalog),
            SyntheticLevel::Catalog => Some(SyntheticLevel::Schema),
            SyntheticLevel::Schema => Some(SyntheticLevel::Table),
            SyntheticLevel::Table => Some(SyntheticLevel::Column),
            SyntheticLevel::Column => None,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            SyntheticLevel::DataSource => {
                "Dummy data source for purposes of static query semantic analysis"
            }
            SyntheticLevel::Catalog => "Dummy catalog for purposes of static query semantic analysis",
            SyntheticLevel::Schema => "Dummy schema for purposes of static query semantic analysis",
            SyntheticLevel::Table => "Dummy table for purposes of static query semantic analysis",
            SyntheticLevel::Column => "Dummy column for purposes of static query semantic analysis",
        }
    }
}

/// Name sets shared by every node of one synthetic graph
#[derive(Debug, Clone, Default)]
pub struct SyntheticNames {
    pub catalogs: IndexSet<String>,
    pub schemas: IndexSet<String>,
    pub tables: IndexSet<String>,
    pub columns: IndexSet<String>,
}

impl SyntheticNames {
    /// Collect names from referenced table paths and column names
    ///
    /// Table paths are `[catalog, schema, table]` suffixes; the last part is
    /// the table, the one before it the schema and so on. Placeholder
    /// catalog and schema names are used when no path is qualified that deeply.
    pub fn from_references<C, T, P>(columns: C, tables: T) -> Self
    where
        C: IntoIterator<Item = String>,
        T: IntoIterator<Item = P>,
        P: AsRef<[String]>,
    {
        Self::with_placeholders(columns, tables, DEFAULT_CATALOG_NAME, DEFAULT_SCHEMA_NAME)
    }

    /// Same as [`SyntheticNames::from_references`] with custom placeholder names
    pub fn with_placeholders<C, T, P>(
        columns: C,
        tables: T,
        placeholder_catalog: &str,
        placeholder_schema: &str,
    ) -> Self
    where
        C: IntoIterator<Item = String>,
        T: IntoIterator<Item = P>,
        P: AsRef<[String]>,
    {
        let mut names = SyntheticNames {
            columns: columns.into_iter().collect(),
            ..Default::default()
        };

        for path in tables {
            let parts = path.as_ref();
            let mut rev = parts.iter().rev();
            if let Some(table) = rev.next() {
                names.tables.insert(table.clone());
            }
            if let Some(schema) = rev.next() {
                names.schemas.insert(schema.clone());
            }
            if let Some(catalog) = rev.next() {
                names.catalogs.insert(catalog.clone());
            }
        }

        if names.catalogs.is_empty() {
            names.catalogs.insert(placeholder_catalog.to_string());
        }
        if names.schemas.is_empty() {
            names.schemas.insert(placeholder_schema.to_string());
        }
        names
    }
}

/// One node of the synthetic graph
#[derive(Debug)]
pub struct SyntheticObject {
    level: SyntheticLevel,
    name: String,
    container_path: Option<String>,
    position: usize,
    names: Arc<SyntheticNames>,
    children: OnceLock<IndexMap<String, DbObjectRef>>,
}

impl SyntheticObject {
    /// Root of a new graph
    pub fn data_source(names: Arc<SyntheticNames>) -> DbObjectRef {
        DbObjectRef::new(Self::new(
            SyntheticLevel::DataSource,
            DUMMY_DATA_SOURCE_NAME,
            None,
            0,
            names,
        ))
    }

    /// Standalone table of a graph, outside its schema's children
    ///
    /// Used for the nameless default table and for tables the text never
    /// referenced. Its attributes are all known column names.
    pub fn detached_table(
        names: Arc<SyntheticNames>,
        container_path: impl Into<String>,
        name: impl Into<String>,
    ) -> DbObjectRef {
        DbObjectRef::new(Self::new(
            SyntheticLevel::Table,
            name,
            Some(container_path.into()),
            0,
            names,
        ))
    }

    fn new(
        level: SyntheticLevel,
        name: impl Into<String>,
        container_path: Option<String>,
        position: usize,
        names: Arc<SyntheticNames>,
    ) -> Self {
        Self {
            level,
            name: name.into(),
            container_path,
            position,
            names,
            children: OnceLock::new(),
        }
    }

    pub fn level(&self) -> SyntheticLevel {
        self.level
    }

    /// Ordinal position among its siblings
    pub fn position(&self) -> usize {
        self.position
    }

    fn child_names(&self) -> Option<&IndexSet<String>> {
        match self.level {
            SyntheticLevel::DataSource => Some(&self.names.catalogs),
            SyntheticLevel::Catalog => Some(&self.names.schemas),
            SyntheticLevel::Schema => Some(&self.names.tables),
            SyntheticLevel::Table => Some(&self.names.columns),
            SyntheticLevel::Column => None,
        }
    }

    fn children_map(&self) -> &IndexMap<String, DbObjectRef> {
        self.children.get_or_init(|| {
            let (Some(level), Some(names)) = (self.level.child(), self.child_names()) else {
                return IndexMap::new();
            };
            let path = match self.level {
                SyntheticLevel::DataSource => None,
                _ => Some(self.qualified_name()),
            };
            names
                .iter()
                .enumerate()
                .map(|(position, name)| {
                    let child = Self::new(level, name.clone(), path.clone(), position, self.names.clone());
                    (name.clone(), DbObjectRef::new(child))
                })
                .collect()
        })
    }
}

impl DbObject for SyntheticObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        match self.level {
            SyntheticLevel::DataSource => ObjectKind::DataSource,
            SyntheticLevel::Catalog => ObjectKind::Catalog,
            SyntheticLevel::Schema => ObjectKind::Schema,
            SyntheticLevel::Table => ObjectKind::Table,
            SyntheticLevel::Column => ObjectKind::Column,
        }
    }

    fn description(&self) -> Option<&str> {
        Some(self.level.description())
    }

    fn qualified_name(&self) -> String {
        match &self.container_path {
            Some(path) if self.name.is_empty() => path.clone(),
            Some(path) => format!("{}.{}", path, self.name),
            None => self.name.clone(),
        }
    }

    fn is_synthetic(&self) -> bool {
        true
    }

    fn as_container(&self) -> Option<&dyn HasChildren> {
        match self.level {
            SyntheticLevel::Column => None,
            _ => Some(self),
        }
    }

    fn as_entity(&self) -> Option<&dyn HasAttributes> {
        match self.level {
            SyntheticLevel::Table => Some(self),
            _ => None,
        }
    }

    fn as_typed(&self) -> Option<&dyn TypedObject> {
        match self.level {
            SyntheticLevel::Table | SyntheticLevel::Column => Some(self),
            _ => None,
        }
    }
}

impl HasChildren for SyntheticObject {
    fn children(&self, _progress: &dyn ProgressMonitor) -> CatalogResult<Vec<DbObjectRef>> {
        Ok(self.children_map().values().cloned().collect())
    }

    fn child(
        &self,
        _progress: &dyn ProgressMonitor,
        name: &str,
    ) -> CatalogResult<Option<DbObjectRef>> {
        Ok(self.children_map().get(name).cloned())
    }
}

impl HasAttributes for SyntheticObject {
    fn attributes(&self, progress: &dyn ProgressMonitor) -> CatalogResult<Vec<DbObjectRef>> {
        self.children(progress)
    }

    fn attribute(
        &self,
        progress: &dyn ProgressMonitor,
        name: &str,
    ) -> CatalogResult<Option<DbObjectRef>> {
        self.child(progress, name)
    }
}

impl TypedObject for SyntheticObject {
    fn data_kind(&self) -> DataKind {
        DataKind::String
    }

    fn type_name(&self) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VoidProgressMonitor;

    fn names() -> Arc<SyntheticNames> {
        Arc::new(SyntheticNames::from_references(
            vec!["id".to_string(), "name".to_string()],
            vec![vec!["orders".to_string()], vec!["customers".to_string()]],
        ))
    }

    fn child(object: &DbObjectRef, name: &str) -> DbObjectRef {
        object
            .as_container()
            .unwrap()
            .child(&VoidProgressMonitor, name)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_placeholder_names() {
        let names = names();
        assert_eq!(names.catalogs.iter().next().map(String::as_str), Some("dummyCatalog"));
        assert_eq!(names.schemas.iter().next().map(String::as_str), Some("dummySchema"));
    }

    #[test]
    fn test_qualified_references_seed_levels() {
        let names = SyntheticNames::from_references(
            Vec::<String>::new(),
            vec![
                vec!["db".to_string(), "sales".to_string(), "orders".to_string()],
                vec!["hr".to_string(), "people".to_string()],
            ],
        );
        assert!(names.catalogs.contains("db"));
        assert!(names.schemas.contains("sales"));
        assert!(names.schemas.contains("hr"));
        assert_eq!(names.tables.len(), 2);
    }

    #[test]
    fn test_graph_levels() {
        let ds = SyntheticObject::data_source(names());
        assert_eq!(ds.kind(), ObjectKind::DataSource);
        assert!(ds.is_synthetic());

        let catalog = child(&ds, "dummyCatalog");
        let schema = child(&catalog, "dummySchema");
        let table = child(&schema, "orders");
        assert_eq!(table.kind(), ObjectKind::Table);
        assert_eq!(table.qualified_name(), "dummyCatalog.dummySchema.orders");

        let column = table
            .as_entity()
            .unwrap()
            .attribute(&VoidProgressMonitor, "id")
            .unwrap()
            .unwrap();
        assert_eq!(column.kind(), ObjectKind::Column);
        assert!(column.as_container().is_none());
        assert!(column.as_typed().is_some());
    }

    #[test]
    fn test_children_built_once() {
        let ds = SyntheticObject::data_source(names());
        let a = child(&ds, "dummyCatalog");
        let b = child(&ds, "dummyCatalog");
        assert_eq!(a, b);

        let first = a.as_container().unwrap().children(&VoidProgressMonitor).unwrap();
        let second = a.as_container().unwrap().children(&VoidProgressMonitor).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_children_keep_reference_order() {
        let ds = SyntheticObject::data_source(names());
        let schema = child(&child(&ds, "dummyCatalog"), "dummySchema");
        let tables: Vec<String> = schema
            .as_container()
            .unwrap()
            .children(&VoidProgressMonitor)
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(tables, vec!["orders", "customers"]);
    }

    #[test]
    fn test_detached_table_has_all_columns() {
        let table = SyntheticObject::detached_table(names(), "dummyCatalog.dummySchema", "");
        let attrs = table.as_entity().unwrap().attributes(&VoidProgressMonitor).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(table.qualified_name(), "dummyCatalog.dummySchema");
        assert_eq!(
            table.description(),
            Some("Dummy table for purposes of static query semantic analysis")
        );
    }
}

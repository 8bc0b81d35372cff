// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Synthetic root context
//!
//! [`DummyDataSourceContext`] lets analysis run without a connection. It
//! answers table lookups from a [`SyntheticObject`] graph built from the
//! identifiers the query text references, and never reports a table as
//! missing: a path no referenced name covers gets an ad-hoc synthetic table,
//! memoized so the same path always yields the same object.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};
use unified_sql_lsp_catalog::{
    DbObjectRef, ObjectKind, ProgressMonitor, SyntheticNames, SyntheticObject, check_canceled,
};
use unified_sql_lsp_ir::Dialect;

use crate::config::ResolutionPolicy;
use crate::context::DataContext;
use crate::error::SemanticResult;

pub struct DummyDataSourceContext {
    dialect: Dialect,
    policy: ResolutionPolicy,
    default_catalog_name: String,
    default_schema_name: String,
    names: Arc<SyntheticNames>,
    data_source: DbObjectRef,
    default_table: DbObjectRef,
    ad_hoc_tables: Mutex<HashMap<Vec<String>, DbObjectRef>>,
}

impl DummyDataSourceContext {
    /// Root seeded with the column names and table paths a query references
    ///
    /// # Examples
    ///
    /// ```
    /// use unified_sql_lsp_catalog::VoidProgressMonitor;
    /// use unified_sql_lsp_ir::Dialect;
    /// use unified_sql_lsp_semantic::DummyDataSourceContext;
    ///
    /// let root = DummyDataSourceContext::new(
    ///     Dialect::PostgreSQL,
    ///     vec!["id".to_string()],
    ///     vec![vec!["orders".to_string()]],
    /// );
    /// let table = root
    ///     .find_real_table(&VoidProgressMonitor, &["orders".to_string()])
    ///     .unwrap();
    /// assert_eq!(table.name(), "orders");
    /// ```
    pub fn new<C, T, P>(dialect: Dialect, known_columns: C, known_tables: T) -> Self
    where
        C: IntoIterator<Item = String>,
        T: IntoIterator<Item = P>,
        P: AsRef<[String]>,
    {
        let (columns, tables) = Self::unquote_references(dialect, known_columns, known_tables);
        Self::from_names(dialect, SyntheticNames::from_references(columns, tables))
    }

    /// Same as [`DummyDataSourceContext::new`] with custom placeholder names
    pub fn with_placeholders<C, T, P>(
        dialect: Dialect,
        known_columns: C,
        known_tables: T,
        placeholder_catalog: &str,
        placeholder_schema: &str,
    ) -> Self
    where
        C: IntoIterator<Item = String>,
        T: IntoIterator<Item = P>,
        P: AsRef<[String]>,
    {
        let (columns, tables) = Self::unquote_references(dialect, known_columns, known_tables);
        Self::from_names(
            dialect,
            SyntheticNames::with_placeholders(columns, tables, placeholder_catalog, placeholder_schema),
        )
    }

    fn unquote_references<C, T, P>(
        dialect: Dialect,
        known_columns: C,
        known_tables: T,
    ) -> (Vec<String>, Vec<Vec<String>>)
    where
        C: IntoIterator<Item = String>,
        T: IntoIterator<Item = P>,
        P: AsRef<[String]>,
    {
        let columns = known_columns
            .into_iter()
            .map(|c| dialect.unquoted_identifier(&c))
            .collect();
        let tables = known_tables
            .into_iter()
            .map(|path| {
                path.as_ref()
                    .iter()
                    .map(|part| dialect.unquoted_identifier(part))
                    .collect()
            })
            .collect();
        (columns, tables)
    }

    fn from_names(dialect: Dialect, names: SyntheticNames) -> Self {
        let default_catalog_name = names.catalogs.first().cloned().unwrap_or_default();
        let default_schema_name = names.schemas.first().cloned().unwrap_or_default();
        let names = Arc::new(names);
        let data_source = SyntheticObject::data_source(names.clone());
        let default_table = SyntheticObject::detached_table(
            names.clone(),
            format!("{default_catalog_name}.{default_schema_name}"),
            "",
        );
        debug!(
            tables = names.tables.len(),
            columns = names.columns.len(),
            "synthetic data source prepared"
        );

        Self {
            dialect,
            policy: ResolutionPolicy::default(),
            default_catalog_name,
            default_schema_name,
            names,
            data_source,
            default_table,
            ad_hoc_tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    pub fn names(&self) -> &SyntheticNames {
        &self.names
    }

    pub fn data_source(&self) -> &DbObjectRef {
        &self.data_source
    }

    /// Nameless table whose attributes are every known column
    pub fn default_table(&self) -> &DbObjectRef {
        &self.default_table
    }

    pub fn default_catalog_name(&self) -> &str {
        &self.default_catalog_name
    }

    pub fn default_schema_name(&self) -> &str {
        &self.default_schema_name
    }

    /// Synthetic table at `path`; never missing
    ///
    /// Missing catalog and schema parts default to the placeholders. An
    /// empty path yields the default table.
    pub fn find_real_table(
        &self,
        progress: &dyn ProgressMonitor,
        path: &[String],
    ) -> SemanticResult<DbObjectRef> {
        check_canceled(progress)?;
        let parts: Vec<String> = path
            .iter()
            .map(|part| self.dialect.unquoted_identifier(part))
            .collect();
        let Some((table_name, qualifiers)) = parts.split_last() else {
            return Ok(self.default_table.clone());
        };

        let schema_name = qualifiers.last().unwrap_or(&self.default_schema_name);
        let catalog_name = match qualifiers.len() {
            0 | 1 => &self.default_catalog_name,
            n => &qualifiers[n - 2],
        };

        if let Some(table) =
            self.find_in_graph(progress, &[catalog_name, schema_name, table_name])?
        {
            trace!(table = %table_name, "synthetic table found");
            return Ok(table);
        }

        let key = vec![catalog_name.clone(), schema_name.clone(), table_name.clone()];
        let mut ad_hoc = self
            .ad_hoc_tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let table = ad_hoc.entry(key).or_insert_with(|| {
            debug!(table = %table_name, "fabricating synthetic table for unreferenced name");
            SyntheticObject::detached_table(
                self.names.clone(),
                format!("{catalog_name}.{schema_name}"),
                table_name.clone(),
            )
        });
        Ok(table.clone())
    }

    /// Number of tables fabricated for names outside the known list
    pub fn ad_hoc_table_count(&self) -> usize {
        self.ad_hoc_tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn find_in_graph(
        &self,
        progress: &dyn ProgressMonitor,
        path: &[&String],
    ) -> SemanticResult<Option<DbObjectRef>> {
        let mut current = self.data_source.clone();
        for part in path {
            let Some(container) = current.as_container() else {
                return Ok(None);
            };
            match container.child(progress, part)? {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Synthetic object at `path`; only tables and views are fabricated
    pub fn find_real_object(
        &self,
        progress: &dyn ProgressMonitor,
        kind: ObjectKind,
        path: &[String],
    ) -> SemanticResult<Option<DbObjectRef>> {
        if !kind.is_table_like() {
            check_canceled(progress)?;
            return Ok(None);
        }
        self.find_real_table(progress, path).map(Some)
    }

    pub fn into_context(self) -> DataContext {
        DataContext::from_dummy(self)
    }
}

impl fmt::Debug for DummyDataSourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyDataSourceContext")
            .field("dialect", &self.dialect)
            .field("catalog", &self.default_catalog_name)
            .field("schema", &self.default_schema_name)
            .field("tables", &self.names.tables)
            .field("columns", &self.names.columns)
            .finish()
    }
}

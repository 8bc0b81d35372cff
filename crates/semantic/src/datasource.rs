// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! Root context backed by real metadata.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;
use unified_sql_lsp_catalog::{DbObjectRef, MetadataProvider, ObjectKind, ProgressMonitor};
use unified_sql_lsp_ir::Dialect;

use crate::columns::PseudoColumn;
use crate::config::ResolutionPolicy;
use crate::context::DataContext;
use crate::error::SemanticResult;
use crate::source::RowsSourceRef;

/// Root of a context chain answering lookups from a [`MetadataProvider`]
pub struct DataSourceContext {
    provider: Arc<dyn MetadataProvider>,
    dialect: Dialect,
    policy: ResolutionPolicy,
    globals: IndexMap<String, PseudoColumn>,
}

impl DataSourceContext {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        let dialect = provider.dialect();
        let globals = dialect
            .global_variables()
            .iter()
            .map(|attr| {
                let column = PseudoColumn::global(attr, dialect);
                (column.name().to_string(), column)
            })
            .collect();
        Self {
            provider,
            dialect,
            policy: ResolutionPolicy::default(),
            globals,
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

    pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
        &self.provider
    }

    /// Session variables of the dialect, as pseudo columns
    pub fn global_pseudo_columns(&self) -> impl Iterator<Item = &PseudoColumn> {
        self.globals.values()
    }

    pub(crate) fn find_global_pseudo_column(&self, name: &str) -> Option<&PseudoColumn> {
        self.dialect
            .find_by_identifier(name, self.globals.values(), |c| c.name())
    }

    /// System columns rows of `source` carry; only table sources have them
    pub fn rowset_pseudo_columns(&self, source: &RowsSourceRef) -> Vec<PseudoColumn> {
        if !source.is_table() {
            return Vec::new();
        }
        self.dialect
            .rowset_pseudo_attributes()
            .iter()
            .map(|attr| PseudoColumn::rowset(attr, source.clone()))
            .collect()
    }

    pub fn find_real_table(
        &self,
        progress: &dyn ProgressMonitor,
        path: &[String],
    ) -> SemanticResult<Option<DbObjectRef>> {
        let found = self.lookup(progress, path)?;
        Ok(found.filter(|object| object.kind().is_table_like()))
    }

    /// Object at `path`, if it is of `kind`
    ///
    /// Tables and views are interchangeable here.
    pub fn find_real_object(
        &self,
        progress: &dyn ProgressMonitor,
        kind: ObjectKind,
        path: &[String],
    ) -> SemanticResult<Option<DbObjectRef>> {
        let found = self.lookup(progress, path)?;
        Ok(found.filter(|object| {
            object.kind() == kind || (kind.is_table_like() && object.kind().is_table_like())
        }))
    }

    fn lookup(
        &self,
        progress: &dyn ProgressMonitor,
        path: &[String],
    ) -> SemanticResult<Option<DbObjectRef>> {
        if path.is_empty() {
            return Ok(None);
        }
        let found = self
            .provider
            .find_by_qualified_name(progress, None, path, false)?;
        if found.is_none() {
            debug!(path = %path.join("."), "object not found in metadata");
        }
        Ok(found)
    }

    pub fn into_context(self) -> DataContext {
        DataContext::from_data_source(self)
    }
}

impl fmt::Debug for DataSourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceContext")
            .field("dialect", &self.dialect)
            .field("policy", &self.policy)
            .field("globals", &self.globals.len())
            .finish()
    }
}

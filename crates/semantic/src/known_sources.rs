// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Source resolution records
//!
//! [`SourceResolutionResult`] describes what a name resolved to;
//! [`KnownSourcesInfo`] aggregates every source a context chain touched.

use indexmap::{IndexMap, IndexSet};
use unified_sql_lsp_catalog::DbObjectRef;

use crate::source::RowsSourceRef;
use crate::symbol::Symbol;

/// Outcome of resolving a name to a rows source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResolutionResult {
    pub source: RowsSourceRef,
    pub table: Option<DbObjectRef>,
    pub alias: Option<Symbol>,
    pub is_cte_subquery: bool,
}

impl SourceResolutionResult {
    /// Source found through the catalog table it is bound to
    pub fn for_real_table(source: RowsSourceRef, table: DbObjectRef) -> Self {
        let is_cte_subquery = source.is_cte_subquery();
        Self {
            source,
            table: Some(table),
            alias: None,
            is_cte_subquery,
        }
    }

    /// Source found through its alias
    pub fn for_alias(source: RowsSourceRef, alias: Symbol) -> Self {
        let is_cte_subquery = source.is_cte_subquery();
        Self {
            source,
            table: None,
            alias: Some(alias),
            is_cte_subquery,
        }
    }

    fn empty(source: RowsSourceRef) -> Self {
        let is_cte_subquery = source.is_cte_subquery();
        Self {
            source,
            table: None,
            alias: None,
            is_cte_subquery,
        }
    }
}

/// Every source reachable from one context, with its bindings merged
#[derive(Debug, Clone, Default)]
pub struct KnownSourcesInfo {
    sources: IndexMap<RowsSourceRef, SourceResolutionResult>,
    referenced_tables: IndexSet<DbObjectRef>,
    aliases_in_use: IndexSet<String>,
}

impl KnownSourcesInfo {
    pub fn sources(&self) -> &IndexMap<RowsSourceRef, SourceResolutionResult> {
        &self.sources
    }

    pub fn referenced_tables(&self) -> &IndexSet<DbObjectRef> {
        &self.referenced_tables
    }

    pub fn aliases_in_use(&self) -> &IndexSet<String> {
        &self.aliases_in_use
    }

    /// Bindings recorded for a source, after unwrapping correlations
    pub fn get(&self, source: &RowsSourceRef) -> Option<&SourceResolutionResult> {
        self.sources.get(&source.unwrap_correlation())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub(crate) fn register_table_reference(&mut self, source: &RowsSourceRef, table: &DbObjectRef) {
        let key = source.unwrap_correlation();
        let entry = self
            .sources
            .entry(key.clone())
            .or_insert_with(|| SourceResolutionResult::empty(key));
        if entry.table.is_none() {
            entry.table = Some(table.clone());
        }
        self.referenced_tables.insert(table.clone());
    }

    pub(crate) fn register_alias(&mut self, source: &RowsSourceRef, alias: &Symbol) {
        let key = source.unwrap_correlation();
        let entry = self
            .sources
            .entry(key.clone())
            .or_insert_with(|| SourceResolutionResult::empty(key));
        if entry.alias.is_none() {
            entry.alias = Some(alias.clone());
        }
        self.aliases_in_use.insert(alias.name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unified_sql_lsp_catalog::{DbObject, ObjectKind};

    #[derive(Debug)]
    struct Table;

    impl DbObject for Table {
        fn name(&self) -> &str {
            "users"
        }

        fn kind(&self) -> ObjectKind {
            ObjectKind::Table
        }
    }

    #[test]
    fn test_table_then_alias_merge_into_one_entry() {
        let mut info = KnownSourcesInfo::default();
        let source = RowsSourceRef::table(["users"]);
        let aliased = RowsSourceRef::correlated(source.clone(), "u", vec![]);
        let table = DbObjectRef::new(Table);

        info.register_table_reference(&source, &table);
        info.register_alias(&aliased, &Symbol::new("u"));

        assert_eq!(info.len(), 1);
        let entry = info.get(&source).unwrap();
        assert_eq!(entry.table.as_ref(), Some(&table));
        assert_eq!(entry.alias.as_ref().map(|a| a.name.as_str()), Some("u"));
        assert!(info.aliases_in_use().contains("u"));
        assert!(info.referenced_tables().contains(&table));
    }

    #[test]
    fn test_cte_flag() {
        let result = SourceResolutionResult::for_alias(RowsSourceRef::cte("c"), Symbol::new("c"));
        assert!(result.is_cte_subquery);
        assert!(result.table.is_none());
    }
}

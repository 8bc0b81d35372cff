// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Metadata provider that fails on demand

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use unified_sql_lsp_catalog::{
    CatalogError, CatalogResult, DbObjectRef, MetadataProvider, ProgressMonitor,
};
use unified_sql_lsp_ir::Dialect;

/// Provider returning an access failure for selected lookups
///
/// Without an inner provider every lookup fails. With one, only lookups
/// whose last path part is listed fail; the rest are delegated.
pub struct FailingProvider {
    dialect: Dialect,
    error: CatalogError,
    inner: Option<Arc<dyn MetadataProvider>>,
    failing_names: HashSet<String>,
    calls: AtomicUsize,
}

impl FailingProvider {
    /// Fail every lookup with `error`
    pub fn new(dialect: Dialect, error: CatalogError) -> Self {
        Self {
            dialect,
            error,
            inner: None,
            failing_names: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail lookups of `names`, delegating everything else to `inner`
    pub fn for_names<I, S>(inner: Arc<dyn MetadataProvider>, names: I, error: CatalogError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dialect: inner.dialect(),
            error,
            inner: Some(inner),
            failing_names: names.into_iter().map(Into::into).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn should_fail(&self, path: &[String]) -> bool {
        match &self.inner {
            None => true,
            Some(_) => path
                .last()
                .is_some_and(|name| self.failing_names.contains(name)),
        }
    }
}

impl MetadataProvider for FailingProvider {
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
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.should_fail(path) {
            return Err(self.error.clone());
        }
        match &self.inner {
            Some(inner) => inner.find_by_qualified_name(progress, container, path, case_sensitive),
            None => Ok(None),
        }
    }
}

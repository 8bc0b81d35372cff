// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata provider
//!
//! Synchronous lookup capability consulted by the root of a data context
//! chain. Analysis never awaits I/O: live sources are fetched up front into a
//! [`CatalogSnapshot`](crate::CatalogSnapshot) or served from a cache by the
//! implementor.

use unified_sql_lsp_ir::Dialect;

use crate::error::CatalogResult;
use crate::object::DbObjectRef;
use crate::progress::ProgressMonitor;

pub trait MetadataProvider: Send + Sync {
    /// Dialect whose identifier rules apply to every lookup
    fn dialect(&self) -> Dialect;

    /// Find an object by a possibly qualified name path
    ///
    /// # Arguments
    ///
    /// * `container` - object to search under; `None` searches from the top
    /// * `path` - name parts as written in the query, quotes included
    /// * `case_sensitive` - compare unquoted names exactly instead of applying
    ///   the dialect's matching tiers
    ///
    /// # Returns
    ///
    /// `Ok(None)` when nothing matches; `Err` only on access failure.
    fn find_by_qualified_name(
        &self,
        progress: &dyn ProgressMonitor,
        container: Option<&DbObjectRef>,
        path: &[String],
        case_sensitive: bool,
    ) -> CatalogResult<Option<DbObjectRef>>;
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Rows sources
//!
//! A rows source is the syntax-model node that produces rows: a table
//! reference, subquery, CTE, VALUES list, or a correlation wrapping one of
//! those under an alias. The engine only needs their identity and, once the
//! tree walker has propagated a context through them, their result context.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, Weak};

use crate::context::{ContextNode, DataContext};

/// Shape of a rows source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowsSourceKind {
    /// Table reference by name path, quotes included
    Table { name: Vec<String> },
    Subquery,
    /// Common table expression
    Cte { name: String },
    Values,
    /// Alias over another source, optionally renaming its columns
    Correlated {
        inner: RowsSourceRef,
        alias: String,
        column_names: Vec<String>,
    },
}

#[derive(Debug)]
pub struct RowsSource {
    kind: RowsSourceKind,
    result: OnceLock<Weak<ContextNode>>,
}

/// Shared handle to a rows source, compared by identity
#[derive(Clone)]
pub struct RowsSourceRef(Arc<RowsSource>);

impl RowsSourceRef {
    pub fn new(kind: RowsSourceKind) -> Self {
        Self(Arc::new(RowsSource {
            kind,
            result: OnceLock::new(),
        }))
    }

    pub fn table<I, S>(name: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(RowsSourceKind::Table {
            name: name.into_iter().map(Into::into).collect(),
        })
    }

    pub fn subquery() -> Self {
        Self::new(RowsSourceKind::Subquery)
    }

    pub fn cte(name: impl Into<String>) -> Self {
        Self::new(RowsSourceKind::Cte { name: name.into() })
    }

    pub fn values() -> Self {
        Self::new(RowsSourceKind::Values)
    }

    pub fn correlated(inner: RowsSourceRef, alias: impl Into<String>, column_names: Vec<String>) -> Self {
        Self::new(RowsSourceKind::Correlated {
            inner,
            alias: alias.into(),
            column_names,
        })
    }

    pub fn kind(&self) -> &RowsSourceKind {
        &self.0.kind
    }

    /// Identity used when registering known sources
    ///
    /// A correlation that renames no columns is transparent and unwraps to
    /// the source it aliases.
    pub fn unwrap_correlation(&self) -> RowsSourceRef {
        let mut current = self.clone();
        loop {
            let next = match current.kind() {
                RowsSourceKind::Correlated {
                    inner,
                    column_names,
                    ..
                } if column_names.is_empty() => inner.clone(),
                _ => return current,
            };
            current = next;
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self.unwrap_correlation().kind(), RowsSourceKind::Table { .. })
    }

    pub fn is_cte_subquery(&self) -> bool {
        matches!(self.unwrap_correlation().kind(), RowsSourceKind::Cte { .. })
    }

    /// Record the context describing this source's rows
    ///
    /// Only the first call has an effect; returns whether it was this one.
    /// The source does not keep the context alive, the syntax model owning
    /// both does.
    pub fn attach_result_context(&self, context: &DataContext) -> bool {
        self.0.result.set(context.downgrade()).is_ok()
    }

    pub fn result_context(&self) -> Option<DataContext> {
        self.0.result.get().and_then(DataContext::upgrade)
    }

    /// Short label for diagnostics and logs
    pub fn display_name(&self) -> String {
        match self.kind() {
            RowsSourceKind::Table { name } => name.join("."),
            RowsSourceKind::Subquery => "(subquery)".to_string(),
            RowsSourceKind::Cte { name } => name.clone(),
            RowsSourceKind::Values => "(values)".to_string(),
            RowsSourceKind::Correlated { alias, .. } => alias.clone(),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for RowsSourceRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for RowsSourceRef {}

impl Hash for RowsSourceRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for RowsSourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowsSource({})", self.display_name())
    }
}

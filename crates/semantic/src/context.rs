// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Data context chain
//!
//! A [`DataContext`] describes what is visible at one point of a query: the
//! current result tuple, the sources that can be referenced by name, and the
//! catalog behind them. Contexts are immutable. Each combinator wraps the
//! receiver in a new node, so a chain is built bottom-up while walking the
//! syntax tree:
//!
//! ```text
//! root -> real table t -> alias a --+
//!                                   +-> combine -> result tuple
//! root -> real table u -> alias b --+
//! ```
//!
//! Nodes share their parents, so a chain that is combined with another one
//! forms a DAG over a common root. Nothing is cached: every query walks the
//! structure again.
//!
//! Names that cannot be found are reported as `Ok(None)`. Only metadata
//! access failures, cancellation and ambiguity under
//! [`ResolutionPolicy::Strict`] are errors.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use tracing::{debug, instrument, trace};
use unified_sql_lsp_catalog::{DbObjectRef, ObjectKind, ProgressMonitor, check_canceled};
use unified_sql_lsp_ir::Dialect;

use crate::columns::{PseudoColumn, ResultColumn, reindex};
use crate::config::ResolutionPolicy;
use crate::datasource::DataSourceContext;
use crate::dummy::DummyDataSourceContext;
use crate::error::{SemanticError, SemanticResult};
use crate::known_sources::{KnownSourcesInfo, SourceResolutionResult};
use crate::source::RowsSourceRef;
use crate::symbol::Symbol;

pub(crate) struct ContextNode {
    dialect: Dialect,
    policy: ResolutionPolicy,
    synthetic: bool,
    variant: ContextVariant,
}

enum ContextVariant {
    DataSource(DataSourceContext),
    Dummy(DummyDataSourceContext),
    RealTable {
        parent: DataContext,
        table: DbObjectRef,
        source: RowsSourceRef,
    },
    TableAlias {
        parent: DataContext,
        alias: Symbol,
        source: RowsSourceRef,
    },
    Combined {
        left: DataContext,
        right: DataContext,
        columns: Vec<ResultColumn>,
        pseudo_columns: Vec<PseudoColumn>,
    },
    ResultTuple {
        parent: DataContext,
        source: RowsSourceRef,
        columns: Vec<ResultColumn>,
        pseudo_columns: Vec<PseudoColumn>,
    },
    HiddenSources {
        parent: DataContext,
    },
    Unresolved {
        parent: DataContext,
    },
}

/// Shared handle to one node of a context chain, compared by identity
#[derive(Clone)]
pub struct DataContext(Arc<ContextNode>);

impl DataContext {
    /// Chain root backed by real metadata
    pub fn from_data_source(root: DataSourceContext) -> Self {
        Self(Arc::new(ContextNode {
            dialect: root.dialect(),
            policy: root.policy(),
            synthetic: false,
            variant: ContextVariant::DataSource(root),
        }))
    }

    /// Chain root backed by synthetic metadata
    pub fn from_dummy(root: DummyDataSourceContext) -> Self {
        Self(Arc::new(ContextNode {
            dialect: root.dialect(),
            policy: root.policy(),
            synthetic: true,
            variant: ContextVariant::Dummy(root),
        }))
    }

    fn wrap(&self, variant: ContextVariant) -> Self {
        Self(Arc::new(ContextNode {
            dialect: self.0.dialect,
            policy: self.0.policy,
            synthetic: self.0.synthetic,
            variant,
        }))
    }

    pub(crate) fn downgrade(&self) -> Weak<ContextNode> {
        Arc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(node: &Weak<ContextNode>) -> Option<Self> {
        node.upgrade().map(Self)
    }

    pub fn dialect(&self) -> Dialect {
        self.0.dialect
    }

    pub fn resolution_policy(&self) -> ResolutionPolicy {
        self.0.policy
    }

    /// Whether the chain is rooted at synthetic metadata
    pub fn is_synthetic(&self) -> bool {
        self.0.synthetic
    }

    /// Wrapped context; the left side for a combined context
    pub fn parent(&self) -> Option<&DataContext> {
        match &self.0.variant {
            ContextVariant::DataSource(_) | ContextVariant::Dummy(_) => None,
            ContextVariant::Combined { left, .. } => Some(left),
            ContextVariant::RealTable { parent, .. }
            | ContextVariant::TableAlias { parent, .. }
            | ContextVariant::ResultTuple { parent, .. }
            | ContextVariant::HiddenSources { parent }
            | ContextVariant::Unresolved { parent } => Some(parent),
        }
    }

    /// Root of the chain, following left sides of combined contexts
    pub fn root(&self) -> DataContext {
        let mut current = self.clone();
        while let Some(parent) = current.parent().cloned() {
            current = parent;
        }
        current
    }

    pub fn as_data_source(&self) -> Option<&DataSourceContext> {
        match &self.0.variant {
            ContextVariant::DataSource(root) => Some(root),
            _ => None,
        }
    }

    pub fn as_dummy(&self) -> Option<&DummyDataSourceContext> {
        match &self.0.variant {
            ContextVariant::Dummy(root) => Some(root),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // Queries

    /// Columns of the nearest enclosing result tuple
    pub fn columns_list(&self) -> &[ResultColumn] {
        match &self.0.variant {
            ContextVariant::DataSource(_) | ContextVariant::Dummy(_) => &[],
            ContextVariant::Combined { columns, .. } | ContextVariant::ResultTuple { columns, .. } => {
                columns
            }
            ContextVariant::RealTable { parent, .. }
            | ContextVariant::TableAlias { parent, .. }
            | ContextVariant::HiddenSources { parent }
            | ContextVariant::Unresolved { parent } => parent.columns_list(),
        }
    }

    /// Source projected by the nearest enclosing result tuple
    ///
    /// `None` at the root and for a combined tuple, which projects several
    /// sources at once.
    pub fn result_source(&self) -> Option<&RowsSourceRef> {
        match &self.0.variant {
            ContextVariant::DataSource(_)
            | ContextVariant::Dummy(_)
            | ContextVariant::Combined { .. } => None,
            ContextVariant::ResultTuple { source, .. } => Some(source),
            ContextVariant::RealTable { parent, .. }
            | ContextVariant::TableAlias { parent, .. }
            | ContextVariant::HiddenSources { parent }
            | ContextVariant::Unresolved { parent } => parent.result_source(),
        }
    }

    /// Pseudo columns of the nearest enclosing result tuple
    pub fn pseudo_columns_list(&self) -> &[PseudoColumn] {
        match &self.0.variant {
            ContextVariant::DataSource(_) | ContextVariant::Dummy(_) => &[],
            ContextVariant::Combined { pseudo_columns, .. }
            | ContextVariant::ResultTuple { pseudo_columns, .. } => pseudo_columns,
            ContextVariant::RealTable { parent, .. }
            | ContextVariant::TableAlias { parent, .. }
            | ContextVariant::HiddenSources { parent }
            | ContextVariant::Unresolved { parent } => parent.pseudo_columns_list(),
        }
    }

    pub fn has_unresolved_source(&self) -> bool {
        match &self.0.variant {
            ContextVariant::DataSource(_) | ContextVariant::Dummy(_) => false,
            ContextVariant::Unresolved { .. } => true,
            ContextVariant::HiddenSources { .. } => false,
            ContextVariant::Combined { left, right, .. } => {
                left.has_unresolved_source() || right.has_unresolved_source()
            }
            ContextVariant::RealTable { parent, .. }
            | ContextVariant::TableAlias { parent, .. }
            | ContextVariant::ResultTuple { parent, .. } => parent.has_unresolved_source(),
        }
    }

    /// Column of the current result tuple named `name`
    pub fn resolve_column(
        &self,
        progress: &dyn ProgressMonitor,
        name: &str,
    ) -> SemanticResult<Option<ResultColumn>> {
        check_canceled(progress)?;
        let matches = self
            .dialect()
            .filter_by_identifier(name, self.columns_list(), |c| c.name());
        if matches.len() > 1 && self.resolution_policy() == ResolutionPolicy::Strict {
            let origins = matches.iter().map(|c| c.source.display_name()).collect();
            return Err(SemanticError::AmbiguousColumn(name.to_string(), origins));
        }
        if matches.is_empty() {
            trace!(column = name, "column not found");
        }
        Ok(matches.first().map(|c| (*c).clone()))
    }

    /// Pseudo column of the current result tuple named `name`
    pub fn resolve_pseudo_column(
        &self,
        progress: &dyn ProgressMonitor,
        name: &str,
    ) -> SemanticResult<Option<PseudoColumn>> {
        check_canceled(progress)?;
        let matches =
            self.dialect()
                .filter_by_identifier(name, self.pseudo_columns_list(), |c| c.name());
        if matches.len() > 1 && self.resolution_policy() == ResolutionPolicy::Strict {
            let origins = matches
                .iter()
                .map(|c| {
                    c.source
                        .as_ref()
                        .map(|s| s.display_name())
                        .unwrap_or_default()
                })
                .collect();
            return Err(SemanticError::AmbiguousColumn(name.to_string(), origins));
        }
        Ok(matches.first().map(|c| (*c).clone()))
    }

    /// Session variable named `name`, answered by a real metadata root
    pub fn resolve_global_pseudo_column(
        &self,
        progress: &dyn ProgressMonitor,
        name: &str,
    ) -> SemanticResult<Option<PseudoColumn>> {
        check_canceled(progress)?;
        let root = self.root();
        Ok(root
            .as_data_source()
            .and_then(|ds| ds.find_global_pseudo_column(name))
            .cloned())
    }

    /// Table or view at `path`
    pub fn find_real_table(
        &self,
        progress: &dyn ProgressMonitor,
        path: &[String],
    ) -> SemanticResult<Option<DbObjectRef>> {
        check_canceled(progress)?;
        match &self.0.variant {
            ContextVariant::DataSource(root) => root.find_real_table(progress, path),
            ContextVariant::Dummy(root) => root.find_real_table(progress, path).map(Some),
            ContextVariant::Combined { left, right, .. } => self.first_of_both(
                || left.find_real_table(progress, path),
                || right.find_real_table(progress, path),
                |a, b| a == b,
                |found| {
                    SemanticError::AmbiguousSource(
                        path.join("."),
                        found.iter().map(|t| t.qualified_name()).collect(),
                    )
                },
            ),
            ContextVariant::RealTable { parent, .. }
            | ContextVariant::TableAlias { parent, .. }
            | ContextVariant::ResultTuple { parent, .. }
            | ContextVariant::HiddenSources { parent }
            | ContextVariant::Unresolved { parent } => parent.find_real_table(progress, path),
        }
    }

    /// Catalog object of `kind` at `path`
    pub fn find_real_object(
        &self,
        progress: &dyn ProgressMonitor,
        kind: ObjectKind,
        path: &[String],
    ) -> SemanticResult<Option<DbObjectRef>> {
        check_canceled(progress)?;
        match &self.0.variant {
            ContextVariant::DataSource(root) => root.find_real_object(progress, kind, path),
            ContextVariant::Dummy(root) => root.find_real_object(progress, kind, path),
            ContextVariant::Combined { left, right, .. } => self.first_of_both(
                || left.find_real_object(progress, kind, path),
                || right.find_real_object(progress, kind, path),
                |a, b| a == b,
                |found| {
                    SemanticError::AmbiguousSource(
                        path.join("."),
                        found.iter().map(|o| o.qualified_name()).collect(),
                    )
                },
            ),
            ContextVariant::RealTable { parent, .. }
            | ContextVariant::TableAlias { parent, .. }
            | ContextVariant::ResultTuple { parent, .. }
            | ContextVariant::HiddenSources { parent }
            | ContextVariant::Unresolved { parent } => {
                parent.find_real_object(progress, kind, path)
            }
        }
    }

    /// Rows source bound to `table` in this chain
    pub fn find_real_source(&self, table: &DbObjectRef) -> Option<RowsSourceRef> {
        match &self.0.variant {
            ContextVariant::DataSource(_) | ContextVariant::Dummy(_) => None,
            ContextVariant::HiddenSources { .. } => None,
            ContextVariant::RealTable {
                parent,
                table: bound,
                source,
            } => {
                if bound == table {
                    Some(source.clone())
                } else {
                    parent.find_real_source(table)
                }
            }
            ContextVariant::Combined { left, right, .. } => left
                .find_real_source(table)
                .or_else(|| right.find_real_source(table)),
            ContextVariant::TableAlias { parent, .. }
            | ContextVariant::ResultTuple { parent, .. }
            | ContextVariant::Unresolved { parent } => parent.find_real_source(table),
        }
    }

    /// Source referenced by `path`, as in the qualifier of `t.col`
    pub fn resolve_source(
        &self,
        progress: &dyn ProgressMonitor,
        path: &[String],
    ) -> SemanticResult<Option<SourceResolutionResult>> {
        check_canceled(progress)?;
        match &self.0.variant {
            ContextVariant::DataSource(_) | ContextVariant::Dummy(_) => Ok(None),
            ContextVariant::HiddenSources { .. } => Ok(None),
            ContextVariant::TableAlias {
                parent,
                alias,
                source,
            } => {
                if let [name] = path {
                    let dialect = self.dialect();
                    if dialect.matches_identifier(name, &dialect.canonical_identifier(&alias.name)) {
                        trace!(alias = %alias.name, "source resolved by alias");
                        return Ok(Some(SourceResolutionResult::for_alias(
                            source.clone(),
                            alias.clone(),
                        )));
                    }
                }
                parent.resolve_source(progress, path)
            }
            ContextVariant::RealTable {
                parent,
                table,
                source,
            } => {
                if self.may_name_table(path, table)
                    && self.find_real_table(progress, path)?.as_ref() == Some(table)
                {
                    trace!(table = ?table, "source resolved by table");
                    return Ok(Some(SourceResolutionResult::for_real_table(
                        source.clone(),
                        table.clone(),
                    )));
                }
                parent.resolve_source(progress, path)
            }
            ContextVariant::Combined { left, right, .. } => self.first_of_both(
                || left.resolve_source(progress, path),
                || right.resolve_source(progress, path),
                |a, b| a.source == b.source,
                |found| {
                    SemanticError::AmbiguousSource(
                        path.join("."),
                        found.iter().map(|r| r.source.display_name()).collect(),
                    )
                },
            ),
            ContextVariant::ResultTuple { parent, .. } | ContextVariant::Unresolved { parent } => {
                parent.resolve_source(progress, path)
            }
        }
    }

    /// Whether `path` can refer to `table` at all
    ///
    /// A synthetic root fabricates a table for any name it is asked about,
    /// so names that cannot match are filtered out before the lookup.
    fn may_name_table(&self, path: &[String], table: &DbObjectRef) -> bool {
        if !self.is_synthetic() {
            return true;
        }
        match path.last() {
            Some(last) => self.dialect().unquoted_identifier(last) == table.name(),
            None => true,
        }
    }

    /// Every source bound anywhere in the chain
    ///
    /// Walks both sides of combined contexts and past hidden sources, visiting
    /// each node once.
    #[instrument(skip(self))]
    pub fn collect_known_sources(&self) -> KnownSourcesInfo {
        let mut info = KnownSourcesInfo::default();
        let mut visited = HashSet::new();
        let mut stack = vec![self.clone()];

        while let Some(context) = stack.pop() {
            if !visited.insert(Arc::as_ptr(&context.0)) {
                continue;
            }
            match &context.0.variant {
                ContextVariant::DataSource(_) | ContextVariant::Dummy(_) => {}
                ContextVariant::RealTable {
                    parent,
                    table,
                    source,
                } => {
                    info.register_table_reference(source, table);
                    stack.push(parent.clone());
                }
                ContextVariant::TableAlias {
                    parent,
                    alias,
                    source,
                } => {
                    info.register_alias(source, alias);
                    stack.push(parent.clone());
                }
                ContextVariant::Combined { left, right, .. } => {
                    stack.push(right.clone());
                    stack.push(left.clone());
                }
                ContextVariant::ResultTuple { parent, .. }
                | ContextVariant::HiddenSources { parent }
                | ContextVariant::Unresolved { parent } => stack.push(parent.clone()),
            }
        }

        debug!(sources = info.len(), "collected known sources");
        info
    }

    /// Run `left`, then `right` if needed, under the resolution policy
    ///
    /// First match returns the first non-empty side without evaluating the
    /// other. Strict evaluates both and fails when they disagree.
    fn first_of_both<T, L, R, S, E>(
        &self,
        left: L,
        right: R,
        same: S,
        ambiguous: E,
    ) -> SemanticResult<Option<T>>
    where
        L: FnOnce() -> SemanticResult<Option<T>>,
        R: FnOnce() -> SemanticResult<Option<T>>,
        S: Fn(&T, &T) -> bool,
        E: FnOnce([&T; 2]) -> SemanticError,
    {
        let first = left()?;
        match self.resolution_policy() {
            ResolutionPolicy::FirstMatch => match first {
                Some(found) => Ok(Some(found)),
                None => right(),
            },
            ResolutionPolicy::Strict => {
                let second = right()?;
                match (first, second) {
                    (Some(a), Some(b)) if !same(&a, &b) => Err(ambiguous([&a, &b])),
                    (first, second) => Ok(first.or(second)),
                }
            }
        }
    }

    // Combinators

    /// Bind `source` to a catalog table
    pub fn extend_with_real_table(&self, table: DbObjectRef, source: RowsSourceRef) -> DataContext {
        self.wrap(ContextVariant::RealTable {
            parent: self.clone(),
            table,
            source,
        })
    }

    /// Bind `source` to an alias
    pub fn extend_with_table_alias(&self, alias: Symbol, source: RowsSourceRef) -> DataContext {
        self.wrap(ContextVariant::TableAlias {
            parent: self.clone(),
            alias,
            source,
        })
    }

    /// Join this context with `other`
    ///
    /// Columns are this context's followed by `other`'s, renumbered.
    pub fn combine(&self, other: &DataContext) -> DataContext {
        let columns = reindex(
            self.columns_list()
                .iter()
                .chain(other.columns_list())
                .cloned(),
        );
        let pseudo_columns = self
            .pseudo_columns_list()
            .iter()
            .chain(other.pseudo_columns_list())
            .cloned()
            .collect();
        self.wrap(ContextVariant::Combined {
            left: self.clone(),
            right: other.clone(),
            columns,
            pseudo_columns,
        })
    }

    /// Replace the result tuple with the projection of `source`
    ///
    /// Inherited pseudo columns are kept when their policy survives
    /// projection, followed by the rowset pseudo columns the root provides
    /// for `source` and then `pseudo_columns`.
    pub fn override_result_tuple(
        &self,
        source: RowsSourceRef,
        columns: Vec<ResultColumn>,
        pseudo_columns: Vec<PseudoColumn>,
    ) -> DataContext {
        let root = self.root();
        let rowset = root
            .as_data_source()
            .map(|ds| ds.rowset_pseudo_columns(&source))
            .unwrap_or_default();
        let pseudo_columns = self
            .pseudo_columns_list()
            .iter()
            .filter(|c| c.propagation_policy.survives_projection())
            .cloned()
            .chain(rowset)
            .chain(pseudo_columns)
            .collect();
        self.wrap(ContextVariant::ResultTuple {
            parent: self.clone(),
            source,
            columns: reindex(columns),
            pseudo_columns,
        })
    }

    /// Seal a subquery boundary: sources below are no longer reachable by name
    pub fn hide_sources(&self) -> DataContext {
        self.wrap(ContextVariant::HiddenSources {
            parent: self.clone(),
        })
    }

    pub fn mark_has_unresolved_source(&self) -> DataContext {
        self.wrap(ContextVariant::Unresolved {
            parent: self.clone(),
        })
    }
}

impl PartialEq for DataContext {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DataContext {}

impl Hash for DataContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.variant {
            ContextVariant::DataSource(root) => write!(f, "{root:?}"),
            ContextVariant::Dummy(root) => write!(f, "{root:?}"),
            ContextVariant::RealTable { parent, table, .. } => {
                write!(f, "{parent:?} -> RealTable({})", table.qualified_name())
            }
            ContextVariant::TableAlias { parent, alias, .. } => {
                write!(f, "{parent:?} -> Alias({})", alias.name)
            }
            ContextVariant::Combined { left, right, .. } => {
                write!(f, "Combine({left:?}, {right:?})")
            }
            ContextVariant::ResultTuple {
                parent,
                source,
                columns,
                ..
            } => write!(
                f,
                "{parent:?} -> ResultTuple({}, {})",
                source.display_name(),
                columns.len()
            ),
            ContextVariant::HiddenSources { parent } => write!(f, "{parent:?} -> Hide"),
            ContextVariant::Unresolved { parent } => write!(f, "{parent:?} -> Unresolved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr_type::ExprType;
    use unified_sql_lsp_catalog::VoidProgressMonitor;

    fn dummy_root() -> DataContext {
        DummyDataSourceContext::new(
            Dialect::PostgreSQL,
            vec!["id".to_string()],
            vec![vec!["t".to_string()]],
        )
        .into_context()
    }

    fn column(name: &str, source: &RowsSourceRef) -> ResultColumn {
        ResultColumn::new(0, Symbol::new(name), source.clone(), ExprType::STRING)
    }

    #[test]
    fn test_root_is_empty() {
        let root = dummy_root();
        assert!(root.columns_list().is_empty());
        assert!(root.pseudo_columns_list().is_empty());
        assert!(!root.has_unresolved_source());
        assert!(root.parent().is_none());
        assert!(root.is_synthetic());
    }

    #[test]
    fn test_result_source_follows_nearest_tuple() {
        let root = dummy_root();
        assert!(root.result_source().is_none());

        let inner = RowsSourceRef::subquery();
        let projected = root.override_result_tuple(inner.clone(), vec![column("a", &inner)], vec![]);
        let hidden = projected.hide_sources();
        assert_eq!(hidden.result_source(), Some(&inner));

        let outer = RowsSourceRef::table(["t"]);
        let reprojected = hidden.override_result_tuple(outer.clone(), vec![], vec![]);
        assert_eq!(reprojected.result_source(), Some(&outer));
        assert!(projected.combine(&reprojected).result_source().is_none());
        assert!(format!("{reprojected:?}").ends_with("ResultTuple(t, 0)"));
    }

    #[test]
    fn test_combinators_do_not_mutate_receiver() {
        let root = dummy_root();
        let source = RowsSourceRef::subquery();
        let projected = root.override_result_tuple(source.clone(), vec![column("a", &source)], vec![]);
        let marked = projected.mark_has_unresolved_source();

        assert!(!projected.has_unresolved_source());
        assert!(marked.has_unresolved_source());
        assert_eq!(projected.columns_list().len(), 1);
        assert!(root.columns_list().is_empty());
        assert_eq!(marked.parent(), Some(&projected));
        assert_eq!(marked.root(), root);
    }

    #[test]
    fn test_unresolved_does_not_leak_past_hide() {
        let root = dummy_root();
        let hidden = root.mark_has_unresolved_source().hide_sources();
        assert!(!hidden.has_unresolved_source());
        assert!(hidden.mark_has_unresolved_source().has_unresolved_source());
    }

    #[test]
    fn test_combine_unresolved_from_either_side() {
        let root = dummy_root();
        let combined = root.combine(&root.mark_has_unresolved_source());
        assert!(combined.has_unresolved_source());
    }

    #[test]
    fn test_strict_reports_ambiguous_column() {
        let root = DummyDataSourceContext::new(Dialect::PostgreSQL, Vec::<String>::new(), Vec::<Vec<String>>::new())
            .with_policy(ResolutionPolicy::Strict)
            .into_context();
        let a = RowsSourceRef::table(["a"]);
        let b = RowsSourceRef::table(["b"]);
        let left = root.override_result_tuple(a.clone(), vec![column("id", &a)], vec![]);
        let right = root.override_result_tuple(b.clone(), vec![column("id", &b)], vec![]);
        let combined = left.combine(&right);

        let err = combined.resolve_column(&VoidProgressMonitor, "id").unwrap_err();
        assert!(matches!(err, SemanticError::AmbiguousColumn(name, _) if name == "id"));
    }

    #[test]
    fn test_first_match_picks_leftmost_column() {
        let root = dummy_root();
        let a = RowsSourceRef::table(["a"]);
        let b = RowsSourceRef::table(["b"]);
        let left = root.override_result_tuple(a.clone(), vec![column("id", &a)], vec![]);
        let right = root.override_result_tuple(b.clone(), vec![column("id", &b)], vec![]);
        let found = left
            .combine(&right)
            .resolve_column(&VoidProgressMonitor, "ID")
            .unwrap()
            .unwrap();
        assert_eq!(found.source, a);
        assert_eq!(found.index, 0);
    }

    #[test]
    fn test_debug_shows_chain() {
        let root = dummy_root();
        let ctx = root
            .extend_with_table_alias(Symbol::new("a"), RowsSourceRef::subquery())
            .hide_sources();
        let rendered = format!("{ctx:?}");
        assert!(rendered.ends_with("-> Alias(a) -> Hide"));
    }
}

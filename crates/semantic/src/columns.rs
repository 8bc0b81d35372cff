// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Result columns
//!
//! Entries of a result tuple: [`ResultColumn`] for declared and derived
//! columns, [`PseudoColumn`] for columns the dialect provides without
//! declaration.

use tracing::trace;
use unified_sql_lsp_catalog::{DbObjectRef, ProgressMonitor, check_canceled};
use unified_sql_lsp_ir::{Dialect, PropagationPolicy, PseudoAttribute};

use crate::error::SemanticResult;
use crate::expr_type::ExprType;
use crate::source::RowsSourceRef;
use crate::symbol::{Symbol, SymbolClass};

/// One column of a result tuple
#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    /// Position in the owning tuple, contiguous from 0
    pub index: usize,
    pub symbol: Symbol,
    /// Source producing the column
    pub source: RowsSourceRef,
    /// Table the column ultimately comes from
    pub real_source: Option<DbObjectRef>,
    /// Catalog attribute the column ultimately comes from
    pub real_attr: Option<DbObjectRef>,
    pub ty: ExprType,
}

impl ResultColumn {
    pub fn new(index: usize, symbol: Symbol, source: RowsSourceRef, ty: ExprType) -> Self {
        Self {
            index,
            symbol,
            source,
            real_source: None,
            real_attr: None,
            ty,
        }
    }

    /// Record the catalog table and attribute behind this column
    pub fn with_real_origin(mut self, table: DbObjectRef, attr: DbObjectRef) -> Self {
        self.real_source = Some(table);
        self.real_attr = Some(attr);
        self
    }

    pub fn name(&self) -> &str {
        &self.symbol.name
    }
}

/// Renumber columns `0..n` in iteration order
pub(crate) fn reindex<I>(columns: I) -> Vec<ResultColumn>
where
    I: IntoIterator<Item = ResultColumn>,
{
    columns
        .into_iter()
        .enumerate()
        .map(|(index, mut column)| {
            column.index = index;
            column
        })
        .collect()
}

/// Column provided by the dialect rather than declared
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoColumn {
    pub symbol: Symbol,
    /// Source whose rows carry the column; `None` for session variables
    pub source: Option<RowsSourceRef>,
    pub real_source: Option<DbObjectRef>,
    pub ty: ExprType,
    pub propagation_policy: PropagationPolicy,
    pub description: Option<String>,
}

impl PseudoColumn {
    /// Session variable visible everywhere, named in canonical form
    pub fn global(attr: &PseudoAttribute, dialect: Dialect) -> Self {
        Self {
            symbol: Symbol::new(dialect.canonical_identifier(attr.name))
                .with_class(SymbolClass::Column),
            source: None,
            real_source: None,
            ty: ExprType::for_predefined(attr.kind),
            propagation_policy: PropagationPolicy::GlobalVariable,
            description: Some(attr.description.to_string()),
        }
    }

    /// System column carried by every row of `source`
    pub fn rowset(attr: &PseudoAttribute, source: RowsSourceRef) -> Self {
        Self {
            symbol: Symbol::new(attr.name).with_class(SymbolClass::Column),
            source: Some(source),
            real_source: None,
            ty: ExprType::for_predefined(attr.kind),
            propagation_policy: attr.policy,
            description: Some(attr.description.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        &self.symbol.name
    }
}

/// Build the result tuple of a table bound to `source`
///
/// One column per attribute of `table`, in attribute order, each typed from
/// its metadata.
pub fn prepare_table_columns(
    progress: &dyn ProgressMonitor,
    dialect: Dialect,
    source: &RowsSourceRef,
    table: &DbObjectRef,
) -> SemanticResult<Vec<ResultColumn>> {
    check_canceled(progress)?;
    let Some(entity) = table.as_entity() else {
        trace!(table = ?table, "table exposes no attributes");
        return Ok(Vec::new());
    };

    let mut columns = Vec::new();
    for (index, attr) in entity.attributes(progress)?.into_iter().enumerate() {
        let ty = ExprType::for_typed_object(progress, &attr, SymbolClass::Column, dialect)?;
        let symbol = Symbol::for_object(&attr, SymbolClass::Column);
        columns.push(
            ResultColumn::new(index, symbol, source.clone(), ty).with_real_origin(table.clone(), attr),
        );
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unified_sql_lsp_ir::DataKind;

    #[test]
    fn test_reindex_is_contiguous() {
        let source = RowsSourceRef::values();
        let columns = vec![
            ResultColumn::new(7, Symbol::new("a"), source.clone(), ExprType::STRING),
            ResultColumn::new(3, Symbol::new("b"), source.clone(), ExprType::NUMERIC),
        ];
        let columns = reindex(columns);
        assert_eq!(columns.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(columns[1].name(), "b");
    }

    #[test]
    fn test_global_pseudo_column_uses_canonical_name() {
        let attr = PseudoAttribute::global("current_user", DataKind::String, "Session user");
        let column = PseudoColumn::global(&attr, Dialect::PostgreSQL);
        assert_eq!(column.name(), "current_user");
        assert!(column.source.is_none());
        assert_eq!(column.ty, ExprType::STRING);
        assert!(column.propagation_policy.is_global());

        let column = PseudoColumn::global(&attr, Dialect::Generic);
        assert_eq!(column.name(), "CURRENT_USER");
    }

    #[test]
    fn test_rowset_pseudo_column_keeps_policy() {
        let attr = PseudoAttribute::rowset(
            "tableoid",
            DataKind::Numeric,
            PropagationPolicy::TableGlobal,
            "Table OID",
        );
        let source = RowsSourceRef::table(["users"]);
        let column = PseudoColumn::rowset(&attr, source.clone());
        assert_eq!(column.source, Some(source));
        assert!(column.propagation_policy.survives_projection());
        assert_eq!(column.description.as_deref(), Some("Table OID"));
    }
}

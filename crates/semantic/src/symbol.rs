// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Symbol types for semantic analysis
//!
//! A [`Symbol`] is a name as it appears in query text together with what it
//! was resolved to. The definition is what go-to-definition navigates to.

use serde::{Deserialize, Serialize};
use unified_sql_lsp_catalog::DbObjectRef;

use crate::source::RowsSourceRef;

/// Role a symbol plays in the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolClass {
    Catalog,
    Schema,
    Table,
    TableAlias,
    Column,
    ColumnDerived,
    CompositeField,
    Object,
    Unknown,
}

/// What a symbol refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolDefinition {
    /// A catalog object, with the role it was referenced in
    DbObject {
        object: DbObjectRef,
        class: SymbolClass,
    },
    /// A rows source declared in the same statement
    RowsSource(RowsSourceRef),
    /// Nothing to navigate to, only the symbol role is known
    Class(SymbolClass),
}

impl SymbolDefinition {
    pub fn symbol_class(&self) -> SymbolClass {
        match self {
            SymbolDefinition::DbObject { class, .. } => *class,
            SymbolDefinition::RowsSource(_) => SymbolClass::TableAlias,
            SymbolDefinition::Class(class) => *class,
        }
    }

    /// Catalog object behind this definition, if any
    pub fn db_object(&self) -> Option<&DbObjectRef> {
        match self {
            SymbolDefinition::DbObject { object, .. } => Some(object),
            _ => None,
        }
    }
}

/// A name from the query text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Name as written, quotes included
    pub name: String,

    /// Role of the name
    pub class: SymbolClass,

    /// Resolution target
    pub definition: Option<SymbolDefinition>,
}

impl Symbol {
    /// Create an unresolved symbol
    ///
    /// # Examples
    ///
    /// ```
    /// use unified_sql_lsp_semantic::{Symbol, SymbolClass};
    ///
    /// let symbol = Symbol::new("u");
    /// assert_eq!(symbol.name, "u");
    /// assert_eq!(symbol.class, SymbolClass::Unknown);
    /// assert!(symbol.definition.is_none());
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: SymbolClass::Unknown,
            definition: None,
        }
    }

    /// Set the symbol class
    pub fn with_class(mut self, class: SymbolClass) -> Self {
        self.class = class;
        self
    }

    /// Attach a definition, adopting its symbol class
    ///
    /// # Examples
    ///
    /// ```
    /// use unified_sql_lsp_semantic::{RowsSourceRef, Symbol, SymbolClass, SymbolDefinition};
    ///
    /// let source = RowsSourceRef::subquery();
    /// let alias = Symbol::new("t").with_definition(SymbolDefinition::RowsSource(source));
    /// assert_eq!(alias.class, SymbolClass::TableAlias);
    /// ```
    pub fn with_definition(mut self, definition: SymbolDefinition) -> Self {
        self.class = definition.symbol_class();
        self.definition = Some(definition);
        self
    }

    /// Symbol for a catalog object, named after it
    pub fn for_object(object: &DbObjectRef, class: SymbolClass) -> Self {
        Self::new(object.name()).with_definition(SymbolDefinition::DbObject {
            object: object.clone(),
            class,
        })
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Unified SQL LSP - Semantic Analysis Layer
//!
//! This crate resolves names and types in SQL queries without executing
//! them or requiring a live connection.
//!
//! ## Overview
//!
//! While walking a parsed query, the tree walker builds chains of immutable
//! [`DataContext`] nodes. Every identifier is resolved against the context
//! active at its position:
//!
//! - **Context chains**: which columns are visible, which sources can be
//!   referenced by name, which catalog tables back them
//! - **Expression types**: [`ExprType`] answers member and subscript lookups
//! - **Synthetic metadata**: [`DummyDataSourceContext`] stands in for a
//!   catalog when there is no connection
//!
//! ## Core Concepts
//!
//! ### Roots
//!
//! A chain starts at a [`DataSourceContext`] backed by a
//! [`MetadataProvider`](unified_sql_lsp_catalog::MetadataProvider), or at a
//! [`DummyDataSourceContext`] seeded with the names the text references.
//! [`SemanticConfig::prepare_root`] picks one.
//!
//! ### Combinators
//!
//! Each FROM item extends the context, joins combine two contexts and the
//! SELECT list overrides the result tuple:
//!
//! ```rust
//! use unified_sql_lsp_catalog::VoidProgressMonitor;
//! use unified_sql_lsp_ir::Dialect;
//! use unified_sql_lsp_semantic::{
//!     prepare_table_columns, DummyDataSourceContext, RowsSourceRef, Symbol,
//! };
//!
//! let progress = VoidProgressMonitor;
//! let root = DummyDataSourceContext::new(
//!     Dialect::PostgreSQL,
//!     vec!["id".to_string(), "name".to_string()],
//!     vec![vec!["users".to_string()]],
//! )
//! .into_context();
//!
//! // FROM users AS u
//! let users = RowsSourceRef::table(["users"]);
//! let table = root.find_real_table(&progress, &["users".to_string()]).unwrap().unwrap();
//! let context = root
//!     .extend_with_real_table(table.clone(), users.clone())
//!     .extend_with_table_alias(Symbol::new("u"), users.clone());
//!
//! // SELECT *
//! let columns = prepare_table_columns(&progress, root.dialect(), &users, &table).unwrap();
//! let context = context.override_result_tuple(users.clone(), columns, vec![]);
//!
//! assert!(context.resolve_column(&progress, "name").unwrap().is_some());
//! let u = context.resolve_source(&progress, &["u".to_string()]).unwrap().unwrap();
//! assert_eq!(u.source, users);
//! ```
//!
//! ### Subquery boundaries
//!
//! [`DataContext::hide_sources`] seals a subquery: its columns stay visible
//! to the enclosing query, its table names and aliases do not.
//!
//! ## Error Handling
//!
//! Names that cannot be found resolve to `Ok(None)`. [`SemanticError`] is
//! returned for metadata access failures, cancellation and, under
//! [`ResolutionPolicy::Strict`], ambiguous names. [`RecognitionContext`]
//! turns those into span-attached diagnostics.

pub mod columns;
pub mod config;
pub mod context;
pub mod datasource;
pub mod dummy;
pub mod error;
pub mod expr_type;
pub mod known_sources;
pub mod recognition;
pub mod source;
pub mod symbol;

// Re-exports
pub use columns::{PseudoColumn, ResultColumn, prepare_table_columns};
pub use config::{ConfigError, ResolutionPolicy, SemanticConfig};
pub use context::DataContext;
pub use datasource::DataSourceContext;
pub use dummy::DummyDataSourceContext;
pub use error::{SemanticError, SemanticResult};
pub use expr_type::ExprType;
pub use known_sources::{KnownSourcesInfo, SourceResolutionResult};
pub use recognition::{
    DiagnosticCode, DiagnosticSeverity, RecognitionContext, SemanticDiagnostic, Span,
};
pub use source::{RowsSource, RowsSourceKind, RowsSourceRef};
pub use symbol::{Symbol, SymbolClass, SymbolDefinition};

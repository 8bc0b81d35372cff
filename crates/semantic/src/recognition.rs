// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Recognition diagnostics
//!
//! [`RecognitionContext`] is carried by the tree walker while it builds
//! context chains. It turns failed lookups into [`SemanticDiagnostic`]s
//! attached to source spans so that one bad reference never stops analysis
//! of the rest of the document.
//!
//! ## Usage
//!
//! ```rust
//! use unified_sql_lsp_catalog::VoidProgressMonitor;
//! use unified_sql_lsp_ir::Dialect;
//! use unified_sql_lsp_semantic::{DummyDataSourceContext, RecognitionContext, RowsSourceRef, Span};
//!
//! let root = DummyDataSourceContext::new(Dialect::MySQL, Vec::<String>::new(), Vec::<Vec<String>>::new())
//!     .into_context();
//! let mut recognition = RecognitionContext::new(&VoidProgressMonitor);
//! let source = RowsSourceRef::table(["users"]);
//! let context = recognition
//!     .bind_table(&root, &["users".to_string()], &source, Span::new(14, 19))
//!     .unwrap();
//! assert!(!context.has_unresolved_source());
//! assert!(recognition.diagnostics().is_empty());
//! ```

use serde::Serialize;
use tracing::{debug, instrument, warn};
use unified_sql_lsp_catalog::ProgressMonitor;

use crate::columns::ResultColumn;
use crate::context::DataContext;
use crate::error::{SemanticError, SemanticResult};
use crate::source::RowsSourceRef;

/// Byte range in the analyzed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// Diagnostic code identifying the kind of problem
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    /// FROM-clause table not found in metadata
    TableNotFound,

    /// Column reference not found in scope
    ColumnNotFound,

    /// Name matches several candidates under the strict policy
    AmbiguousReference,

    /// Metadata provider failed
    MetadataAccess,

    /// Reported by the tree walker itself
    Custom(String),
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &str {
        match self {
            DiagnosticCode::TableNotFound => "SEMANTIC-001",
            DiagnosticCode::ColumnNotFound => "SEMANTIC-002",
            DiagnosticCode::AmbiguousReference => "SEMANTIC-003",
            DiagnosticCode::MetadataAccess => "SEMANTIC-004",
            DiagnosticCode::Custom(code) => code,
        }
    }
}

/// Problem found while recognizing a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticDiagnostic {
    pub span: Span,
    pub severity: DiagnosticSeverity,
    pub code: DiagnosticCode,
    pub message: String,
}

/// Diagnostic collector used while building context chains
pub struct RecognitionContext<'a> {
    progress: &'a dyn ProgressMonitor,
    diagnostics: Vec<SemanticDiagnostic>,
}

impl<'a> RecognitionContext<'a> {
    pub fn new(progress: &'a dyn ProgressMonitor) -> Self {
        Self {
            progress,
            diagnostics: Vec::new(),
        }
    }

    pub fn progress(&self) -> &'a dyn ProgressMonitor {
        self.progress
    }

    /// Bind a FROM-clause table to `source`
    ///
    /// Returns `context` extended with the table. When the table cannot be
    /// bound, records a diagnostic and returns `context` marked unresolved
    /// instead. Only cancellation is returned as an error.
    #[instrument(skip(self, context, source), fields(table = %name_path.join(".")))]
    pub fn bind_table(
        &mut self,
        context: &DataContext,
        name_path: &[String],
        source: &RowsSourceRef,
        span: Span,
    ) -> SemanticResult<DataContext> {
        match context.find_real_table(self.progress, name_path) {
            Ok(Some(table)) => {
                debug!(table = ?table, "table bound");
                Ok(context.extend_with_real_table(table, source.clone()))
            }
            Ok(None) => {
                self.push(
                    span,
                    DiagnosticSeverity::Warning,
                    DiagnosticCode::TableNotFound,
                    format!("Table {} not found", name_path.join(".")),
                );
                Ok(context.mark_has_unresolved_source())
            }
            Err(SemanticError::Canceled) => Err(SemanticError::Canceled),
            Err(err) => {
                warn!(error = %err, "table lookup failed");
                self.push_error(span, &err);
                Ok(context.mark_has_unresolved_source())
            }
        }
    }

    /// Resolve a column reference, reporting it when missing
    ///
    /// Missing columns are not reported when the context has an unresolved
    /// source, since that source was already reported and may hold them.
    pub fn resolve_column(
        &mut self,
        context: &DataContext,
        name: &str,
        span: Span,
    ) -> SemanticResult<Option<ResultColumn>> {
        match context.resolve_column(self.progress, name) {
            Ok(Some(column)) => Ok(Some(column)),
            Ok(None) => {
                if !context.has_unresolved_source() {
                    self.push(
                        span,
                        DiagnosticSeverity::Error,
                        DiagnosticCode::ColumnNotFound,
                        format!("Column {name} not found"),
                    );
                }
                Ok(None)
            }
            Err(SemanticError::Canceled) => Err(SemanticError::Canceled),
            Err(err) => {
                self.push_error(span, &err);
                Ok(None)
            }
        }
    }

    /// Record an error reported by the tree walker
    pub fn append_error(&mut self, span: Span, message: impl Into<String>) {
        self.push(
            span,
            DiagnosticSeverity::Error,
            DiagnosticCode::Custom("SEMANTIC-000".to_string()),
            message.into(),
        );
    }

    pub fn diagnostics(&self) -> &[SemanticDiagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<SemanticDiagnostic> {
        self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    fn push_error(&mut self, span: Span, err: &SemanticError) {
        let code = match err {
            SemanticError::AmbiguousColumn(..) | SemanticError::AmbiguousSource(..) => {
                DiagnosticCode::AmbiguousReference
            }
            _ => DiagnosticCode::MetadataAccess,
        };
        self.push(span, DiagnosticSeverity::Error, code, err.to_string());
    }

    fn push(&mut self, span: Span, severity: DiagnosticSeverity, code: DiagnosticCode, message: String) {
        debug!(code = code.as_str(), %message, "diagnostic");
        self.diagnostics.push(SemanticDiagnostic {
            span,
            severity,
            code,
            message,
        });
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Diagnostics collected while binding FROM clauses

use std::sync::Arc;

use unified_sql_lsp_catalog::{
    CancellationFlag, CatalogError, MetadataProvider, VoidProgressMonitor,
};
use unified_sql_lsp_ir::Dialect;
use unified_sql_lsp_semantic::{
    DataSourceContext, DiagnosticCode, DiagnosticSeverity, RecognitionContext, RowsSourceRef,
    SemanticError, Span, prepare_table_columns,
};
use unified_sql_lsp_test_utils::{FailingProvider, MetadataBuilder, init_test_tracing};

fn path(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

fn standard_provider() -> Arc<dyn MetadataProvider> {
    MetadataBuilder::new(Dialect::PostgreSQL)
        .with_standard_schema()
        .build_provider()
}

#[test]
fn test_bound_table_produces_no_diagnostics() {
    let progress = VoidProgressMonitor;
    let root = DataSourceContext::new(standard_provider()).into_context();
    let mut recognition = RecognitionContext::new(&progress);

    let source = RowsSourceRef::table(["users"]);
    let ctx = recognition
        .bind_table(&root, &path(&["users"]), &source, Span::new(14, 19))
        .unwrap();
    let table = ctx
        .resolve_source(recognition.progress(), &path(&["users"]))
        .unwrap()
        .unwrap()
        .table
        .unwrap();
    let columns = prepare_table_columns(&progress, ctx.dialect(), &source, &table).unwrap();
    let ctx = ctx.override_result_tuple(source, columns, vec![]);

    assert!(recognition
        .resolve_column(&ctx, "email", Span::new(7, 12))
        .unwrap()
        .is_some());
    assert!(recognition.diagnostics().is_empty());
}

#[test]
fn test_missing_table_and_column_reporting() {
    init_test_tracing();
    let progress = VoidProgressMonitor;
    let root = DataSourceContext::new(standard_provider()).into_context();
    let mut recognition = RecognitionContext::new(&progress);

    // a column missing from a fully resolved scope is an error
    assert!(recognition
        .resolve_column(&root, "nope", Span::new(7, 11))
        .unwrap()
        .is_none());

    let ctx = recognition
        .bind_table(&root, &path(&["ghosts"]), &RowsSourceRef::table(["ghosts"]), Span::new(17, 23))
        .unwrap();
    assert!(ctx.has_unresolved_source());

    // columns possibly provided by the missing table are not reported again
    assert!(recognition
        .resolve_column(&ctx, "haunt", Span::new(30, 35))
        .unwrap()
        .is_none());

    let diagnostics = recognition.into_diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].code, DiagnosticCode::ColumnNotFound);
    assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Error);
    assert_eq!(diagnostics[1].code, DiagnosticCode::TableNotFound);
    assert_eq!(diagnostics[1].severity, DiagnosticSeverity::Warning);
    assert_eq!(diagnostics[1].span, Span::new(17, 23));
    assert!(diagnostics[1].message.contains("ghosts"));
}

#[test]
fn test_access_failure_is_localized() {
    let progress = VoidProgressMonitor;
    let provider = Arc::new(FailingProvider::for_names(
        standard_provider(),
        ["orders"],
        CatalogError::PermissionDenied("orders".to_string()),
    ));
    let root = DataSourceContext::new(provider.clone()).into_context();
    let mut recognition = RecognitionContext::new(&progress);

    let users = recognition
        .bind_table(&root, &path(&["users"]), &RowsSourceRef::table(["users"]), Span::new(14, 19))
        .unwrap();
    let both = recognition
        .bind_table(&users, &path(&["orders"]), &RowsSourceRef::table(["orders"]), Span::new(25, 31))
        .unwrap();

    assert!(!users.has_unresolved_source());
    assert!(both.has_unresolved_source());
    assert!(provider.calls() >= 2);

    let diagnostics = recognition.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::MetadataAccess);
    assert_eq!(diagnostics[0].code.as_str(), "SEMANTIC-004");
    assert!(diagnostics[0].message.contains("orders"));
    assert!(recognition.has_errors());
}

#[test]
fn test_access_failure_surfaces_from_raw_lookup() {
    let progress = VoidProgressMonitor;
    let provider = Arc::new(FailingProvider::new(
        Dialect::PostgreSQL,
        CatalogError::ConnectionFailed("refused".to_string()),
    ));
    let root = DataSourceContext::new(provider).into_context();

    let err = root.find_real_table(&progress, &path(&["users"])).unwrap_err();
    assert!(err.is_access_failure());
    assert!(matches!(
        err,
        SemanticError::Catalog(CatalogError::ConnectionFailed(_))
    ));
}

#[test]
fn test_cancellation_aborts_binding() {
    let flag = CancellationFlag::new();
    let root = DataSourceContext::new(standard_provider()).into_context();
    let mut recognition = RecognitionContext::new(&flag);
    flag.cancel();

    let err = recognition
        .bind_table(&root, &path(&["users"]), &RowsSourceRef::table(["users"]), Span::new(0, 5))
        .unwrap_err();
    assert_eq!(err, SemanticError::Canceled);
    assert!(recognition.diagnostics().is_empty());
}

#[test]
fn test_diagnostics_serialize() {
    let progress = VoidProgressMonitor;
    let mut recognition = RecognitionContext::new(&progress);
    recognition.append_error(Span::new(1, 4), "unexpected token");
    let json = serde_json::to_value(recognition.diagnostics()).unwrap();
    assert_eq!(json[0]["span"]["start"], 1);
    assert_eq!(json[0]["message"], "unexpected token");
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Rowset and session pseudo columns

use unified_sql_lsp_catalog::VoidProgressMonitor;
use unified_sql_lsp_ir::{DataKind, Dialect, PropagationPolicy};
use unified_sql_lsp_semantic::{
    DataContext, DataSourceContext, DummyDataSourceContext, RowsSourceRef, prepare_table_columns,
};
use unified_sql_lsp_test_utils::MetadataBuilder;

fn root(dialect: Dialect) -> DataContext {
    DataSourceContext::new(
        MetadataBuilder::new(dialect)
            .with_standard_schema()
            .build_provider(),
    )
    .into_context()
}

fn select_from(root: &DataContext, table: &str) -> (DataContext, RowsSourceRef) {
    let progress = VoidProgressMonitor;
    let object = root
        .find_real_table(&progress, &[table.to_string()])
        .unwrap()
        .unwrap();
    let source = RowsSourceRef::table([table]);
    let columns = prepare_table_columns(&progress, root.dialect(), &source, &object).unwrap();
    let context = root
        .extend_with_real_table(object, source.clone())
        .override_result_tuple(source.clone(), columns, vec![]);
    (context, source)
}

#[test]
fn test_postgres_table_exposes_system_columns() {
    let progress = VoidProgressMonitor;
    let root = root(Dialect::PostgreSQL);
    let (ctx, source) = select_from(&root, "users");

    let names: Vec<&str> = ctx.pseudo_columns_list().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["ctid", "xmin", "xmax", "tableoid"]);

    let ctid = ctx.resolve_pseudo_column(&progress, "CTID").unwrap().unwrap();
    assert_eq!(ctid.source, Some(source));
    assert_eq!(ctid.propagation_policy, PropagationPolicy::TableLocal);
    assert_eq!(ctid.ty.data_kind(), DataKind::Rowid);
    assert!(ctid.description.is_some());
}

#[test]
fn test_only_table_global_columns_survive_projection() {
    let progress = VoidProgressMonitor;
    let root = root(Dialect::PostgreSQL);
    let (inner, _) = select_from(&root, "orders");
    let outer = inner
        .hide_sources()
        .override_result_tuple(RowsSourceRef::subquery(), vec![], vec![]);

    assert!(outer.resolve_pseudo_column(&progress, "ctid").unwrap().is_none());
    let tableoid = outer.resolve_pseudo_column(&progress, "tableoid").unwrap().unwrap();
    assert_eq!(tableoid.propagation_policy, PropagationPolicy::TableGlobal);
}

#[test]
fn test_subquery_sources_carry_no_rowset_columns() {
    let root = root(Dialect::PostgreSQL);
    let ctx = root.override_result_tuple(RowsSourceRef::subquery(), vec![], vec![]);
    assert!(ctx.pseudo_columns_list().is_empty());
}

#[test]
fn test_mysql_has_no_rowset_columns() {
    let root = root(Dialect::MySQL);
    let (ctx, _) = select_from(&root, "users");
    assert!(ctx.pseudo_columns_list().is_empty());
}

#[test]
fn test_cockroach_exposes_mvcc_timestamp() {
    let root = root(Dialect::CockroachDB);
    let (ctx, _) = select_from(&root, "users");
    assert!(ctx
        .pseudo_columns_list()
        .iter()
        .any(|c| c.name() == "crdb_internal_mvcc_timestamp"));
}

#[test]
fn test_session_variables_resolve_from_any_depth() {
    let progress = VoidProgressMonitor;
    let root = root(Dialect::PostgreSQL);
    let (ctx, _) = select_from(&root, "users");
    let deep = ctx.hide_sources().mark_has_unresolved_source();

    let user = deep
        .resolve_global_pseudo_column(&progress, "CURRENT_USER")
        .unwrap()
        .unwrap();
    assert_eq!(user.name(), "current_user");
    assert_eq!(user.propagation_policy, PropagationPolicy::GlobalVariable);
    assert!(user.source.is_none());
    assert!(deep
        .resolve_global_pseudo_column(&progress, "no_such_variable")
        .unwrap()
        .is_none());
}

#[test]
fn test_mysql_session_variables_match_any_case() {
    let progress = VoidProgressMonitor;
    let root = root(Dialect::MySQL);
    let user = root
        .resolve_global_pseudo_column(&progress, "current_user")
        .unwrap()
        .unwrap();
    assert_eq!(user.name(), "CURRENT_USER");
    assert_eq!(user.ty.data_kind(), DataKind::String);
}

#[test]
fn test_synthetic_root_has_no_session_variables() {
    let progress = VoidProgressMonitor;
    let root = DummyDataSourceContext::new(
        Dialect::PostgreSQL,
        Vec::<String>::new(),
        Vec::<Vec<String>>::new(),
    )
    .into_context();
    assert!(root
        .resolve_global_pseudo_column(&progress, "current_user")
        .unwrap()
        .is_none());
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Cross-dialect identifier matching behavior

use unified_sql_lsp_ir::{ColumnMetadata, DataType, Dialect, IdentifierCase};

fn columns() -> Vec<ColumnMetadata> {
    vec![
        ColumnMetadata::new("id", DataType::Integer),
        ColumnMetadata::new("UserName", DataType::Text),
        ColumnMetadata::new("CREATED_AT", DataType::Timestamp),
    ]
}

#[test]
fn test_stored_case_per_dialect() {
    assert_eq!(Dialect::Generic.stores_unquoted_case(), IdentifierCase::Upper);
    assert_eq!(Dialect::PostgreSQL.stores_unquoted_case(), IdentifierCase::Lower);
    assert_eq!(Dialect::CockroachDB.stores_unquoted_case(), IdentifierCase::Lower);
    assert_eq!(Dialect::MySQL.stores_unquoted_case(), IdentifierCase::Mixed);
    assert_eq!(Dialect::MariaDB.stores_unquoted_case(), IdentifierCase::Mixed);
}

#[test]
fn test_postgres_folds_unquoted_names() {
    let cols = columns();
    let found = Dialect::PostgreSQL.find_by_identifier("ID", &cols, |c| c.name.as_str());
    assert_eq!(found.map(|c| c.name.as_str()), Some("id"));

    // Mixed-case column is only reachable by quoting it
    assert!(
        Dialect::PostgreSQL
            .find_by_identifier("username", &cols, |c| c.name.as_str())
            .is_none()
    );
    assert!(
        Dialect::PostgreSQL
            .find_by_identifier("\"UserName\"", &cols, |c| c.name.as_str())
            .is_some()
    );
}

#[test]
fn test_generic_folds_to_upper() {
    let cols = columns();
    let found = Dialect::Generic.find_by_identifier("created_at", &cols, |c| c.name.as_str());
    assert_eq!(found.map(|c| c.name.as_str()), Some("CREATED_AT"));
    assert!(
        Dialect::Generic
            .find_by_identifier("\"created_at\"", &cols, |c| c.name.as_str())
            .is_none()
    );
}

#[test]
fn test_mysql_case_insensitive_lookup() {
    let cols = columns();
    let found = Dialect::MySQL.find_by_identifier("username", &cols, |c| c.name.as_str());
    assert_eq!(found.map(|c| c.name.as_str()), Some("UserName"));
    let found = Dialect::TiDB.find_by_identifier("`created_at`", &cols, |c| c.name.as_str());
    assert_eq!(found.map(|c| c.name.as_str()), Some("CREATED_AT"));
}

#[test]
fn test_match_identifier_over_plain_names() {
    let names = ["orders", "Customers"];
    assert_eq!(Dialect::MySQL.match_identifier("CUSTOMERS", names), Some("Customers"));
    assert_eq!(Dialect::PostgreSQL.match_identifier("Orders", names), Some("orders"));
    assert_eq!(Dialect::PostgreSQL.match_identifier("customers", names), None);
}

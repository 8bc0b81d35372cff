// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! YAML schema fixtures
//!
//! A fixture describes a dialect, composite types and tables:
//!
//! ```yaml
//! dialect: postgresql
//! default_schema: public
//! types:
//!   - name: point
//!     fields:
//!       - { name: x, type: double }
//!       - { name: y, type: double }
//! tables:
//!   - name: shapes
//!     schema: public
//!     columns:
//!       - { name: id, type: bigint }
//!       - { name: origin, type: point }
//!       - { name: labels, type: "text[]" }
//! ```
//!
//! Column types are spelled in lower case SQL. A trailing `[]` makes an
//! array; a name listed under `types` refers to that composite type.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use unified_sql_lsp_catalog::{CatalogSnapshot, ColumnMetadata, DataType, TableMetadata, TableType};
use unified_sql_lsp_ir::Dialect;

/// Fixture loading errors
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid fixture YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Composite type {0} is defined more than once")]
    DuplicateType(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaFixture {
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub default_schema: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeFixture>,
    pub tables: Vec<TableFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeFixture {
    pub name: String,
    pub fields: Vec<ColumnFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableFixture {
    pub name: String,
    #[serde(default = "default_schema_name")]
    pub schema: String,
    #[serde(default)]
    pub view: bool,
    #[serde(default)]
    pub comment: Option<String>,
    pub columns: Vec<ColumnFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnFixture {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_schema_name() -> String {
    "public".to_string()
}

impl SchemaFixture {
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Table records with composite types expanded
    pub fn tables(&self) -> Result<Vec<TableMetadata>, FixtureError> {
        let mut types: HashMap<String, DataType> = HashMap::new();
        for fixture in &self.types {
            let fields = fixture
                .fields
                .iter()
                .map(|f| f.to_metadata(&types))
                .collect();
            let data_type = DataType::Struct {
                name: fixture.name.clone(),
                fields,
            };
            if types.insert(fixture.name.to_lowercase(), data_type).is_some() {
                return Err(FixtureError::DuplicateType(fixture.name.clone()));
            }
        }

        Ok(self
            .tables
            .iter()
            .map(|table| {
                let mut metadata = TableMetadata::new(&table.name, &table.schema)
                    .with_columns(table.columns.iter().map(|c| c.to_metadata(&types)).collect());
                if table.view {
                    metadata = metadata.with_type(TableType::View);
                }
                if let Some(comment) = &table.comment {
                    metadata = metadata.with_comment(comment);
                }
                metadata
            })
            .collect())
    }

    pub fn snapshot(&self) -> Result<CatalogSnapshot, FixtureError> {
        let mut snapshot = CatalogSnapshot::from_tables(self.dialect, self.tables()?);
        if let Some(schema) = &self.default_schema {
            snapshot = snapshot.with_default_schema(schema);
        }
        Ok(snapshot)
    }
}

impl ColumnFixture {
    fn to_metadata(&self, types: &HashMap<String, DataType>) -> ColumnMetadata {
        let mut column = ColumnMetadata::new(&self.name, parse_type(&self.type_name, types))
            .with_nullable(self.nullable);
        if let Some(comment) = &self.comment {
            column = column.with_comment(comment);
        }
        column
    }
}

/// Parse a lower case SQL type spelling
pub fn parse_type(spelling: &str, types: &HashMap<String, DataType>) -> DataType {
    let spelling = spelling.trim().to_lowercase();
    if let Some(element) = spelling.strip_suffix("[]") {
        return DataType::Array(Box::new(parse_type(element, types)));
    }

    let (base, length) = match spelling.split_once('(') {
        Some((base, rest)) => (
            base.trim(),
            rest.trim_end_matches(')').trim().parse::<usize>().ok(),
        ),
        None => (spelling.as_str(), None),
    };

    match base {
        "int" | "integer" => DataType::Integer,
        "bigint" => DataType::BigInt,
        "smallint" => DataType::SmallInt,
        "tinyint" => DataType::TinyInt,
        "decimal" | "numeric" => DataType::Decimal,
        "float" | "real" => DataType::Float,
        "double" => DataType::Double,
        "varchar" => DataType::Varchar(length),
        "char" => DataType::Char(length),
        "text" => DataType::Text,
        "binary" => DataType::Binary,
        "varbinary" => DataType::VarBinary(length),
        "blob" | "bytea" => DataType::Blob,
        "date" => DataType::Date,
        "time" => DataType::Time,
        "datetime" => DataType::DateTime,
        "timestamp" => DataType::Timestamp,
        "boolean" | "bool" => DataType::Boolean,
        "json" | "jsonb" => DataType::Json,
        "uuid" => DataType::Uuid,
        other => types
            .get(other)
            .cloned()
            .unwrap_or_else(|| DataType::Other(other.to_string())),
    }
}

/// Fixture shipped with the crate: `shop` schema with a composite type
pub const SHOP_SCHEMA_YAML: &str = r#"
dialect: postgresql
default_schema: shop
types:
  - name: money_amount
    fields:
      - { name: currency, type: "char(3)" }
      - { name: value, type: decimal }
tables:
  - name: customers
    schema: shop
    comment: Registered customers
    columns:
      - { name: id, type: bigint }
      - { name: name, type: "varchar(100)" }
      - { name: emails, type: "text[]" }
  - name: invoices
    schema: shop
    columns:
      - { name: id, type: bigint }
      - { name: customer_id, type: bigint }
      - { name: amount, type: money_amount, nullable: true }
      - { name: line_totals, type: "decimal[][]" }
  - name: big_customers
    schema: shop
    view: true
    columns:
      - { name: id, type: bigint }
"#;

pub fn shop_schema() -> Result<SchemaFixture, FixtureError> {
    SchemaFixture::from_yaml(SHOP_SCHEMA_YAML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_fixture_parses() {
        let fixture = shop_schema().unwrap();
        assert_eq!(fixture.dialect, Dialect::PostgreSQL);
        let tables = fixture.tables().unwrap();
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[2].table_type, TableType::View);

        let amount = &tables[1].columns[2];
        assert!(matches!(&amount.data_type, DataType::Struct { name, fields } if name == "money_amount" && fields.len() == 2));
        assert!(amount.nullable);
    }

    #[test]
    fn test_parse_type() {
        let types = HashMap::new();
        assert_eq!(parse_type("VARCHAR(20)", &types), DataType::Varchar(Some(20)));
        assert_eq!(
            parse_type("int[][]", &types),
            DataType::Array(Box::new(DataType::Array(Box::new(DataType::Integer))))
        );
        assert_eq!(parse_type("geometry", &types), DataType::Other("geometry".to_string()));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let yaml = r#"
types:
  - { name: t, fields: [] }
  - { name: T, fields: [] }
tables: []
"#;
        let err = SchemaFixture::from_yaml(yaml).unwrap().tables().unwrap_err();
        assert!(matches!(err, FixtureError::DuplicateType(_)));
    }

    #[test]
    fn test_snapshot_from_fixture() {
        let snapshot = shop_schema().unwrap().snapshot().unwrap();
        assert!(snapshot.table("shop", "invoices").is_some());
    }
}

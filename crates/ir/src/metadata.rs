// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for database schema information
//!
//! This module defines the records a catalog source hands over to analysis:
//! tables, their columns and column data types.

use serde::{Deserialize, Serialize};

use crate::kind::DataKind;

/// SQL data types (unified across dialects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataType {
    // Numeric types
    Integer,
    BigInt,
    SmallInt,
    TinyInt,
    Decimal,
    Float,
    Double,

    // String types
    Varchar(Option<usize>),
    Char(Option<usize>),
    Text,

    // Binary types
    Binary,
    VarBinary(Option<usize>),
    Blob,

    // Date/Time types
    Date,
    Time,
    DateTime,
    Timestamp,

    // Boolean
    Boolean,

    // JSON
    Json,

    // Special types
    Uuid,
    Enum(Vec<String>),
    Array(Box<DataType>),
    /// Named composite type with ordered fields
    Struct {
        name: String,
        fields: Vec<ColumnMetadata>,
    },

    // Unknown/Other (with original type name)
    Other(String),
}

impl DataType {
    /// Coarse kind used for expression typing
    pub fn data_kind(&self) -> DataKind {
        match self {
            DataType::Integer
            | DataType::BigInt
            | DataType::SmallInt
            | DataType::TinyInt
            | DataType::Decimal
            | DataType::Float
            | DataType::Double => DataKind::Numeric,
            DataType::Varchar(_) | DataType::Char(_) | DataType::Text | DataType::Enum(_) => {
                DataKind::String
            }
            DataType::Uuid => DataKind::String,
            DataType::Binary | DataType::VarBinary(_) => DataKind::Binary,
            DataType::Blob => DataKind::Content,
            DataType::Date | DataType::Time | DataType::DateTime | DataType::Timestamp => {
                DataKind::Datetime
            }
            DataType::Boolean => DataKind::Boolean,
            DataType::Json => DataKind::Document,
            DataType::Array(_) => DataKind::Array,
            DataType::Struct { .. } => DataKind::Struct,
            DataType::Other(_) => DataKind::Unknown,
        }
    }

    /// SQL spelling of the type
    pub fn type_name(&self) -> String {
        match self {
            DataType::Integer => "INTEGER".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::SmallInt => "SMALLINT".to_string(),
            DataType::TinyInt => "TINYINT".to_string(),
            DataType::Decimal => "DECIMAL".to_string(),
            DataType::Float => "FLOAT".to_string(),
            DataType::Double => "DOUBLE".to_string(),
            DataType::Varchar(Some(n)) => format!("VARCHAR({n})"),
            DataType::Varchar(None) => "VARCHAR".to_string(),
            DataType::Char(Some(n)) => format!("CHAR({n})"),
            DataType::Char(None) => "CHAR".to_string(),
            DataType::Text => "TEXT".to_string(),
            DataType::Binary => "BINARY".to_string(),
            DataType::VarBinary(Some(n)) => format!("VARBINARY({n})"),
            DataType::VarBinary(None) => "VARBINARY".to_string(),
            DataType::Blob => "BLOB".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::Time => "TIME".to_string(),
            DataType::DateTime => "DATETIME".to_string(),
            DataType::Timestamp => "TIMESTAMP".to_string(),
            DataType::Boolean => "BOOLEAN".to_string(),
            DataType::Json => "JSON".to_string(),
            DataType::Uuid => "UUID".to_string(),
            DataType::Enum(values) => format!("ENUM({})", values.join(", ")),
            DataType::Array(element) => format!("{}[]", element.type_name()),
            DataType::Struct { name, .. } => name.clone(),
            DataType::Other(name) => name.clone(),
        }
    }

    /// Element type of an array type
    pub fn element_type(&self) -> Option<&DataType> {
        match self {
            DataType::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Fields of a composite type
    pub fn fields(&self) -> &[ColumnMetadata] {
        match self {
            DataType::Struct { fields, .. } => fields,
            _ => &[],
        }
    }
}

/// Kind of a table-like catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    Table,
    View,
    MaterializedView,
    Temporary,
    System,
    Other(String),
}

impl TableType {
    /// Whether rows come from a stored query rather than table storage
    pub fn is_view(&self) -> bool {
        matches!(self, TableType::View | TableType::MaterializedView)
    }
}

/// Column record as delivered by a catalog source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub comment: Option<String>,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            comment: None,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Table or view record with its columns in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub name: String,
    pub schema: String,
    pub columns: Vec<ColumnMetadata>,
    pub comment: Option<String>,
    pub table_type: TableType,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            columns: Vec::new(),
            comment: None,
            table_type: TableType::Table,
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Column named exactly `name`
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_kind_mapping() {
        assert_eq!(DataType::BigInt.data_kind(), DataKind::Numeric);
        assert_eq!(DataType::Varchar(Some(255)).data_kind(), DataKind::String);
        assert_eq!(DataType::Timestamp.data_kind(), DataKind::Datetime);
        assert_eq!(DataType::Json.data_kind(), DataKind::Document);
        assert_eq!(
            DataType::Array(Box::new(DataType::Integer)).data_kind(),
            DataKind::Array
        );
        assert_eq!(DataType::Other("geometry".into()).data_kind(), DataKind::Unknown);
    }

    #[test]
    fn test_type_name_nests_arrays() {
        let ty = DataType::Array(Box::new(DataType::Array(Box::new(DataType::Text))));
        assert_eq!(ty.type_name(), "TEXT[][]");
        assert_eq!(DataType::Varchar(Some(64)).type_name(), "VARCHAR(64)");
    }

    #[test]
    fn test_struct_fields() {
        let ty = DataType::Struct {
            name: "address".into(),
            fields: vec![
                ColumnMetadata::new("street", DataType::Text),
                ColumnMetadata::new("zip", DataType::Char(Some(5))),
            ],
        };
        assert_eq!(ty.data_kind(), DataKind::Struct);
        assert_eq!(ty.fields().len(), 2);
        assert!(DataType::Text.fields().is_empty());
    }

    #[test]
    fn test_table_builder() {
        let table = TableMetadata::new("users", "myapp")
            .with_type(TableType::MaterializedView)
            .with_columns(vec![
                ColumnMetadata::new("id", DataType::Integer),
                ColumnMetadata::new("email", DataType::Varchar(Some(255))).with_nullable(true),
            ]);
        assert!(table.table_type.is_view());
        assert!(table.column("email").is_some_and(|c| c.nullable));
        assert!(table.column("missing").is_none());
    }
}

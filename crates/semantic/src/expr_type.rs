// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Expression types
//!
//! [`ExprType`] is the type of a value expression as far as static analysis
//! can tell. It is derived from catalog metadata by
//! [`ExprType::for_typed_object`] and answers member (`a.b`) and subscript
//! (`a[1]`) lookups.
//!
//! Types built from synthetic metadata are [`ExprType::Dummy`], which
//! answers every member and subscript lookup with another dummy type so
//! chained access on unknown data never stops inference.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;
use unified_sql_lsp_catalog::{DbObjectRef, ObjectKind, ProgressMonitor, TypeDescriptorRef, check_canceled};
use unified_sql_lsp_ir::{DataKind, Dialect};

use crate::error::SemanticResult;
use crate::known_sources::SourceResolutionResult;
use crate::source::RowsSourceRef;
use crate::symbol::{Symbol, SymbolClass, SymbolDefinition};

/// Type of a value expression
#[derive(Debug, Clone)]
pub enum ExprType {
    /// Dialect-independent kind with no backing metadata
    Predefined {
        name: Cow<'static, str>,
        kind: DataKind,
    },
    /// Whole row of a referenced source, as in `SELECT t FROM t`
    Row {
        reference: Symbol,
        resolved: Box<SourceResolutionResult>,
    },
    /// Composite type with named attributes
    Complex {
        declarator: Option<SymbolDefinition>,
        entity: DbObjectRef,
        kind: DataKind,
        attrs: Arc<IndexMap<String, DbObjectRef>>,
        dialect: Dialect,
    },
    /// Array-like type with a known element type
    Indexable {
        declarator: Option<SymbolDefinition>,
        typed: DbObjectRef,
        kind: DataKind,
        element: DbObjectRef,
        dialect: Dialect,
    },
    /// Array-like type described by a dialect type descriptor
    DescribedIndexable {
        declarator: Option<SymbolDefinition>,
        typed: DbObjectRef,
        kind: DataKind,
        descriptor: TypeDescriptorRef,
        dialect: Dialect,
    },
    /// Opaque scalar backed by metadata
    Simple {
        declarator: Option<SymbolDefinition>,
        typed: DbObjectRef,
        kind: DataKind,
    },
    /// Type of anything backed by synthetic metadata
    Dummy {
        declarator: Option<SymbolDefinition>,
    },
}

const fn predefined(name: &'static str, kind: DataKind) -> ExprType {
    ExprType::Predefined {
        name: Cow::Borrowed(name),
        kind,
    }
}

impl ExprType {
    pub const STRING: ExprType = predefined("STRING", DataKind::String);
    pub const BOOLEAN: ExprType = predefined("BOOLEAN", DataKind::Boolean);
    pub const NUMERIC: ExprType = predefined("NUMERIC", DataKind::Numeric);
    pub const DATETIME: ExprType = predefined("DATETIME", DataKind::Datetime);
    pub const UNKNOWN: ExprType = predefined("UNKNOWN", DataKind::Unknown);
    pub const ANY: ExprType = predefined("ANY", DataKind::Any);
    pub const DUMMY: ExprType = ExprType::Dummy { declarator: None };

    const DUMMY_FIELD: ExprType = ExprType::Dummy {
        declarator: Some(SymbolDefinition::Class(SymbolClass::CompositeField)),
    };

    /// Predefined type for a data kind, named after the kind
    pub fn for_predefined(kind: DataKind) -> ExprType {
        let name = match kind {
            DataKind::Boolean => "BOOLEAN",
            DataKind::Numeric => "NUMERIC",
            DataKind::String => "STRING",
            DataKind::Datetime => "DATETIME",
            DataKind::Binary => "BINARY",
            DataKind::Content => "CONTENT",
            DataKind::Struct => "STRUCT",
            DataKind::Document => "DOCUMENT",
            DataKind::Array => "ARRAY",
            DataKind::Object => "OBJECT",
            DataKind::Reference => "REFERENCE",
            DataKind::Rowid => "ROWID",
            DataKind::Any => "ANY",
            DataKind::Unknown => "UNKNOWN",
        };
        predefined(name, kind)
    }

    /// Type named by an explicit type reference such as a CAST target
    pub fn for_explicit_type_ref(type_name: impl Into<String>) -> ExprType {
        ExprType::Predefined {
            name: Cow::Owned(type_name.into()),
            kind: DataKind::Unknown,
        }
    }

    /// Type of a scalar subquery: its first column, if known
    pub fn for_scalar_subquery(source: &RowsSourceRef) -> ExprType {
        source
            .result_context()
            .and_then(|ctx| ctx.columns_list().first().map(|c| c.ty.clone()))
            .unwrap_or(ExprType::UNKNOWN)
    }

    /// Type of a whole-row reference to a resolved source
    pub fn for_referenced_row(reference: Symbol, resolved: SourceResolutionResult) -> ExprType {
        ExprType::Row {
            reference,
            resolved: Box::new(resolved),
        }
    }

    /// Classify a typed catalog object
    ///
    /// Checked in order: synthetic metadata, type descriptor, declared data
    /// type, element type, attributes. Anything left is [`ExprType::Simple`].
    pub fn for_typed_object(
        progress: &dyn ProgressMonitor,
        object: &DbObjectRef,
        class: SymbolClass,
        dialect: Dialect,
    ) -> SemanticResult<ExprType> {
        check_canceled(progress)?;
        let declarator = SymbolDefinition::DbObject {
            object: object.clone(),
            class,
        };
        Self::for_typed_object_impl(progress, object, Some(declarator), dialect)
    }

    fn for_typed_object_impl(
        progress: &dyn ProgressMonitor,
        object: &DbObjectRef,
        declarator: Option<SymbolDefinition>,
        dialect: Dialect,
    ) -> SemanticResult<ExprType> {
        if object.is_synthetic() {
            return Ok(ExprType::DUMMY);
        }
        let Some(typed) = object.as_typed() else {
            trace!(object = ?object, "untyped object");
            return Ok(ExprType::UNKNOWN);
        };

        if let Some(ty) = Self::for_described_if_present(
            progress,
            object,
            typed.type_descriptor(),
            declarator.clone(),
            dialect,
        )? {
            return Ok(ty);
        }

        if let Some(data_type) = typed.declared_type() {
            if !data_type.ptr_eq(object) {
                return Self::for_typed_object_impl(progress, &data_type, declarator, dialect);
            }
        }

        let kind = typed.data_kind();
        if object.kind() == ObjectKind::DataType {
            if let Some(element) = typed.component_type(progress)? {
                return Ok(ExprType::Indexable {
                    declarator,
                    typed: object.clone(),
                    kind,
                    element,
                    dialect,
                });
            }
            if let Some(entity) = object.as_entity() {
                let mut attrs = IndexMap::new();
                for attr in entity.attributes(progress)? {
                    attrs.entry(dialect.quoted_if_needed(attr.name())).or_insert(attr);
                }
                return Ok(ExprType::Complex {
                    declarator,
                    entity: object.clone(),
                    kind,
                    attrs: Arc::new(attrs),
                    dialect,
                });
            }
        }

        Ok(ExprType::Simple {
            declarator,
            typed: object.clone(),
            kind,
        })
    }

    fn for_described_if_present(
        progress: &dyn ProgressMonitor,
        typed: &DbObjectRef,
        descriptor: Option<TypeDescriptorRef>,
        declarator: Option<SymbolDefinition>,
        dialect: Dialect,
    ) -> SemanticResult<Option<ExprType>> {
        let Some(descriptor) = descriptor else {
            return Ok(None);
        };

        if descriptor.is_indexable() {
            let kind = typed
                .as_typed()
                .map(|t| t.data_kind())
                .unwrap_or(DataKind::Array);
            return Ok(Some(ExprType::DescribedIndexable {
                declarator,
                typed: typed.clone(),
                kind,
                descriptor,
                dialect,
            }));
        }

        match descriptor.underlying_type() {
            Some(underlying) => {
                Self::for_typed_object_impl(progress, &underlying, declarator, dialect).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn data_kind(&self) -> DataKind {
        match self {
            ExprType::Predefined { kind, .. }
            | ExprType::Complex { kind, .. }
            | ExprType::Indexable { kind, .. }
            | ExprType::DescribedIndexable { kind, .. }
            | ExprType::Simple { kind, .. } => *kind,
            ExprType::Row { .. } | ExprType::Dummy { .. } => DataKind::Any,
        }
    }

    /// Definition to navigate to from an expression of this type
    pub fn declarator(&self) -> Option<&SymbolDefinition> {
        match self {
            ExprType::Predefined { .. } => None,
            ExprType::Row { reference, .. } => reference.definition.as_ref(),
            ExprType::Complex { declarator, .. }
            | ExprType::Indexable { declarator, .. }
            | ExprType::DescribedIndexable { declarator, .. }
            | ExprType::Simple { declarator, .. }
            | ExprType::Dummy { declarator } => declarator.as_ref(),
        }
    }

    /// Catalog object this type was derived from
    pub fn typed_object(&self) -> Option<&DbObjectRef> {
        match self {
            ExprType::Complex { entity, .. } => Some(entity),
            ExprType::Indexable { typed, .. }
            | ExprType::DescribedIndexable { typed, .. }
            | ExprType::Simple { typed, .. } => Some(typed),
            _ => None,
        }
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self, ExprType::Dummy { .. })
    }

    /// Name shown to the user, if the type has one
    pub fn display_name(&self) -> Option<String> {
        match self {
            ExprType::Predefined { name, .. } => Some(name.to_string()),
            ExprType::Row {
                reference,
                resolved,
            } => Some(match &resolved.table {
                Some(table) => table.qualified_name(),
                None => reference.name.clone(),
            }),
            ExprType::Complex { entity, .. } => Some(full_type_name(entity)),
            ExprType::Indexable { typed, .. } | ExprType::Simple { typed, .. } => {
                Some(full_type_name(typed))
            }
            ExprType::DescribedIndexable { descriptor, .. } => {
                Some(descriptor.type_name().to_string())
            }
            ExprType::Dummy { .. } => None,
        }
    }

    /// Type of member `name`, as in `value.name`
    pub fn find_named_member_type(
        &self,
        progress: &dyn ProgressMonitor,
        name: &str,
    ) -> SemanticResult<Option<ExprType>> {
        match self {
            ExprType::Dummy { .. } => Ok(Some(ExprType::DUMMY_FIELD)),
            ExprType::Row { resolved, .. } => {
                let Some(context) = resolved.source.result_context() else {
                    return Ok(None);
                };
                Ok(context.resolve_column(progress, name)?.map(|c| c.ty))
            }
            ExprType::Complex {
                entity,
                attrs,
                dialect,
                ..
            } => {
                check_canceled(progress)?;
                let mut attr = dialect
                    .find_by_identifier(name, attrs.keys(), String::as_str)
                    .and_then(|key| attrs.get(key))
                    .cloned();
                if attr.is_none() {
                    if let Some(entity) = entity.as_entity() {
                        attr = entity.attribute(progress, &dialect.canonical_identifier(name))?;
                    }
                }
                match attr {
                    Some(attr) => {
                        Self::for_typed_object(progress, &attr, SymbolClass::CompositeField, *dialect)
                            .map(Some)
                    }
                    None => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    /// Type produced by `depth` chained subscripts
    ///
    /// `slicing` carries one flag per subscript, `true` for a slice that
    /// keeps the array type and `false` for element access.
    pub fn find_indexed_item_type(
        &self,
        progress: &dyn ProgressMonitor,
        depth: usize,
        slicing: Option<&[bool]>,
    ) -> SemanticResult<Option<ExprType>> {
        match self {
            ExprType::Dummy { .. } => Ok(Some(ExprType::DUMMY_FIELD)),
            ExprType::Indexable {
                declarator,
                element,
                dialect,
                ..
            } => {
                if depth == 0 {
                    return Ok(Some(self.clone()));
                }
                let element_type = || {
                    Self::for_typed_object_impl(progress, element, declarator.clone(), *dialect)
                };
                match slicing {
                    None => {
                        let item = element_type()?;
                        if depth == 1 {
                            Ok(Some(item))
                        } else {
                            item.find_indexed_item_type(progress, depth - 1, None)
                        }
                    }
                    Some(flags) => match flags.len().checked_sub(depth).and_then(|i| flags.get(i)) {
                        Some(true) => Ok(Some(self.clone())),
                        Some(false) => element_type().map(Some),
                        None => Ok(None),
                    },
                }
            }
            ExprType::DescribedIndexable {
                declarator,
                typed,
                descriptor,
                dialect,
                ..
            } => Self::for_described_if_present(
                progress,
                typed,
                descriptor.indexable_item_type(depth, slicing),
                declarator.clone(),
                *dialect,
            ),
            _ => Ok(None),
        }
    }

    /// Common type of two branches of one expression, if they agree
    ///
    /// `ANY` absorbs the other side. Returns `None` when the types do not
    /// unify; callers report that as an unknown expression type.
    pub fn try_combine_if_matches(a: &ExprType, b: &ExprType) -> Option<ExprType> {
        if a.data_kind() == DataKind::Any {
            return Some(a.clone());
        }
        if b.data_kind() == DataKind::Any {
            return Some(b.clone());
        }

        let (ka, kb) = (a.data_kind(), b.data_kind());
        let matches = (!ka.is_complex() && !kb.is_complex() && ka == kb)
            || match (a, b) {
                (ExprType::Complex { entity: x, .. }, ExprType::Complex { entity: y, .. }) => {
                    x == y
                }
                (ExprType::Indexable { element: x, .. }, ExprType::Indexable { element: y, .. }) => {
                    data_types_match(x, y)
                }
                (
                    ExprType::DescribedIndexable { descriptor: x, .. },
                    ExprType::DescribedIndexable { descriptor: y, .. },
                ) => x == y,
                _ => false,
            };

        matches.then(|| a.clone())
    }
}

fn full_type_name(object: &DbObjectRef) -> String {
    object
        .as_typed()
        .map(|t| t.full_type_name())
        .unwrap_or_else(|| object.name().to_string())
}

fn data_types_match(a: &DbObjectRef, b: &DbObjectRef) -> bool {
    let kind = |o: &DbObjectRef| o.as_typed().map(|t| t.data_kind()).unwrap_or(DataKind::Unknown);
    let (ka, kb) = (kind(a), kind(b));
    (!ka.is_complex() && !kb.is_complex() && ka == kb)
        || (ka.is_complex() && kb.is_complex() && a == b)
}

/// Types compare by what they describe, not where they were declared
impl PartialEq for ExprType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ExprType::Predefined { name: a, kind: ka },
                ExprType::Predefined { name: b, kind: kb },
            ) => a == b && ka == kb,
            (ExprType::Row { resolved: a, .. }, ExprType::Row { resolved: b, .. }) => {
                a.source == b.source
            }
            (ExprType::Complex { entity: a, .. }, ExprType::Complex { entity: b, .. }) => a == b,
            (
                ExprType::Indexable {
                    typed: a,
                    element: ea,
                    ..
                },
                ExprType::Indexable {
                    typed: b,
                    element: eb,
                    ..
                },
            ) => a == b && ea == eb,
            (
                ExprType::DescribedIndexable {
                    typed: a,
                    descriptor: da,
                    ..
                },
                ExprType::DescribedIndexable {
                    typed: b,
                    descriptor: db,
                    ..
                },
            ) => a == b && da == db,
            (ExprType::Simple { typed: a, .. }, ExprType::Simple { typed: b, .. }) => a == b,
            (ExprType::Dummy { .. }, ExprType::Dummy { .. }) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprType::Predefined { name, .. } => write!(f, "PredefinedType[{name}]"),
            ExprType::Row { .. } => {
                write!(f, "RowType[{}]", self.display_name().unwrap_or_default())
            }
            ExprType::Complex { entity, .. } => write!(f, "ComplexType[{}]", full_type_name(entity)),
            ExprType::Indexable { element, .. } => {
                write!(f, "IndexableType[{}]", full_type_name(element))
            }
            ExprType::DescribedIndexable { descriptor, .. } => {
                write!(f, "DescribedIndexableType[{}]", descriptor.type_name())
            }
            ExprType::Simple { typed, .. } => write!(f, "SimpleType[{}]", full_type_name(typed)),
            ExprType::Dummy { .. } => write!(f, "DummyType[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unified_sql_lsp_catalog::VoidProgressMonitor;

    #[test]
    fn test_predefined_names() {
        assert_eq!(ExprType::for_predefined(DataKind::String), ExprType::STRING);
        assert_eq!(ExprType::NUMERIC.display_name().as_deref(), Some("NUMERIC"));
        assert_eq!(ExprType::BOOLEAN.to_string(), "PredefinedType[BOOLEAN]");
    }

    #[test]
    fn test_combine_same_kind() {
        assert_eq!(
            ExprType::try_combine_if_matches(&ExprType::STRING, &ExprType::STRING),
            Some(ExprType::STRING)
        );
    }

    #[test]
    fn test_combine_different_kinds_fails() {
        assert_eq!(
            ExprType::try_combine_if_matches(&ExprType::STRING, &ExprType::NUMERIC),
            None
        );
    }

    #[test]
    fn test_any_absorbs() {
        for other in [
            ExprType::STRING,
            ExprType::NUMERIC,
            ExprType::UNKNOWN,
            ExprType::DUMMY,
            ExprType::for_explicit_type_ref("geometry"),
        ] {
            assert_eq!(
                ExprType::try_combine_if_matches(&ExprType::ANY, &other),
                Some(ExprType::ANY)
            );
            assert_eq!(
                ExprType::try_combine_if_matches(&other, &ExprType::ANY),
                if other.data_kind() == DataKind::Any {
                    Some(other.clone())
                } else {
                    Some(ExprType::ANY)
                }
            );
        }
    }

    #[test]
    fn test_dummy_chain_never_ends() {
        let progress = VoidProgressMonitor;
        let mut ty = ExprType::DUMMY;
        for name in ["a", "b", "c"] {
            ty = ty.find_named_member_type(&progress, name).unwrap().unwrap();
            assert!(ty.is_dummy());
        }
        let item = ty.find_indexed_item_type(&progress, 2, None).unwrap().unwrap();
        assert!(item.is_dummy());
        assert_eq!(item.declarator().map(|d| d.symbol_class()), Some(SymbolClass::CompositeField));
    }

    #[test]
    fn test_predefined_has_no_members() {
        let progress = VoidProgressMonitor;
        assert!(ExprType::STRING.find_named_member_type(&progress, "x").unwrap().is_none());
        assert!(ExprType::STRING.find_indexed_item_type(&progress, 1, None).unwrap().is_none());
    }

    #[test]
    fn test_explicit_type_ref() {
        let ty = ExprType::for_explicit_type_ref("INTERVAL");
        assert_eq!(ty.data_kind(), DataKind::Unknown);
        assert_eq!(ty.to_string(), "PredefinedType[INTERVAL]");
    }

    #[test]
    fn test_scalar_subquery_without_context_is_unknown() {
        assert_eq!(ExprType::for_scalar_subquery(&RowsSourceRef::subquery()), ExprType::UNKNOWN);
    }

    #[test]
    fn test_dummy_display() {
        assert_eq!(ExprType::DUMMY.to_string(), "DummyType[]");
        assert!(ExprType::DUMMY.display_name().is_none());
    }
}

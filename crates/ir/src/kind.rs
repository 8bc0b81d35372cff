// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Value kinds and pseudo attributes
//!
//! Coarse classification of values shared by catalog metadata and expression
//! typing, plus the description of columns a dialect synthesizes on its own.

use serde::{Deserialize, Serialize};

/// Coarse classification of a value's type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Boolean,
    Numeric,
    String,
    Datetime,
    Binary,
    Content,
    Struct,
    Document,
    Array,
    Object,
    Reference,
    Rowid,
    Any,
    Unknown,
}

impl DataKind {
    /// Kinds whose values carry named or indexed members
    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            DataKind::Struct | DataKind::Document | DataKind::Array | DataKind::Object
        )
    }
}

/// How far a pseudo column stays visible through nested scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropagationPolicy {
    /// Provided by a table rowset, visible only where the table itself is
    TableLocal,
    /// Provided by a table rowset, survives projection into enclosing queries
    TableGlobal,
    /// Session-wide value, visible everywhere
    GlobalVariable,
}

impl PropagationPolicy {
    pub fn provided_by_rowset(&self) -> bool {
        matches!(self, PropagationPolicy::TableLocal | PropagationPolicy::TableGlobal)
    }

    pub fn survives_projection(&self) -> bool {
        matches!(self, PropagationPolicy::TableGlobal)
    }

    pub fn is_global(&self) -> bool {
        matches!(self, PropagationPolicy::GlobalVariable)
    }
}

/// Static description of a dialect-provided pseudo column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PseudoAttribute {
    pub name: &'static str,
    pub kind: DataKind,
    pub policy: PropagationPolicy,
    pub description: &'static str,
}

impl PseudoAttribute {
    pub const fn global(name: &'static str, kind: DataKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            policy: PropagationPolicy::GlobalVariable,
            description,
        }
    }

    pub const fn rowset(
        name: &'static str,
        kind: DataKind,
        policy: PropagationPolicy,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            policy,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complex_kinds() {
        assert!(DataKind::Struct.is_complex());
        assert!(DataKind::Array.is_complex());
        assert!(!DataKind::String.is_complex());
        assert!(!DataKind::Any.is_complex());
    }

    #[test]
    fn test_propagation_policy() {
        assert!(PropagationPolicy::TableLocal.provided_by_rowset());
        assert!(!PropagationPolicy::TableLocal.survives_projection());
        assert!(PropagationPolicy::TableGlobal.survives_projection());
        assert!(PropagationPolicy::GlobalVariable.is_global());
        assert!(!PropagationPolicy::GlobalVariable.provided_by_rowset());
    }
}

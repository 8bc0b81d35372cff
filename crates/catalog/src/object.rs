// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata object model
//!
//! Catalog objects are exposed to analysis through a small set of orthogonal
//! capabilities rather than one wide interface:
//!
//! - [`DbObject`]: every object has a name and a kind
//! - [`HasChildren`]: containers (data sources, catalogs, schemas)
//! - [`HasAttributes`]: entities with named attributes (tables, composite types)
//! - [`TypedObject`]: objects carrying a value type (columns, data types)
//!
//! Objects are shared through [`DbObjectRef`], a cheap handle compared and
//! hashed by identity, so two lookups returning the same table can be
//! recognized as such without comparing names.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use unified_sql_lsp_ir::DataKind;

use crate::error::CatalogResult;
use crate::progress::ProgressMonitor;

/// Classification of catalog objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    DataSource,
    Catalog,
    Schema,
    Table,
    View,
    Column,
    DataType,
}

impl ObjectKind {
    /// Kinds a FROM clause may reference
    pub fn is_table_like(&self) -> bool {
        matches!(self, ObjectKind::Table | ObjectKind::View)
    }
}

/// Base capability shared by every catalog object
pub trait DbObject: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn kind(&self) -> ObjectKind;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Dot-separated path from the outermost container
    fn qualified_name(&self) -> String {
        self.name().to_string()
    }

    /// Whether this object was fabricated for connection-less analysis
    fn is_synthetic(&self) -> bool {
        false
    }

    fn as_container(&self) -> Option<&dyn HasChildren> {
        None
    }

    fn as_entity(&self) -> Option<&dyn HasAttributes> {
        None
    }

    fn as_typed(&self) -> Option<&dyn TypedObject> {
        None
    }
}

/// Objects that contain other objects
pub trait HasChildren: Send + Sync {
    fn children(&self, progress: &dyn ProgressMonitor) -> CatalogResult<Vec<DbObjectRef>>;

    /// Exact-name child lookup
    fn child(&self, progress: &dyn ProgressMonitor, name: &str)
    -> CatalogResult<Option<DbObjectRef>>;
}

/// Entities exposing named attributes
pub trait HasAttributes: Send + Sync {
    fn attributes(&self, progress: &dyn ProgressMonitor) -> CatalogResult<Vec<DbObjectRef>>;

    /// Exact-name attribute lookup
    ///
    /// Providers are not required to fold case here; callers needing dialect
    /// matching go through `Dialect::find_by_identifier`.
    fn attribute(
        &self,
        progress: &dyn ProgressMonitor,
        name: &str,
    ) -> CatalogResult<Option<DbObjectRef>>;
}

/// Objects carrying a value type
pub trait TypedObject: Send + Sync {
    fn data_kind(&self) -> DataKind;

    fn type_name(&self) -> String;

    fn full_type_name(&self) -> String {
        self.type_name()
    }

    /// Data type object this object is declared with, if distinct from itself
    fn declared_type(&self) -> Option<DbObjectRef> {
        None
    }

    /// Dialect-specific descriptor consulted before the plain metadata
    fn type_descriptor(&self) -> Option<TypeDescriptorRef> {
        None
    }

    /// Element type of an array-like data type
    fn component_type(&self, _progress: &dyn ProgressMonitor) -> CatalogResult<Option<DbObjectRef>> {
        Ok(None)
    }
}

/// Dialect-supplied description of a data type's indexing behavior
pub trait TypeDescriptor: Send + Sync + fmt::Debug {
    fn type_name(&self) -> &str;

    fn is_indexable(&self) -> bool;

    /// Known type this descriptor is an alias for
    fn underlying_type(&self) -> Option<DbObjectRef>;

    /// Descriptor of the value produced by `depth` chained subscripts
    ///
    /// `slicing` carries one flag per subscript: `true` for a slice, `false`
    /// for element access.
    fn indexable_item_type(&self, depth: usize, slicing: Option<&[bool]>)
    -> Option<TypeDescriptorRef>;
}

macro_rules! identity_handle {
    ($name:ident, $target:ident) => {
        #[derive(Clone)]
        pub struct $name(Arc<dyn $target>);

        impl $name {
            pub fn new<T: $target + 'static>(value: T) -> Self {
                Self(Arc::new(value))
            }

            pub fn from_arc(value: Arc<dyn $target>) -> Self {
                Self(value)
            }

            pub fn ptr_eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
            }

            fn addr(&self) -> *const () {
                Arc::as_ptr(&self.0) as *const ()
            }
        }

        impl Deref for $name {
            type Target = dyn $target;

            fn deref(&self) -> &Self::Target {
                self.0.as_ref()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.addr() == other.addr()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.addr().hash(state);
            }
        }
    };
}

identity_handle!(DbObjectRef, DbObject);
identity_handle!(TypeDescriptorRef, TypeDescriptor);

impl fmt::Debug for DbObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind(), self.qualified_name())
    }
}

impl fmt::Debug for TypeDescriptorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug)]
    struct Named(&'static str);

    impl DbObject for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn kind(&self) -> ObjectKind {
            ObjectKind::Table
        }
    }

    #[test]
    fn test_identity_not_name_equality() {
        let a = DbObjectRef::new(Named("users"));
        let b = DbObjectRef::new(Named("users"));
        let a2 = a.clone();

        assert_ne!(a, b);
        assert_eq!(a, a2);
        assert!(a.ptr_eq(&a2));

        let set: HashSet<_> = [a.clone(), b, a2].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_default_capabilities() {
        let obj = DbObjectRef::new(Named("users"));
        assert!(!obj.is_synthetic());
        assert!(obj.as_entity().is_none());
        assert!(obj.as_container().is_none());
        assert!(obj.as_typed().is_none());
        assert_eq!(format!("{obj:?}"), "Table(users)");
    }

    #[test]
    fn test_table_like_kinds() {
        assert!(ObjectKind::Table.is_table_like());
        assert!(ObjectKind::View.is_table_like());
        assert!(!ObjectKind::Column.is_table_like());
    }
}

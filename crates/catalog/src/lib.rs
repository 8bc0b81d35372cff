// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Unified SQL LSP - Catalog Layer
//!
//! This crate provides the metadata side of semantic analysis:
//!
//! - **Object model**: capability traits ([`DbObject`], [`HasChildren`],
//!   [`HasAttributes`], [`TypedObject`], [`TypeDescriptor`]) behind
//!   identity-compared handles ([`DbObjectRef`], [`TypeDescriptorRef`])
//! - **Providers**: the synchronous [`MetadataProvider`] consulted during
//!   analysis, and the async [`Catalog`] trait implemented by live sources
//! - **Snapshots**: [`CatalogSnapshot`], an in-memory provider loaded once
//!   from a [`Catalog`]
//! - **Synthetic metadata**: [`SyntheticObject`] graphs fabricated from the
//!   names a query references, for connection-less analysis
//! - **Cancellation**: [`ProgressMonitor`] checked at operation entry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use unified_sql_lsp_catalog::{CatalogSnapshot, MetadataProvider, VoidProgressMonitor};
//! use unified_sql_lsp_ir::Dialect;
//!
//! async fn find_users(catalog: &dyn Catalog) -> CatalogResult<()> {
//!     let snapshot = CatalogSnapshot::load(catalog, Dialect::PostgreSQL).await?;
//!     let users = snapshot.find_by_qualified_name(
//!         &VoidProgressMonitor,
//!         None,
//!         &["public".to_string(), "users".to_string()],
//!         false,
//!     )?;
//!     println!("{users:?}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod object;
pub mod progress;
pub mod provider;
pub mod snapshot;
pub mod synthetic;
pub mod r#trait;

// Re-exports
pub use error::{CatalogError, CatalogResult};
pub use object::{
    DbObject, DbObjectRef, HasAttributes, HasChildren, ObjectKind, TypeDescriptor,
    TypeDescriptorRef, TypedObject,
};
pub use progress::{CancellationFlag, ProgressMonitor, VoidProgressMonitor, check_canceled};
pub use provider::MetadataProvider;
pub use r#trait::Catalog;
pub use snapshot::CatalogSnapshot;
pub use synthetic::{SyntheticLevel, SyntheticNames, SyntheticObject};
pub use unified_sql_lsp_ir::{ColumnMetadata, DataType, TableMetadata, TableType};

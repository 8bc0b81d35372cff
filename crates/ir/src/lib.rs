// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Unified SQL LSP - Core Vocabulary
//!
//! This crate holds the dialect-aware vocabulary shared by the catalog and
//! semantic layers:
//! - [`Dialect`] with its identifier case-folding and matching rules
//! - [`DataKind`] and [`PropagationPolicy`] for typing and pseudo columns
//! - catalog metadata records ([`TableMetadata`], [`ColumnMetadata`], [`DataType`])

pub mod dialect;
pub mod kind;
pub mod metadata;

// Re-export commonly used types
pub use dialect::{Dialect, DialectFamily, IdentifierCase};
pub use kind::{DataKind, PropagationPolicy, PseudoAttribute};
pub use metadata::{ColumnMetadata, DataType, TableMetadata, TableType};

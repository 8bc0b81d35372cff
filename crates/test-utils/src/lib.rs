// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for unified-sql-lsp
//!
//! This crate provides common testing components including:
//! - Mock async catalog implementations
//! - Metadata provider builders with a standard schema
//! - YAML schema fixtures
//! - A provider that injects metadata access failures
//! - Tracing setup for tests

pub mod failing_provider;
pub mod fixtures;
pub mod metadata_builder;
pub mod mock_catalog;

// Re-exports for convenience
pub use failing_provider::FailingProvider;
pub use fixtures::{FixtureError, SchemaFixture, shop_schema};
pub use metadata_builder::MetadataBuilder;
pub use mock_catalog::{MockCatalog, MockCatalogBuilder, standard_tables};

use tracing_subscriber::EnvFilter;

/// Install a test subscriber honoring `RUST_LOG`
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

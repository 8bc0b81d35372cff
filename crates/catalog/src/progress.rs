// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Progress and cancellation
//!
//! Every operation that may reach metadata takes a [`ProgressMonitor`] and
//! checks it once at entry. Cancellation is cooperative: nothing is
//! interrupted, the next check simply fails with [`CatalogError::Canceled`].

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{CatalogError, CatalogResult};

/// Cancellation handle passed down through metadata lookups
pub trait ProgressMonitor: Send + Sync {
    fn is_canceled(&self) -> bool;
}

/// Monitor that is never canceled
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidProgressMonitor;

impl ProgressMonitor for VoidProgressMonitor {
    fn is_canceled(&self) -> bool {
        false
    }
}

/// Monitor backed by a flag another thread may raise
#[derive(Debug, Default)]
pub struct CancellationFlag {
    canceled: AtomicBool,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }
}

impl ProgressMonitor for CancellationFlag {
    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}

/// Fail with [`CatalogError::Canceled`] if the monitor was canceled
pub fn check_canceled(progress: &dyn ProgressMonitor) -> CatalogResult<()> {
    if progress.is_canceled() {
        Err(CatalogError::Canceled)
    } else {
        Ok(())
    }
}

//! Application state for the compliance engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::catalog::ComplianceCatalog;
use crate::compliance::SharedOptOutRegistry;

/// Shared application state.
///
/// Holds the immutable rule catalog and the resident opt-out registry.
/// Cloning is cheap; every clone sees the same registry.
#[derive(Clone)]
pub struct AppState {
    /// The loaded rule catalog.
    catalog: Arc<ComplianceCatalog>,
    /// Opt-out consent shared by all requests.
    opt_outs: SharedOptOutRegistry,
}

impl AppState {
    /// Creates a new application state with an empty opt-out registry.
    pub fn new(catalog: ComplianceCatalog) -> Self {
        Self::with_opt_outs(catalog, SharedOptOutRegistry::default())
    }

    /// Creates a new application state around an existing registry.
    pub fn with_opt_outs(catalog: ComplianceCatalog, opt_outs: SharedOptOutRegistry) -> Self {
        Self {
            catalog: Arc::new(catalog),
            opt_outs,
        }
    }

    /// Returns a reference to the rule catalog.
    pub fn catalog(&self) -> &ComplianceCatalog {
        &self.catalog
    }

    /// Returns a shared handle to the catalog.
    pub fn catalog_handle(&self) -> Arc<ComplianceCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Returns the opt-out registry.
    pub fn opt_outs(&self) -> &SharedOptOutRegistry {
        &self.opt_outs
    }
}

//! Catalog configuration loading.
//!
//! This module loads the jurisdiction tree and rule definitions from YAML
//! files and validates every rule's parameters against its rule type.
//!
//! # Example
//!
//! ```no_run
//! use compliance_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/catalog").unwrap();
//! println!("Loaded {} rules", loader.catalog().rules().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{JurisdictionsFile, RawRuleDefinition, RuleFile};

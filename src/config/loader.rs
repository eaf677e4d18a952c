//! Catalog loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the
//! jurisdiction tree and rule catalog from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::catalog::{ComplianceCatalog, JurisdictionResolver, RuleCatalog};
use crate::error::{EngineError, EngineResult};
use crate::models::Jurisdiction;

use super::types::{JurisdictionsFile, RuleFile};

/// Loads and validates a compliance catalog.
///
/// # Directory Structure
///
/// ```text
/// config/catalog/
/// ├── jurisdictions.yaml   # Jurisdiction tree
/// └── rules/
///     ├── eu.yaml          # Rules imposed by one jurisdiction each
///     └── us-ca.yaml
/// ```
///
/// Rule files are read in file-name order, which fixes catalog order.
/// Entries whose parameters fail validation are kept as invalid entries
/// instead of failing the load.
///
/// # Example
///
/// ```no_run
/// use compliance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/catalog")?;
/// println!("Loaded {} rules", loader.catalog().rules().len());
/// # Ok::<(), compliance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    catalog: ComplianceCatalog,
}

impl ConfigLoader {
    /// Loads the catalog from the specified directory.
    ///
    /// Returns an error if:
    /// - `jurisdictions.yaml` or the `rules` directory is missing
    /// - Any file contains invalid YAML or lacks a required field
    /// - The jurisdiction tree has unknown parents or cycles
    /// - A rule file names an unknown jurisdiction
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let jurisdictions_path = path.join("jurisdictions.yaml");
        let jurisdictions = Self::load_yaml::<JurisdictionsFile>(&jurisdictions_path)?;

        let rules_dir = path.join("rules");
        let mut rule_files = Vec::new();
        for file_path in Self::rule_file_paths(&rules_dir)? {
            rule_files.push(Self::load_yaml::<RuleFile>(&file_path)?);
        }

        let loader = Self::build(jurisdictions.jurisdictions, rule_files)?;
        info!(
            path = %path.display(),
            jurisdictions = loader.catalog.resolver().jurisdictions().len(),
            rules = loader.catalog.rules().len(),
            invalid = loader.catalog.rules().invalid_entries().len(),
            "Loaded compliance catalog"
        );
        Ok(loader)
    }

    /// Builds a catalog from in-memory YAML documents.
    ///
    /// `jurisdictions` holds a `jurisdictions.yaml` document and each entry
    /// of `rule_files` a `rules/*.yaml` document, in catalog order.
    pub fn from_yaml(jurisdictions: &str, rule_files: &[&str]) -> EngineResult<Self> {
        let jurisdictions = Self::parse_yaml::<JurisdictionsFile>(jurisdictions, "<jurisdictions>")?;

        let mut files = Vec::with_capacity(rule_files.len());
        for (index, content) in rule_files.iter().enumerate() {
            files.push(Self::parse_yaml::<RuleFile>(
                content,
                &format!("<rules #{}>", index),
            )?);
        }

        Self::build(jurisdictions.jurisdictions, files)
    }

    /// Returns the loaded catalog.
    pub fn catalog(&self) -> &ComplianceCatalog {
        &self.catalog
    }

    /// Consumes the loader, returning the catalog.
    pub fn into_catalog(self) -> ComplianceCatalog {
        self.catalog
    }

    fn build(jurisdictions: Vec<Jurisdiction>, rule_files: Vec<RuleFile>) -> EngineResult<Self> {
        let resolver = JurisdictionResolver::new(jurisdictions)?;

        let mut rules = Vec::new();
        let mut invalid = Vec::new();
        for file in rule_files {
            for raw in file.rules {
                match raw.validate(&file.jurisdiction) {
                    Ok(rule) => rules.push(rule),
                    Err(entry) => {
                        warn!(
                            jurisdiction = %entry.jurisdiction,
                            rule_code = %entry.rule_code,
                            reason = %entry.message,
                            "Rejected rule definition"
                        );
                        invalid.push(entry);
                    }
                }
            }
        }

        let catalog = ComplianceCatalog::new(resolver, RuleCatalog::new(rules, invalid))?;
        Ok(Self { catalog })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Lists the YAML files in the rules directory, sorted by file name.
    fn rule_file_paths(rules_dir: &Path) -> EngineResult<Vec<PathBuf>> {
        let rules_dir_str = rules_dir.display().to_string();

        let entries = fs::read_dir(rules_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rules_dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rules_dir_str.clone(),
            })?;

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            warn!(path = %rules_dir_str, "No rule files found; catalog is empty");
        }

        paths.sort();
        Ok(paths)
    }
}

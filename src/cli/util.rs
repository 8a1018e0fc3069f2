//! CLI Common Utilities
//!
//! Shared initialization and selection parsing for CLI commands.

use std::path::Path;
use std::sync::Arc;

use crate::catalog;
use crate::client::{HttpClient, SharedInsightSource};
use crate::config::{Config, ConfigLoader};
use crate::types::{BenchError, Criterion, Result, Selection};

/// Command execution context
///
/// Loaded configuration plus a client for the configured backend.
#[derive(Clone)]
pub struct CommandContext {
    pub config: Config,
    pub client: Arc<HttpClient>,
    /// Same client, seen through the insights seam
    pub insights: SharedInsightSource,
}

impl CommandContext {
    /// Load config (explicit file if given, else the layered chain) and
    /// build the HTTP client.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        let client = Arc::new(HttpClient::new(&config.api)?);

        Ok(Self {
            config,
            insights: client.clone(),
            client,
        })
    }
}

/// Split a comma-separated id list, dropping blanks
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve ids against the catalog and check the result is reportable.
///
/// Custom criterion names are appended after the catalog criteria.
pub fn build_selection(
    banks: &str,
    criteria: &str,
    product: Option<&str>,
    custom: &[String],
    config: &Config,
) -> Result<Selection> {
    let entities = split_ids(banks)
        .iter()
        .map(|id| catalog::bank(id))
        .collect::<Result<Vec<_>>>()?;

    let mut selected = split_ids(criteria)
        .iter()
        .map(|id| catalog::criterion(id))
        .collect::<Result<Vec<_>>>()?;
    for name in custom {
        selected.push(Criterion::custom(name)?);
    }

    let product = product.unwrap_or(&config.selection.default_product);
    let product = catalog::product(product)?;

    let selection = Selection::new(entities, selected, product.id);
    selection
        .validate(config.selection.min_entities)
        .map_err(BenchError::SelectionIncomplete)?;

    Ok(selection)
}

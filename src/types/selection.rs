//! Selection Model
//!
//! What the analyst picked: banks, a product, and comparison criteria.
//! Ids are unique within each list; `Selection::new` drops repeats so the
//! fetch and evaluation layers never see duplicates.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::{Result, SelectionIssue};

/// A bank taking part in the comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logo: None,
        }
    }
}

/// A comparison criterion, either from the catalog or authored by the user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub custom: bool,
}

impl Criterion {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            custom: false,
        }
    }

    /// Create a user-authored criterion with a freshly generated id.
    pub fn custom(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SelectionIssue::BlankCriterionName.into());
        }

        Ok(Self {
            id: format!("custom-{}", uuid::Uuid::new_v4().simple()),
            name: name.to_string(),
            custom: true,
        })
    }
}

/// Immutable selection handed to the fetch layer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    entities: Vec<Entity>,
    criteria: Vec<Criterion>,
    product: String,
}

impl Selection {
    /// Build a selection, keeping the first occurrence of any repeated id.
    pub fn new(
        entities: impl IntoIterator<Item = Entity>,
        criteria: impl IntoIterator<Item = Criterion>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            entities: dedup_by_id(entities, |e| e.id.as_str()),
            criteria: dedup_by_id(criteria, |c| c.id.as_str()),
            product: product.into(),
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    /// Entity ids joined with commas, in selection order
    pub fn entity_ids(&self) -> String {
        join_ids(self.entities.iter().map(|e| e.id.as_str()))
    }

    /// Criterion ids joined with commas, in selection order
    pub fn criterion_ids(&self) -> String {
        join_ids(self.criteria.iter().map(|c| c.id.as_str()))
    }

    /// Minimum needed before any network call: one entity and one criterion.
    pub fn is_fetchable(&self) -> bool {
        !self.entities.is_empty() && !self.criteria.is_empty()
    }

    /// Check the selection is ready for a report.
    ///
    /// Returns the first problem in the order the user is expected to fix them.
    pub fn validate(&self, min_entities: usize) -> std::result::Result<(), SelectionIssue> {
        if self.entities.len() < min_entities {
            return Err(SelectionIssue::TooFewEntities {
                required: min_entities,
                selected: self.entities.len(),
            });
        }
        if self.product.trim().is_empty() {
            return Err(SelectionIssue::MissingProduct);
        }
        if self.criteria.is_empty() {
            return Err(SelectionIssue::NoCriteria);
        }
        Ok(())
    }
}

fn dedup_by_id<T>(items: impl IntoIterator<Item = T>, id: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(id(item).to_string()))
        .collect()
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(",")
}

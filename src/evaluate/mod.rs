//! Best-Performer Evaluation
//!
//! Pure derivations over a `ComparisonMatrix` used for highlighting:
//! which banks satisfy a criterion, and how many criteria each bank wins.
//!
//! Nothing here fabricates data. An empty matrix has no winners; demo
//! matrices live in [`crate::demo`] and must be requested explicitly.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{ComparisonMatrix, Criterion, Entity};

/// Entity ids satisfying `criterion_id`, in the order of `entities`.
///
/// Ties are not broken: every satisfying entity is a winner.
pub fn winners(entities: &[Entity], matrix: &ComparisonMatrix, criterion_id: &str) -> Vec<String> {
    entities
        .iter()
        .filter(|entity| matrix.get(&entity.id, criterion_id))
        .map(|entity| entity.id.clone())
        .collect()
}

/// Winner sets for every criterion of a selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WinnerTable {
    winners: HashMap<String, Vec<String>>,
}

impl WinnerTable {
    pub fn build(entities: &[Entity], criteria: &[Criterion], matrix: &ComparisonMatrix) -> Self {
        Self {
            winners: criteria
                .iter()
                .map(|criterion| {
                    (
                        criterion.id.clone(),
                        winners(entities, matrix, &criterion.id),
                    )
                })
                .collect(),
        }
    }

    /// Winners for one criterion; empty for unknown criteria
    pub fn winners(&self, criterion_id: &str) -> &[String] {
        self.winners
            .get(criterion_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// A cell is highlighted iff its entity is in a non-empty winner set.
    pub fn is_best(&self, entity_id: &str, criterion_id: &str) -> bool {
        let winners = self.winners(criterion_id);
        !winners.is_empty() && winners.iter().any(|id| id == entity_id)
    }
}

/// Number of satisfied criteria per entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinCount {
    pub entity_id: String,
    pub wins: usize,
}

/// Per-entity count of satisfied criteria, in the order of `entities`.
pub fn win_counts(
    entities: &[Entity],
    criteria: &[Criterion],
    matrix: &ComparisonMatrix,
) -> Vec<WinCount> {
    entities
        .iter()
        .map(|entity| WinCount {
            entity_id: entity.id.clone(),
            wins: criteria
                .iter()
                .filter(|criterion| matrix.get(&entity.id, &criterion.id))
                .count(),
        })
        .collect()
}

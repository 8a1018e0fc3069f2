//! Synthetic Demo Data
//!
//! Explicitly-invoked stand-ins for when the backend has nothing to show.
//! Every result produced here is flagged `is_synthetic`; nothing in the
//! fetch or evaluation layers calls into this module on its own.

use chrono::Utc;
use rand::Rng;

use crate::constants::demo::SATISFIED_PROBABILITY;
use crate::types::{
    ComparisonMatrix, ConfidenceMap, Criterion, Entity, FetchResult, SourceRecord,
};

/// Random demo matrix covering every (entity, criterion) pair.
///
/// All banks share the same probability of satisfying a criterion.
pub fn synthetic_matrix<R: Rng + ?Sized>(
    entities: &[Entity],
    criteria: &[Criterion],
    rng: &mut R,
) -> ComparisonMatrix {
    let mut matrix = ComparisonMatrix::new();
    for entity in entities {
        for criterion in criteria {
            matrix.set(
                entity.id.as_str(),
                criterion.id.as_str(),
                rng.random_bool(SATISFIED_PROBABILITY),
            );
        }
    }
    matrix
}

/// Sources listed alongside demo data
pub fn demo_sources() -> Vec<SourceRecord> {
    vec![
        SourceRecord::new(Some(1), "Banki.ru", "https://banki.ru"),
        SourceRecord::new(Some(2), "Sravni.ru", "https://sravni.ru"),
    ]
}

/// A complete synthetic `FetchResult`, stamped now
pub fn synthetic_result<R: Rng + ?Sized>(
    entities: &[Entity],
    criteria: &[Criterion],
    rng: &mut R,
) -> FetchResult {
    FetchResult {
        matrix: synthetic_matrix(entities, criteria, rng),
        sources: demo_sources(),
        confidence: ConfidenceMap::default(),
        fetched_at: Some(Utc::now()),
        is_synthetic: true,
        note: Some("Mock data for demonstration (no real data available)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn selection() -> (Vec<Entity>, Vec<Criterion>) {
        (
            vec![Entity::new("sber", "Sberbank"), Entity::new("vtb", "VTB")],
            vec![Criterion::new("cost", "Cost"), Criterion::new("sms", "SMS")],
        )
    }

    #[test]
    fn test_matrix_covers_every_pair() {
        let (entities, criteria) = selection();
        let matrix = synthetic_matrix(&entities, &criteria, &mut StdRng::seed_from_u64(7));

        assert_eq!(matrix.entity_count(), 2);
        assert!(matrix.contains_entity("sber"));
        assert!(matrix.contains_entity("vtb"));
    }

    #[test]
    fn test_same_seed_same_matrix() {
        let (entities, criteria) = selection();
        let a = synthetic_matrix(&entities, &criteria, &mut StdRng::seed_from_u64(42));
        let b = synthetic_matrix(&entities, &criteria, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_result_is_flagged_synthetic() {
        let (entities, criteria) = selection();
        let result = synthetic_result(&entities, &criteria, &mut StdRng::seed_from_u64(1));

        assert!(result.is_synthetic);
        assert_eq!(result.sources.len(), 2);
        assert!(result.fetched_at.is_some());
    }

    #[test]
    fn test_probability_is_uniform_across_banks() {
        let entities: Vec<Entity> = ["sber", "vtb"]
            .iter()
            .map(|id| Entity::new(*id, *id))
            .collect();
        let criteria: Vec<Criterion> = (0..2000)
            .map(|i| Criterion::new(format!("c{}", i), "c"))
            .collect();
        let matrix = synthetic_matrix(&entities, &criteria, &mut StdRng::seed_from_u64(3));

        let rate = |entity: &str| {
            criteria.iter().filter(|c| matrix.get(entity, &c.id)).count() as f64
                / criteria.len() as f64
        };
        assert!((rate("sber") - rate("vtb")).abs() < 0.06);
        assert!((rate("sber") - SATISFIED_PROBABILITY).abs() < 0.05);
    }
}

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use labelwise::analysis::ingredients::repository::{IngredientRepository, RepositoryError};

use crate::off::OpenFoodFactsClient;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) products: Arc<OpenFoodFactsClient>,
}

/// Seeded in-memory knowledge base standing in for the curated ingredient
/// store until a persistent backend is wired up.
pub(crate) struct InMemoryIngredientRepository {
    canonical: HashMap<&'static str, &'static str>,
}

impl Default for InMemoryIngredientRepository {
    fn default() -> Self {
        const SEED: &[(&str, &str)] = &[
            ("water", "ing-water"),
            ("carbonated water", "ing-water"),
            ("salt", "ing-salt"),
            ("sea salt", "ing-salt"),
            ("sugar", "ing-sugar"),
            ("cane sugar", "ing-sugar"),
            ("glucose syrup", "ing-glucose-syrup"),
            ("palm oil", "ing-palm-oil"),
            ("sunflower oil", "ing-sunflower-oil"),
            ("wheat flour", "ing-wheat-flour"),
            ("whole milk powder", "ing-milk-powder"),
            ("soy lecithin", "ing-soy-lecithin"),
            ("citric acid", "ing-citric-acid"),
            ("ascorbic acid", "ing-ascorbic-acid"),
        ];

        Self {
            canonical: SEED.iter().copied().collect(),
        }
    }
}

impl IngredientRepository for InMemoryIngredientRepository {
    fn find_canonical_by_name(&self, name: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.canonical.get(name).map(|id| id.to_string()))
    }

    fn aliases(&self, ingredient_id: &str) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .canonical
            .iter()
            .filter(|(_, id)| **id == ingredient_id)
            .map(|(name, _)| name.to_string())
            .collect())
    }
}

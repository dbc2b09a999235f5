use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::json;

use crate::analysis::ingredients::repository::{IngredientRepository, RepositoryError};
use crate::analysis::ingredients::IngredientService;
use crate::analysis::product::{ExternalProduct, ProductSnapshot};
use crate::analysis::report::{LabelConfidence, LabelData, ReportContext, ReportService};
use crate::analysis::scoring::domain::{Allergen, DietPreference, ScoringContext, UserProfile};
use crate::analysis::scoring::{ScoringConfig, ScoringEngine};

/// Knowledge base stub resolving a fixed alias table.
#[derive(Default, Clone)]
pub(super) struct MemoryIngredientRepository {
    canonical: HashMap<String, String>,
}

impl MemoryIngredientRepository {
    pub(super) fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            canonical: entries
                .iter()
                .map(|(name, id)| (name.to_string(), id.to_string()))
                .collect(),
        }
    }
}

impl IngredientRepository for MemoryIngredientRepository {
    fn find_canonical_by_name(&self, name: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.canonical.get(name).cloned())
    }

    fn aliases(&self, ingredient_id: &str) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .canonical
            .iter()
            .filter(|(_, id)| id.as_str() == ingredient_id)
            .map(|(name, _)| name.clone())
            .collect())
    }
}

/// Knowledge base stub that is permanently offline.
pub(super) struct UnavailableIngredientRepository;

impl IngredientRepository for UnavailableIngredientRepository {
    fn find_canonical_by_name(&self, _name: &str) -> Result<Option<String>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn aliases(&self, _ingredient_id: &str) -> Result<Vec<String>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

pub(super) fn nutrition(entries: &[(&str, f64)]) -> BTreeMap<String, Option<f64>> {
    entries
        .iter()
        .map(|(field, value)| (field.to_string(), Some(*value)))
        .collect()
}

pub(super) fn context_with_nutrition(entries: &[(&str, f64)]) -> ScoringContext {
    ScoringContext {
        nutrition: nutrition(entries),
        ..ScoringContext::default()
    }
}

pub(super) fn profile() -> UserProfile {
    UserProfile {
        allergens: vec![Allergen::Peanut],
        diet_preferences: vec![DietPreference::Vegan],
        avoid_list: vec!["palm oil".to_string()],
        ..UserProfile::default()
    }
}

pub(super) fn granola_bar() -> ExternalProduct {
    ExternalProduct {
        barcode: "0123456789012".to_string(),
        name: "Crunchy Peanut Granola Bar".to_string(),
        brand: Some("Sunrise Foods".to_string()),
        categories: vec!["Snacks".to_string(), "Granola bars".to_string()],
        ingredients_text: Some(
            "Ingredients: oats, peanuts, milk chocolate (sugar, cocoa butter, whole milk \
             powder), honey, artificial flavor, e322, salt"
                .to_string(),
        ),
        ingredients_tags: Vec::new(),
        nutrition: nutrition(&[
            ("sugars_100g", 28.0),
            ("salt_100g", 1.6),
            ("saturated-fat_100g", 6.0),
            ("proteins_100g", 9.0),
        ]),
        image_url: None,
        source: "open-food-facts".to_string(),
        source_url: Some("https://world.openfoodfacts.org/product/0123456789012".to_string()),
        raw_data: json!({ "nova_group": 4, "nutriscore_grade": "d" }),
    }
}

pub(super) fn granola_label() -> LabelData {
    LabelData {
        ingredients: vec![
            "oats".to_string(),
            "peanuts".to_string(),
            "milk chocolate (sugar, cocoa butter, whole milk powder)".to_string(),
            "honey".to_string(),
            "artificial flavor".to_string(),
            "e322".to_string(),
            "salt".to_string(),
        ],
        nutrition: BTreeMap::new(),
        allergen_statements: vec!["peanut".to_string()],
        may_contain: vec!["milk".to_string()],
        confidence: Some(LabelConfidence::High),
    }
}

pub(super) fn granola_context() -> ReportContext {
    let product = granola_bar();
    ReportContext {
        product: ProductSnapshot::from_external(&product),
        external_product: Some(product),
        label_data: Some(granola_label()),
        profile: Some(profile()),
    }
}

pub(super) fn build_report_service() -> ReportService<MemoryIngredientRepository> {
    let repository = Arc::new(MemoryIngredientRepository::with_entries(&[
        ("oats", "ing-oats"),
        ("peanuts", "ing-peanut"),
        ("salt", "ing-salt"),
    ]));
    ReportService::new(
        ScoringEngine::new(ScoringConfig::default()),
        IngredientService::new(repository),
    )
}

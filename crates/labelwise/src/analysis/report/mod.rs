//! Report assembly: merges scoring output with normalized ingredients,
//! allergen extraction, and source attribution.

mod views;

pub use views::{
    AllergenEntry, Concern, Flag, IngredientDetail, NutritionView, Report, ReportSummary,
};

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ingredients::repository::IngredientRepository;
use super::ingredients::{IngredientService, NormalizedIngredient};
use super::product::{ExternalProduct, ProductSnapshot};
use super::scoring::domain::{
    AllergenProvenance, Evidence, EvidenceSource, RuleResult, ScoringContext, UserProfile,
};
use super::scoring::ScoringEngine;

/// OCR quality tier reported by the label parsing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelConfidence {
    High,
    Medium,
    Low,
}

impl LabelConfidence {
    pub const fn label(self) -> &'static str {
        match self {
            LabelConfidence::High => "high",
            LabelConfidence::Medium => "medium",
            LabelConfidence::Low => "low",
        }
    }

    /// Evidence confidence assigned to label-sourced data at this tier.
    pub const fn source_confidence(self) -> u8 {
        match self {
            LabelConfidence::High => 85,
            LabelConfidence::Medium => 70,
            LabelConfidence::Low => 50,
        }
    }
}

/// Structured output of the label OCR/parse collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelData {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub nutrition: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub allergen_statements: Vec<String>,
    #[serde(default)]
    pub may_contain: Vec<String>,
    #[serde(default)]
    pub confidence: Option<LabelConfidence>,
}

/// Materialized inputs for one analysis request.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub product: ProductSnapshot,
    pub external_product: Option<ExternalProduct>,
    pub label_data: Option<LabelData>,
    pub profile: Option<UserProfile>,
}

/// Combines the scoring engine and ingredient normalization into the final
/// report. Constructed once and reused across requests; each call operates on
/// its own context.
pub struct ReportService<R> {
    engine: ScoringEngine,
    ingredients: IngredientService<R>,
}

impl<R> ReportService<R>
where
    R: IngredientRepository,
{
    pub fn new(engine: ScoringEngine, ingredients: IngredientService<R>) -> Self {
        Self {
            engine,
            ingredients,
        }
    }

    pub fn generate_report(&self, context: &ReportContext) -> Report {
        let raw_ingredients: Vec<String> = context
            .label_data
            .as_ref()
            .map(|label| label.ingredients.clone())
            .unwrap_or_default();

        let normalized: Vec<NormalizedIngredient> = context
            .external_product
            .as_ref()
            .map(|product| self.ingredients.normalize_ingredients(product))
            .unwrap_or_default();

        let (allergens, allergen_provenance) = extract_allergens(context.label_data.as_ref());

        let nova_group = context
            .external_product
            .as_ref()
            .and_then(ExternalProduct::nova_group);
        let nutrition_grade = context
            .external_product
            .as_ref()
            .and_then(ExternalProduct::nutrition_grade);

        let scoring_context = ScoringContext {
            product_name: Some(context.product.name.clone()),
            categories: context.product.categories.clone(),
            nutrition: context
                .external_product
                .as_ref()
                .map(|product| product.nutrition.clone())
                .or_else(|| context.label_data.as_ref().map(|label| label.nutrition.clone()))
                .unwrap_or_default(),
            nova_group,
            nutrition_grade: nutrition_grade.clone(),
            ingredients: raw_ingredients.clone(),
            normalized_ingredients: normalized.clone(),
            allergens: allergens.clone(),
            allergen_provenance,
            profile: context.profile.clone(),
        };

        let outcome = self.engine.compute(&scoring_context);

        let ingredient_details = raw_ingredients
            .iter()
            .enumerate()
            .map(|(idx, name)| IngredientDetail {
                name: name.clone(),
                normalized: normalized
                    .get(idx)
                    .map(|entry| entry.original.clone())
                    .unwrap_or_else(|| name.clone()),
                concerns: concerns_for_ingredient(name, &outcome.rule_results),
                confidence: 75,
            })
            .collect();

        let allergen_entries = dedup_preserving_order(&allergens)
            .into_iter()
            .map(|name| AllergenEntry {
                name,
                detected_from: allergen_provenance,
            })
            .collect();

        let flags = outcome
            .rule_results
            .iter()
            .enumerate()
            .map(|(idx, rule)| Flag {
                code: format!("RULE_{idx}"),
                title: rule.title.clone(),
                severity: rule.severity,
                message: rule.message.clone(),
                evidence: rule.evidence.clone(),
            })
            .collect();

        let mut sources: Vec<Evidence> = Vec::new();
        if context.product.source == "open-food-facts" {
            sources.push(Evidence {
                source: EvidenceSource::Openfoodfacts,
                reference: context.product.source_url.clone(),
                field: None,
                confidence: 85,
                note: Some("Product data from Open Food Facts".to_string()),
            });
        }
        if let Some(label) = &context.label_data {
            let tier = label.confidence.unwrap_or(LabelConfidence::Medium);
            sources.push(Evidence {
                source: EvidenceSource::Label,
                reference: None,
                field: None,
                confidence: tier.source_confidence(),
                note: Some(format!("Parsed from product label ({} quality)", tier.label())),
            });
        }
        sources.extend(outcome.all_evidence.iter().cloned());

        let nutrition = context
            .external_product
            .as_ref()
            .map(|product| NutritionView {
                per_100g: Some(product.nutrition.clone()),
                nutri_score: nutrition_grade,
                nova_group,
            });

        Report {
            score: outcome.score,
            summary: ReportSummary {
                headline: outcome.headline.to_string(),
                verdict: outcome.verdict,
            },
            flags,
            ingredients: ingredient_details,
            allergens: allergen_entries,
            nutrition,
            sources,
            generated_at: Utc::now(),
        }
    }
}

/// Union of allergen and may-contain statements, tagged with one provenance
/// value for the whole batch.
fn extract_allergens(label: Option<&LabelData>) -> (Vec<String>, AllergenProvenance) {
    let mut allergens = Vec::new();
    if let Some(label) = label {
        allergens.extend(label.allergen_statements.iter().cloned());
        allergens.extend(label.may_contain.iter().cloned());
    }
    (allergens, AllergenProvenance::Label)
}

/// Heuristic association of triggered rules to one ingredient: a rule applies
/// when its message mentions the ingredient's raw text. A rule may attach to
/// several ingredients or to none.
fn concerns_for_ingredient(name: &str, rules: &[RuleResult]) -> Vec<Concern> {
    let needle = name.to_lowercase();
    rules
        .iter()
        .filter(|rule| rule.message.to_lowercase().contains(&needle))
        .map(|rule| Concern {
            kind: rule.title.clone(),
            message: rule.message.clone(),
            severity: rule.severity,
            evidence: rule.evidence.clone(),
        })
        .collect()
}

fn dedup_preserving_order(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|value| seen.insert(value.as_str()))
        .cloned()
        .collect()
}

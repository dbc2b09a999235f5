use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::ingredients::NormalizedIngredient;

/// Allergens recognized in user profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Allergen {
    Peanut,
    TreeNut,
    Milk,
    Egg,
    Soy,
    Wheat,
    Fish,
    Shellfish,
    Sesame,
}

impl Allergen {
    pub const fn label(self) -> &'static str {
        match self {
            Allergen::Peanut => "peanut",
            Allergen::TreeNut => "tree-nut",
            Allergen::Milk => "milk",
            Allergen::Egg => "egg",
            Allergen::Soy => "soy",
            Allergen::Wheat => "wheat",
            Allergen::Fish => "fish",
            Allergen::Shellfish => "shellfish",
            Allergen::Sesame => "sesame",
        }
    }
}

/// Dietary preferences recognized in user profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietPreference {
    Vegan,
    Vegetarian,
    Keto,
    Halal,
    LowSodium,
    LowSugar,
    Paleo,
    None,
}

/// How aggressively the user wants sensitivities surfaced. Carried on the
/// profile for future rule gating; no current rule reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensitivityLevel {
    Strict,
    #[default]
    Moderate,
    InfoOnly,
}

/// Dietary profile supplied by the user profile store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    #[serde(default)]
    pub diet_preferences: Vec<DietPreference>,
    #[serde(default)]
    pub avoid_list: Vec<String>,
    #[serde(default)]
    pub sensitivity: SensitivityLevel,
}

/// Which data source an allergen statement batch originated from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllergenProvenance {
    #[default]
    #[serde(rename = "label")]
    Label,
    #[serde(rename = "off")]
    ExternalDatabase,
    #[serde(rename = "both")]
    Both,
}

impl AllergenProvenance {
    pub const fn label(self) -> &'static str {
        match self {
            AllergenProvenance::Label => "label",
            AllergenProvenance::ExternalDatabase => "off",
            AllergenProvenance::Both => "both",
        }
    }
}

/// Severity attached to flags and concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Med,
    High,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Med => "med",
            Severity::High => "high",
        }
    }
}

/// Three-way qualitative classification derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Mixed,
    Avoid,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Good => "good",
            Verdict::Mixed => "mixed",
            Verdict::Avoid => "avoid",
        }
    }

    /// Fixed headline per verdict, independent of the numeric score.
    pub const fn headline(self) -> &'static str {
        match self {
            Verdict::Good => "Mostly fine, with a few things to be aware of",
            Verdict::Mixed => "Some concerns, but generally okay",
            Verdict::Avoid => "Several things to consider before choosing this product",
        }
    }
}

/// Where a piece of evidence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceSource {
    Openfoodfacts,
    Label,
    Curated,
}

impl EvidenceSource {
    pub const fn label(self) -> &'static str {
        match self {
            EvidenceSource::Openfoodfacts => "openfoodfacts",
            EvidenceSource::Label => "label",
            EvidenceSource::Curated => "curated",
        }
    }
}

/// Structured citation attached to flags, concerns, and report sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub source: EvidenceSource,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome of one rule evaluation. Non-triggered results carry zero impact
/// and empty text, and must be filtered before reaching any output.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult {
    pub triggered: bool,
    pub severity: Severity,
    pub score_impact: f64,
    pub title: String,
    pub message: String,
    pub evidence: Vec<Evidence>,
}

impl RuleResult {
    pub(crate) fn not_triggered() -> Self {
        Self {
            triggered: false,
            severity: Severity::Low,
            score_impact: 0.0,
            title: String::new(),
            message: String::new(),
            evidence: Vec::new(),
        }
    }
}

/// Unified input to rule evaluation. Lives only for the duration of one
/// scoring call.
#[derive(Debug, Clone, Default)]
pub struct ScoringContext {
    pub product_name: Option<String>,
    pub categories: Vec<String>,
    pub nutrition: BTreeMap<String, Option<f64>>,
    pub nova_group: Option<u8>,
    pub nutrition_grade: Option<String>,
    /// Raw ingredient phrases in label order.
    pub ingredients: Vec<String>,
    /// Same length and order as `ingredients` when both were populated from
    /// the same source.
    pub normalized_ingredients: Vec<NormalizedIngredient>,
    pub allergens: Vec<String>,
    pub allergen_provenance: AllergenProvenance,
    pub profile: Option<UserProfile>,
}

impl ScoringContext {
    /// First present nutrition value among `fields`, in preference order.
    /// An absent or null field is skipped, never treated as zero.
    pub(crate) fn nutrition_value(&self, fields: &[&str]) -> Option<(String, f64)> {
        fields.iter().find_map(|field| {
            self.nutrition
                .get(*field)
                .and_then(|value| value.map(|v| ((*field).to_string(), v)))
        })
    }

    pub(crate) fn is_drink(&self) -> bool {
        self.categories.iter().any(|category| {
            let lower = category.to_lowercase();
            lower.contains("drink") || lower.contains("beverage")
        })
    }

    pub(crate) fn ingredients_text_lower(&self) -> String {
        self.ingredients.join(" ").to_lowercase()
    }
}

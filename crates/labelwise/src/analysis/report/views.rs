use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::scoring::domain::{AllergenProvenance, Evidence, Severity, Verdict};

/// Final analysis report, serialized directly to API consumers. Field names
/// and enumerations are part of the public contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub score: u8,
    pub summary: ReportSummary,
    pub flags: Vec<Flag>,
    pub ingredients: Vec<IngredientDetail>,
    pub allergens: Vec<AllergenEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionView>,
    pub sources: Vec<Evidence>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub headline: String,
    pub verdict: Verdict,
}

/// One entry per triggered rule, coded by its position in the triggered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub code: String,
    pub title: String,
    pub severity: Severity,
    pub message: String,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientDetail {
    pub name: String,
    pub normalized: String,
    pub concerns: Vec<Concern>,
    pub confidence: u8,
}

/// A triggered rule heuristically associated with one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concern {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub severity: Severity,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenEntry {
    pub name: String,
    pub detected_from: AllergenProvenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_100g: Option<BTreeMap<String, Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutri_score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nova_group: Option<u8>,
}

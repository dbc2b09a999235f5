use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Product record as returned by an external database lookup.
///
/// `raw_data` retains the source payload for audit and for fields the mapped
/// shape does not carry (NOVA group, nutrition grade).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalProduct {
    pub barcode: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub ingredients_text: Option<String>,
    #[serde(default)]
    pub ingredients_tags: Vec<String>,
    #[serde(default)]
    pub nutrition: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub source: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub raw_data: serde_json::Value,
}

impl ExternalProduct {
    /// NOVA processing group carried in the source payload, if any.
    pub fn nova_group(&self) -> Option<u8> {
        self.raw_data
            .get("nova_group")
            .and_then(serde_json::Value::as_u64)
            .map(|group| group as u8)
    }

    /// Single-letter nutrition grade carried in the source payload, uppercased.
    pub fn nutrition_grade(&self) -> Option<String> {
        self.raw_data
            .get("nutriscore_grade")
            .and_then(serde_json::Value::as_str)
            .map(str::to_uppercase)
    }
}

/// Minimal product identity used for report headers and source attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub barcode: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub source: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl ProductSnapshot {
    /// Snapshot derived from an external lookup result.
    pub fn from_external(product: &ExternalProduct) -> Self {
        Self {
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            categories: product.categories.clone(),
            source: product.source.clone(),
            source_url: product.source_url.clone(),
        }
    }

    /// Placeholder identity for label-only analyses.
    pub fn unknown() -> Self {
        Self {
            barcode: "unknown".to_string(),
            name: "Unknown Product".to_string(),
            brand: None,
            categories: Vec::new(),
            source: "label".to_string(),
            source_url: None,
        }
    }
}

//! Ingredient text parsing and canonical-name resolution.

pub mod parser;
pub mod repository;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::product::ExternalProduct;
use repository::IngredientRepository;

/// One ingredient after normalization and canonical resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIngredient {
    pub original: String,
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub canonical_id: Option<String>,
}

/// Resolves ingredient names against the curated knowledge base.
///
/// Output order always matches input order, and a lookup failure degrades to
/// a miss for that single ingredient rather than aborting the batch.
pub struct IngredientService<R> {
    repository: Arc<R>,
}

impl<R> IngredientService<R>
where
    R: IngredientRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Normalize ingredients from external product data, preferring the
    /// source's structured tags over free-text parsing.
    pub fn normalize_ingredients(&self, product: &ExternalProduct) -> Vec<NormalizedIngredient> {
        let names: Vec<String> = if !product.ingredients_tags.is_empty() {
            product
                .ingredients_tags
                .iter()
                .map(|tag| name_from_tag(tag))
                .collect()
        } else if let Some(text) = product.ingredients_text.as_deref() {
            parser::extract_and_normalize(text)
        } else {
            Vec::new()
        };

        names
            .into_iter()
            .map(|original| {
                let canonical_id = self
                    .repository
                    .find_canonical_by_name(&original)
                    .unwrap_or(None);
                NormalizedIngredient {
                    canonical: canonical_id.as_ref().map(|_| original.clone()),
                    canonical_id,
                    original,
                }
            })
            .collect()
    }
}

/// Turn a taxonomy-style tag such as `en:palm-oil` into a plain name.
fn name_from_tag(tag: &str) -> String {
    let name = tag.split_once(':').map(|(_, rest)| rest).unwrap_or(tag);
    name.replace('-', " ")
}

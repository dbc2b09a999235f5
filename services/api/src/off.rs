use std::collections::BTreeMap;
use std::fmt;

use labelwise::analysis::ExternalProduct;
use serde::Deserialize;

/// Client for the Open Food Facts read API.
pub(crate) struct OpenFoodFactsClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug)]
pub(crate) enum ProductLookupError {
    Transport(reqwest::Error),
    Status(reqwest::StatusCode),
    Decode(serde_json::Error),
}

impl fmt::Display for ProductLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductLookupError::Transport(err) => {
                write!(f, "failed to reach the product source: {}", err)
            }
            ProductLookupError::Status(status) => {
                write!(f, "product source returned status {}", status)
            }
            ProductLookupError::Decode(err) => {
                write!(f, "invalid product source payload: {}", err)
            }
        }
    }
}

impl std::error::Error for ProductLookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProductLookupError::Transport(err) => Some(err),
            ProductLookupError::Status(_) => None,
            ProductLookupError::Decode(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for ProductLookupError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

#[derive(Debug, Deserialize)]
struct OffResponse {
    status: i64,
    #[serde(default)]
    product: Option<OffProduct>,
}

#[derive(Debug, Deserialize)]
struct OffProduct {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    brands: Option<String>,
    #[serde(default)]
    categories: Option<String>,
    #[serde(default)]
    categories_tags: Vec<String>,
    #[serde(default)]
    ingredients_text: Option<String>,
    #[serde(default)]
    ingredients_tags: Vec<String>,
    #[serde(default)]
    nutriments: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl OpenFoodFactsClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Look up a product by barcode. Source-side "not found" responses map
    /// to `Ok(None)`; only transport and payload problems are errors.
    pub(crate) async fn lookup_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<ExternalProduct>, ProductLookupError> {
        let url = format!("{}/product/{}.json", self.base_url, barcode);
        let response = self
            .http
            .get(&url)
            .header(
                reqwest::header::USER_AGENT,
                "LabelWise/1.0 (https://labelwise.app)",
            )
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ProductLookupError::Status(response.status()));
        }

        let raw: serde_json::Value = response.json().await?;
        let parsed: OffResponse =
            serde_json::from_value(raw.clone()).map_err(ProductLookupError::Decode)?;

        if parsed.status != 1 {
            return Ok(None);
        }
        let Some(product) = parsed.product else {
            return Ok(None);
        };

        // The product object keeps fields the mapped shape drops, such as
        // nova_group and nutriscore_grade.
        let raw_data = raw
            .get("product")
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        Ok(Some(map_product(product, barcode, raw_data)))
    }
}

fn map_product(
    product: OffProduct,
    barcode: &str,
    raw_data: serde_json::Value,
) -> ExternalProduct {
    let nutrition: BTreeMap<String, Option<f64>> = product
        .nutriments
        .into_iter()
        .map(|(field, value)| (field, value.as_f64()))
        .collect();

    let categories: Vec<String> = if !product.categories_tags.is_empty() {
        product
            .categories_tags
            .iter()
            .map(|tag| category_from_tag(tag))
            .filter(|category| !category.is_empty())
            .collect()
    } else {
        product.categories.into_iter().collect()
    };

    ExternalProduct {
        barcode: product.code.unwrap_or_else(|| barcode.to_string()),
        name: product
            .product_name
            .unwrap_or_else(|| "Unknown Product".to_string()),
        brand: product.brands,
        categories,
        ingredients_text: product.ingredients_text,
        ingredients_tags: product.ingredients_tags,
        nutrition,
        image_url: product.image_url,
        source: "open-food-facts".to_string(),
        source_url: product
            .url
            .or_else(|| Some(format!("https://world.openfoodfacts.org/product/{barcode}"))),
        raw_data,
    }
}

fn category_from_tag(tag: &str) -> String {
    let name = tag.split_once(':').map(|(_, rest)| rest).unwrap_or(tag);
    name.replace('-', " ")
}

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde_json::json;

use labelwise::analysis::product::{ExternalProduct, ProductSnapshot};
use labelwise::analysis::report::{LabelConfidence, LabelData, Report, ReportContext};
use labelwise::analysis::scoring::domain::{Allergen, DietPreference, UserProfile};
use labelwise::analysis::{
    AnalysisRequest, IngredientService, ReportService, ScoringConfig, ScoringEngine,
};
use labelwise::error::AppError;

use crate::infra::InMemoryIngredientRepository;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Path to a JSON file containing an analysis request
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Emit the raw report JSON instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Emit the raw report JSON instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
}

fn build_report_service() -> ReportService<InMemoryIngredientRepository> {
    ReportService::new(
        ScoringEngine::new(ScoringConfig::default()),
        IngredientService::new(Arc::new(InMemoryIngredientRepository::default())),
    )
}

/// Analyze a materialized request read from disk.
pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.request)?;
    let request: AnalysisRequest = serde_json::from_str(&raw)?;

    let context = request.into_context().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "request must include external product data or label data",
        )
    })?;

    let product_name = context.product.name.clone();
    let report = build_report_service().generate_report(&context);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&product_name, &report);
    }

    Ok(())
}

/// Analyze a built-in sample product so the pipeline can be exercised
/// without any upstream data.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let context = sample_context();
    let product_name = context.product.name.clone();
    let report = build_report_service().generate_report(&context);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&product_name, &report);
    }

    Ok(())
}

fn sample_context() -> ReportContext {
    let product = sample_product();
    ReportContext {
        product: ProductSnapshot::from_external(&product),
        external_product: Some(product),
        label_data: Some(sample_label()),
        profile: Some(sample_profile()),
    }
}

fn sample_product() -> ExternalProduct {
    ExternalProduct {
        barcode: "4006381333931".to_string(),
        name: "Choco Crunch Cereal".to_string(),
        brand: Some("Morning Mills".to_string()),
        categories: vec!["Breakfast cereals".to_string(), "Snacks".to_string()],
        ingredients_text: Some(
            "Ingredients: whole grain wheat, sugar, cocoa powder, palm oil, whole milk powder, \
             artificial flavor, e322, salt"
                .to_string(),
        ),
        ingredients_tags: Vec::new(),
        nutrition: sample_nutrition(),
        image_url: None,
        source: "open-food-facts".to_string(),
        source_url: Some("https://world.openfoodfacts.org/product/4006381333931".to_string()),
        raw_data: json!({ "nova_group": 4, "nutriscore_grade": "e" }),
    }
}

fn sample_nutrition() -> BTreeMap<String, Option<f64>> {
    [
        ("energy-kcal_100g", 420.0),
        ("sugars_100g", 29.0),
        ("salt_100g", 1.7),
        ("saturated-fat_100g", 7.5),
        ("proteins_100g", 6.0),
        ("fiber_100g", 4.2),
    ]
    .into_iter()
    .map(|(field, value)| (field.to_string(), Some(value)))
    .collect()
}

fn sample_label() -> LabelData {
    LabelData {
        ingredients: vec![
            "whole grain wheat".to_string(),
            "sugar".to_string(),
            "cocoa powder".to_string(),
            "palm oil".to_string(),
            "whole milk powder".to_string(),
            "artificial flavor".to_string(),
            "e322".to_string(),
            "salt".to_string(),
        ],
        nutrition: BTreeMap::new(),
        allergen_statements: vec!["milk".to_string(), "wheat".to_string()],
        may_contain: vec!["peanut".to_string()],
        confidence: Some(LabelConfidence::High),
    }
}

fn sample_profile() -> UserProfile {
    UserProfile {
        allergens: vec![Allergen::Milk],
        diet_preferences: vec![DietPreference::Vegan],
        avoid_list: vec!["palm oil".to_string()],
        ..UserProfile::default()
    }
}

fn render_report(product_name: &str, report: &Report) {
    println!("LabelWise analysis");
    println!("Product: {}", product_name);
    println!(
        "\nScore: {}/100 (verdict: {})",
        report.score,
        report.summary.verdict.label()
    );
    println!("{}", report.summary.headline);

    if report.flags.is_empty() {
        println!("\nFlags: none");
    } else {
        println!("\nFlags");
        for flag in &report.flags {
            println!(
                "- [{}] {}: {}",
                flag.severity.label(),
                flag.title,
                flag.message
            );
        }
    }

    if report.ingredients.is_empty() {
        println!("\nIngredients: none listed");
    } else {
        println!("\nIngredients");
        for ingredient in &report.ingredients {
            if ingredient.concerns.is_empty() {
                println!("- {}", ingredient.name);
            } else {
                let kinds = ingredient
                    .concerns
                    .iter()
                    .map(|concern| concern.kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("- {} (concerns: {})", ingredient.name, kinds);
            }
        }
    }

    if report.allergens.is_empty() {
        println!("\nAllergens: none declared");
    } else {
        println!("\nAllergens");
        for allergen in &report.allergens {
            println!("- {} (from {})", allergen.name, allergen.detected_from.label());
        }
    }

    println!("\nSources");
    for source in &report.sources {
        match &source.note {
            Some(note) => println!(
                "- {} (confidence {}): {}",
                source.source.label(),
                source.confidence,
                note
            ),
            None => println!(
                "- {} (confidence {})",
                source.source.label(),
                source.confidence
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelwise::analysis::scoring::domain::Verdict;

    #[test]
    fn sample_product_produces_a_fully_flagged_report() {
        let context = sample_context();
        let report = build_report_service().generate_report(&context);

        assert_eq!(report.summary.verdict, Verdict::Avoid);
        assert!(report.score < 50);
        assert!(report
            .flags
            .iter()
            .any(|flag| flag.title == "Contains allergens based on your profile"));
        assert!(report
            .flags
            .iter()
            .any(|flag| flag.title == "Conflicts with your preferences"));

        let palm_oil = report
            .ingredients
            .iter()
            .find(|ingredient| ingredient.name == "palm oil")
            .expect("palm oil listed");
        assert!(palm_oil
            .concerns
            .iter()
            .any(|concern| concern.kind == "Conflicts with your preferences"));
    }
}

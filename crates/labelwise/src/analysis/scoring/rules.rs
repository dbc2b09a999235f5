use once_cell::sync::Lazy;
use regex::Regex;

use super::config::ScoringConfig;
use super::domain::{
    AllergenProvenance, DietPreference, Evidence, EvidenceSource, RuleResult, ScoringContext,
    Severity,
};

/// A rule is a pure predicate+scoring function over the unified context.
pub(crate) type RuleFn = fn(&ScoringContext, &ScoringConfig) -> RuleResult;

/// Fixed evaluation order; flag codes and evidence concatenation depend on it.
pub(crate) const RULES: &[RuleFn] = &[
    allergen_match,
    ultra_processed,
    high_sugar,
    high_sodium,
    high_saturated_fat,
    additives_present,
    profile_conflicts,
];

/// Evaluate every rule once, unconditionally, in table order.
pub(crate) fn evaluate_rules(context: &ScoringContext, config: &ScoringConfig) -> Vec<RuleResult> {
    RULES.iter().map(|rule| rule(context, config)).collect()
}

fn allergen_evidence_source(provenance: AllergenProvenance) -> EvidenceSource {
    match provenance {
        AllergenProvenance::ExternalDatabase => EvidenceSource::Openfoodfacts,
        AllergenProvenance::Label | AllergenProvenance::Both => EvidenceSource::Label,
    }
}

/// Allergen statements, weighted up when they intersect the user's profile.
fn allergen_match(context: &ScoringContext, config: &ScoringConfig) -> RuleResult {
    if context.allergens.is_empty() {
        return RuleResult::not_triggered();
    }

    let source = allergen_evidence_source(context.allergen_provenance);

    if let Some(profile) = &context.profile {
        if !profile.allergens.is_empty() {
            let matches: Vec<&str> = context
                .allergens
                .iter()
                .filter(|statement| {
                    profile
                        .allergens
                        .iter()
                        .any(|allergen| allergen.label() == statement.as_str())
                })
                .map(String::as_str)
                .collect();

            if !matches.is_empty() {
                return RuleResult {
                    triggered: true,
                    severity: Severity::High,
                    score_impact: config.impacts.allergen_profile_match,
                    title: "Contains allergens based on your profile".to_string(),
                    message: format!(
                        "This product contains: {}. Please check the label carefully.",
                        matches.join(", ")
                    ),
                    evidence: vec![Evidence {
                        source,
                        reference: None,
                        field: Some("allergens".to_string()),
                        confidence: 90,
                        note: Some(format!(
                            "Detected from {}",
                            context.allergen_provenance.label()
                        )),
                    }],
                };
            }
        }
    }

    RuleResult {
        triggered: true,
        severity: Severity::Med,
        score_impact: config.impacts.allergen_general,
        title: "Contains common allergens".to_string(),
        message: format!("This product may contain: {}.", context.allergens.join(", ")),
        evidence: vec![Evidence {
            source,
            reference: None,
            field: Some("allergens".to_string()),
            confidence: 85,
            note: None,
        }],
    }
}

/// NOVA group 4 marks ultra-processed foods.
fn ultra_processed(context: &ScoringContext, config: &ScoringConfig) -> RuleResult {
    if context.nova_group != Some(config.thresholds.ultra_processed_nova_group) {
        return RuleResult::not_triggered();
    }

    RuleResult {
        triggered: true,
        severity: Severity::Med,
        score_impact: config.impacts.ultra_processed,
        title: "Ultra-processed food".to_string(),
        message: "This product is classified as ultra-processed. These foods often contain many \
                  additives and are typically high in salt, sugar, or fat."
            .to_string(),
        evidence: vec![Evidence {
            source: EvidenceSource::Openfoodfacts,
            reference: None,
            field: Some("nova_group".to_string()),
            confidence: 85,
            note: Some("NOVA classification system".to_string()),
        }],
    }
}

/// High sugar, with a stricter threshold for drinks (per 100 ml).
fn high_sugar(context: &ScoringContext, config: &ScoringConfig) -> RuleResult {
    let Some((field, value)) = context.nutrition_value(&["sugars_100g", "sugar"]) else {
        return RuleResult::not_triggered();
    };

    let threshold = if context.is_drink() {
        config.thresholds.sugar_drink_high
    } else {
        config.thresholds.sugar_high
    };

    if value < threshold {
        return RuleResult::not_triggered();
    }

    RuleResult {
        triggered: true,
        severity: Severity::Med,
        score_impact: config.impacts.high_sugar,
        title: "High sugar content".to_string(),
        message: format!(
            "This product contains {value:.1}g of sugar per 100g, which is considered high."
        ),
        evidence: vec![Evidence {
            source: EvidenceSource::Openfoodfacts,
            reference: Some(format!("sugar: {value}g/100g")),
            field: Some(field),
            confidence: 90,
            note: None,
        }],
    }
}

/// High salt, derived from sodium when only sodium is reported.
fn high_sodium(context: &ScoringContext, config: &ScoringConfig) -> RuleResult {
    let salt = context.nutrition_value(&["salt_100g"]).or_else(|| {
        context
            .nutrition_value(&["sodium_100g"])
            .map(|(field, sodium)| (field, sodium * config.thresholds.sodium_to_salt))
    });

    let Some((field, value)) = salt else {
        return RuleResult::not_triggered();
    };

    if value < config.thresholds.salt_high {
        return RuleResult::not_triggered();
    }

    RuleResult {
        triggered: true,
        severity: Severity::Med,
        score_impact: config.impacts.high_sodium,
        title: "High salt content".to_string(),
        message: format!(
            "This product contains {value:.1}g of salt per 100g, which is considered high."
        ),
        evidence: vec![Evidence {
            source: EvidenceSource::Openfoodfacts,
            reference: Some(format!("salt: {value:.1}g/100g")),
            field: Some(field),
            confidence: 90,
            note: None,
        }],
    }
}

fn high_saturated_fat(context: &ScoringContext, config: &ScoringConfig) -> RuleResult {
    let Some((_, value)) = context.nutrition_value(&["saturated-fat_100g", "saturated_fat"])
    else {
        return RuleResult::not_triggered();
    };

    if value < config.thresholds.saturated_fat_high {
        return RuleResult::not_triggered();
    }

    RuleResult {
        triggered: true,
        severity: Severity::Med,
        score_impact: config.impacts.high_saturated_fat,
        title: "High saturated fat".to_string(),
        message: format!(
            "This product contains {value:.1}g of saturated fat per 100g, which is considered high."
        ),
        evidence: vec![Evidence {
            source: EvidenceSource::Openfoodfacts,
            reference: Some(format!("saturated fat: {value:.1}g/100g")),
            field: Some("saturated-fat_100g".to_string()),
            confidence: 90,
            note: None,
        }],
    }
}

static ADDITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\be\d{3,4}\b",
        r"artificial (color|flavor|sweetener|preservative)",
        r"sodium (benzoate|nitrite|sulfite)",
        r"bht|bha|tbhq",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("additive pattern compiles"))
    .collect()
});

/// Heuristic additive scan over the joined ingredient text.
fn additives_present(context: &ScoringContext, config: &ScoringConfig) -> RuleResult {
    let text = context.ingredients_text_lower();

    let mut matches: Vec<String> = Vec::new();
    for pattern in ADDITIVE_PATTERNS.iter() {
        for found in pattern.find_iter(&text) {
            matches.push(found.as_str().to_string());
        }
    }

    if matches.is_empty() {
        return RuleResult::not_triggered();
    }

    // Penalty grows with the match count but never past the floor.
    let scaled = config.impacts.additives_base
        * (1.0 + config.thresholds.additive_scale_step * matches.len() as f64);
    let impact = scaled.max(config.impacts.additives_floor);

    let severity = if matches.len() > 3 {
        Severity::Med
    } else {
        Severity::Low
    };

    let preview_len = matches.len().min(3);
    let suffix = if matches.len() > 3 { "..." } else { "" };
    let note = format!("Detected: {}{}", matches[..preview_len].join(", "), suffix);

    RuleResult {
        triggered: true,
        severity,
        score_impact: impact,
        title: "Contains additives".to_string(),
        message: format!(
            "This product contains {} additive{}. Some people prefer to limit processed additives.",
            matches.len(),
            if matches.len() > 1 { "s" } else { "" }
        ),
        evidence: vec![Evidence {
            source: EvidenceSource::Label,
            reference: None,
            field: Some("ingredients".to_string()),
            confidence: 75,
            note: Some(note),
        }],
    }
}

const NON_VEGAN: &[&str] = &["milk", "egg", "cheese", "butter", "gelatin", "honey"];
const NON_VEGETARIAN: &[&str] = &["gelatin", "rennet", "carmine"];

/// Diet preference and avoid-list conflicts against the ingredient text.
fn profile_conflicts(context: &ScoringContext, config: &ScoringConfig) -> RuleResult {
    let Some(profile) = &context.profile else {
        return RuleResult::not_triggered();
    };
    if profile.diet_preferences.is_empty() {
        return RuleResult::not_triggered();
    }

    let ingredients_lower: Vec<String> = context
        .ingredients
        .iter()
        .map(|ingredient| ingredient.to_lowercase())
        .collect();
    let contains_any = |tokens: &[&str]| {
        tokens
            .iter()
            .any(|token| ingredients_lower.iter().any(|ing| ing.contains(token)))
    };

    let mut conflicts: Vec<String> = Vec::new();

    if profile.diet_preferences.contains(&DietPreference::Vegan) && contains_any(NON_VEGAN) {
        conflicts.push("vegan".to_string());
    }

    if profile.diet_preferences.contains(&DietPreference::Vegetarian)
        && contains_any(NON_VEGETARIAN)
    {
        conflicts.push("vegetarian".to_string());
    }

    for avoid in &profile.avoid_list {
        let needle = avoid.to_lowercase();
        if ingredients_lower.iter().any(|ing| ing.contains(&needle)) {
            conflicts.push(format!("avoid: {avoid}"));
        }
    }

    if conflicts.is_empty() {
        return RuleResult::not_triggered();
    }

    RuleResult {
        triggered: true,
        severity: Severity::High,
        score_impact: config.impacts.profile_conflicts,
        title: "Conflicts with your preferences".to_string(),
        message: format!(
            "This product may not align with your dietary preferences: {}.",
            conflicts.join(", ")
        ),
        evidence: vec![Evidence {
            source: EvidenceSource::Label,
            reference: None,
            field: Some("ingredients".to_string()),
            confidence: 70,
            note: Some("Based on ingredient analysis and your profile".to_string()),
        }],
    }
}

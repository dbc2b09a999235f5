use super::common::*;
use crate::analysis::scoring::domain::{
    Allergen, AllergenProvenance, DietPreference, EvidenceSource, RuleResult, ScoringContext,
    Severity, UserProfile, Verdict,
};

fn find_rule<'a>(results: &'a [RuleResult], title: &str) -> Option<&'a RuleResult> {
    results.iter().find(|rule| rule.title == title)
}

#[test]
fn clean_product_scores_full_marks_with_good_verdict() {
    let context = context_with_nutrition(&[("sugars_100g", 5.0), ("salt_100g", 0.5)]);

    let outcome = engine().compute(&context);

    assert_eq!(outcome.score, 100);
    assert_eq!(outcome.verdict, Verdict::Good);
    assert_eq!(
        outcome.headline,
        "Mostly fine, with a few things to be aware of"
    );
    assert!(outcome.rule_results.is_empty());
    assert!(outcome.all_evidence.is_empty());
}

#[test]
fn score_is_clamped_when_every_rule_fires() {
    let mut context = context_with_nutrition(&[
        ("sugars_100g", 50.0),
        ("salt_100g", 3.0),
        ("saturated-fat_100g", 10.0),
    ]);
    context.nova_group = Some(4);
    context.allergens = vec!["peanut".to_string()];
    context.ingredients = vec![
        "milk powder".to_string(),
        "artificial flavor".to_string(),
        "e102".to_string(),
        "e110".to_string(),
        "bht".to_string(),
    ];
    context.profile = Some(profile());

    let outcome = engine().compute(&context);

    assert_eq!(outcome.rule_results.len(), 7);
    assert_eq!(outcome.score, 0);
    assert_eq!(outcome.verdict, Verdict::Avoid);
}

#[test]
fn high_sugar_uses_category_sensitive_thresholds() {
    let solid = context_with_nutrition(&[("sugars_100g", 25.0)]);
    let outcome = engine().compute(&solid);
    assert!(find_rule(&outcome.rule_results, "High sugar content").is_some());

    let mut drink = context_with_nutrition(&[("sugars_100g", 25.0)]);
    drink.categories = vec!["Sugary beverages".to_string()];
    let outcome = engine().compute(&drink);
    assert!(find_rule(&outcome.rule_results, "High sugar content").is_some());

    let mild = context_with_nutrition(&[("sugars_100g", 10.0)]);
    let outcome = engine().compute(&mild);
    assert!(find_rule(&outcome.rule_results, "High sugar content").is_none());

    // 10g clears the drink threshold of 11.25 only at or above it.
    let mut mild_drink = context_with_nutrition(&[("sugars_100g", 11.25)]);
    mild_drink.categories = vec!["Soft drinks".to_string()];
    let outcome = engine().compute(&mild_drink);
    assert!(find_rule(&outcome.rule_results, "High sugar content").is_some());
}

#[test]
fn sugar_falls_back_to_generic_field_name() {
    let context = context_with_nutrition(&[("sugar", 30.0)]);
    let outcome = engine().compute(&context);

    let rule = find_rule(&outcome.rule_results, "High sugar content").expect("sugar rule fires");
    assert_eq!(rule.evidence[0].field.as_deref(), Some("sugar"));
}

#[test]
fn sodium_is_converted_to_salt_when_salt_is_absent() {
    let context = context_with_nutrition(&[("sodium_100g", 0.7)]);
    let outcome = engine().compute(&context);

    let rule = find_rule(&outcome.rule_results, "High salt content").expect("salt rule fires");
    assert_eq!(rule.evidence[0].field.as_deref(), Some("sodium_100g"));
    assert!(rule.message.contains("g of salt per 100g"));
}

#[test]
fn salt_field_wins_over_sodium_derivation() {
    let context = context_with_nutrition(&[("salt_100g", 2.0), ("sodium_100g", 0.1)]);
    let outcome = engine().compute(&context);

    let rule = find_rule(&outcome.rule_results, "High salt content").expect("salt rule fires");
    assert_eq!(rule.evidence[0].field.as_deref(), Some("salt_100g"));
}

#[test]
fn missing_nutrition_never_triggers_nutrition_rules() {
    let outcome = engine().compute(&ScoringContext::default());

    assert!(outcome.rule_results.is_empty());
    assert_eq!(outcome.score, 100);
}

#[test]
fn nova_group_four_flags_ultra_processed() {
    let mut context = ScoringContext::default();
    context.nova_group = Some(4);
    let outcome = engine().compute(&context);
    assert!(find_rule(&outcome.rule_results, "Ultra-processed food").is_some());

    context.nova_group = Some(3);
    let outcome = engine().compute(&context);
    assert!(find_rule(&outcome.rule_results, "Ultra-processed food").is_none());

    context.nova_group = None;
    let outcome = engine().compute(&context);
    assert!(find_rule(&outcome.rule_results, "Ultra-processed food").is_none());
}

#[test]
fn saturated_fat_triggers_at_threshold() {
    let context = context_with_nutrition(&[("saturated-fat_100g", 5.0)]);
    let outcome = engine().compute(&context);

    let rule = find_rule(&outcome.rule_results, "High saturated fat").expect("rule fires");
    assert_eq!(rule.evidence[0].field.as_deref(), Some("saturated-fat_100g"));

    let below = context_with_nutrition(&[("saturated-fat_100g", 4.9)]);
    let outcome = engine().compute(&below);
    assert!(find_rule(&outcome.rule_results, "High saturated fat").is_none());
}

#[test]
fn additive_penalty_scales_with_match_count() {
    let mut context = ScoringContext::default();
    context.ingredients = vec!["e322".to_string()];

    let outcome = engine().compute(&context);
    let rule = find_rule(&outcome.rule_results, "Contains additives").expect("rule fires");
    assert_eq!(rule.severity, Severity::Low);
    assert!((rule.score_impact - (-9.6)).abs() < 1e-9);
}

#[test]
fn additive_penalty_never_exceeds_the_floor() {
    let mut context = ScoringContext::default();
    context.ingredients = vec![
        "e102".to_string(),
        "e110".to_string(),
        "e129".to_string(),
        "e211".to_string(),
        "e320".to_string(),
        "sodium benzoate".to_string(),
        "artificial flavor".to_string(),
        "bht".to_string(),
        "bha".to_string(),
        "tbhq".to_string(),
    ];

    let outcome = engine().compute(&context);
    let rule = find_rule(&outcome.rule_results, "Contains additives").expect("rule fires");
    assert_eq!(rule.severity, Severity::Med);
    assert!((rule.score_impact - (-20.0)).abs() < 1e-9);
}

#[test]
fn allergen_match_weighs_profile_intersection_higher() {
    let mut context = ScoringContext::default();
    context.allergens = vec!["peanut".to_string()];
    context.profile = Some(UserProfile {
        allergens: vec![Allergen::Peanut],
        ..UserProfile::default()
    });

    let outcome = engine().compute(&context);
    let rule = find_rule(&outcome.rule_results, "Contains allergens based on your profile")
        .expect("profile allergen rule fires");
    assert_eq!(rule.severity, Severity::High);
    assert!((rule.score_impact - (-35.0)).abs() < 1e-9);
    assert_eq!(rule.evidence[0].confidence, 90);
    assert_eq!(rule.evidence[0].note.as_deref(), Some("Detected from label"));

    let mut general = ScoringContext::default();
    general.allergens = vec!["peanut".to_string()];
    let outcome = engine().compute(&general);
    let rule = find_rule(&outcome.rule_results, "Contains common allergens")
        .expect("general allergen rule fires");
    assert_eq!(rule.severity, Severity::Med);
    assert!((rule.score_impact - (-15.0)).abs() < 1e-9);
}

#[test]
fn allergen_evidence_source_follows_provenance() {
    let mut context = ScoringContext::default();
    context.allergens = vec!["soy".to_string()];
    context.allergen_provenance = AllergenProvenance::ExternalDatabase;

    let outcome = engine().compute(&context);
    let rule = find_rule(&outcome.rule_results, "Contains common allergens").expect("rule fires");
    assert_eq!(rule.evidence[0].source, EvidenceSource::Openfoodfacts);
}

#[test]
fn diet_conflicts_cover_preferences_and_avoid_list() {
    let mut context = ScoringContext::default();
    context.ingredients = vec![
        "milk chocolate".to_string(),
        "gelatin".to_string(),
        "palm oil blend".to_string(),
    ];
    context.profile = Some(UserProfile {
        diet_preferences: vec![DietPreference::Vegan, DietPreference::Vegetarian],
        avoid_list: vec!["palm oil".to_string()],
        ..UserProfile::default()
    });

    let outcome = engine().compute(&context);
    let rule = find_rule(&outcome.rule_results, "Conflicts with your preferences")
        .expect("conflict rule fires");
    assert_eq!(rule.severity, Severity::High);
    assert!(rule.message.contains("vegan"));
    assert!(rule.message.contains("vegetarian"));
    assert!(rule.message.contains("avoid: palm oil"));
}

#[test]
fn avoid_list_alone_does_not_trigger_without_diet_preferences() {
    let mut context = ScoringContext::default();
    context.ingredients = vec!["palm oil".to_string()];
    context.profile = Some(UserProfile {
        avoid_list: vec!["palm oil".to_string()],
        ..UserProfile::default()
    });

    let outcome = engine().compute(&context);
    assert!(find_rule(&outcome.rule_results, "Conflicts with your preferences").is_none());
}

#[test]
fn triggered_evidence_is_concatenated_in_rule_order() {
    let mut context = context_with_nutrition(&[("sugars_100g", 30.0), ("salt_100g", 2.0)]);
    context.nova_group = Some(4);

    let outcome = engine().compute(&context);

    let fields: Vec<_> = outcome
        .all_evidence
        .iter()
        .filter_map(|evidence| evidence.field.as_deref())
        .collect();
    assert_eq!(fields, vec!["nova_group", "sugars_100g", "salt_100g"]);
}

//! Deterministic rule evaluation and score aggregation.

pub mod config;
pub mod domain;
mod rules;

pub use config::{RuleImpacts, ScoringConfig, Thresholds, VerdictCutoffs};
pub use domain::{
    Allergen, AllergenProvenance, DietPreference, Evidence, EvidenceSource, RuleResult,
    ScoringContext, SensitivityLevel, Severity, UserProfile, Verdict,
};

/// Stateless engine applying the rule table to a scoring context.
pub struct ScoringEngine {
    config: ScoringConfig,
}

/// Aggregated scoring output handed to report assembly.
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    /// Clamped, reportable score.
    pub score: u8,
    pub verdict: Verdict,
    pub headline: &'static str,
    /// Triggered rules only, in rule-table order.
    pub rule_results: Vec<RuleResult>,
    /// Concatenated evidence of every triggered rule, in the same order.
    pub all_evidence: Vec<Evidence>,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Evaluate every rule once, sum the triggered impacts against the base
    /// score, and classify the verdict.
    ///
    /// The verdict reads the running score before clamping; only the exposed
    /// score is clamped to the reportable range.
    pub fn compute(&self, context: &ScoringContext) -> ScoreOutcome {
        let triggered: Vec<RuleResult> = rules::evaluate_rules(context, &self.config)
            .into_iter()
            .filter(|result| result.triggered)
            .collect();

        let raw_score = self.config.base_score
            + triggered
                .iter()
                .map(|result| result.score_impact)
                .sum::<f64>();

        let verdict = classify(raw_score, &self.config.verdicts);
        let score = raw_score.clamp(0.0, 100.0).round() as u8;

        let all_evidence = triggered
            .iter()
            .flat_map(|result| result.evidence.iter().cloned())
            .collect();

        ScoreOutcome {
            score,
            verdict,
            headline: verdict.headline(),
            rule_results: triggered,
            all_evidence,
        }
    }
}

fn classify(raw_score: f64, cutoffs: &VerdictCutoffs) -> Verdict {
    if raw_score >= cutoffs.good {
        Verdict::Good
    } else if raw_score >= cutoffs.mixed {
        Verdict::Mixed
    } else {
        Verdict::Avoid
    }
}

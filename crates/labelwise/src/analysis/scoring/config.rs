use serde::{Deserialize, Serialize};

/// Static table of weights and thresholds consumed by the rule set.
///
/// Every tunable the rules read lives here so the engine can be tested with
/// alternative rubrics without touching rule code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub base_score: f64,
    pub impacts: RuleImpacts,
    pub thresholds: Thresholds,
    pub verdicts: VerdictCutoffs,
}

/// Signed score deltas applied by triggered rules. All current rules deduct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleImpacts {
    pub allergen_profile_match: f64,
    pub allergen_general: f64,
    pub ultra_processed: f64,
    pub high_sugar: f64,
    pub high_sodium: f64,
    pub high_saturated_fat: f64,
    pub additives_base: f64,
    /// Most negative impact the additive rule may reach after scaling.
    pub additives_floor: f64,
    pub profile_conflicts: f64,
}

/// Nutrition cut-offs, per 100 g (or 100 ml for drinks). All inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub sugar_high: f64,
    pub sugar_drink_high: f64,
    pub salt_high: f64,
    /// Multiplier deriving salt from sodium when only sodium is reported.
    pub sodium_to_salt: f64,
    pub saturated_fat_high: f64,
    pub ultra_processed_nova_group: u8,
    /// Per-match growth factor for the additive penalty.
    pub additive_scale_step: f64,
}

/// Verdict boundaries evaluated against the running (pre-clamp) score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictCutoffs {
    pub good: f64,
    pub mixed: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 100.0,
            impacts: RuleImpacts {
                allergen_profile_match: -35.0,
                allergen_general: -15.0,
                ultra_processed: -20.0,
                high_sugar: -15.0,
                high_sodium: -10.0,
                high_saturated_fat: -8.0,
                additives_base: -8.0,
                additives_floor: -20.0,
                profile_conflicts: -25.0,
            },
            thresholds: Thresholds {
                sugar_high: 22.5,
                sugar_drink_high: 11.25,
                salt_high: 1.5,
                sodium_to_salt: 2.5,
                saturated_fat_high: 5.0,
                ultra_processed_nova_group: 4,
                additive_scale_step: 0.2,
            },
            verdicts: VerdictCutoffs {
                good: 80.0,
                mixed: 50.0,
            },
        }
    }
}

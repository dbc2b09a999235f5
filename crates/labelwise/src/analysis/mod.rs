//! Label analysis pipeline: ingredient parsing and canonical resolution, the
//! deterministic rule set, score aggregation, and report assembly.
//!
//! Everything in here is pure computation over materialized inputs; the only
//! collaborator is the [`ingredients::repository::IngredientRepository`]
//! lookup, which the enclosing service provides.

pub mod ingredients;
pub mod product;
pub mod report;
pub mod router;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use ingredients::{IngredientService, NormalizedIngredient};
pub use product::{ExternalProduct, ProductSnapshot};
pub use report::{LabelConfidence, LabelData, Report, ReportContext, ReportService};
pub use router::{analysis_router, AnalysisRequest};
pub use scoring::{ScoreOutcome, ScoringConfig, ScoringEngine};

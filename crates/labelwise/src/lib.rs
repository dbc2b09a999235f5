//! LabelWise core: deterministic, explainable analysis of food product labels.
//!
//! The [`analysis`] module holds the scoring engine proper; [`config`],
//! [`telemetry`], and [`error`] carry the shared service plumbing.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;

//! Top-level module for the discrete source.
//!
//! This module provides a two-level stochastic symbol source, including:
//! - Validated probability tables (`DistributionTable`)
//! - The switch / model / schedule aggregate (`SourceModel`)
//! - The unvalidated document form and its snapshot (`SourceDescription`)
//! - Symbol emission (`SymbolGenerator`)
//! - Bounded and live generation (`StreamDriver`)
//! - Sliding-window probability estimation (`SequenceProbabilityEstimator`)

/// Categorical probability tables and literal parsing.
///
/// Holds the inverse-CDF sampling used at both levels of the source.
pub mod distribution;

/// JSON description of a source and its saved `postcard` snapshot.
pub mod description;

/// Validated source model with read-only accessors.
pub mod source_model;

/// Uniform draws: any `rand::Rng`, or a scripted replay.
pub mod draw;

/// Position → symbol emission.
pub mod generator;

/// Bounded and cancellable live generation.
pub mod stream;

/// Sliding-window match probability.
pub mod estimator;

//! Discrete two-level stochastic source.
//!
//! This crate provides a switch-driven symbol generator including:
//! - Validated distribution tables read from a JSON description
//! - Two-stage sampling (switch → model → symbol) with injectable randomness
//! - Bounded generation and cancellable live generation
//! - Sliding-window estimation of a target subsequence probability
//! - A saved snapshot of the last used description
//!
//! The model is immutable once built and can be shared between threads.

/// Source model, generation and estimation.
pub mod model;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (file loading, extension checks).
///
/// Not exposed
pub(crate) mod io;

pub use error::SourceError;
pub use model::description::SourceDescription;
pub use model::distribution::{DistributionTable, SUM_TOLERANCE};
pub use model::draw::{ScriptedDraws, UniformDraw};
pub use model::estimator::{SequenceProbabilityEstimator, estimate_run};
pub use model::generator::SymbolGenerator;
pub use model::source_model::SourceModel;
pub use model::stream::{CancelToken, LineSink, StreamDriver, SymbolSink, spawn_live};

//! Default-risk scoring for small-business loan applications.
//!
//! The [`scoring`] module holds the pipeline (feature building, model inference and decision
//! derivation) along with the training routine that produces the artifacts it consumes.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;

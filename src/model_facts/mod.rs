//! Classifier facts loaded once at startup and shared read-only.
//!
//! The facts come from two collaborator files: a ranked `feature,importance`
//! CSV and the serialized trained-classifier artifact. If either is missing
//! the service degrades to empty facts instead of failing startup.

pub mod facts;
pub mod loader;

pub use facts::{FeatureImportance, ModelFacts};
pub use loader::{FactsError, load, load_or_degrade};

//! credit-classifiers: inference core for credit-score classification.
//!
//! This crate turns uploaded tabular customer data into Poor/Standard/Good
//! credit-score predictions. It provides a schema-driven feature encoder, a
//! uniform adapter over tree-ensemble classifiers (gradient-boosted trees via
//! the `gbdt` crate, or a serialized random forest), and a batch predictor
//! with per-row failure isolation, plus CSV I/O helpers used by the CLI.
//!
//! The trained model, its feature schema, and the categorical vocabularies
//! travel together in a versioned artifact loaded once at startup; everything
//! downstream of loading is pure and stateless between requests.
pub mod artifact;
pub mod encoder;
pub mod error;
pub mod io;
pub mod models;
pub mod predictor;
pub mod schema;
pub mod table;

pub mod adapter;
pub mod classifier_trait;
pub mod factory;
pub mod forest;
pub mod gbt;

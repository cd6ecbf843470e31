use crate::error::ClassifyError;

/// Uniform contract over the trained classifier variants. Exactly one
/// variant is active at inference time; which one is a static property of
/// the loaded artifact (whichever won on macro-F1 during training), never a
/// runtime decision.
pub trait ClassifierModel {
    /// Feature count the model was trained on.
    fn n_features(&self) -> usize;

    /// Number of classes in the probability output.
    fn n_classes(&self) -> usize;

    /// Class probability distribution for one feature vector. A vector of
    /// the wrong length fails with `ShapeMismatch`; that failure is scoped
    /// to the one row being classified.
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ClassifyError>;

    /// Human readable variant name for logs and the CLI.
    fn name(&self) -> &str {
        "classifier"
    }
}

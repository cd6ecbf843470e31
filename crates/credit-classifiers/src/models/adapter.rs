//! The label/confidence surface over a boxed classifier variant.
use crate::error::ClassifyError;
use crate::models::classifier_trait::ClassifierModel;

/// One row's prediction: the argmax class and its probability.
/// Created per row, immutable, consumed by the results table builder.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub label: String,
    pub class_index: usize,
    pub confidence: f32,
}

/// Wraps the active classifier variant together with the class labels so
/// callers get `predict(features) -> label, confidence` without caring which
/// algorithm is underneath.
pub struct ModelAdapter {
    model: Box<dyn ClassifierModel>,
    class_labels: Vec<String>,
}

impl ModelAdapter {
    pub fn new(
        model: Box<dyn ClassifierModel>,
        class_labels: Vec<String>,
    ) -> Result<Self, ClassifyError> {
        if model.n_classes() != class_labels.len() {
            return Err(ClassifyError::ShapeMismatch {
                expected: class_labels.len(),
                actual: model.n_classes(),
            });
        }
        Ok(ModelAdapter {
            model,
            class_labels,
        })
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn predict(&self, features: &[f32]) -> Result<PredictionResult, ClassifyError> {
        let proba = self.model.predict_proba(features)?;
        if proba.len() != self.class_labels.len() {
            return Err(ClassifyError::ShapeMismatch {
                expected: self.class_labels.len(),
                actual: proba.len(),
            });
        }
        let (class_index, best) = proba
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or(ClassifyError::ShapeMismatch {
                expected: self.class_labels.len(),
                actual: 0,
            })?;
        Ok(PredictionResult {
            label: self.class_labels[class_index].clone(),
            class_index,
            confidence: best.clamp(0.0, 1.0),
        })
    }
}

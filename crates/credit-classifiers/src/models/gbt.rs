//! Gradient-boosted trees classifier backed by the `gbdt` crate.
//!
//! The training pipeline exports one binary boosted ensemble per class
//! (one-vs-rest, log-likelihood loss); inference runs each ensemble on the
//! row and normalizes the per-class scores into a distribution.
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;
use crate::models::classifier_trait::ClassifierModel;

/// Serialized one-vs-rest ensembles as they appear inside the model
/// artifact, in class-label order.
#[derive(Serialize, Deserialize)]
pub struct GbtPayload {
    pub n_features: usize,
    pub class_models: Vec<GBDT>,
}

/// Validated, ready-to-predict gradient-boosted classifier.
pub struct GbtModel {
    payload: GbtPayload,
}

// `gbdt::GBDT` has no `Debug` impl, so summarize the payload instead of
// deriving.
impl std::fmt::Debug for GbtModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GbtModel")
            .field("n_features", &self.payload.n_features)
            .field("n_class_models", &self.payload.class_models.len())
            .finish()
    }
}

impl GbtModel {
    pub fn new(payload: GbtPayload, n_classes: usize) -> Result<Self, ClassifyError> {
        if payload.class_models.len() != n_classes {
            return Err(ClassifyError::ModelLoad(format!(
                "gradient-boosted payload holds {} class models, expected {}",
                payload.class_models.len(),
                n_classes
            )));
        }
        if payload.n_features == 0 {
            return Err(ClassifyError::ModelLoad(
                "gradient-boosted payload declares zero features".to_string(),
            ));
        }
        Ok(GbtModel { payload })
    }
}

impl ClassifierModel for GbtModel {
    fn n_features(&self) -> usize {
        self.payload.n_features
    }

    fn n_classes(&self) -> usize {
        self.payload.class_models.len()
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ClassifyError> {
        if features.len() != self.payload.n_features {
            return Err(ClassifyError::ShapeMismatch {
                expected: self.payload.n_features,
                actual: features.len(),
            });
        }

        let mut row = DataVec::new();
        row.push(Data::new_training_data(features.to_vec(), 1.0, 0.0, None));

        let mut scores = Vec::with_capacity(self.payload.class_models.len());
        for model in &self.payload.class_models {
            let pred = model.predict(&row);
            let score = pred.first().copied().unwrap_or(0.0);
            scores.push(if score.is_finite() { score.max(0.0) } else { 0.0 });
        }

        let total: f32 = scores.iter().sum();
        if total > 0.0 {
            for s in scores.iter_mut() {
                *s /= total;
            }
        } else {
            scores.fill(1.0 / self.payload.class_models.len() as f32);
        }
        Ok(scores)
    }

    fn name(&self) -> &str {
        "gradient_boosted_trees"
    }
}

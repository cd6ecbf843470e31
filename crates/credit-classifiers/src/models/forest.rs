//! Random forest classifier over serialized CART trees.
//!
//! Trees are exported by the training pipeline as index-based arenas: node 0
//! is the root and children always point forward, so traversal terminates by
//! construction. Prediction averages the leaf class distributions across
//! trees.
use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;
use crate::models::classifier_trait::ClassifierModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        /// Class distribution at this leaf, one entry per class.
        distribution: Vec<f32>,
    },
    Split {
        feature: usize,
        threshold: f32,
        /// Arena index taken when `features[feature] <= threshold`.
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Serialized forest as it appears inside the model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestPayload {
    pub n_features: usize,
    pub trees: Vec<Tree>,
}

/// Validated, ready-to-predict random forest.
pub struct RandomForestModel {
    payload: ForestPayload,
    n_classes: usize,
}

impl RandomForestModel {
    /// Validate the payload against the class count and wrap it. Any
    /// structural defect here is a packaging bug and fails the load.
    pub fn new(payload: ForestPayload, n_classes: usize) -> Result<Self, ClassifyError> {
        if payload.trees.is_empty() {
            return Err(ClassifyError::ModelLoad(
                "random forest payload holds no trees".to_string(),
            ));
        }
        for (t, tree) in payload.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ClassifyError::ModelLoad(format!("tree {} is empty", t)));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Leaf { distribution } => {
                        if distribution.len() != n_classes {
                            return Err(ClassifyError::ModelLoad(format!(
                                "tree {} leaf {} has {} classes, expected {}",
                                t,
                                i,
                                distribution.len(),
                                n_classes
                            )));
                        }
                        if distribution.iter().any(|p| !p.is_finite() || *p < 0.0) {
                            return Err(ClassifyError::ModelLoad(format!(
                                "tree {} leaf {} holds an invalid probability",
                                t, i
                            )));
                        }
                    }
                    TreeNode::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= payload.n_features {
                            return Err(ClassifyError::ModelLoad(format!(
                                "tree {} node {} splits on feature {} of {}",
                                t, i, feature, payload.n_features
                            )));
                        }
                        // Forward-only children make the arena acyclic.
                        if *left <= i || *right <= i || *left >= tree.nodes.len()
                            || *right >= tree.nodes.len()
                        {
                            return Err(ClassifyError::ModelLoad(format!(
                                "tree {} node {} has out-of-order children",
                                t, i
                            )));
                        }
                    }
                }
            }
        }
        Ok(RandomForestModel { payload, n_classes })
    }

    fn walk<'a>(&'a self, tree: &'a Tree, features: &[f32]) -> &'a [f32] {
        let mut idx = 0;
        loop {
            match &tree.nodes[idx] {
                TreeNode::Leaf { distribution } => return distribution,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl ClassifierModel for RandomForestModel {
    fn n_features(&self) -> usize {
        self.payload.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ClassifyError> {
        if features.len() != self.payload.n_features {
            return Err(ClassifyError::ShapeMismatch {
                expected: self.payload.n_features,
                actual: features.len(),
            });
        }
        let mut acc = vec![0.0f32; self.n_classes];
        for tree in &self.payload.trees {
            let dist = self.walk(tree, features);
            let total: f32 = dist.iter().sum();
            if total > 0.0 {
                for (a, p) in acc.iter_mut().zip(dist) {
                    *a += p / total;
                }
            }
        }
        let total: f32 = acc.iter().sum();
        if total > 0.0 {
            for a in acc.iter_mut() {
                *a /= total;
            }
        } else {
            acc.fill(1.0 / self.n_classes as f32);
        }
        Ok(acc)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

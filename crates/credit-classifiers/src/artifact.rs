//! The versioned model artifact loaded once at process start.
//!
//! One JSON blob carries the frozen schema, the class labels, and the
//! trained model payload so they can never drift apart. A file that fails to
//! parse or validate is fatal to startup, never to an individual request.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;
use crate::models::forest::ForestPayload;
use crate::models::gbt::GbtPayload;
use crate::schema::TableSchema;

/// Artifact format this build reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// The trained model, tagged by variant. Exactly one variant ships in an
/// artifact; selection happened offline on macro-F1.
#[derive(Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ModelPayload {
    GradientBoostedTrees(GbtPayload),
    RandomForest(ForestPayload),
}

// The gradient-boosted payload wraps `gbdt::GBDT`, which has no `Debug`
// impl, so print only the variant tag.
impl std::fmt::Debug for ModelPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ModelPayload")
            .field(&self.variant_name())
            .finish()
    }
}

impl ModelPayload {
    pub fn n_features(&self) -> usize {
        match self {
            ModelPayload::GradientBoostedTrees(p) => p.n_features,
            ModelPayload::RandomForest(p) => p.n_features,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            ModelPayload::GradientBoostedTrees(_) => "gradient_boosted_trees",
            ModelPayload::RandomForest(_) => "random_forest",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub schema: TableSchema,
    pub model: ModelPayload,
}

impl ModelArtifact {
    /// Load and validate an artifact from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ClassifyError> {
        let file = File::open(&path).map_err(|e| {
            ClassifyError::ModelLoad(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ClassifyError> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)
            .map_err(|e| ClassifyError::ModelLoad(e.to_string()))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Write the artifact. Used by the offline training pipeline's export
    /// step and by tests.
    pub fn to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ClassifyError> {
        let file = File::create(&path).map_err(|e| {
            ClassifyError::ModelLoad(format!("{}: {}", path.as_ref().display(), e))
        })?;
        serde_json::to_writer(BufWriter::new(file), self)
            .map_err(|e| ClassifyError::ModelLoad(e.to_string()))
    }

    /// Cross-checks that make a malformed artifact fail at load time rather
    /// than surface later as per-row shape errors.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ClassifyError::ModelLoad(format!(
                "unsupported artifact format version {} (this build reads {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        self.schema.validate()?;
        if self.model.n_features() != self.schema.feature_width() {
            return Err(ClassifyError::ModelLoad(format!(
                "model expects {} features but the schema encodes {}",
                self.model.n_features(),
                self.schema.feature_width()
            )));
        }
        Ok(())
    }

    pub fn stamped_now(mut self) -> Self {
        self.created_at = Some(Utc::now());
        self
    }
}

//! Row-wise batch prediction with partial-failure semantics.
use crate::artifact::ModelArtifact;
use crate::encoder::FeatureEncoder;
use crate::error::ClassifyError;
use crate::models::adapter::ModelAdapter;
use crate::models::factory;
use crate::table::{InputTable, ResultRow, ResultsTable, RowOutcome};

/// Applies the encoder and the model adapter to each uploaded row
/// independently and in input order. Holds no per-request state, so one
/// instance serves any number of uploads.
pub struct BatchPredictor {
    encoder: FeatureEncoder,
    adapter: ModelAdapter,
}

impl BatchPredictor {
    /// Wire encoder and adapter from a loaded artifact. The artifact was
    /// already validated at load time; the width cross-check here guards
    /// against hand-assembled inconsistent parts.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ClassifyError> {
        let ModelArtifact { schema, model, .. } = artifact;
        let class_labels = schema.class_labels.clone();
        let encoder = FeatureEncoder::new(schema)?;
        let model = factory::build_model(model, class_labels.len())?;
        if model.n_features() != encoder.feature_width() {
            return Err(ClassifyError::ShapeMismatch {
                expected: encoder.feature_width(),
                actual: model.n_features(),
            });
        }
        let adapter = ModelAdapter::new(model, class_labels)?;
        Ok(BatchPredictor { encoder, adapter })
    }

    /// Classify every row of an uploaded table.
    ///
    /// The header is validated once, before any model call; a header that
    /// does not match the training schema fails the whole upload with
    /// `SchemaMismatch`. After that, row-level failures (a ragged row, a
    /// non-numeric value in a numeric column) are recorded as error markers
    /// in place of a prediction and never abort the batch. `ShapeMismatch`
    /// from inside the encoder/model contract propagates untouched.
    pub fn predict_all(&self, table: &InputTable) -> Result<ResultsTable, ClassifyError> {
        let bound = self.encoder.bind(&table.header)?;

        let mut rows = Vec::with_capacity(table.rows.len());
        for record in &table.rows {
            let outcome = match bound.encode(record) {
                Ok(features) => match self.adapter.predict(&features) {
                    Ok(result) => RowOutcome::Classified(result),
                    Err(err) if err.is_row_level() => RowOutcome::Failed(err),
                    Err(err) => return Err(err),
                },
                Err(err) if err.is_row_level() => RowOutcome::Failed(err),
                Err(err) => return Err(err),
            };
            rows.push(ResultRow {
                record: record.clone(),
                outcome,
            });
        }

        let results = ResultsTable {
            header: table.header.clone(),
            rows,
        };
        log::info!(
            "Classified {} of {} rows with {} ({} failed)",
            results.classified_count(),
            results.rows.len(),
            self.adapter.model_name(),
            results.failed_count()
        );
        Ok(results)
    }
}

use crate::artifact::ModelPayload;
use crate::error::ClassifyError;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::forest::RandomForestModel;
use crate::models::gbt::GbtModel;

/// Build a boxed classifier from the artifact's model payload, validating
/// it against the schema's class count.
pub fn build_model(
    payload: ModelPayload,
    n_classes: usize,
) -> Result<Box<dyn ClassifierModel>, ClassifyError> {
    match payload {
        ModelPayload::GradientBoostedTrees(p) => Ok(Box::new(GbtModel::new(p, n_classes)?)),
        ModelPayload::RandomForest(p) => Ok(Box::new(RandomForestModel::new(p, n_classes)?)),
    }
}

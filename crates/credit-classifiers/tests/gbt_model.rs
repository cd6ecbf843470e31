//! Gradient-boosted variant: one-vs-rest ensembles trained in-process on a
//! tiny separable dataset.

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use credit_classifiers::error::ClassifyError;
use credit_classifiers::models::adapter::ModelAdapter;
use credit_classifiers::models::classifier_trait::ClassifierModel;
use credit_classifiers::models::gbt::{GbtModel, GbtPayload};

/// Three well-separated clusters in two dimensions, ten points each.
fn clusters() -> Vec<(Vec<f32>, usize)> {
    let centers = [(0.0f32, 0.0f32), (5.0, 0.0), (0.0, 5.0)];
    let offsets = [
        (0.0f32, 0.0f32),
        (0.2, 0.1),
        (-0.1, 0.2),
        (0.1, -0.2),
        (-0.2, -0.1),
        (0.3, 0.0),
        (0.0, 0.3),
        (-0.3, 0.1),
        (0.1, 0.3),
        (-0.1, -0.3),
    ];
    let mut rows = Vec::new();
    for (class, (cx, cy)) in centers.iter().enumerate() {
        for (dx, dy) in &offsets {
            rows.push((vec![cx + dx, cy + dy], class));
        }
    }
    rows
}

/// Fit one binary ensemble per class, positives labeled 1 and the rest -1,
/// the way the offline training pipeline exports its one-vs-rest payload.
fn fit_one_vs_rest(rows: &[(Vec<f32>, usize)], n_classes: usize) -> Vec<GBDT> {
    let mut models = Vec::with_capacity(n_classes);
    for class in 0..n_classes {
        let mut config = Config::new();
        config.set_feature_size(2);
        config.set_max_depth(3);
        config.set_iterations(20);
        config.set_shrinkage(0.3);
        config.set_loss("LogLikelyhood");

        let mut train: DataVec = rows
            .iter()
            .map(|(features, label)| {
                let y = if *label == class { 1.0 } else { -1.0 };
                Data::new_training_data(features.clone(), 1.0, y, None)
            })
            .collect();

        let mut gbdt = GBDT::new(&config);
        gbdt.fit(&mut train);
        models.push(gbdt);
    }
    models
}

#[test]
fn one_vs_rest_probabilities_form_a_distribution() {
    let rows = clusters();
    let model = GbtModel::new(
        GbtPayload {
            n_features: 2,
            class_models: fit_one_vs_rest(&rows, 3),
        },
        3,
    )
    .unwrap();

    for (features, label) in &rows {
        let proba = model.predict_proba(features).unwrap();
        assert_eq!(proba.len(), 3);
        let total: f32 = proba.iter().sum();
        assert!((total - 1.0).abs() < 1e-4, "probabilities sum to {}", total);
        let argmax = proba
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(argmax, *label, "misclassified training point {:?}", features);
    }
}

#[test]
fn adapter_maps_argmax_to_class_label() {
    let rows = clusters();
    let model = GbtModel::new(
        GbtPayload {
            n_features: 2,
            class_models: fit_one_vs_rest(&rows, 3),
        },
        3,
    )
    .unwrap();
    let adapter = ModelAdapter::new(
        Box::new(model),
        vec![
            "Poor".to_string(),
            "Standard".to_string(),
            "Good".to_string(),
        ],
    )
    .unwrap();

    let result = adapter.predict(&[5.0, 0.0]).unwrap();
    assert_eq!(result.label, "Standard");
    assert!(result.confidence > 0.0 && result.confidence <= 1.0);
}

#[test]
fn wrong_length_vector_is_shape_mismatch() {
    let rows = clusters();
    let model = GbtModel::new(
        GbtPayload {
            n_features: 2,
            class_models: fit_one_vs_rest(&rows, 3),
        },
        3,
    )
    .unwrap();

    let err = model.predict_proba(&[1.0, 2.0, 3.0]).unwrap_err();
    assert_eq!(
        err,
        ClassifyError::ShapeMismatch {
            expected: 2,
            actual: 3
        }
    );
}

#[test]
fn class_count_mismatch_is_a_load_error() {
    let rows = clusters();
    let err = GbtModel::new(
        GbtPayload {
            n_features: 2,
            class_models: fit_one_vs_rest(&rows, 3),
        },
        4,
    )
    .unwrap_err();
    assert!(matches!(err, ClassifyError::ModelLoad(_)));
}

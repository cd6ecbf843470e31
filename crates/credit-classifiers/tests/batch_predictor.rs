//! End-to-end batch prediction over a random-forest artifact.

use credit_classifiers::artifact::{ModelArtifact, ModelPayload, FORMAT_VERSION};
use credit_classifiers::error::ClassifyError;
use credit_classifiers::io::{write_results, ERROR_MARKER};
use credit_classifiers::models::forest::{ForestPayload, Tree, TreeNode};
use credit_classifiers::predictor::BatchPredictor;
use credit_classifiers::schema::{ColumnKind, ColumnSpec, TableSchema};
use credit_classifiers::table::{InputTable, RawRecord, RowOutcome};

fn numeric(name: &str, fallback: f32) -> ColumnSpec {
    ColumnSpec {
        name: name.to_string(),
        kind: ColumnKind::Numeric {
            fallback,
            valid_range: None,
        },
    }
}

/// Two numeric features, three classes, one decision stump: low outstanding
/// debt predicts Good, high predicts Poor.
fn forest_artifact() -> ModelArtifact {
    let schema = TableSchema {
        columns: vec![
            numeric("Annual_Income", 40000.0),
            numeric("Outstanding_Debt", 1000.0),
        ],
        class_labels: vec![
            "Poor".to_string(),
            "Standard".to_string(),
            "Good".to_string(),
        ],
        target_column: Some("Credit_Score".to_string()),
    };
    let payload = ForestPayload {
        n_features: 2,
        trees: vec![Tree {
            nodes: vec![
                TreeNode::Split {
                    feature: 1,
                    threshold: 2000.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf {
                    distribution: vec![0.0, 1.0, 9.0],
                },
                TreeNode::Leaf {
                    distribution: vec![8.0, 2.0, 0.0],
                },
            ],
        }],
    };
    ModelArtifact {
        format_version: FORMAT_VERSION,
        created_at: None,
        schema,
        model: ModelPayload::RandomForest(payload),
    }
}

fn table(rows: &[&[&str]]) -> InputTable {
    InputTable {
        header: vec!["Annual_Income".to_string(), "Outstanding_Debt".to_string()],
        rows: rows
            .iter()
            .map(|r| RawRecord::new(r.iter().map(|v| v.to_string()).collect()))
            .collect(),
    }
}

#[test]
fn predicts_labels_with_confidence_in_range() {
    let predictor = BatchPredictor::from_artifact(forest_artifact()).unwrap();
    let results = predictor
        .predict_all(&table(&[&["52000", "800"], &["18000", "4500"]]))
        .unwrap();

    assert_eq!(results.rows.len(), 2);
    match &results.rows[0].outcome {
        RowOutcome::Classified(p) => {
            assert_eq!(p.label, "Good");
            assert!(p.confidence > 0.0 && p.confidence <= 1.0);
        }
        other => panic!("expected classification, got {:?}", other),
    }
    match &results.rows[1].outcome {
        RowOutcome::Classified(p) => assert_eq!(p.label, "Poor"),
        other => panic!("expected classification, got {:?}", other),
    }
}

#[test]
fn one_malformed_row_does_not_abort_the_batch() {
    let predictor = BatchPredictor::from_artifact(forest_artifact()).unwrap();
    let results = predictor
        .predict_all(&table(&[
            &["52000", "800"],
            &["not-a-number", "900"],
            &["18000", "4500"],
        ]))
        .unwrap();

    assert_eq!(results.rows.len(), 3);
    assert_eq!(results.classified_count(), 2);
    assert_eq!(results.failed_count(), 1);
    assert!(results.rows[0].outcome.is_classified());
    assert!(!results.rows[1].outcome.is_classified());
    assert!(results.rows[2].outcome.is_classified());

    match &results.rows[1].outcome {
        RowOutcome::Failed(ClassifyError::TypeMismatch { column, .. }) => {
            assert_eq!(column, "Annual_Income");
        }
        other => panic!("expected row-level TypeMismatch, got {:?}", other),
    }
}

#[test]
fn preserves_input_row_order() {
    let predictor = BatchPredictor::from_artifact(forest_artifact()).unwrap();
    let input = table(&[&["1", "100"], &["2", "100"], &["3", "100"], &["4", "100"]]);
    let results = predictor.predict_all(&input).unwrap();

    let incomes: Vec<&str> = results
        .rows
        .iter()
        .map(|r| r.record.values[0].as_str())
        .collect();
    assert_eq!(incomes, vec!["1", "2", "3", "4"]);
}

#[test]
fn missing_header_column_fails_before_any_model_call() {
    let predictor = BatchPredictor::from_artifact(forest_artifact()).unwrap();
    let input = InputTable {
        header: vec!["Annual_Income".to_string()],
        rows: vec![RawRecord::new(vec!["52000".to_string()])],
    };

    let err = predictor.predict_all(&input).unwrap_err();
    match err {
        ClassifyError::SchemaMismatch { missing, .. } => {
            assert_eq!(missing, vec!["Outstanding_Debt".to_string()]);
        }
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn inconsistent_artifact_width_is_rejected() {
    let mut artifact = forest_artifact();
    if let ModelPayload::RandomForest(p) = &mut artifact.model {
        p.n_features = 5;
        // Keep the tree's split feature in range for the new width.
    }
    // Validation in from_artifact catches the packaging bug.
    assert!(BatchPredictor::from_artifact(artifact).is_err());
}

#[test]
fn results_csv_carries_marker_for_failed_rows() {
    let predictor = BatchPredictor::from_artifact(forest_artifact()).unwrap();
    let results = predictor
        .predict_all(&table(&[&["52000", "800"], &["oops", "900"]]))
        .unwrap();

    let path = std::env::temp_dir().join(format!("credit_results_{}.csv", std::process::id()));
    write_results(&path, &results, true).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut lines = written.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Annual_Income,Outstanding_Debt,Predicted_Credit_Score,Confidence"
    );
    let first = lines.next().unwrap();
    assert!(first.starts_with("52000,800,Good,"));
    let second = lines.next().unwrap();
    assert!(second.contains(ERROR_MARKER));
    assert!(second.ends_with(','), "failed row has empty confidence");
    assert_eq!(lines.next(), None);
}

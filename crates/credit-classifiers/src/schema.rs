//! The input schema frozen at training time.
//!
//! A `TableSchema` is data, not code: it travels inside the model artifact so
//! that the encoder, the vocabularies, and the trained trees can never drift
//! apart. Column order in `columns` fixes the feature order of every encoded
//! vector.
use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

/// One categorical vocabulary entry. Several raw values may share a code
/// (e.g. Payment_of_Min_Amount maps both "No" and "NM" to 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLevel {
    pub value: String,
    pub code: f32,
}

/// How a single input column is turned into features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnKind {
    /// Cleaned and coerced to a float. Nulls (and values outside
    /// `valid_range`, when set) impute from `fallback`, the global median
    /// frozen at training time. Negative values are treated as nulls.
    Numeric {
        fallback: f32,
        #[serde(default)]
        valid_range: Option<(f32, f32)>,
    },
    /// Fixed versioned vocabulary. Unseen values map to the reserved
    /// `unknown_code` rather than failing.
    Categorical {
        levels: Vec<CategoryLevel>,
        unknown_code: f32,
    },
    /// A "<y> Years and <m> Months" sentence, encoded as total months.
    /// Unparsable or null values impute from `fallback`.
    CreditHistory { fallback: f32 },
    /// Comma-separated list column expanded to one 0/1 feature per entry
    /// of `types`, in order.
    LoanTypes { types: Vec<String> },
    /// Required in the upload (it was present at training time) but does
    /// not contribute a feature, e.g. ID, Name, SSN.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// The full training-time contract: required columns, their encodings, and
/// the class labels the model predicts over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<ColumnSpec>,
    pub class_labels: Vec<String>,
    /// Training target column. Tolerated and dropped when present in an
    /// upload, never required.
    #[serde(default)]
    pub target_column: Option<String>,
}

impl TableSchema {
    /// Number of features every encoded vector carries.
    pub fn feature_width(&self) -> usize {
        self.columns.iter().map(|c| c.kind.width()).sum()
    }

    /// Feature names in encoding order. A `LoanTypes` column contributes one
    /// name per known loan type, `Loan_<type>` with spaces and dashes
    /// normalized the way the training pipeline named them.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.feature_width());
        for col in &self.columns {
            match &col.kind {
                ColumnKind::Ignored => {}
                ColumnKind::LoanTypes { types } => {
                    for lt in types {
                        names.push(loan_feature_name(lt));
                    }
                }
                _ => names.push(col.name.clone()),
            }
        }
        names
    }

    /// Structural sanity checks, run when an artifact is loaded. A schema
    /// that fails here is a packaging bug, not a user input problem.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        if self.class_labels.is_empty() {
            return Err(ClassifyError::ModelLoad(
                "schema declares no class labels".to_string(),
            ));
        }
        if self.feature_width() == 0 {
            return Err(ClassifyError::ModelLoad(
                "schema declares no feature columns".to_string(),
            ));
        }
        for (i, col) in self.columns.iter().enumerate() {
            if col.name.trim().is_empty() {
                return Err(ClassifyError::ModelLoad(format!(
                    "schema column {} has an empty name",
                    i
                )));
            }
            if self.columns[..i].iter().any(|c| c.name == col.name) {
                return Err(ClassifyError::ModelLoad(format!(
                    "schema declares column '{}' twice",
                    col.name
                )));
            }
            if let ColumnKind::Categorical { levels, .. } = &col.kind {
                for (j, level) in levels.iter().enumerate() {
                    if levels[..j].iter().any(|l| l.value == level.value) {
                        return Err(ClassifyError::ModelLoad(format!(
                            "column '{}' maps value '{}' twice",
                            col.name, level.value
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl ColumnKind {
    fn width(&self) -> usize {
        match self {
            ColumnKind::Ignored => 0,
            ColumnKind::LoanTypes { types } => types.len(),
            _ => 1,
        }
    }
}

/// "Credit-Builder Loan" -> "Loan_CreditBuilder_Loan", matching the column
/// names the training pipeline generated for the multi-hot expansion.
pub fn loan_feature_name(loan_type: &str) -> String {
    format!("Loan_{}", loan_type.replace('-', "").replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(name: &str) -> ColumnSpec {
        ColumnSpec {
            name: name.to_string(),
            kind: ColumnKind::Numeric {
                fallback: 0.0,
                valid_range: None,
            },
        }
    }

    #[test]
    fn feature_width_counts_loan_expansion() {
        let schema = TableSchema {
            columns: vec![
                ColumnSpec {
                    name: "ID".to_string(),
                    kind: ColumnKind::Ignored,
                },
                numeric("Age"),
                ColumnSpec {
                    name: "Type_of_Loan".to_string(),
                    kind: ColumnKind::LoanTypes {
                        types: vec!["Auto Loan".to_string(), "Credit-Builder Loan".to_string()],
                    },
                },
            ],
            class_labels: vec!["Poor".to_string(), "Good".to_string()],
            target_column: None,
        };
        assert_eq!(schema.feature_width(), 3);
        assert_eq!(
            schema.feature_names(),
            vec!["Age", "Loan_Auto_Loan", "Loan_CreditBuilder_Loan"]
        );
    }

    #[test]
    fn validate_rejects_duplicate_columns() {
        let schema = TableSchema {
            columns: vec![numeric("Age"), numeric("Age")],
            class_labels: vec!["Poor".to_string()],
            target_column: None,
        };
        assert!(matches!(
            schema.validate(),
            Err(ClassifyError::ModelLoad(_))
        ));
    }
}

use std::error::Error;
use std::fmt;

/// Error type for the inference pipeline.
///
/// `SchemaMismatch` and `TypeMismatch` are row-level: the batch predictor
/// catches them per row and records an error marker instead of aborting the
/// batch. `ShapeMismatch` indicates an internal encoder/model contract
/// violation and `ModelLoad` a broken artifact; both propagate to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyError {
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    TypeMismatch {
        column: String,
        value: String,
    },
    ShapeMismatch {
        expected: usize,
        actual: usize,
    },
    ModelLoad(String),
}

impl ClassifyError {
    /// Whether the batch predictor should isolate this error to one row.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            ClassifyError::SchemaMismatch { .. } | ClassifyError::TypeMismatch { .. }
        )
    }
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifyError::SchemaMismatch {
                missing,
                unexpected,
            } => {
                write!(f, "Input does not match the training schema")?;
                if !missing.is_empty() {
                    write!(f, "; missing columns: {}", missing.join(", "))?;
                }
                if !unexpected.is_empty() {
                    write!(f, "; unexpected columns: {}", unexpected.join(", "))?;
                }
                Ok(())
            }
            ClassifyError::TypeMismatch { column, value } => {
                write!(f, "Column '{}' holds non-numeric value '{}'", column, value)
            }
            ClassifyError::ShapeMismatch { expected, actual } => write!(
                f,
                "Feature vector length {} does not match expected {}",
                actual, expected
            ),
            ClassifyError::ModelLoad(msg) => write!(f, "Failed to load model artifact: {}", msg),
        }
    }
}

impl Error for ClassifyError {}

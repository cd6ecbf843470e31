//! In-memory tables flowing through the batch predictor.
use crate::error::ClassifyError;
use crate::models::adapter::PredictionResult;

/// One uploaded row, values positionally aligned to the upload's header.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub values: Vec<String>,
}

impl RawRecord {
    pub fn new(values: Vec<String>) -> Self {
        RawRecord { values }
    }
}

/// An uploaded table: header plus rows, in file order.
#[derive(Debug, Clone)]
pub struct InputTable {
    pub header: Vec<String>,
    pub rows: Vec<RawRecord>,
}

/// Outcome of classifying one row. Row-level failures are carried here so a
/// partial batch still renders; they never abort sibling rows.
#[derive(Debug, Clone)]
pub enum RowOutcome {
    Classified(PredictionResult),
    Failed(ClassifyError),
}

impl RowOutcome {
    pub fn is_classified(&self) -> bool {
        matches!(self, RowOutcome::Classified(_))
    }
}

/// One result row: the original record plus its outcome.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub record: RawRecord,
    pub outcome: RowOutcome,
}

/// Results for one uploaded table, same row count and order as the input.
/// Owned by the caller for the duration of one request.
#[derive(Debug, Clone)]
pub struct ResultsTable {
    pub header: Vec<String>,
    pub rows: Vec<ResultRow>,
}

impl ResultsTable {
    pub fn classified_count(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome.is_classified()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.rows.len() - self.classified_count()
    }
}

//! Deterministic encoding of raw rows into fixed-width feature vectors.
//!
//! Column lookup by name happens exactly once, when an upload's header is
//! bound against the schema; after that every row is read positionally. The
//! cleaning rules mirror the training pipeline: stray underscores are
//! stripped, the dataset's junk sentinel and empty strings are nulls, and
//! nulls or out-of-range numerics impute from the fallback frozen at
//! training time.
use crate::error::ClassifyError;
use crate::schema::{ColumnKind, TableSchema};
use crate::table::RawRecord;

/// Placeholder the raw dataset uses for scrubbed values.
const JUNK_SENTINEL: &str = "!@9#%8";

/// Stateless encoder for one frozen schema.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: TableSchema,
    feature_names: Vec<String>,
}

impl FeatureEncoder {
    pub fn new(schema: TableSchema) -> Result<Self, ClassifyError> {
        schema.validate()?;
        let feature_names = schema.feature_names();
        Ok(FeatureEncoder {
            schema,
            feature_names,
        })
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn feature_width(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Validate an upload's header against the schema and resolve every
    /// required column to its position. Missing or unexpected columns fail
    /// here, before any row is touched. The target column, if the upload
    /// still carries it, is tolerated and dropped.
    pub fn bind<'a>(&'a self, header: &[String]) -> Result<BoundEncoder<'a>, ClassifyError> {
        let mut positions = Vec::with_capacity(self.schema.columns.len());
        let mut missing = Vec::new();

        for col in &self.schema.columns {
            match header.iter().position(|h| h.trim() == col.name) {
                Some(idx) => positions.push(idx),
                None => missing.push(col.name.clone()),
            }
        }

        let mut unexpected = Vec::new();
        for (i, h) in header.iter().enumerate() {
            let name = h.trim();
            let known = self.schema.columns.iter().any(|c| c.name == name)
                || self.schema.target_column.as_deref() == Some(name);
            // A repeated known column is ambiguous input; the second
            // occurrence counts as an extra column.
            if !known || header[..i].iter().any(|p| p.trim() == name) {
                unexpected.push(name.to_string());
            }
        }

        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(ClassifyError::SchemaMismatch {
                missing,
                unexpected,
            });
        }

        log::debug!(
            "Bound {} schema columns to a {}-column header",
            self.schema.columns.len(),
            header.len()
        );

        Ok(BoundEncoder {
            encoder: self,
            positions,
            header_width: header.len(),
        })
    }
}

/// A `FeatureEncoder` resolved against one upload's header.
#[derive(Debug)]
pub struct BoundEncoder<'a> {
    encoder: &'a FeatureEncoder,
    /// Header position of each schema column, in schema order.
    positions: Vec<usize>,
    header_width: usize,
}

impl BoundEncoder<'_> {
    /// Encode one row. Pure and deterministic: the same record always yields
    /// the same vector, and the vector length always equals
    /// `feature_width()`.
    pub fn encode(&self, record: &RawRecord) -> Result<Vec<f32>, ClassifyError> {
        if record.values.len() != self.header_width {
            // Ragged row: report which bound columns fall past its end.
            let missing = self
                .encoder
                .schema
                .columns
                .iter()
                .zip(&self.positions)
                .filter(|(_, &pos)| pos >= record.values.len())
                .map(|(col, _)| col.name.clone())
                .collect();
            return Err(ClassifyError::SchemaMismatch {
                missing,
                unexpected: if record.values.len() > self.header_width {
                    vec![format!(
                        "{} field(s) past the header",
                        record.values.len() - self.header_width
                    )]
                } else {
                    Vec::new()
                },
            });
        }

        let mut features = Vec::with_capacity(self.encoder.feature_width());
        for (col, &pos) in self.encoder.schema.columns.iter().zip(&self.positions) {
            let raw = record.values[pos].as_str();
            match &col.kind {
                ColumnKind::Ignored => {}
                ColumnKind::Numeric {
                    fallback,
                    valid_range,
                } => {
                    features.push(encode_numeric(&col.name, raw, *fallback, *valid_range)?);
                }
                ColumnKind::Categorical {
                    levels,
                    unknown_code,
                } => {
                    let code = match clean(raw) {
                        None => *unknown_code,
                        Some(value) => levels
                            .iter()
                            .find(|l| l.value == value)
                            .map(|l| l.code)
                            .unwrap_or(*unknown_code),
                    };
                    features.push(code);
                }
                ColumnKind::CreditHistory { fallback } => {
                    let months = clean(raw)
                        .and_then(|v| parse_history_months(v))
                        .unwrap_or(*fallback);
                    features.push(months);
                }
                ColumnKind::LoanTypes { types } => {
                    encode_loan_types(raw, types, &mut features);
                }
            }
        }

        debug_assert_eq!(features.len(), self.encoder.feature_width());
        Ok(features)
    }
}

/// Strip stray underscores and whitespace; map empties and the junk
/// sentinel to null.
fn clean(raw: &str) -> Option<&str> {
    let value = raw.trim().trim_matches('_');
    if value.is_empty() || value == JUNK_SENTINEL {
        None
    } else {
        Some(value)
    }
}

fn encode_numeric(
    column: &str,
    raw: &str,
    fallback: f32,
    valid_range: Option<(f32, f32)>,
) -> Result<f32, ClassifyError> {
    let value = match clean(raw) {
        None => return Ok(fallback),
        Some(v) => v,
    };
    let parsed: f32 = value.parse().map_err(|_| ClassifyError::TypeMismatch {
        column: column.to_string(),
        value: value.to_string(),
    })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Ok(fallback);
    }
    if let Some((lo, hi)) = valid_range {
        if parsed < lo || parsed > hi {
            return Ok(fallback);
        }
    }
    Ok(parsed)
}

/// Parse "<y> Years and <m> Months" into total months.
fn parse_history_months(value: &str) -> Option<f32> {
    let mut tokens = value.split_whitespace();
    let years: u32 = tokens.next()?.parse().ok()?;
    if !tokens.next()?.eq_ignore_ascii_case("Years") {
        return None;
    }
    if !tokens.next()?.eq_ignore_ascii_case("and") {
        return None;
    }
    let months: u32 = tokens.next()?.parse().ok()?;
    if !tokens.next()?.eq_ignore_ascii_case("Months") {
        return None;
    }
    if tokens.next().is_some() {
        return None;
    }
    // Absurd year counts overflow the month arithmetic; treat them as
    // unparsable so the caller imputes the fallback.
    years
        .checked_mul(12)
        .and_then(|y| y.checked_add(months))
        .map(|total| total as f32)
}

/// Multi-hot expansion of the comma-separated loan list. Customers with no
/// loans have a null list and encode to all zeros.
fn encode_loan_types(raw: &str, types: &[String], out: &mut Vec<f32>) {
    let entries: Vec<&str> = match clean(raw) {
        None => Vec::new(),
        Some(list) => list
            .split(',')
            .map(|e| {
                let e = e.trim();
                // The dataset joins the final entry with "and ".
                e.strip_prefix("and ").unwrap_or(e).trim()
            })
            .collect(),
    };
    for lt in types {
        let hit = entries.iter().any(|e| e.eq_ignore_ascii_case(lt));
        out.push(if hit { 1.0 } else { 0.0 });
    }
}

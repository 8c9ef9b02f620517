use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};

/// Name of the derived regression column added to tables when a trend exists.
pub const BEST_FIT_COLUMN: &str = "best_fit_line";

/// Canonical column names for one dashboard's readings.
///
/// Every consumer that addresses columns by name (grid, chart axes) is checked
/// against this schema once at startup, before the first tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingSchema {
    /// Column holding the reading value, e.g. `"beak_depth"`.
    pub value:     String,
    /// Column holding the formatted timestamp.
    pub timestamp: String,
}

impl Default for ReadingSchema {
    fn default() -> Self {
        Self {
            value:     "value".to_string(),
            timestamp: "timestamp".to_string(),
        }
    }
}

impl ReadingSchema {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Columns of the tabular view, without the derived trend column.
    pub fn base_columns(&self) -> Vec<String> {
        vec![self.value.clone(), self.timestamp.clone()]
    }

    /// Every column a consumer may reference, including [`BEST_FIT_COLUMN`].
    pub fn columns(&self) -> Vec<String> {
        let mut columns = self.base_columns();
        columns.push(BEST_FIT_COLUMN.to_string());
        columns
    }

    /// Check that the schema itself is well-formed: non-empty, distinct names.
    pub fn check(&self) -> Result<()> {
        let columns = self.columns();
        for (i, name) in columns.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(DashError::Config("reading schema has an empty column name".into()));
            }
            if columns[..i].contains(name) {
                return Err(DashError::Config(format!(
                    "reading schema declares column '{name}' twice"
                )));
            }
        }
        Ok(())
    }

    /// Fail fast if `consumer` references a column this schema does not have.
    pub fn validate<'a>(
        &self,
        consumer: &str,
        referenced: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        require_columns(consumer, referenced, &self.columns())
    }
}

/// Generic column check shared by reading schemas and static datasets.
pub fn require_columns<'a, S: AsRef<str>>(
    consumer: &str,
    referenced: impl IntoIterator<Item = &'a str>,
    available: &[S],
) -> Result<()> {
    for column in referenced {
        if !available.iter().any(|c| c.as_ref() == column) {
            return Err(DashError::SchemaMismatch {
                consumer:  consumer.to_string(),
                column:    column.to_string(),
                available: available.iter().map(|c| c.as_ref().to_string()).collect(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_columns() {
        let schema = ReadingSchema::new("beak_depth");
        assert!(schema
            .validate("chart", ["timestamp", "beak_depth", BEST_FIT_COLUMN])
            .is_ok());
    }

    #[test]
    fn rejects_unknown_column() {
        let schema = ReadingSchema::new("beak_depth");
        let err = schema.validate("chart", ["timestamp", "beak depth"]).unwrap_err();
        match err {
            DashError::SchemaMismatch { consumer, column, available } => {
                assert_eq!(consumer, "chart");
                assert_eq!(column, "beak depth");
                assert_eq!(available, vec!["beak_depth", "timestamp", BEST_FIT_COLUMN]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn check_rejects_duplicate_and_empty_names() {
        assert!(ReadingSchema::new("timestamp").check().is_err());
        assert!(ReadingSchema::new(" ").check().is_err());
        assert!(ReadingSchema::new(BEST_FIT_COLUMN).check().is_err());
        assert!(ReadingSchema::new("temp").check().is_ok());
    }
}

use crate::error::Result;
use crate::reading::Reading;
use crate::schema::{ReadingSchema, BEST_FIT_COLUMN};
use crate::trend::Trend;
use crate::window::SampleWindow;
use serde::Serialize;
use std::fmt;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // `{:.prec$}` honours a precision passed by the renderer.
            Cell::Float(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None    => write!(f, "{v}"),
            },
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Column-named rows, the tabular form handed to grid renderers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows:    Vec<Vec<Cell>>,
}

impl Table {
    /// Tabular form of `readings`: one row per reading, `[value, timestamp]`.
    pub fn from_readings(readings: &[Reading], schema: &ReadingSchema) -> Self {
        Self {
            columns: schema.base_columns(),
            rows: readings
                .iter()
                .map(|r| vec![Cell::Float(r.value()), Cell::Text(r.timestamp().to_string())])
                .collect(),
        }
    }

    /// Copy of this table with a [`BEST_FIT_COLUMN`] appended.
    #[must_use]
    pub fn with_best_fit(&self, trend: &Trend) -> Self {
        let mut table = self.clone();
        table.columns.push(BEST_FIT_COLUMN.to_string());
        for (x, row) in table.rows.iter_mut().enumerate() {
            row.push(Cell::Float(trend.at(x)));
        }
        table
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of column `name`, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything consumers need from one tick: the snapshot, its table and the
/// latest reading. Built in one go and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    /// Sequence number of the tick that produced this view (1-based).
    pub tick:     u64,
    pub snapshot: Vec<Reading>,
    pub tabular:  Table,
    pub latest:   Reading,
}

impl DerivedView {
    /// Build a view from the window's current contents.
    pub fn build(window: &SampleWindow, schema: &ReadingSchema, tick: u64) -> Result<Self> {
        let latest = window.latest()?;
        let snapshot = window.snapshot();
        let tabular = Table::from_readings(&snapshot, schema);
        Ok(Self { tick, snapshot, tabular, latest })
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Values in snapshot order.
    pub fn values(&self) -> Vec<f64> {
        self.snapshot.iter().map(Reading::value).collect()
    }
}

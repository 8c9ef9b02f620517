//! Static datasets shown next to the live readings.
//!
//! The core does not own the data files. Rows arrive already parsed (the host
//! reads a JSON array); this module only offers the filtering pass-through used
//! by the static views.

use crate::error::{DashError, Result};
use crate::schema::require_columns;
use crate::view::{Cell, Table};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A row type that can be shown in a grid and filtered by column.
pub trait Record {
    /// Column names, in display order.
    fn columns() -> &'static [&'static str];

    /// Cells in the same order as [`Record::columns`].
    fn cells(&self) -> Vec<Cell>;

    /// Categorical value of `column`, if it is a text column.
    fn category(&self, column: &str) -> Option<&str>;
}

/// Rows of one static dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset<R> {
    rows: Vec<R>,
}

impl<R> Dataset<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows matching `predicate`, in their original order.
    pub fn filtered_data(&self, predicate: impl Fn(&R) -> bool) -> Vec<&R> {
        self.rows.iter().filter(|row| predicate(row)).collect()
    }
}

impl<R: DeserializeOwned> Dataset<R> {
    /// Parse a JSON array of rows.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map(Self::new)
            .map_err(|e| DashError::Dataset(format!("JSON parse error: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DashError::Dataset(format!("cannot read '{}': {e}", path.display())))?;
        Self::from_json(&raw)
    }
}

impl<R: Record> Dataset<R> {
    /// Rows whose categorical `column` is one of `allowed`.
    ///
    /// Fails with [`DashError::SchemaMismatch`] when `column` is not part of
    /// the record type. An empty `allowed` set matches nothing.
    pub fn filter_by_membership(&self, column: &str, allowed: &HashSet<String>) -> Result<Vec<&R>> {
        require_columns("dataset filter", [column], R::columns())?;
        Ok(self.filtered_data(|row| {
            row.category(column)
                .is_some_and(|value| allowed.contains(value))
        }))
    }

    /// Tabulate `rows` with the record's columns.
    pub fn table_of(rows: &[&R]) -> Table {
        Table {
            columns: R::columns().iter().map(|c| c.to_string()).collect(),
            rows:    rows.iter().map(|r| r.cells()).collect(),
        }
    }
}

fn opt_float(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::Float(v),
        None    => Cell::Text("NA".to_string()),
    }
}

/// One row of the Palmer Penguins dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenguinRecord {
    pub species:           String,
    pub island:            String,
    pub bill_length_mm:    Option<f64>,
    pub bill_depth_mm:     Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g:       Option<f64>,
    pub sex:               Option<String>,
}

impl Record for PenguinRecord {
    fn columns() -> &'static [&'static str] {
        &[
            "species",
            "island",
            "bill_length_mm",
            "bill_depth_mm",
            "flipper_length_mm",
            "body_mass_g",
            "sex",
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.species.clone()),
            Cell::Text(self.island.clone()),
            opt_float(self.bill_length_mm),
            opt_float(self.bill_depth_mm),
            opt_float(self.flipper_length_mm),
            opt_float(self.body_mass_g),
            Cell::Text(self.sex.clone().unwrap_or_else(|| "NA".to_string())),
        ]
    }

    fn category(&self, column: &str) -> Option<&str> {
        match column {
            "species" => Some(&self.species),
            "island"  => Some(&self.island),
            "sex"     => self.sex.as_deref(),
            _ => None,
        }
    }
}

/// One row of the Galápagos finch beak measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinchRecord {
    pub band:        Option<u32>,
    pub species:     String,
    pub year:        u16,
    pub beak_length: f64,
    pub beak_depth:  f64,
}

impl Record for FinchRecord {
    fn columns() -> &'static [&'static str] {
        &["band", "species", "year", "beak_length", "beak_depth"]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.band
                .map(|b| Cell::Text(b.to_string()))
                .unwrap_or_else(|| Cell::Text("NA".to_string())),
            Cell::Text(self.species.clone()),
            Cell::Text(self.year.to_string()),
            Cell::Float(self.beak_length),
            Cell::Float(self.beak_depth),
        ]
    }

    fn category(&self, column: &str) -> Option<&str> {
        match column {
            "species" => Some(&self.species),
            _ => None,
        }
    }
}

//! Minimal column-oriented table used for location and submission data.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HubError};

fn schema_error(code: &str, message: impl Into<String>) -> HubError {
    HubError::SchemaViolation(ErrorInfo::new(code, message))
}

fn csv_error(code: &str, err: impl ToString) -> HubError {
    HubError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Typed storage for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    /// UTF-8 text values.
    Text(Vec<String>),
    /// Signed integer values.
    Int(Vec<i64>),
    /// Floating point values.
    Float(Vec<f64>),
    /// Boolean values.
    Bool(Vec<bool>),
}

impl ColumnData {
    /// Number of values stored in the column.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(values) => values.len(),
            ColumnData::Int(values) => values.len(),
            ColumnData::Float(values) => values.len(),
            ColumnData::Bool(values) => values.len(),
        }
    }

    /// Returns true when the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the stored value type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::Text(_) => "text",
            ColumnData::Int(_) => "int",
            ColumnData::Float(_) => "float",
            ColumnData::Bool(_) => "bool",
        }
    }

    /// Renders the value at `idx` the way it is written to CSV.
    pub fn render(&self, idx: usize) -> String {
        match self {
            ColumnData::Text(values) => values[idx].clone(),
            ColumnData::Int(values) => values[idx].to_string(),
            ColumnData::Float(values) => values[idx].to_string(),
            ColumnData::Bool(values) => values[idx].to_string(),
        }
    }

    fn take(&self, indices: &[usize]) -> ColumnData {
        fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&idx| values[idx].clone()).collect()
        }
        match self {
            ColumnData::Text(values) => ColumnData::Text(pick(values, indices)),
            ColumnData::Int(values) => ColumnData::Int(pick(values, indices)),
            ColumnData::Float(values) => ColumnData::Float(pick(values, indices)),
            ColumnData::Bool(values) => ColumnData::Bool(pick(values, indices)),
        }
    }
}

/// Named column of a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Creates a column from raw typed data.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Creates a text column.
    pub fn text<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Creates an integer column.
    pub fn int(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(name, ColumnData::Int(values))
    }

    /// Creates a floating point column.
    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }

    /// Creates a boolean column.
    pub fn bool(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self::new(name, ColumnData::Bool(values))
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Typed column values.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Number of values in the column.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true when the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Ordered collection of equally sized named columns.
///
/// Tables are values: every transforming method returns a new table and
/// leaves the receiver untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table, rejecting ragged or duplicated columns.
    pub fn new(columns: Vec<Column>) -> Result<Self, HubError> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(schema_error(
                    "table.duplicate_column",
                    format!("column '{}' appears more than once", column.name()),
                ));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(ragged) = columns.iter().find(|column| column.len() != expected) {
                return Err(HubError::SchemaViolation(
                    ErrorInfo::new(
                        "table.ragged",
                        format!(
                            "column '{}' has {} rows but '{}' has {}",
                            ragged.name(),
                            ragged.len(),
                            first.name(),
                            expected
                        ),
                    )
                    .with_context("column", ragged.name()),
                ));
            }
        }
        Ok(Self { columns })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Columns in their current order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in their current order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// Returns a copy with `column` replacing the column of the same name,
    /// or appended at the end when no such column exists.
    pub fn with_column(&self, column: Column) -> Result<Self, HubError> {
        let mut columns = self.columns.clone();
        match columns.iter().position(|c| c.name() == column.name()) {
            Some(idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Self::new(columns)
    }

    /// Returns a copy holding only the rows whose mask entry is true.
    pub fn filter(&self, mask: &[bool]) -> Result<Self, HubError> {
        if mask.len() != self.height() {
            return Err(schema_error(
                "table.mask_length",
                format!(
                    "row mask has {} entries but the table has {} rows",
                    mask.len(),
                    self.height()
                ),
            ));
        }
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(idx, &keep)| keep.then_some(idx))
            .collect();
        Ok(self.take(&indices))
    }

    /// Returns a copy with the rows at `indices`, in that order.
    ///
    /// Indices must be in range; repeats are allowed.
    pub fn take(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| Column::new(column.name(), column.data().take(indices)))
            .collect();
        Self { columns }
    }

    /// Returns a copy containing exactly `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Self, HubError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let column = self.column(name).ok_or_else(|| {
                HubError::MissingColumn(
                    ErrorInfo::new("table.select", format!("column '{name}' not found"))
                        .with_context("column", *name)
                        .with_list("available", self.column_names()),
                )
            })?;
            columns.push(column.clone());
        }
        Self::new(columns)
    }

    /// Renders row `idx` as strings in column order.
    pub fn render_row(&self, idx: usize) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.data().render(idx))
            .collect()
    }

    /// Reads a headered CSV stream; every column is stored as text.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, HubError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|err| csv_error("table.csv_header", err))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut values: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record.map_err(|err| csv_error("table.csv_record", err))?;
            for (idx, field) in record.iter().enumerate() {
                values[idx].push(field.to_string());
            }
        }
        let columns = headers
            .into_iter()
            .zip(values)
            .map(|(name, values)| Column::text(name, values))
            .collect();
        Self::new(columns)
    }

    /// Reads a headered CSV file; every column is stored as text.
    pub fn from_csv_path(path: &Path) -> Result<Self, HubError> {
        let file = File::open(path).map_err(|err| {
            HubError::Io(
                ErrorInfo::new("table.csv_open", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_csv_reader(file)
    }

    /// Writes the table as headered CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), HubError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.column_names())
            .map_err(|err| csv_error("table.csv_write", err))?;
        for idx in 0..self.height() {
            wtr.write_record(self.render_row(idx))
                .map_err(|err| csv_error("table.csv_write", err))?;
        }
        wtr.flush()
            .map_err(|err| csv_error("table.csv_write", err))
    }

    /// Writes the table as headered CSV to `path`.
    pub fn write_csv_path(&self, path: &Path) -> Result<(), HubError> {
        let file = File::create(path).map_err(|err| {
            HubError::Io(
                ErrorInfo::new("table.csv_create", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        self.write_csv(file)
    }
}

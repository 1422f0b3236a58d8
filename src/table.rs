//! In-memory sample table with named, ordered columns.
//!
//! Columns are either numeric (`Option<f64>` per cell) or text. Missing cells
//! are `None`. Loading from delimited text infers a column as numeric when
//! every non-missing cell parses as `f64`. Loaded columns keep their original
//! cell text, which is what gets written back out, so IDs such as `007` and
//! readings such as `93.620` survive a load/write cycle unchanged.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::AppError;

/// Cell tokens treated as missing on load (compared case-insensitively).
const MISSING_TOKENS: [&str; 4] = ["", "na", "nan", "null"];

/// Token written for missing numeric cells.
pub const MISSING_OUT: &str = "NA";

#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_string(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(v) => match v[row] {
                Some(x) if x.is_finite() => x.to_string(),
                _ => MISSING_OUT.to_string(),
            },
            ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
        }
    }

    fn cell_json(&self, row: usize) -> Value {
        match self {
            ColumnData::Numeric(v) => v[row]
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ColumnData::Text(v) => v[row].clone().map(Value::String).unwrap_or(Value::Null),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
    /// Cell text as read from the input file. `None` for computed columns.
    pub raw: Option<Vec<String>>,
}

impl Column {
    fn cell_string(&self, row: usize) -> String {
        match &self.raw {
            Some(raw) => raw[row].clone(),
            None => self.data.cell_string(row),
        }
    }
}

/// A table of sample rows. All columns have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl SampleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric cells of `name`; `None` if the column is absent or holds text.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name).map(|c| &c.data) {
            Some(ColumnData::Numeric(v)) => Some(v),
            _ => None,
        }
    }

    /// Text cells of `name`; `None` if the column is absent or numeric.
    pub fn text(&self, name: &str) -> Option<&[Option<String>]> {
        match self.column(name).map(|c| &c.data) {
            Some(ColumnData::Text(v)) => Some(v),
            _ => None,
        }
    }

    /// Append a column, or replace the existing column of the same name in place.
    ///
    /// The first column pushed into an empty table fixes the row count.
    pub fn push_column(&mut self, name: &str, data: ColumnData) -> Result<(), AppError> {
        self.insert_column(name, data, None)
    }

    fn insert_column(
        &mut self,
        name: &str,
        data: ColumnData,
        raw: Option<Vec<String>>,
    ) -> Result<(), AppError> {
        if self.columns.is_empty() {
            self.n_rows = data.len();
        } else if data.len() != self.n_rows {
            return Err(AppError::LengthMismatch {
                name: name.to_string(),
                expected: self.n_rows,
                actual: data.len(),
            });
        }

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => {
                existing.data = data;
                existing.raw = raw;
            }
            None => self.columns.push(Column {
                name: name.to_string(),
                data,
                raw,
            }),
        }
        Ok(())
    }

    pub fn push_numeric(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<(), AppError> {
        self.push_column(name, ColumnData::Numeric(values))
    }

    pub fn push_text(&mut self, name: &str, values: Vec<Option<String>>) -> Result<(), AppError> {
        self.push_column(name, ColumnData::Text(values))
    }

    /// Builder-style `push_numeric` for constructing tables inline.
    pub fn with_numeric(mut self, name: &str, values: Vec<Option<f64>>) -> Result<Self, AppError> {
        self.push_numeric(name, values)?;
        Ok(self)
    }

    /// Load a delimited file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, AppError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AppError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), delimiter)
    }

    /// Parse delimited text with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, AppError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        for (i, name) in headers.iter().enumerate() {
            if headers[..i].contains(name) {
                return Err(AppError::DuplicateColumn(name.clone()));
            }
        }

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in csv_reader.records() {
            let record = record?;
            for (i, cells) in raw.iter_mut().enumerate() {
                cells.push(record.get(i).unwrap_or("").to_string());
            }
        }

        let mut table = SampleTable::new();
        for (name, cells) in headers.iter().zip(raw) {
            let data = infer_column(&cells);
            table.insert_column(name, data, Some(cells))?;
        }
        log::debug!(
            "loaded table with {} rows and {} columns",
            table.n_rows(),
            table.n_columns()
        );
        Ok(table)
    }

    /// Write the table as delimited text with a header row.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), AppError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        csv_writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
        for row in 0..self.n_rows {
            csv_writer.write_record(self.columns.iter().map(|c| c.cell_string(row)))?;
        }
        csv_writer
            .flush()
            .map_err(|e| AppError::Csv(csv::Error::from(e)))?;
        Ok(())
    }

    /// Rows as JSON objects keyed by column name; missing and non-finite cells become `null`.
    pub fn to_json_records(&self) -> Value {
        let rows = (0..self.n_rows)
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns
                    .iter()
                    .map(|c| (c.name.clone(), c.data.cell_json(row)))
                    .collect();
                Value::Object(obj)
            })
            .collect();
        Value::Array(rows)
    }
}

fn is_missing_token(cell: &str) -> bool {
    MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

fn infer_column(cells: &[String]) -> ColumnData {
    let present = |c: &String| Some(c.clone()).filter(|c| !is_missing_token(c));
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|c| match present(c) {
            Some(s) => s.parse::<f64>().ok().map(Some),
            None => Some(None),
        })
        .collect();
    match parsed {
        Some(values) => ColumnData::Numeric(values),
        None => ColumnData::Text(cells.iter().map(present).collect()),
    }
}

/// Where a calculator gets its table from: already in memory, or a
/// delimited file loaded when the calculator runs.
#[derive(Clone, Debug)]
pub enum Input {
    Table(SampleTable),
    Path { path: PathBuf, delimiter: u8 },
}

impl Input {
    /// A file with a non-comma delimiter, e.g. `b'\t'` for TSV.
    pub fn delimited<P: Into<PathBuf>>(path: P, delimiter: u8) -> Self {
        Input::Path {
            path: path.into(),
            delimiter,
        }
    }

    pub fn load(self) -> Result<SampleTable, AppError> {
        match self {
            Input::Table(t) => Ok(t),
            Input::Path { path, delimiter } => {
                log::info!("reading sample table from {}", path.display());
                SampleTable::from_csv_path(&path, delimiter)
            }
        }
    }
}

impl From<SampleTable> for Input {
    fn from(t: SampleTable) -> Self {
        Input::Table(t)
    }
}

impl From<PathBuf> for Input {
    fn from(p: PathBuf) -> Self {
        Input::delimited(p, b',')
    }
}

impl From<&Path> for Input {
    fn from(p: &Path) -> Self {
        Input::delimited(p, b',')
    }
}

impl From<&str> for Input {
    fn from(p: &str) -> Self {
        Input::delimited(p, b',')
    }
}

/// Read all of stdin as delimited text.
pub fn read_stdin_table(delimiter: u8) -> Result<SampleTable, AppError> {
    let mut s = String::new();
    io::stdin()
        .read_to_string(&mut s)
        .map_err(|source| AppError::ReadStdin { source })?;
    SampleTable::from_reader(s.as_bytes(), delimiter)
}

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, ScoreError};

/// Name of the identifier column every normalized table carries.
pub const ID_COLUMN: &str = "ID";

/// Literal token the analysis tools write for a missing measurement.
pub const MISSING_TOKEN: &str = "NaN";

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, mirroring the handful of dtypes the tool
/// exports actually contain.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole floats keep one decimal, like the tools' own CSV writers.
            Value::Number(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Missing => Ok(()),
        }
    }
}

impl Value {
    /// Parse a raw CSV cell without any coercion: empty and `NaN` become
    /// [`Value::Missing`], everything else stays text.
    pub fn from_raw(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == MISSING_TOKEN {
            Value::Missing
        } else {
            Value::Text(s.to_string())
        }
    }

    /// Interpret the value as an `f64`. `Missing` maps to `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One row of a table: column name → value.
pub type Row = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Table – the complete loaded data set
// ---------------------------------------------------------------------------

/// An ordered collection of rows sharing one column list.
///
/// `columns` fixes the column order used for display and export; every row
/// holds a value for every column (absent cells are stored as
/// [`Value::Missing`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Append a row, filling any column it lacks with `Missing`.
    pub fn push_row(&mut self, mut row: Row) {
        for col in &self.columns {
            row.entry(col.clone()).or_insert(Value::Missing);
        }
        self.rows.push(row);
    }

    /// Fail with [`ScoreError::MissingColumn`] unless `name` is present.
    pub fn require_column(&self, name: &str, source: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(ScoreError::MissingColumn {
                column: name.to_string(),
                source_name: source.to_string(),
            })
        }
    }

    /// Rename a column in place. Unknown names are a no-op.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        let Some(pos) = self.columns.iter().position(|c| c == from) else {
            return;
        };
        self.columns[pos] = to.to_string();
        for row in &mut self.rows {
            if let Some(v) = row.remove(from) {
                row.insert(to.to_string(), v);
            }
        }
    }

    /// Drop every column for which `pred` returns true.
    pub fn drop_columns_where<F>(&mut self, mut pred: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let (dropped, kept): (Vec<String>, Vec<String>) =
            self.columns.drain(..).partition(|c| pred(c.as_str()));
        self.columns = kept;
        for row in &mut self.rows {
            for col in &dropped {
                row.remove(col);
            }
        }
        dropped
    }

    /// Keep only `wanted`, in that order. Every name must exist.
    pub fn select_columns(&mut self, wanted: &[&str], source: &str) -> Result<()> {
        for col in wanted {
            self.require_column(col, source)?;
        }
        self.columns = wanted.iter().map(|c| c.to_string()).collect();
        let keep = &self.columns;
        for row in &mut self.rows {
            row.retain(|k, _| keep.contains(k));
        }
        Ok(())
    }

    /// Convert every text cell outside `ID` into a finite number.
    ///
    /// `inf`, `nan` and friends parse as floats but are rejected like any
    /// other non-numeric text; only the literal `NaN` token means missing.
    ///
    /// A cell that does not parse is a schema error; an unrecoverable value
    /// in a numeric column must not flow silently into the models.
    pub fn coerce_numeric(&mut self) -> Result<()> {
        for (row_no, row) in self.rows.iter_mut().enumerate() {
            let id = row
                .get(ID_COLUMN)
                .map(|v| v.to_string())
                .unwrap_or_else(|| format!("row {row_no}"));
            for (col, value) in row.iter_mut() {
                if col == ID_COLUMN {
                    continue;
                }
                if let Value::Text(s) = value {
                    let parsed = s
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| ScoreError::NotNumeric {
                            column: col.clone(),
                            id: id.clone(),
                            value: s.clone(),
                        })?;
                    *value = Value::Number(parsed);
                }
            }
        }
        Ok(())
    }

    /// Look up the `ID` of a row as text.
    pub fn id_of(row: &Row) -> Option<&str> {
        row.get(ID_COLUMN).and_then(|v| v.as_str())
    }

    /// Sort rows ascending by `ID`, rejecting duplicates.
    pub fn sort_by_id(&mut self) -> Result<()> {
        self.rows
            .sort_by(|a, b| Table::id_of(a).unwrap_or("").cmp(Table::id_of(b).unwrap_or("")));
        for pair in self.rows.windows(2) {
            let (a, b) = (Table::id_of(&pair[0]), Table::id_of(&pair[1]));
            if a == b {
                return Err(ScoreError::DuplicateId(a.unwrap_or("").to_string()));
            }
        }
        Ok(())
    }

    /// Move `ID` to the front of the column list.
    pub fn move_id_first(&mut self) {
        if let Some(pos) = self.columns.iter().position(|c| c == ID_COLUMN) {
            let id = self.columns.remove(pos);
            self.columns.insert(0, id);
        }
    }

    /// Iterate the values of one column in row order.
    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows
            .iter()
            .map(move |r| r.get(name).unwrap_or(&Value::Missing))
    }
}

//! CSV export of predictions alongside the table they were computed from.

use std::path::Path;

use log::info;

use crate::data::model::{Row, Table, Value, ID_COLUMN};
use crate::error::{Result, ScoreError};

/// Put the score columns of `predictions` next to `input`, row by row.
///
/// Column order is `ID`, the score columns, then the remaining input
/// columns. Both tables must have the same length; rows are paired by
/// position and not re-sorted.
pub fn attach_predictions(predictions: &Table, input: &Table) -> Result<Table> {
    if predictions.len() != input.len() {
        return Err(ScoreError::Config(format!(
            "cannot attach {} predictions to {} input rows",
            predictions.len(),
            input.len()
        )));
    }

    let score_columns: Vec<&String> = predictions
        .columns
        .iter()
        .filter(|c| c.as_str() != ID_COLUMN)
        .collect();

    let mut columns = vec![ID_COLUMN.to_string()];
    columns.extend(score_columns.iter().map(|c| c.to_string()));
    columns.extend(
        input
            .columns
            .iter()
            .filter(|c| c.as_str() != ID_COLUMN && !score_columns.contains(c))
            .cloned(),
    );

    let mut combined = Table::new(columns);
    for (pred, orig) in predictions.rows.iter().zip(&input.rows) {
        let mut row: Row = orig.clone();
        for col in &score_columns {
            let v = pred.get(col.as_str()).cloned().unwrap_or(Value::Missing);
            row.insert(col.to_string(), v);
        }
        combined.push_row(row);
    }
    Ok(combined)
}

/// Write `table` as comma-separated text with a header row.
///
/// No index column is written; missing cells are empty. A relative `path`
/// lands in the current working directory.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| ScoreError::csv(path, e))?;
    writer
        .write_record(&table.columns)
        .map_err(|e| ScoreError::csv(path, e))?;
    for row in &table.rows {
        let record = table
            .columns
            .iter()
            .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default());
        writer
            .write_record(record)
            .map_err(|e| ScoreError::csv(path, e))?;
    }
    writer.flush().map_err(|e| ScoreError::io(path, e))?;
    Ok(())
}

/// [`attach_predictions`] then [`write_csv`]; returns the combined table.
pub fn export_predictions(predictions: &Table, input: &Table, path: &Path) -> Result<Table> {
    let combined = attach_predictions(predictions, input)?;
    write_csv(&combined, path)?;
    info!("wrote {} rows to {}", combined.len(), path.display());
    Ok(combined)
}

use std::collections::{HashMap, HashSet};

use log::info;

use super::model::{Row, Table, ID_COLUMN};
use crate::error::{Result, ScoreError};

// ---------------------------------------------------------------------------
// Inner equi-join on ID
// ---------------------------------------------------------------------------

/// Join a ReaderBench table (`left`) with a GAMET table (`right`) on `ID`.
///
/// Only IDs present in both tables survive; the count of dropped rows is
/// logged. Columns are `ID`, then `left`'s, then `right`'s. A non-ID name
/// present on both sides becomes `<name>_x` / `<name>_y`.
///
/// Fails with [`ScoreError::DuplicateId`] if either side repeats an `ID`.
pub fn merge_on_id(left: &Table, right: &Table) -> Result<Table> {
    let mut left_ids = HashSet::new();
    for id in left.rows.iter().filter_map(Table::id_of) {
        if !left_ids.insert(id) {
            return Err(ScoreError::DuplicateId(id.to_string()));
        }
    }

    let overlap: Vec<&String> = left
        .columns
        .iter()
        .filter(|c| c.as_str() != ID_COLUMN && right.has_column(c.as_str()))
        .collect();

    let left_name = |c: &str| -> String {
        if overlap.iter().any(|o| o.as_str() == c) {
            format!("{c}_x")
        } else {
            c.to_string()
        }
    };
    let right_name = |c: &str| -> String {
        if overlap.iter().any(|o| o.as_str() == c) {
            format!("{c}_y")
        } else {
            c.to_string()
        }
    };

    let mut columns = vec![ID_COLUMN.to_string()];
    columns.extend(
        left.columns
            .iter()
            .filter(|c| c.as_str() != ID_COLUMN)
            .map(|c| left_name(c.as_str())),
    );
    columns.extend(
        right
            .columns
            .iter()
            .filter(|c| c.as_str() != ID_COLUMN)
            .map(|c| right_name(c.as_str())),
    );

    let mut right_index: HashMap<&str, &Row> = HashMap::with_capacity(right.len());
    for r in &right.rows {
        let Some(id) = Table::id_of(r) else {
            continue;
        };
        if right_index.insert(id, r).is_some() {
            return Err(ScoreError::DuplicateId(id.to_string()));
        }
    }

    let mut merged = Table::new(columns);
    for lrow in &left.rows {
        let Some(id) = Table::id_of(lrow) else {
            continue;
        };
        let Some(rrow) = right_index.get(id) else {
            continue;
        };
        let mut row = Row::new();
        for (col, value) in lrow {
            let name = if col == ID_COLUMN {
                col.clone()
            } else {
                left_name(col.as_str())
            };
            row.insert(name, value.clone());
        }
        for (col, value) in rrow.iter().filter(|(c, _)| c.as_str() != ID_COLUMN) {
            row.insert(right_name(col.as_str()), value.clone());
        }
        merged.push_row(row);
    }

    let dropped_left = left.len().saturating_sub(merged.len());
    let dropped_right = right.len().saturating_sub(merged.len());
    if dropped_left > 0 || dropped_right > 0 {
        info!(
            "merge kept {} rows; dropped {} unmatched left rows and {} unmatched right rows",
            merged.len(),
            dropped_left,
            dropped_right
        );
    }
    Ok(merged)
}

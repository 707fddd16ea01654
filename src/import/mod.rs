//! Importers for the three analysis-tool exports.
//!
//! Each importer turns one tool's CSV into a normalized [`Table`]: an `ID`
//! text column first, every other cell a number or missing, rows sorted
//! ascending by `ID`.

pub mod cohmetrix;
pub mod gamet;
pub mod readerbench;

use std::path::Path;

use log::{debug, warn};

use crate::data::identifier::IdRule;
use crate::data::model::{Table, Value, ID_COLUMN};
use crate::error::{Result, ScoreError};

pub use cohmetrix::import_cohmetrix;
pub use gamet::import_gamet;
pub use readerbench::import_readerbench;

/// Replace the path column `source_col` by an `ID` column derived with
/// `rule`. The new column takes the source column's position.
pub(crate) fn derive_ids(table: &mut Table, source_col: &str, rule: IdRule) -> Result<()> {
    for row in &mut table.rows {
        let raw = match row.remove(source_col) {
            Some(Value::Text(s)) => s,
            _ => return Err(ScoreError::IdNotExtractable(String::new())),
        };
        let id = rule.extract(&raw)?;
        row.insert(ID_COLUMN.to_string(), Value::Text(id));
    }
    table.rename_column(source_col, ID_COLUMN);
    Ok(())
}

/// Shared tail of every importer: numeric coercion, ID ordering, `ID` as
/// the first column.
pub(crate) fn normalize(mut table: Table, path: &Path) -> Result<Table> {
    require_ids(&table)?;
    table.coerce_numeric()?;
    table.sort_by_id()?;
    table.move_id_first();
    if table.is_empty() {
        warn!("{}: no data rows", path.display());
    }
    debug!(
        "{}: normalized {} rows, {} columns",
        path.display(),
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

/// Every row must carry a non-blank text `ID`.
fn require_ids(table: &Table) -> Result<()> {
    for row in &table.rows {
        match row.get(ID_COLUMN) {
            Some(Value::Text(id)) if !id.trim().is_empty() => {}
            Some(other) => return Err(ScoreError::IdNotExtractable(other.to_string())),
            None => return Err(ScoreError::IdNotExtractable(String::new())),
        }
    }
    Ok(())
}

/// Display name used in `MissingColumn` errors.
pub(crate) fn source_name(path: &Path) -> String {
    path.display().to_string()
}

use std::path::Path;

use crate::data::identifier::IdRule;
use crate::data::loader::load_csv;
use crate::data::model::{Table, Value, ID_COLUMN};
use crate::error::{Result, ScoreError};

use super::{derive_ids, normalize, source_name};

/// Column holding the analysed file's path.
pub const FILENAME_COLUMN: &str = "filename";

/// Columns kept from a GAMET export, in output order.
pub const GAMET_COLUMNS: [&str; 5] = [ID_COLUMN, "error_count", "word_count", "grammar", "misspelling"];

/// Import a GAMET export.
///
/// Keeps the error and word counts and adds `per_gram` and `per_misspell`,
/// the grammar and spelling error rates per word rounded to six decimals.
pub fn import_gamet(path: &Path, rule: IdRule) -> Result<Table> {
    let mut table = load_csv(path)?;
    let source = source_name(path);

    table.require_column(FILENAME_COLUMN, &source)?;
    derive_ids(&mut table, FILENAME_COLUMN, rule)?;
    table.select_columns(&GAMET_COLUMNS, &source)?;
    table.coerce_numeric()?;

    add_rate(&mut table, "per_gram", "grammar")?;
    add_rate(&mut table, "per_misspell", "misspelling")?;

    normalize(table, path)
}

/// Add `name = round(numerator / word_count, 6)`.
fn add_rate(table: &mut Table, name: &str, numerator: &str) -> Result<()> {
    for row in &mut table.rows {
        let count = row.get("word_count").and_then(Value::as_f64);
        let errors = row.get(numerator).and_then(Value::as_f64);
        let rate = match (errors, count) {
            (_, Some(c)) if c == 0.0 => {
                return Err(ScoreError::DivisionByZero {
                    column: name.to_string(),
                    id: Table::id_of(row).unwrap_or_default().to_string(),
                })
            }
            (Some(e), Some(c)) => Value::Number(round_to(e / c, 6)),
            _ => Value::Missing,
        };
        row.insert(name.to_string(), rate);
    }
    table.columns.push(name.to_string());
    Ok(())
}

/// Round half to even at `decimals` places.
pub(crate) fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round_ties_even() / scale
}

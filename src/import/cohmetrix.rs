use std::path::Path;

use crate::data::identifier::IdRule;
use crate::data::loader::load_csv;
use crate::data::model::Table;
use crate::error::{Result, ScoreError};

use super::{derive_ids, normalize, source_name};

/// Columns that may carry the analysed file's path, in lookup order.
/// Desktop Coh-Metrix writes `TextID`; some batch exports use `filename`.
pub const PATH_COLUMNS: [&str; 2] = ["TextID", "filename"];

/// Import a Coh-Metrix export, keeping every index column.
///
/// The path column the ID is derived from (`TextID` or `filename`) is
/// replaced by `ID`; every other column is kept in file order.
pub fn import_cohmetrix(path: &Path, rule: IdRule) -> Result<Table> {
    let mut table = load_csv(path)?;

    let path_col = PATH_COLUMNS
        .iter()
        .find(|c| table.has_column(c))
        .copied()
        .ok_or_else(|| ScoreError::MissingColumn {
            column: PATH_COLUMNS.join(" | "),
            source_name: source_name(path),
        })?;

    derive_ids(&mut table, path_col, rule)?;
    normalize(table, path)
}

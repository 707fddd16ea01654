use std::path::Path;

use log::debug;

use crate::data::loader::load_csv_with_sep_marker;
use crate::data::model::{Table, ID_COLUMN};
use crate::error::Result;

use super::{normalize, source_name};

/// Column ReaderBench uses for the document identifier.
pub const FILE_NAME_COLUMN: &str = "File name";

/// Substring marking the sentiment word-list columns. Their number varies
/// between ReaderBench versions, so they are never used as features.
pub const EXCLUDED_COLUMN_MARKER: &str = "AvgWordsList";

/// Import a ReaderBench export.
pub fn import_readerbench(path: &Path) -> Result<Table> {
    let mut table = load_csv_with_sep_marker(path)?;

    let dropped = table.drop_columns_where(|c| c.contains(EXCLUDED_COLUMN_MARKER));
    if !dropped.is_empty() {
        debug!("{}: dropped {} AvgWordsList columns", path.display(), dropped.len());
    }

    table.require_column(FILE_NAME_COLUMN, &source_name(path))?;
    table.rename_column(FILE_NAME_COLUMN, ID_COLUMN);
    normalize(table, path)
}

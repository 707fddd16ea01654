//! End-to-end entry points: import → [merge] → predict → [export].

use std::path::Path;

use crate::config::Config;
use crate::data::merge::merge_on_id;
use crate::data::model::Table;
use crate::error::Result;
use crate::export::export_predictions;
use crate::import::{import_cohmetrix, import_gamet, import_readerbench};
use crate::predict::{predict, Mode, ModelSource};

/// Score an already normalized table and optionally export it.
///
/// Export only happens after every row was scored.
pub fn score_table(
    table: &Table,
    mode: Mode,
    config: &Config,
    source: &dyn ModelSource,
    export: Option<&Path>,
) -> Result<Table> {
    let predictions = predict(table, mode, &config.registry, source)?;
    if let Some(path) = export {
        export_predictions(&predictions, table, path)?;
    }
    Ok(predictions)
}

/// Holistic quality from a ReaderBench export.
pub fn quality_from_readerbench(
    path: &Path,
    config: &Config,
    export: Option<&Path>,
) -> Result<Table> {
    let table = import_readerbench(path)?;
    score_table(
        &table,
        Mode::HolisticQualityFromReaderbench,
        config,
        &config.model_source(),
        export,
    )
}

/// Holistic quality from a Coh-Metrix export.
pub fn quality_from_cohmetrix(
    path: &Path,
    config: &Config,
    export: Option<&Path>,
) -> Result<Table> {
    let table = import_cohmetrix(path, config.id_rule)?;
    score_table(
        &table,
        Mode::HolisticQualityFromCohmetrix,
        config,
        &config.model_source(),
        export,
    )
}

/// CWS and CIWS from a ReaderBench export merged with a GAMET export.
///
/// Essays missing from either file are dropped by the merge.
pub fn cws_ciws_from_files(
    readerbench: &Path,
    gamet: &Path,
    config: &Config,
    export: Option<&Path>,
) -> Result<Table> {
    let rb = import_readerbench(readerbench)?;
    let gm = import_gamet(gamet, config.id_rule)?;
    let merged = merge_on_id(&rb, &gm)?;
    score_table(
        &merged,
        Mode::CwsCiwsFromMerged,
        config,
        &config.model_source(),
        export,
    )
}

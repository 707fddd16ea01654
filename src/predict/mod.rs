//! Ensemble scoring of normalized tables.
//!
//! A [`Mode`] names what to predict; the [`ModelRegistry`] says which
//! models are averaged into which output column; a [`ModelSource`]
//! supplies the models. Every mode goes through the same
//! load → schema check → average path in [`predict`].

pub mod artifact;
pub mod mode;
pub mod registry;
pub mod source;

use log::info;

use crate::data::model::{Row, Table, Value, ID_COLUMN};
use crate::error::{Result, ScoreError};

pub use artifact::{FeatureRow, LoadedModel, Model, ModelArtifact};
pub use mode::Mode;
pub use registry::{ModelRegistry, Target};
pub use source::{DirectoryModelSource, ModelSource};

/// Models loaded for one output column.
struct LoadedTarget {
    column: String,
    models: Vec<Box<dyn Model>>,
}

/// Score every row of `table` with the ensembles configured for `mode`.
///
/// Returns a table of `ID` plus one column per target, in the input's row
/// order. Models are loaded from `source` for this call only. All schema
/// checks run before the first row is scored, so a mismatch never yields a
/// partial result.
pub fn predict(
    table: &Table,
    mode: Mode,
    registry: &ModelRegistry,
    source: &dyn ModelSource,
) -> Result<Table> {
    let targets = registry.targets(mode)?;

    let loaded: Vec<LoadedTarget> = targets
        .iter()
        .map(|t| -> Result<LoadedTarget> {
            let models = t
                .models
                .iter()
                .map(|name| source.load(name))
                .collect::<Result<Vec<_>>>()?;
            Ok(LoadedTarget {
                column: t.column.clone(),
                models,
            })
        })
        .collect::<Result<_>>()?;

    table.require_column(ID_COLUMN, "input table")?;
    for model in loaded.iter().flat_map(|t| &t.models) {
        check_features(table, model.as_ref())?;
    }

    let mut columns = vec![ID_COLUMN.to_string()];
    columns.extend(loaded.iter().map(|t| t.column.clone()));
    let mut out = Table::new(columns);

    for row in &table.rows {
        let features = FeatureRow::new(row);
        let mut scored = Row::new();
        scored.insert(ID_COLUMN.to_string(), Value::Text(features.id().to_string()));
        for target in &loaded {
            let score = average(&target.models, &features)?;
            scored.insert(target.column.clone(), Value::Number(score));
        }
        out.push_row(scored);
    }

    info!(
        "{mode}: scored {} rows with {} models",
        out.len(),
        loaded.iter().map(|t| t.models.len()).sum::<usize>()
    );
    Ok(out)
}

/// Unweighted mean of every model's prediction for one row.
fn average(models: &[Box<dyn Model>], row: &FeatureRow<'_>) -> Result<f64> {
    let mut sum = 0.0;
    for model in models {
        sum += model.predict(row)?;
    }
    Ok(sum / models.len() as f64)
}

fn check_features(table: &Table, model: &dyn Model) -> Result<()> {
    let missing: Vec<String> = model
        .features()
        .into_iter()
        .filter(|f| !table.has_column(f))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ScoreError::SchemaMismatch {
            model: model.name().to_string(),
            missing,
        })
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mode::Mode;
use crate::data::model::ID_COLUMN;
use crate::error::{Result, ScoreError};

/// Output column for the holistic quality modes.
pub const QUALITY_COLUMN: &str = "predicted_quality";
pub const CWS_COLUMN: &str = "predicted_cws";
pub const CIWS_COLUMN: &str = "predicted_ciws";

/// One averaged output: the column it fills and the models averaged into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub column: String,
    pub models: Vec<String>,
}

impl Target {
    pub fn new(column: &str, models: &[&str]) -> Self {
        Target {
            column: column.to_string(),
            models: models.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Which models each mode averages, keyed by mode.
///
/// Serialized as a JSON object from mode selector strings to target lists,
/// e.g. `{"cws-ciws-from-merged": [{"column": "predicted_cws", ...}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelRegistry(BTreeMap<Mode, Vec<Target>>);

impl Default for ModelRegistry {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert(
            Mode::HolisticQualityFromReaderbench,
            vec![ensemble(QUALITY_COLUMN, "rb_model", 6)],
        );
        map.insert(
            Mode::HolisticQualityFromCohmetrix,
            vec![ensemble(QUALITY_COLUMN, "cm_model", 6)],
        );
        map.insert(
            Mode::CwsCiwsFromMerged,
            vec![
                ensemble(CWS_COLUMN, "cws_model", 2),
                ensemble(CIWS_COLUMN, "ciws_model", 2),
            ],
        );
        ModelRegistry(map)
    }
}

/// `prefix_a`, `prefix_b`, ... for `n` slots.
fn ensemble(column: &str, prefix: &str, n: u8) -> Target {
    Target {
        column: column.to_string(),
        models: (0..n)
            .map(|i| format!("{prefix}_{}", (b'a' + i) as char))
            .collect(),
    }
}

impl ModelRegistry {
    pub fn empty() -> Self {
        ModelRegistry(BTreeMap::new())
    }

    /// Replace the targets of one mode.
    pub fn set(&mut self, mode: Mode, targets: Vec<Target>) {
        self.0.insert(mode, targets);
    }

    /// Targets configured for `mode`, each with at least one model and a
    /// column name of its own.
    pub fn targets(&self, mode: Mode) -> Result<&[Target]> {
        let targets = self
            .0
            .get(&mode)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ScoreError::Config(format!("no targets configured for mode '{mode}'")))?;
        if let Some(empty) = targets.iter().find(|t| t.models.is_empty()) {
            return Err(ScoreError::EmptyEnsemble(empty.column.clone()));
        }
        for (i, t) in targets.iter().enumerate() {
            if t.column == ID_COLUMN || targets[..i].iter().any(|p| p.column == t.column) {
                return Err(ScoreError::Config(format!(
                    "mode '{mode}' has a clashing output column '{}'",
                    t.column
                )));
            }
        }
        Ok(targets.as_slice())
    }

    /// Fill modes this registry does not mention from the defaults.
    pub fn merged_with_defaults(mut self) -> Self {
        for (mode, targets) in ModelRegistry::default().0 {
            self.0.entry(mode).or_insert(targets);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_mode() {
        let reg = ModelRegistry::default();
        let rb = reg.targets(Mode::HolisticQualityFromReaderbench).unwrap();
        assert_eq!(rb.len(), 1);
        assert_eq!(rb[0].column, QUALITY_COLUMN);
        assert_eq!(
            rb[0].models,
            vec!["rb_model_a", "rb_model_b", "rb_model_c", "rb_model_d", "rb_model_e", "rb_model_f"]
        );

        let cws = reg.targets(Mode::CwsCiwsFromMerged).unwrap();
        assert_eq!(cws.len(), 2);
        assert_eq!(cws[0].models, vec!["cws_model_a", "cws_model_b"]);
        assert_eq!(cws[1].column, CIWS_COLUMN);
    }

    #[test]
    fn empty_target_is_rejected() {
        let mut reg = ModelRegistry::empty();
        reg.set(Mode::CwsCiwsFromMerged, vec![Target::new("predicted_cws", &[])]);
        assert!(matches!(
            reg.targets(Mode::CwsCiwsFromMerged),
            Err(ScoreError::EmptyEnsemble(c)) if c == "predicted_cws"
        ));
        assert!(matches!(
            reg.targets(Mode::HolisticQualityFromCohmetrix),
            Err(ScoreError::Config(_))
        ));
    }

    #[test]
    fn repeated_target_columns_are_rejected() {
        let mut reg = ModelRegistry::empty();
        reg.set(
            Mode::CwsCiwsFromMerged,
            vec![
                Target::new("predicted_cws", &["a"]),
                Target::new("predicted_cws", &["b"]),
            ],
        );
        assert!(matches!(
            reg.targets(Mode::CwsCiwsFromMerged),
            Err(ScoreError::Config(msg)) if msg.contains("predicted_cws")
        ));

        reg.set(Mode::CwsCiwsFromMerged, vec![Target::new("ID", &["a"])]);
        assert!(reg.targets(Mode::CwsCiwsFromMerged).is_err());
    }

    #[test]
    fn json_overrides_merge_with_defaults() {
        let json = r#"{"holistic-quality-from-cohmetrix": [{"column": "q", "models": ["m1"]}]}"#;
        let reg: ModelRegistry = serde_json::from_str(json).unwrap();
        let reg = reg.merged_with_defaults();
        assert_eq!(
            reg.targets(Mode::HolisticQualityFromCohmetrix).unwrap(),
            &[Target::new("q", &["m1"])]
        );
        assert_eq!(reg.targets(Mode::CwsCiwsFromMerged).unwrap().len(), 2);
    }
}

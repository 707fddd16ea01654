use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::model::{Row, Table};
use crate::error::{Result, ScoreError};

// ---------------------------------------------------------------------------
// Model capability
// ---------------------------------------------------------------------------

/// A row seen through the eyes of a model: named numeric features.
#[derive(Debug, Clone, Copy)]
pub struct FeatureRow<'a> {
    row: &'a Row,
}

impl<'a> FeatureRow<'a> {
    pub fn new(row: &'a Row) -> Self {
        FeatureRow { row }
    }

    /// Numeric value of `feature`; missing cells and NaN are `None`.
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.row
            .get(feature)
            .and_then(|v| v.as_f64())
            .filter(|v| !v.is_nan())
    }

    pub fn id(&self) -> &'a str {
        Table::id_of(self.row).unwrap_or_default()
    }
}

/// A pre-trained regression model. Never mutated after loading.
pub trait Model {
    /// Name the model was loaded under (e.g. `rb_model_a`).
    fn name(&self) -> &str;

    /// Feature columns the model reads.
    fn features(&self) -> Vec<String>;

    /// Score one row.
    fn predict(&self, row: &FeatureRow<'_>) -> Result<f64>;
}

// ---------------------------------------------------------------------------
// Serialized artifacts
// ---------------------------------------------------------------------------

/// On-disk model format, one JSON document per model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

/// `intercept + Σ coefficient · feature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
}

/// A sum of regression trees: `base_score + scale · Σ tree(row)`.
///
/// Boosted ensembles use `scale = 1`; a random forest stores its trees
/// with `scale = 1 / n_trees`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "one")]
    pub scale: f64,
    pub trees: Vec<Tree>,
}

fn one() -> f64 {
    1.0
}

/// Flat pre-order node array; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// A split node when `feature` is set, a leaf otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    #[serde(default)]
    pub value: f64,
    #[serde(default = "yes")]
    pub missing_left: bool,
}

fn yes() -> bool {
    true
}

impl Node {
    pub fn leaf(value: f64) -> Self {
        Node {
            feature: None,
            threshold: 0.0,
            left: 0,
            right: 0,
            value,
            missing_left: true,
        }
    }

    pub fn split(feature: &str, threshold: f64, left: usize, right: usize) -> Self {
        Node {
            feature: Some(feature.to_string()),
            threshold,
            left,
            right,
            value: 0.0,
            missing_left: true,
        }
    }
}

impl ModelArtifact {
    /// Structural checks run once at load time.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            ModelArtifact::Linear(m) => {
                if m.coefficients.values().chain([&m.intercept]).any(|c| !c.is_finite()) {
                    return Err("non-finite coefficient".to_string());
                }
                Ok(())
            }
            ModelArtifact::TreeEnsemble(e) => {
                if e.trees.is_empty() {
                    return Err("ensemble has no trees".to_string());
                }
                for (t, tree) in e.trees.iter().enumerate() {
                    tree.validate().map_err(|msg| format!("tree {t}: {msg}"))?;
                }
                Ok(())
            }
        }
    }

    pub fn features(&self) -> Vec<String> {
        match self {
            ModelArtifact::Linear(m) => m.coefficients.keys().cloned().collect(),
            ModelArtifact::TreeEnsemble(e) => e
                .trees
                .iter()
                .flat_map(|t| t.nodes.iter().filter_map(|n| n.feature.clone()))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    fn evaluate(&self, model: &str, row: &FeatureRow<'_>) -> Result<f64> {
        match self {
            ModelArtifact::Linear(m) => {
                let mut acc = m.intercept;
                for (feature, coef) in &m.coefficients {
                    let x = row.get(feature).ok_or_else(|| ScoreError::MissingFeatureValue {
                        model: model.to_string(),
                        feature: feature.clone(),
                        id: row.id().to_string(),
                    })?;
                    acc += coef * x;
                }
                Ok(acc)
            }
            ModelArtifact::TreeEnsemble(e) => {
                let sum: f64 = e.trees.iter().map(|t| t.evaluate(row)).sum();
                Ok(e.base_score + e.scale * sum)
            }
        }
    }
}

impl Tree {
    /// Children must point forward and stay in range; that rules out
    /// cycles, so evaluation always terminates.
    fn validate(&self) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if node.feature.is_none() {
                continue;
            }
            for child in [node.left, node.right] {
                if child <= i || child >= self.nodes.len() {
                    return Err(format!("node {i} has invalid child {child}"));
                }
            }
            if !node.threshold.is_finite() {
                return Err(format!("node {i} has a non-finite threshold"));
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &FeatureRow<'_>) -> f64 {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            let Some(feature) = &node.feature else {
                return node.value;
            };
            let go_left = match row.get(feature) {
                Some(x) => x <= node.threshold,
                None => node.missing_left,
            };
            idx = if go_left { node.left } else { node.right };
        }
    }
}

// ---------------------------------------------------------------------------
// Named, loaded model
// ---------------------------------------------------------------------------

/// A validated artifact together with the name it was loaded under.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    name: String,
    artifact: ModelArtifact,
}

impl LoadedModel {
    pub fn new(name: &str, artifact: ModelArtifact) -> Result<Self> {
        artifact.validate().map_err(|reason| ScoreError::ModelLoad {
            model: name.to_string(),
            reason,
        })?;
        Ok(LoadedModel {
            name: name.to_string(),
            artifact,
        })
    }
}

impl Model for LoadedModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn features(&self) -> Vec<String> {
        self.artifact.features()
    }

    fn predict(&self, row: &FeatureRow<'_>) -> Result<f64> {
        self.artifact.evaluate(&self.name, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn row(pairs: &[(&str, Value)]) -> Row {
        let mut r: Row = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        r.insert("ID".into(), Value::Text("e1".into()));
        r
    }

    fn stump() -> ModelArtifact {
        ModelArtifact::TreeEnsemble(TreeEnsemble {
            base_score: 1.0,
            scale: 1.0,
            trees: vec![Tree {
                nodes: vec![Node::split("words", 100.0, 1, 2), Node::leaf(-0.5), Node::leaf(0.5)],
            }],
        })
    }

    #[test]
    fn linear_model_scores_and_reports_missing_values() {
        let m = LoadedModel::new(
            "lin",
            ModelArtifact::Linear(LinearModel {
                intercept: 2.0,
                coefficients: [("a".to_string(), 0.5), ("b".to_string(), -1.0)].into(),
            }),
        )
        .unwrap();
        assert_eq!(m.features(), vec!["a", "b"]);

        let r = row(&[("a", Value::Number(4.0)), ("b", Value::Number(1.0))]);
        assert_eq!(m.predict(&FeatureRow::new(&r)).unwrap(), 3.0);

        let r = row(&[("a", Value::Number(4.0)), ("b", Value::Missing)]);
        let err = m.predict(&FeatureRow::new(&r)).unwrap_err();
        assert!(matches!(err, ScoreError::MissingFeatureValue { ref feature, ref id, .. }
            if feature == "b" && id == "e1"));
    }

    #[test]
    fn tree_routes_on_threshold_and_missing() {
        let m = LoadedModel::new("tree", stump()).unwrap();
        let low = row(&[("words", Value::Number(100.0))]);
        let high = row(&[("words", Value::Number(250.0))]);
        let none = row(&[("words", Value::Missing)]);
        assert_eq!(m.predict(&FeatureRow::new(&low)).unwrap(), 0.5);
        assert_eq!(m.predict(&FeatureRow::new(&high)).unwrap(), 1.5);
        assert_eq!(m.predict(&FeatureRow::new(&none)).unwrap(), 0.5);
        assert_eq!(m.features(), vec!["words"]);
    }

    #[test]
    fn cyclic_trees_are_rejected() {
        let bad = ModelArtifact::TreeEnsemble(TreeEnsemble {
            base_score: 0.0,
            scale: 1.0,
            trees: vec![Tree {
                nodes: vec![Node::split("x", 0.0, 0, 1), Node::leaf(1.0)],
            }],
        });
        assert!(matches!(
            LoadedModel::new("bad", bad),
            Err(ScoreError::ModelLoad { ref model, .. }) if model == "bad"
        ));
    }

    #[test]
    fn artifacts_parse_from_json() {
        let json = r#"{
            "kind": "tree_ensemble",
            "scale": 0.5,
            "trees": [
                {"nodes": [{"feature": "f", "threshold": 1.0, "left": 1, "right": 2},
                           {"value": 2.0}, {"value": 4.0}]},
                {"nodes": [{"value": 6.0}]}
            ]
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        let m = LoadedModel::new("forest", artifact).unwrap();
        let r = row(&[("f", Value::Number(3.0))]);
        assert_eq!(m.predict(&FeatureRow::new(&r)).unwrap(), 5.0);
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{FeatureRecord, PredictError, Predictor};
use crate::data::model::Feature;

// ---------------------------------------------------------------------------
// Artifact schema
// ---------------------------------------------------------------------------

/// The serialized model as written by the training pipeline.
///
/// ```json
/// {
///   "feature_names": ["Nitrogen", "Phosphorus", ...],
///   "estimator": { "kind": "random_forest", "trees": [ ... ] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    /// Closest class centroid under per-feature scaling.
    NearestCentroid {
        classes: Vec<String>,
        centroids: Vec<Vec<f64>>,
        /// Divisor applied to each feature difference; defaults to 1.
        #[serde(default)]
        scale: Option<Vec<f64>>,
    },
    DecisionTree(Tree),
    /// Majority vote over the trees.
    RandomForest { trees: Vec<Tree> },
}

/// A binary tree stored as a flat node list; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Go `left` when `value <= threshold`, otherwise `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { class: String },
}

// ---------------------------------------------------------------------------
// Structural validation (run once at load time)
// ---------------------------------------------------------------------------

impl ModelArtifact {
    /// Check internal consistency; the message names the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let n_features = self.feature_names.len();
        if n_features == 0 {
            return Err("artifact lists no feature names".into());
        }
        match &self.estimator {
            Estimator::NearestCentroid {
                classes,
                centroids,
                scale,
            } => {
                if classes.is_empty() {
                    return Err("nearest_centroid has no classes".into());
                }
                if classes.len() != centroids.len() {
                    return Err(format!(
                        "{} classes but {} centroids",
                        classes.len(),
                        centroids.len()
                    ));
                }
                if let Some(i) = centroids.iter().position(|c| c.len() != n_features) {
                    return Err(format!("centroid {i} does not have {n_features} values"));
                }
                if let Some(scale) = scale {
                    if scale.len() != n_features || scale.iter().any(|s| *s <= 0.0) {
                        return Err(format!("scale must hold {n_features} positive values"));
                    }
                }
                Ok(())
            }
            Estimator::DecisionTree(tree) => tree
                .validate(n_features)
                .map_err(|e| format!("tree 0: {e}")),
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("random_forest has no trees".into());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(n_features)
                        .map_err(|e| format!("tree {i}: {e}"))?;
                }
                Ok(())
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.estimator {
            Estimator::NearestCentroid { .. } => "nearest_centroid",
            Estimator::DecisionTree(_) => "decision_tree",
            Estimator::RandomForest { .. } => "random_forest",
        }
    }

    /// Reject records the model was not built for.
    fn check_input(&self, record: &FeatureRecord) -> Result<(), PredictError> {
        let names_match = self.feature_names.len() == Feature::ALL.len()
            && self
                .feature_names
                .iter()
                .zip(Feature::ALL)
                .all(|(name, f)| name == f.column_name());
        if !names_match {
            return Err(PredictError::FeatureMismatch {
                expected: self.feature_names.join(", "),
                got: record
                    .fields()
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        if let Some((name, _)) = record.fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(PredictError::NonFinite { feature: name });
        }
        Ok(())
    }
}

impl Tree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("no nodes".into());
        }
        let n = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(format!("node {i} splits on unknown feature {feature}"));
                }
                // children must come after their parent, which also rules out cycles
                if *left <= i || *right <= i || *left >= n || *right >= n {
                    return Err(format!("node {i} has out-of-range children"));
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    fn classify(&self, x: &[f64]) -> Result<&str, String> {
        let mut idx = 0;
        // every step moves strictly forward through the node list
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx) {
                Some(Node::Leaf { class }) => return Ok(class),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = x
                        .get(*feature)
                        .ok_or_else(|| format!("feature index {feature} out of range"))?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
                None => return Err(format!("node {idx} does not exist")),
            }
        }
        Err("walk did not reach a leaf".into())
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

impl Predictor for ModelArtifact {
    fn predict(&self, record: &FeatureRecord) -> Result<String, PredictError> {
        self.check_input(record)?;
        let x = record.values();

        match &self.estimator {
            Estimator::NearestCentroid {
                classes,
                centroids,
                scale,
            } => {
                let distance = |c: &[f64]| -> f64 {
                    c.iter()
                        .zip(x)
                        .enumerate()
                        .map(|(i, (ci, xi))| {
                            let s = scale.as_ref().and_then(|s| s.get(i)).copied().unwrap_or(1.0);
                            ((xi - ci) / s).powi(2)
                        })
                        .sum()
                };
                classes
                    .iter()
                    .zip(centroids)
                    .map(|(class, c)| (class, distance(c.as_slice())))
                    .fold(None::<(&String, f64)>, |best, (class, d)| match best {
                        Some((_, bd)) if bd <= d => best,
                        _ => Some((class, d)),
                    })
                    .map(|(class, _)| class.clone())
                    .ok_or(PredictError::Empty)
            }
            Estimator::DecisionTree(tree) => tree
                .classify(x)
                .map(str::to_string)
                .map_err(|reason| PredictError::MalformedTree { tree: 0, reason }),
            Estimator::RandomForest { trees } => {
                let mut votes: HashMap<&str, usize> = HashMap::new();
                let mut winner: Option<(&str, usize)> = None;
                for (i, tree) in trees.iter().enumerate() {
                    let class = tree
                        .classify(x)
                        .map_err(|reason| PredictError::MalformedTree { tree: i, reason })?;
                    let n = votes.entry(class).or_default();
                    *n += 1;
                    // first label to reach the top count wins ties
                    if winner.map_or(true, |(_, best)| *n > best) {
                        winner = Some((class, *n));
                    }
                }
                winner
                    .map(|(class, _)| class.to_string())
                    .ok_or(PredictError::Empty)
            }
        }
    }

    fn describe(&self) -> String {
        format!("{} over {} features", self.kind(), self.feature_names.len())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn record(humidity: f64) -> FeatureRecord {
        FeatureRecord::new([90.0, 42.0, 43.0, 20.9, humidity, 6.5, 202.9])
    }

    #[test]
    fn nearest_centroid_picks_closest_class() {
        let model = centroid_model();
        assert!(model.validate().is_ok());
        let rice = FeatureRecord::new([82.0, 47.0, 41.0, 23.0, 81.0, 6.3, 230.0]);
        let coffee = FeatureRecord::new([100.0, 27.0, 31.0, 25.0, 60.0, 6.9, 160.0]);
        assert_eq!(model.predict(&rice).unwrap(), "Rice");
        assert_eq!(model.predict(&coffee).unwrap(), "Coffee");
    }

    #[test]
    fn decision_tree_splits_on_threshold() {
        let model = ModelArtifact {
            feature_names: feature_names(),
            estimator: Estimator::DecisionTree(humidity_tree(70.0)),
        };
        assert!(model.validate().is_ok());
        assert_eq!(model.predict(&record(70.0)).unwrap(), "Rice");
        assert_eq!(model.predict(&record(70.1)).unwrap(), "Maize");
    }

    #[test]
    fn random_forest_takes_the_majority() {
        let model = ModelArtifact {
            feature_names: feature_names(),
            estimator: Estimator::RandomForest {
                trees: vec![
                    humidity_tree(50.0),
                    humidity_tree(90.0),
                    humidity_tree(95.0),
                ],
            },
        };
        // 80 % humidity: Maize, Rice, Rice
        assert_eq!(model.predict(&record(80.0)).unwrap(), "Rice");
        // 92 %: Maize, Maize, Rice
        assert_eq!(model.predict(&record(92.0)).unwrap(), "Maize");
    }

    #[test]
    fn forest_ties_go_to_first_label_reaching_the_count() {
        let model = ModelArtifact {
            feature_names: feature_names(),
            estimator: Estimator::RandomForest {
                trees: vec![humidity_tree(50.0), humidity_tree(90.0)],
            },
        };
        assert_eq!(model.predict(&record(80.0)).unwrap(), "Maize");
    }

    #[test]
    fn mismatched_feature_names_fail_at_prediction() {
        let mut model = centroid_model();
        model.feature_names[5] = "ph".into();
        let err = model.predict(&record(80.0)).unwrap_err();
        assert!(matches!(err, PredictError::FeatureMismatch { .. }));
        assert!(err.to_string().contains("pH_Value"));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let err = centroid_model().predict(&record(f64::NAN)).unwrap_err();
        assert_eq!(err, PredictError::NonFinite { feature: "Humidity" });
    }

    #[test]
    fn validation_catches_bad_children() {
        let model = ModelArtifact {
            feature_names: feature_names(),
            estimator: Estimator::DecisionTree(Tree {
                nodes: vec![Node::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 0,
                    right: 7,
                }],
            }),
        };
        assert!(model.validate().unwrap_err().contains("out-of-range"));
    }

    #[test]
    fn artifact_json_uses_kind_tag() {
        let json = r#"{
            "feature_names": ["Nitrogen","Phosphorus","Potassium","Temperature","Humidity","pH_Value","Rainfall"],
            "estimator": {
                "kind": "decision_tree",
                "nodes": [
                    {"feature": 4, "threshold": 70.0, "left": 1, "right": 2},
                    {"class": "Rice"},
                    {"class": "Maize"}
                ]
            }
        }"#;
        let model: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), "decision_tree");
        assert_eq!(model.estimator, Estimator::DecisionTree(humidity_tree(70.0)));
    }
}

//! Classifier variants
//!
//! The trained model deserializes into one of three tagged variants instead
//! of a bag of callable methods; the variant is decided once at artifact
//! load, not probed per request. All variants expose the same capability:
//! a probability pair over the two classes for a preprocessed vector.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inference failure for a single request.
///
/// Never converted into a default prediction; the request fails loudly and
/// sibling requests are unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("feature vector length mismatch: classifier expects {expected}, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("feature `{0}` is not part of the record schema")]
    UnknownFeature(String),

    #[error("model failure: {0}")]
    ModelFailure(String),
}

/// One node of a fitted decision tree.
///
/// `left`/`right` are indices into the tree's node vector; samples with
/// `x[feature] <= threshold` go left.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class weights at this leaf; normalized to probabilities on use
        proba: [f64; 2],
    },
}

/// A trained binary classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum Classifier {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    DecisionTree {
        n_features: usize,
        nodes: Vec<TreeNode>,
    },
    RandomForest {
        n_features: usize,
        trees: Vec<Vec<TreeNode>>,
    },
}

impl Classifier {
    /// Expected input width.
    pub fn n_features(&self) -> usize {
        match self {
            Classifier::LogisticRegression { coefficients, .. } => coefficients.len(),
            Classifier::DecisionTree { n_features, .. } => *n_features,
            Classifier::RandomForest { n_features, .. } => *n_features,
        }
    }

    /// Human-readable variant name for health/info reporting.
    pub fn model_type(&self) -> &'static str {
        match self {
            Classifier::LogisticRegression { .. } => "logistic_regression",
            Classifier::DecisionTree { .. } => "decision_tree",
            Classifier::RandomForest { .. } => "random_forest",
        }
    }

    /// Probability pair `[p(class 0), p(class 1)]` for a preprocessed vector.
    pub fn predict_proba(&self, x: &Array1<f64>) -> Result<[f64; 2], InferenceError> {
        if x.len() != self.n_features() {
            return Err(InferenceError::FeatureMismatch {
                expected: self.n_features(),
                got: x.len(),
            });
        }

        let proba = match self {
            Classifier::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let z: f64 = coefficients
                    .iter()
                    .zip(x.iter())
                    .map(|(c, v)| c * v)
                    .sum::<f64>()
                    + intercept;
                let p1 = sigmoid(z);
                [1.0 - p1, p1]
            }
            Classifier::DecisionTree { nodes, .. } => tree_proba(nodes, x)?,
            Classifier::RandomForest { trees, .. } => {
                if trees.is_empty() {
                    return Err(InferenceError::ModelFailure(
                        "random forest has no trees".to_string(),
                    ));
                }
                let mut sum = [0.0f64; 2];
                for nodes in trees {
                    let p = tree_proba(nodes, x)?;
                    sum[0] += p[0];
                    sum[1] += p[1];
                }
                let n = trees.len() as f64;
                [sum[0] / n, sum[1] / n]
            }
        };

        if !proba[0].is_finite() || !proba[1].is_finite() {
            return Err(InferenceError::ModelFailure(format!(
                "non-finite class probabilities: [{}, {}]",
                proba[0], proba[1]
            )));
        }

        Ok(proba)
    }

    /// Binary label plus the probability of the chosen class.
    ///
    /// Confidence is the maximum class probability, so it always lies in
    /// [0.5, 1] for a well-formed probability pair and in [0, 1] in general.
    pub fn predict(&self, x: &Array1<f64>) -> Result<(u8, f64), InferenceError> {
        let proba = self.predict_proba(x)?;
        let label: u8 = if proba[1] >= proba[0] { 1 } else { 0 };
        Ok((label, proba[label as usize]))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Walk a tree from the root to a leaf and normalize its class weights.
///
/// Bounded by the node count so a malformed artifact with a cycle fails as
/// `ModelFailure` instead of hanging the request.
fn tree_proba(nodes: &[TreeNode], x: &Array1<f64>) -> Result<[f64; 2], InferenceError> {
    let mut idx = 0usize;
    for _ in 0..=nodes.len() {
        let node = nodes.get(idx).ok_or_else(|| {
            InferenceError::ModelFailure(format!("tree node index {} out of bounds", idx))
        })?;
        match node {
            TreeNode::Leaf { proba } => {
                let total = proba[0] + proba[1];
                if !total.is_finite() || total <= 0.0 {
                    return Err(InferenceError::ModelFailure(format!(
                        "leaf {} has invalid class weights [{}, {}]",
                        idx, proba[0], proba[1]
                    )));
                }
                return Ok([proba[0] / total, proba[1] / total]);
            }
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let v = *x.get(*feature).ok_or_else(|| {
                    InferenceError::ModelFailure(format!(
                        "split node {} references feature {} beyond vector width {}",
                        idx,
                        feature,
                        x.len()
                    ))
                })?;
                idx = if v <= *threshold { *left } else { *right };
            }
        }
    }
    Err(InferenceError::ModelFailure(
        "tree traversal did not reach a leaf".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic() -> Classifier {
        Classifier::LogisticRegression {
            coefficients: vec![1.0, -2.0, 0.5],
            intercept: 0.25,
        }
    }

    /// x[0] <= 0.0 -> leaf [0.9, 0.1]; else x[2] <= 1.5 -> [0.2, 0.8] else [0.5, 0.5]
    fn tree_nodes() -> Vec<TreeNode> {
        vec![
            TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { proba: [0.9, 0.1] },
            TreeNode::Split {
                feature: 2,
                threshold: 1.5,
                left: 3,
                right: 4,
            },
            TreeNode::Leaf { proba: [0.2, 0.8] },
            TreeNode::Leaf { proba: [0.5, 0.5] },
        ]
    }

    fn tree() -> Classifier {
        Classifier::DecisionTree {
            n_features: 3,
            nodes: tree_nodes(),
        }
    }

    #[test]
    fn test_logistic_known_values() {
        // z = 1*1 - 2*0.5 + 0.5*(-0.5) + 0.25 = 0.0 -> p1 = 0.5
        let proba = logistic()
            .predict_proba(&Array1::from(vec![1.0, 0.5, -0.5]))
            .unwrap();
        assert!((proba[1] - 0.5).abs() < 1e-12);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_label_follows_sign() {
        let clf = logistic();
        let (label, confidence) = clf.predict(&Array1::from(vec![5.0, 0.0, 0.0])).unwrap();
        assert_eq!(label, 1);
        assert!(confidence > 0.5);

        let (label, confidence) = clf.predict(&Array1::from(vec![-5.0, 0.0, 0.0])).unwrap();
        assert_eq!(label, 0);
        assert!(confidence > 0.5);
    }

    #[test]
    fn test_tree_routing() {
        let clf = tree();
        let (label, confidence) = clf.predict(&Array1::from(vec![-1.0, 0.0, 0.0])).unwrap();
        assert_eq!((label, confidence), (0, 0.9));

        let (label, confidence) = clf.predict(&Array1::from(vec![1.0, 0.0, 1.0])).unwrap();
        assert_eq!((label, confidence), (1, 0.8));
    }

    #[test]
    fn test_tree_normalizes_leaf_weights() {
        // Count-style leaf: 30 class-0 samples, 10 class-1 samples.
        let clf = Classifier::DecisionTree {
            n_features: 1,
            nodes: vec![TreeNode::Leaf { proba: [30.0, 10.0] }],
        };
        let proba = clf.predict_proba(&Array1::from(vec![0.0])).unwrap();
        assert!((proba[0] - 0.75).abs() < 1e-12);
        assert!((proba[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_forest_averages_trees() {
        let clf = Classifier::RandomForest {
            n_features: 1,
            trees: vec![
                vec![TreeNode::Leaf { proba: [1.0, 0.0] }],
                vec![TreeNode::Leaf { proba: [0.0, 1.0] }],
            ],
        };
        let proba = clf.predict_proba(&Array1::from(vec![0.0])).unwrap();
        assert_eq!(proba, [0.5, 0.5]);
    }

    #[test]
    fn test_confidence_bounds_hold() {
        let clf = tree();
        for raw in [
            vec![0.0, 0.0, 0.0],
            vec![1e9, -1e9, 1e9],
            vec![-273.15, 0.5, 2.0],
        ] {
            let (label, confidence) = clf.predict(&Array1::from(raw)).unwrap();
            assert!(label == 0 || label == 1);
            assert!((0.0..=1.0).contains(&confidence));
        }
    }

    #[test]
    fn test_feature_mismatch_is_hard_error() {
        let err = logistic()
            .predict_proba(&Array1::from(vec![1.0, 2.0]))
            .unwrap_err();
        assert_eq!(
            err,
            InferenceError::FeatureMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_out_of_bounds_child_is_model_failure() {
        let clf = Classifier::DecisionTree {
            n_features: 1,
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 7,
                right: 7,
            }],
        };
        let err = clf.predict_proba(&Array1::from(vec![0.0])).unwrap_err();
        assert!(matches!(err, InferenceError::ModelFailure(_)));
    }

    #[test]
    fn test_cyclic_tree_is_model_failure() {
        let clf = Classifier::DecisionTree {
            n_features: 1,
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 0,
            }],
        };
        let err = clf.predict_proba(&Array1::from(vec![0.0])).unwrap_err();
        assert!(matches!(err, InferenceError::ModelFailure(_)));
    }

    #[test]
    fn test_empty_forest_is_model_failure() {
        let clf = Classifier::RandomForest {
            n_features: 2,
            trees: vec![],
        };
        let err = clf.predict_proba(&Array1::from(vec![0.0, 0.0])).unwrap_err();
        assert!(matches!(err, InferenceError::ModelFailure(_)));
    }

    #[test]
    fn test_predict_is_deterministic() {
        let clf = logistic();
        let x = Array1::from(vec![0.3, -1.2, 2.5]);
        let first = clf.predict(&x).unwrap();
        let second = clf.predict(&x).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_artifact_round_trip_from_json() {
        let raw = serde_json::json!({
            "model_type": "logistic_regression",
            "coefficients": [1.0, -2.0, 0.5],
            "intercept": 0.25
        });
        let clf: Classifier = serde_json::from_value(raw).unwrap();
        assert_eq!(clf.model_type(), "logistic_regression");
        assert_eq!(clf.n_features(), 3);
    }
}

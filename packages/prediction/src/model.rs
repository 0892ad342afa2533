//! Severity classifier backend.
//!
//! The serialized model is duck-typed in the source system (whatever the
//! pickle exposes); here it sits behind the narrow [`SeverityClassifier`]
//! trait so the concrete inference backend is swappable. The shipped
//! backend is a random forest of decision trees deserialized from a JSON
//! artifact, trained offline against the same feature contract.

use crime_intel_prediction_models::FeatureVector;
use serde::Deserialize;

use crate::PredictionError;

/// Narrow interface over the trained binary severity classifier.
pub trait SeverityClassifier: Send + Sync {
    /// Predicts the class index (0 = not severe, 1 = severe).
    fn predict(&self, features: &FeatureVector) -> usize;

    /// Per-class probability distribution, when the backend exposes one.
    fn predict_probability(&self, features: &FeatureVector) -> Option<Vec<f64>>;
}

/// A node in a serialized decision tree.
///
/// Untagged: splits carry `feature`/`threshold`/`left`/`right`, leaves
/// carry only `value` (per-class sample counts or weights).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Internal split node: go left when `features[feature] <= threshold`.
    Split {
        /// Index into the feature vector.
        feature: usize,
        /// Split threshold.
        threshold: f64,
        /// Node index when the feature is `<= threshold`.
        left: usize,
        /// Node index when the feature is `> threshold`.
        right: usize,
    },
    /// Leaf node with per-class weights.
    Leaf {
        /// Unnormalized per-class weights.
        value: Vec<f64>,
    },
}

/// A single decision tree, stored as a flat node array rooted at index 0.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walks the tree for a feature array and returns the normalized leaf
    /// distribution.
    #[allow(clippy::cast_precision_loss)]
    fn distribution(&self, features: &[f64; 4], n_classes: usize) -> Vec<f64> {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => {
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return vec![1.0 / n_classes as f64; n_classes];
                    }
                    return value.iter().map(|v| v / total).collect();
                }
            }
        }
    }

    /// Validates node references so traversal can never go out of bounds.
    fn validate(&self, tree_idx: usize, n_classes: usize) -> Result<(), PredictionError> {
        if self.nodes.is_empty() {
            return Err(PredictionError::CorruptArtifact {
                message: format!("tree {tree_idx} has no nodes"),
            });
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= 4 {
                        return Err(PredictionError::CorruptArtifact {
                            message: format!(
                                "tree {tree_idx} node {i} references feature {feature}"
                            ),
                        });
                    }
                    // Children must point strictly forward to rule out cycles.
                    if *left <= i || *right <= i || *left >= self.nodes.len()
                        || *right >= self.nodes.len()
                    {
                        return Err(PredictionError::CorruptArtifact {
                            message: format!("tree {tree_idx} node {i} has bad child indices"),
                        });
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(PredictionError::CorruptArtifact {
                            message: format!(
                                "tree {tree_idx} node {i} has {} class weights, expected {n_classes}",
                                value.len()
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Random forest classifier: averages normalized leaf distributions
/// across all trees.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl ForestClassifier {
    /// Builds a forest from deserialized trees, validating every node.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::CorruptArtifact`] for an empty forest or
    /// malformed tree structure.
    pub fn new(trees: Vec<DecisionTree>, n_classes: usize) -> Result<Self, PredictionError> {
        if trees.is_empty() {
            return Err(PredictionError::CorruptArtifact {
                message: "forest has no trees".to_string(),
            });
        }
        if n_classes < 2 {
            return Err(PredictionError::CorruptArtifact {
                message: format!("forest declares {n_classes} classes, expected at least 2"),
            });
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(i, n_classes)?;
        }
        Ok(Self { trees, n_classes })
    }

    /// Averaged per-class probabilities for a raw feature array.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn probabilities(&self, features: &[f64; 4]) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (sum, p) in sums.iter_mut().zip(tree.distribution(features, self.n_classes)) {
                *sum += p;
            }
        }
        let n = self.trees.len() as f64;
        for sum in &mut sums {
            *sum /= n;
        }
        sums
    }

    /// Argmax class for a raw feature array; lower index wins ties.
    #[must_use]
    pub fn predict_raw(&self, features: &[f64; 4]) -> usize {
        let probs = self.probabilities(features);
        let mut best = 0;
        for (i, p) in probs.iter().enumerate() {
            if *p > probs[best] {
                best = i;
            }
        }
        best
    }
}

impl SeverityClassifier for ForestClassifier {
    fn predict(&self, features: &FeatureVector) -> usize {
        self.predict_raw(&features.to_array())
    }

    fn predict_probability(&self, features: &FeatureVector) -> Option<Vec<f64>> {
        Some(self.probabilities(&features.to_array()))
    }
}

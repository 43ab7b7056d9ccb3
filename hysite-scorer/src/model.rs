//! Pre-trained recommendation models loaded from JSON artefacts.
//!
//! An artefact is read once at start-up and evaluated as a pure function of
//! the three factor scores, in the order `[infrastructure, environmental,
//! economic]`. Three shapes are understood:
//!
//! ```json
//! { "kind": "linear", "intercept": 0.1, "coefficients": [0.3, 0.3, 0.3] }
//! { "kind": "constant", "value": 0.5 }
//! { "kind": "tree_ensemble", "base_score": 0.5, "trees": [
//!     { "nodes": [
//!         { "kind": "split", "feature": 0, "threshold": 0.4, "left": 1, "right": 2 },
//!         { "kind": "leaf", "value": -0.1 },
//!         { "kind": "leaf", "value": 0.2 }
//!     ] }
//! ] }
//! ```
//!
//! Tree ensembles follow gradient-boosted regression semantics: a sample
//! descends left when its feature value is strictly below the threshold, and
//! the prediction is `base_score` plus the sum of the reached leaves.

use std::io::Read;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use hysite_core::{FactorScores, ModelError, ModelScorer, checked_model_score};
use serde::{Deserialize, Serialize};

/// Number of input features.
const FEATURE_COUNT: usize = 3;

/// One node of a flat regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal node routing a sample to one of two children.
    Split {
        /// Feature index in `0..3`.
        feature: usize,
        /// Values strictly below this go left.
        threshold: f64,
        /// Index of the left child.
        left: usize,
        /// Index of the right child.
        right: usize,
    },
    /// Terminal node contributing `value` to the prediction.
    Leaf {
        /// Leaf contribution.
        value: f64,
    },
}

/// A regression tree stored as a node list rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    /// Nodes; children always follow their parent.
    pub nodes: Vec<TreeNode>,
}

/// Serialised model description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtefact {
    /// `intercept + coefficients · scores`.
    Linear {
        /// Constant term.
        intercept: f64,
        /// One coefficient per factor.
        coefficients: [f64; FEATURE_COUNT],
    },
    /// Sum of regression trees on top of a base score.
    TreeEnsemble {
        /// Prediction before any tree contributes.
        base_score: f64,
        /// Boosted trees.
        trees: Vec<RegressionTree>,
    },
    /// Ignores its input.
    Constant {
        /// Fixed prediction.
        value: f64,
    },
}

fn invalid(reason: impl Into<String>) -> ModelError {
    ModelError::InvalidArtefact {
        reason: reason.into(),
    }
}

fn ensure_finite(name: &str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} is not finite")))
    }
}

impl RegressionTree {
    fn validate(&self, tree: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(invalid(format!("tree {tree} has no nodes")));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Leaf { value } => {
                    ensure_finite(&format!("tree {tree} node {index} value"), value)?;
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(invalid(format!(
                            "tree {tree} node {index} splits on unknown feature {feature}"
                        )));
                    }
                    ensure_finite(&format!("tree {tree} node {index} threshold"), threshold)?;
                    for child in [left, right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(invalid(format!(
                                "tree {tree} node {index} has invalid child {child}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Follow splits from the root to a leaf.
    fn leaf_value(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features
                        .get(*feature)
                        .ok_or_else(|| invalid(format!("unknown feature {feature}")))?;
                    index = if *value < *threshold { *left } else { *right };
                }
                None => return Err(invalid(format!("dangling node index {index}"))),
            }
        }
        Err(invalid("tree traversal did not reach a leaf"))
    }
}

impl ModelArtefact {
    /// Check that the artefact can be evaluated for every input.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidArtefact`] for non-finite parameters,
    /// out-of-range features or children, and empty ensembles.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Linear {
                intercept,
                coefficients,
            } => {
                ensure_finite("intercept", *intercept)?;
                for (index, coefficient) in coefficients.iter().enumerate() {
                    ensure_finite(&format!("coefficient {index}"), *coefficient)?;
                }
                Ok(())
            }
            Self::TreeEnsemble { base_score, trees } => {
                ensure_finite("base score", *base_score)?;
                if trees.is_empty() {
                    return Err(invalid("tree ensemble has no trees"));
                }
                trees
                    .iter()
                    .enumerate()
                    .try_for_each(|(index, tree)| tree.validate(index))
            }
            Self::Constant { value } => ensure_finite("constant value", *value),
        }
    }

    /// Evaluate the raw, unclamped prediction.
    #[expect(clippy::float_arithmetic, reason = "model evaluation")]
    fn evaluate(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        match self {
            Self::Linear {
                intercept,
                coefficients,
            } => Ok(coefficients
                .iter()
                .zip(features)
                .fold(*intercept, |acc, (weight, value)| acc + weight * value)),
            Self::TreeEnsemble { base_score, trees } => {
                let mut total = *base_score;
                for tree in trees {
                    total += tree.leaf_value(features)?;
                }
                Ok(total)
            }
            Self::Constant { value } => Ok(*value),
        }
    }
}

/// A validated model ready for prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtefactModel {
    artefact: ModelArtefact,
}

impl ArtefactModel {
    /// Validate an in-memory artefact.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidArtefact`] when validation fails.
    pub fn from_artefact(artefact: ModelArtefact) -> Result<Self, ModelError> {
        artefact.validate()?;
        Ok(Self { artefact })
    }

    /// Read, decode and validate an artefact file.
    ///
    /// # Errors
    /// Returns [`ModelError::Read`] when the file cannot be read,
    /// [`ModelError::Decode`] when it is not a known artefact, and
    /// [`ModelError::InvalidArtefact`] when validation fails.
    pub fn load(path: &Utf8Path) -> Result<Self, ModelError> {
        let read_error = |source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        };
        let mut file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(read_error)?;
        let mut text = String::new();
        file.read_to_string(&mut text).map_err(read_error)?;
        let artefact: ModelArtefact =
            serde_json::from_str(&text).map_err(|err| ModelError::Decode {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        let model = Self::from_artefact(artefact)?;
        log::info!("loaded {} model from {path}", model.kind());
        Ok(model)
    }

    /// The artefact backing this model.
    #[must_use]
    pub const fn artefact(&self) -> &ModelArtefact {
        &self.artefact
    }

    /// Short name of the artefact kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self.artefact {
            ModelArtefact::Linear { .. } => "linear",
            ModelArtefact::TreeEnsemble { .. } => "tree_ensemble",
            ModelArtefact::Constant { .. } => "constant",
        }
    }
}

impl ModelScorer for ArtefactModel {
    fn predict(&self, scores: &FactorScores) -> Result<f64, ModelError> {
        let raw = self.artefact.evaluate(&scores.as_array())?;
        checked_model_score(raw)
    }
}

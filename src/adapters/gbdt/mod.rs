//! GBDT adapter: On-device classifier over an exported tree-model artifact.
//!
//! The training pipeline exports a gradient-boosted tree ensemble as JSON.
//! This adapter loads the artifact, validates it against the canonical
//! feature order, and evaluates it in pure Rust: walk each tree to a leaf,
//! sum the leaf values with the base score, and apply the logistic link.
//!
//! # Feature order
//!
//! The artifact's `feature_names` must equal `FEATURE_NAMES` exactly. A
//! reordered artifact would produce silently wrong predictions, so loading
//! rejects any mismatch instead of remapping.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{HealthFeatures, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{InferenceEngine, InferenceError, LoadError};

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/diabetes_gbdt.json";

/// A decision tree node (internal or leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Feature index to compare (internal nodes)
    #[serde(default)]
    pub feature: u16,

    /// Split threshold; traversal goes left when feature <= threshold
    #[serde(default)]
    pub threshold: f64,

    /// Index of the left child
    #[serde(default)]
    pub left: u16,

    /// Index of the right child
    #[serde(default)]
    pub right: u16,

    /// Leaf value in logit space (None for internal nodes)
    #[serde(default)]
    pub leaf: Option<f64>,
}

/// A single decision tree, nodes indexed from the root at 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// Exported tree-model artifact as produced by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedTreeModel {
    pub model_name: String,
    pub version: u32,
    pub feature_names: Vec<String>,
    /// Intercept in logit space
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl ExportedTreeModel {
    /// Sum the ensemble in logit space for one feature vector.
    fn margin(&self, features: &[f64]) -> f64 {
        self.trees
            .iter()
            .map(|tree| eval_tree(tree, features))
            .sum::<f64>()
            + self.base_score
    }
}

/// Walk one tree to a leaf.
///
/// Indices were bounds-checked at load time; the in-range fallbacks here
/// only guard against an artifact edited after loading.
fn eval_tree(tree: &Tree, features: &[f64]) -> f64 {
    let mut idx = 0usize;

    loop {
        let Some(node) = tree.nodes.get(idx) else {
            return 0.0;
        };

        if let Some(value) = node.leaf {
            return value;
        }

        let feature_value = features.get(node.feature as usize).copied().unwrap_or(0.0);
        idx = if feature_value <= node.threshold {
            node.left as usize
        } else {
            node.right as usize
        };
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// On-device inference engine over an exported tree model.
pub struct GbdtEngine {
    artifact_path: PathBuf,
}

impl GbdtEngine {
    /// Create an engine reading the artifact from the given path.
    #[must_use]
    pub fn new<P: AsRef<Path>>(artifact_path: P) -> Self {
        Self {
            artifact_path: artifact_path.as_ref().to_path_buf(),
        }
    }

    /// Create an engine using `GLUCORA_MODEL_PATH` or the default location.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let path = std::env::var("GLUCORA_MODEL_PATH")
            .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());
        Self::new(path)
    }

    /// Validate an artifact's internal consistency.
    fn validate(model: &ExportedTreeModel) -> Result<(), LoadError> {
        if model.feature_names.len() != FEATURE_COUNT {
            return Err(LoadError::Malformed(format!(
                "Expected {} features, artifact declares {}",
                FEATURE_COUNT,
                model.feature_names.len()
            )));
        }

        for (i, (declared, expected)) in
            model.feature_names.iter().zip(FEATURE_NAMES.iter()).enumerate()
        {
            if declared != expected {
                return Err(LoadError::Malformed(format!(
                    "Feature order mismatch at index {i}: artifact has {declared:?}, model was trained on {expected:?}"
                )));
            }
        }

        if model.trees.is_empty() {
            return Err(LoadError::Malformed("Artifact contains no trees".into()));
        }

        for (t, tree) in model.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(LoadError::Malformed(format!("Tree {t} has no nodes")));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                if node.leaf.is_some() {
                    continue;
                }
                if node.feature as usize >= FEATURE_COUNT {
                    return Err(LoadError::Malformed(format!(
                        "Tree {t} node {n} references feature {} beyond the feature count",
                        node.feature
                    )));
                }
                if node.left as usize >= tree.nodes.len() || node.right as usize >= tree.nodes.len()
                {
                    return Err(LoadError::Malformed(format!(
                        "Tree {t} node {n} has a child index out of bounds"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl InferenceEngine for GbdtEngine {
    type Model = ExportedTreeModel;

    fn load(&self) -> Result<Self::Model, LoadError> {
        let content = std::fs::read_to_string(&self.artifact_path).map_err(|e| {
            LoadError::Artifact(format!("{}: {e}", self.artifact_path.display()))
        })?;

        let model: ExportedTreeModel = serde_json::from_str(&content)
            .map_err(|e| LoadError::Malformed(e.to_string()))?;

        Self::validate(&model)?;

        tracing::info!(
            "Loaded model {:?} v{} from {:?} ({} trees, {} features)",
            model.model_name,
            model.version,
            self.artifact_path,
            model.trees.len(),
            model.feature_names.len()
        );

        Ok(model)
    }

    fn invoke(
        &self,
        model: &Self::Model,
        features: &HealthFeatures,
    ) -> Result<[f64; 2], InferenceError> {
        let vector = features.to_vec();
        if vector.len() != model.feature_names.len() {
            return Err(InferenceError::InferenceFailure(format!(
                "Dimension mismatch: model expects {}, got {}",
                model.feature_names.len(),
                vector.len()
            )));
        }

        let margin = model.margin(&vector);
        if !margin.is_finite() {
            return Err(InferenceError::InferenceFailure(
                "Non-finite margin from tree evaluation".into(),
            ));
        }

        let positive = sigmoid(margin);
        Ok([1.0 - positive, positive])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{encode, AnswerSheet};
    use std::io::Write;

    fn shipped_engine() -> (GbdtEngine, ExportedTreeModel) {
        let engine = GbdtEngine::new(DEFAULT_MODEL_PATH);
        let model = engine.load().expect("Shipped artifact should load");
        (engine, model)
    }

    fn answers(bmi: &str, age: &str) -> AnswerSheet {
        AnswerSheet {
            bmi: Some(bmi.to_string()),
            age: Some(age.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_shipped_artifact() {
        let (_, model) = shipped_engine();
        assert_eq!(model.feature_names.len(), FEATURE_COUNT);
        assert!(!model.trees.is_empty());
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (engine, model) = shipped_engine();
        let features = encode(&answers("28", "6")).expect("Should encode");

        let [negative, positive] = engine.invoke(&model, &features).expect("Should run");
        assert!((negative + positive - 1.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&positive));
    }

    #[test]
    fn test_adverse_profile_scores_high() {
        let (engine, model) = shipped_engine();

        let mut sheet = answers("35", "10");
        sheet.high_bp = Some(true);
        sheet.gen_hlth = Some(5);
        let features = encode(&sheet).expect("Should encode");

        let [_, positive] = engine.invoke(&model, &features).expect("Should run");
        assert!(
            positive >= 0.70,
            "Adverse profile should score high, got {positive}"
        );
    }

    #[test]
    fn test_healthy_profile_scores_low() {
        let (engine, model) = shipped_engine();

        let mut sheet = answers("22", "3");
        sheet.gen_hlth = Some(2);
        let features = encode(&sheet).expect("Should encode");

        let [_, positive] = engine.invoke(&model, &features).expect("Should run");
        assert!(
            positive < 0.30,
            "Healthy profile should score low, got {positive}"
        );
    }

    #[test]
    fn test_risk_is_monotonic_in_bmi() {
        let (engine, model) = shipped_engine();

        let lean = encode(&answers("22", "7")).expect("Should encode");
        let obese = encode(&answers("36", "7")).expect("Should encode");

        let [_, p_lean] = engine.invoke(&model, &lean).expect("Should run");
        let [_, p_obese] = engine.invoke(&model, &obese).expect("Should run");
        assert!(p_obese > p_lean);
    }

    #[test]
    fn test_missing_artifact() {
        let engine = GbdtEngine::new("models/no_such_model.json");
        assert!(matches!(engine.load(), Err(LoadError::Artifact(_))));
    }

    #[test]
    fn test_reordered_artifact_rejected() {
        let (_, mut model) = shipped_engine();
        model.feature_names.swap(0, 3);

        let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
        file.write_all(serde_json::to_string(&model).expect("Should serialize").as_bytes())
            .expect("Should write");

        let engine = GbdtEngine::new(file.path());
        assert!(matches!(engine.load(), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn test_out_of_bounds_child_rejected() {
        let (_, mut model) = shipped_engine();
        model.trees[0].nodes[0].left = 200;

        let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
        file.write_all(serde_json::to_string(&model).expect("Should serialize").as_bytes())
            .expect("Should write");

        let engine = GbdtEngine::new(file.path());
        assert!(matches!(engine.load(), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn test_dimension_mismatch_is_inference_failure() {
        let (engine, mut model) = shipped_engine();
        model.feature_names.pop();

        let features = encode(&answers("25", "5")).expect("Should encode");
        assert!(matches!(
            engine.invoke(&model, &features),
            Err(InferenceError::InferenceFailure(_))
        ));
    }
}

//! Analysis result model and the synthesized evaluation run.
//!
//! The metric values produced here are modeled, not computed: there is no
//! classifier behind the dashboard. A run yields a fixed metric baseline
//! with a small random perturbation on the headline accuracy, standing in
//! for a real model fit.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Selectable classifier labels offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    DecisionTree,
    RandomForest,
    Svm,
    KNearestNeighbors,
    NaiveBayes,
    LogisticRegression,
    MultilayerPerceptron,
    NaiveBayesMultinomial,
}

impl Algorithm {
    pub const ALL: [Algorithm; 8] = [
        Algorithm::DecisionTree,
        Algorithm::RandomForest,
        Algorithm::Svm,
        Algorithm::KNearestNeighbors,
        Algorithm::NaiveBayes,
        Algorithm::LogisticRegression,
        Algorithm::MultilayerPerceptron,
        Algorithm::NaiveBayesMultinomial,
    ];

    /// Human-readable label shown in reports and exports.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::DecisionTree => "Decision Tree (J48)",
            Algorithm::RandomForest => "Random Forest",
            Algorithm::Svm => "SVM (SMO)",
            Algorithm::KNearestNeighbors => "K-Nearest Neighbors (IBk)",
            Algorithm::NaiveBayes => "Naive Bayes",
            Algorithm::LogisticRegression => "Logistic Regression",
            Algorithm::MultilayerPerceptron => "Multilayer Perceptron",
            Algorithm::NaiveBayesMultinomial => "Naive Bayes Multinomial",
        }
    }
}

impl From<&str> for Algorithm {
    fn from(key: &str) -> Self {
        match key {
            "decision-tree" | "j48" => Algorithm::DecisionTree,
            "random-forest" => Algorithm::RandomForest,
            "svm" => Algorithm::Svm,
            "knn" | "k-nearest-neighbors" => Algorithm::KNearestNeighbors,
            "naive-bayes" => Algorithm::NaiveBayes,
            "logistic" | "logistic-regression" => Algorithm::LogisticRegression,
            "mlp" | "multilayer-perceptron" => Algorithm::MultilayerPerceptron,
            "naive-bayes-multi" => Algorithm::NaiveBayesMultinomial,
            other => {
                warn!(
                    algorithm = other,
                    "Unknown algorithm key, defaulting to DecisionTree"
                );
                Algorithm::DecisionTree
            }
        }
    }
}

/// 2x2 confusion matrix, laid out `[[true_pos, false_pos], [false_neg, true_neg]]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: u64,
    pub fp: u64,
    pub fn_: u64,
    pub tn: u64,
}

impl ConfusionMatrix {
    /// Row-major cells in presentation order.
    pub fn rows(&self) -> [[u64; 2]; 2] {
        [[self.tp, self.fp], [self.fn_, self.tn]]
    }

    /// Total number of samples in the matrix.
    pub fn total(&self) -> u64 {
        self.tp + self.fp + self.fn_ + self.tn
    }
}

/// Per-run metric values. Fractions in `[0, 1]`, never percentages; the
/// encoders convert at presentation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: f64,
    pub specificity: f64,
}

/// The canonical record produced by one completed analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub accuracy: f64,
    pub metrics: MetricSet,
    pub confusion: ConfusionMatrix,
    pub algorithm_label: String,
}

impl AnalysisResult {
    /// The four rows every encoder renders, in presentation order. The
    /// headline "Precision" the dashboard shows is the model's overall
    /// accuracy; `metrics.precision` stays available for the advisory path.
    pub fn headline_metrics(&self) -> [(&'static str, f64); 4] {
        [
            ("Precision", self.accuracy),
            ("Recall", self.metrics.recall),
            ("F1-Score", self.metrics.f1),
            ("ROC AUC", self.metrics.roc_auc),
        ]
    }
}

const BASELINE_ACCURACY: f64 = 0.92;
const ACCURACY_JITTER: f64 = 0.025;

/// Produces the modeled result of an evaluation run for the given algorithm.
pub fn synthesize(algorithm: Algorithm) -> AnalysisResult {
    let mut rng = rand::rng();
    let accuracy = (BASELINE_ACCURACY + rng.random_range(-ACCURACY_JITTER..=ACCURACY_JITTER))
        .clamp(0.0, 1.0);
    debug!(
        algorithm = algorithm.label(),
        accuracy, "Synthesized evaluation result"
    );
    AnalysisResult {
        accuracy,
        metrics: MetricSet {
            precision: 0.92,
            recall: 0.89,
            f1: 0.91,
            roc_auc: 0.94,
            specificity: 0.97,
        },
        confusion: ConfusionMatrix {
            tp: 120,
            fp: 8,
            fn_: 5,
            tn: 115,
        },
        algorithm_label: algorithm.label().to_string(),
    }
}

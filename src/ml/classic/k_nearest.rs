use log::debug;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};

use crate::error::{Error, Result};

pub mod distance;
pub mod vote;

pub use distance::DistanceStrategy;
pub use vote::{k_nearest_indices, majority_vote, Label};

/// Prediction settings for [`KNNClassifier::predict_with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KNNConfig {
    /// Number of neighbors that vote.
    pub k: usize,
    /// Which distance form to use.
    pub strategy: DistanceStrategy,
}

impl KNNConfig {
    /// Create a new config with the default strategy (`NoLoops`).
    pub fn new(k: usize) -> Self {
        Self {
            k,
            strategy: DistanceStrategy::default(),
        }
    }

    /// Customize the distance strategy.
    pub fn with_strategy(mut self, strategy: DistanceStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for KNNConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

#[derive(Debug, Clone)]
struct TrainingSet<L> {
    features: Array2<f64>,
    labels: Array1<L>,
}

/// A k-NN classifier with L2 distance that memorizes its training data and
/// classifies queries by majority vote among the `k` closest training points.
///
/// # Type Parameters
/// - `L`: The label type. Must be totally ordered so votes can be counted in an
///   ordered map and ties resolved toward the smallest label.
///
/// Training needs `&mut self` and prediction only `&self`, so a classifier
/// shared behind an `RwLock` can serve concurrent predictions with training as
/// the sole writer.
#[derive(Debug, Clone)]
pub struct KNNClassifier<L: Label = i64> {
    training: Option<TrainingSet<L>>,
}

impl<L: Label> Default for KNNClassifier<L> {
    fn default() -> Self {
        Self { training: None }
    }
}

impl<L: Label> KNNClassifier<L> {
    /// Constructs an untrained classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Memorizes `features` (num_train x D) and their `labels`, replacing any
    /// earlier training data. The arrays are moved in, not copied.
    ///
    /// On error the previous training data is kept.
    ///
    /// # Example
    ///
    /// ```
    /// use knn::{DistanceStrategy, KNNClassifier};
    /// use ndarray::array;
    ///
    /// let mut knn = KNNClassifier::new();
    /// knn.train(array![[0.0, 0.0], [10.0, 10.0], [0.0, 1.0]], array![0, 1, 0])
    ///     .unwrap();
    ///
    /// let predicted = knn
    ///     .predict(&array![[0.0, 0.5]], 3, DistanceStrategy::NoLoops)
    ///     .unwrap();
    /// assert_eq!(predicted, array![0]);
    /// ```
    pub fn train(&mut self, features: Array2<f64>, labels: Array1<L>) -> Result<()> {
        if features.nrows() != labels.len() {
            return Err(Error::invalid_argument(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        debug!(
            "train: {} samples with {} features",
            features.nrows(),
            features.ncols()
        );
        self.training = Some(TrainingSet { features, labels });
        Ok(())
    }

    pub fn is_trained(&self) -> bool {
        self.training.is_some()
    }

    /// Number of stored training points, 0 when untrained.
    pub fn num_train(&self) -> usize {
        self.training.as_ref().map_or(0, |t| t.labels.len())
    }

    /// Feature dimension of the stored training data.
    pub fn num_features(&self) -> Option<usize> {
        self.training.as_ref().map(|t| t.features.ncols())
    }

    pub fn training_features(&self) -> Option<&Array2<f64>> {
        self.training.as_ref().map(|t| &t.features)
    }

    pub fn training_labels(&self) -> Option<&Array1<L>> {
        self.training.as_ref().map(|t| &t.labels)
    }

    fn training(&self) -> Result<&TrainingSet<L>> {
        self.training.as_ref().ok_or(Error::NotTrained)
    }

    /// Distance matrix (num_test x num_train) between `x` and the training data,
    /// computed with `strategy`.
    ///
    /// # Errors
    ///
    /// - `NotTrained` before `train`.
    /// - `InvalidArgument` if `x` has a different feature dimension.
    pub fn compute_distances<S>(
        &self,
        x: &ArrayBase<S, Ix2>,
        strategy: DistanceStrategy,
    ) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        let training = self.training()?;
        strategy.compute(x.view(), training.features.view())
    }

    /// Nested loop over test and training points. Used as the reference form.
    pub fn compute_distances_two_loops<S>(&self, x: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        self.compute_distances(x, DistanceStrategy::TwoLoops)
    }

    /// Single loop over the test points.
    pub fn compute_distances_one_loop<S>(&self, x: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        self.compute_distances(x, DistanceStrategy::OneLoop)
    }

    /// No explicit loops.
    pub fn compute_distances_no_loops<S>(&self, x: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        self.compute_distances(x, DistanceStrategy::NoLoops)
    }

    /// Given a distance matrix from one of the `compute_distances_*` methods,
    /// predict a label for each row by majority vote of its `k` nearest
    /// training points. Ties in the vote go to the smaller label.
    pub fn predict_labels<S>(&self, dists: &ArrayBase<S, Ix2>, k: usize) -> Result<Array1<L>>
    where
        S: Data<Elem = f64>,
    {
        let training = self.training()?;
        vote::predict_labels(dists.view(), training.labels.view(), k)
    }

    /// Predicts a label for every row of `x`.
    ///
    /// Either returns one label per row or fails without a partial result.
    pub fn predict<S>(
        &self,
        x: &ArrayBase<S, Ix2>,
        k: usize,
        strategy: DistanceStrategy,
    ) -> Result<Array1<L>>
    where
        S: Data<Elem = f64>,
    {
        let num_train = self.training()?.labels.len();
        // Fail on a bad k before paying for the distance matrix.
        if k == 0 || k > num_train {
            return Err(Error::invalid_argument(format!(
                "k = {} is outside [1, {}]",
                k, num_train
            )));
        }
        debug!(
            "predict: {} queries, k = {}, strategy = {}",
            x.nrows(),
            k,
            strategy
        );
        let dists = self.compute_distances(x, strategy)?;
        self.predict_labels(&dists, k)
    }

    pub fn predict_with_config<S>(
        &self,
        x: &ArrayBase<S, Ix2>,
        config: &KNNConfig,
    ) -> Result<Array1<L>>
    where
        S: Data<Elem = f64>,
    {
        self.predict(x, config.k, config.strategy)
    }

    /// Like [`predict`](Self::predict), selecting the distance form by its
    /// loop count (0, 1 or 2). Any other count is an `InvalidArgument`.
    pub fn predict_with_loops<S>(
        &self,
        x: &ArrayBase<S, Ix2>,
        k: usize,
        num_loops: u32,
    ) -> Result<Array1<L>>
    where
        S: Data<Elem = f64>,
    {
        let strategy = DistanceStrategy::try_from(num_loops)?;
        self.predict(x, k, strategy)
    }
}

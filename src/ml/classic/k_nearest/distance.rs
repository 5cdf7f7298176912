//! Pairwise Euclidean distances between a query set and a training set.
//!
//! All three forms return the same `(num_test, num_train)` matrix where entry
//! `(i, j)` is `||test[i] - train[j]||_2`. They only differ in how much of the
//! work is left to explicit Rust loops versus whole-array ndarray operations.

use std::fmt;
use std::str::FromStr;

use log::trace;
use ndarray::{Array2, ArrayView2, Axis};

use crate::error::{Error, Result};

/// Selects which distance form a prediction uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceStrategy {
    /// `||a||^2 + ||b||^2 - 2 a.b` over the whole matrix at once.
    #[default]
    NoLoops,
    /// One loop over the test rows, broadcasting against every training row.
    OneLoop,
    /// Explicit loop over every (test, train) pair.
    TwoLoops,
}

impl DistanceStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            DistanceStrategy::NoLoops => "no_loops",
            DistanceStrategy::OneLoop => "one_loop",
            DistanceStrategy::TwoLoops => "two_loops",
        }
    }

    /// Number of explicit loops the form uses.
    pub fn num_loops(&self) -> u32 {
        match self {
            DistanceStrategy::NoLoops => 0,
            DistanceStrategy::OneLoop => 1,
            DistanceStrategy::TwoLoops => 2,
        }
    }

    /// Computes the distance matrix with this form.
    pub fn compute(&self, test: ArrayView2<f64>, train: ArrayView2<f64>) -> Result<Array2<f64>> {
        match self {
            DistanceStrategy::NoLoops => no_loops(test, train),
            DistanceStrategy::OneLoop => one_loop(test, train),
            DistanceStrategy::TwoLoops => two_loops(test, train),
        }
    }
}

impl TryFrom<u32> for DistanceStrategy {
    type Error = Error;

    fn try_from(num_loops: u32) -> Result<Self> {
        match num_loops {
            0 => Ok(DistanceStrategy::NoLoops),
            1 => Ok(DistanceStrategy::OneLoop),
            2 => Ok(DistanceStrategy::TwoLoops),
            other => Err(Error::invalid_argument(format!(
                "invalid value {} for num_loops",
                other
            ))),
        }
    }
}

impl FromStr for DistanceStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no_loops" | "0" => Ok(DistanceStrategy::NoLoops),
            "one_loop" | "1" => Ok(DistanceStrategy::OneLoop),
            "two_loops" | "2" => Ok(DistanceStrategy::TwoLoops),
            _ => Err(Error::invalid_argument(format!(
                "unrecognized distance strategy {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for DistanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn check_dims(test: &ArrayView2<f64>, train: &ArrayView2<f64>) -> Result<()> {
    if test.ncols() != train.ncols() {
        return Err(Error::invalid_argument(format!(
            "query has {} features but training data has {}",
            test.ncols(),
            train.ncols()
        )));
    }
    Ok(())
}

/// Reference form: one distance per (i, j) pair, reduced over the feature axis.
pub fn two_loops(test: ArrayView2<f64>, train: ArrayView2<f64>) -> Result<Array2<f64>> {
    check_dims(&test, &train)?;
    let (num_test, num_train) = (test.nrows(), train.nrows());
    trace!("two_loops: {}x{} distances", num_test, num_train);

    let mut dists = Array2::zeros((num_test, num_train));
    for i in 0..num_test {
        for j in 0..num_train {
            let diff = &test.row(i) - &train.row(j);
            dists[[i, j]] = diff.dot(&diff).sqrt();
        }
    }
    Ok(dists)
}

/// One row of the matrix per iteration; the train set is broadcast against test row `i`.
pub fn one_loop(test: ArrayView2<f64>, train: ArrayView2<f64>) -> Result<Array2<f64>> {
    check_dims(&test, &train)?;
    let (num_test, num_train) = (test.nrows(), train.nrows());
    trace!("one_loop: {}x{} distances", num_test, num_train);

    let mut dists = Array2::zeros((num_test, num_train));
    for (query, mut row) in test.outer_iter().zip(dists.outer_iter_mut()) {
        let diff = &train - &query;
        let squared = (&diff * &diff).sum_axis(Axis(1));
        row.assign(&squared.mapv(f64::sqrt));
    }
    Ok(dists)
}

/// Whole-matrix form using `||a - b||^2 = ||a||^2 + ||b||^2 - 2 a.b`.
///
/// Cancellation can leave tiny negative values when `a` and `b` nearly
/// coincide; those are clamped to zero before the square root.
pub fn no_loops(test: ArrayView2<f64>, train: ArrayView2<f64>) -> Result<Array2<f64>> {
    check_dims(&test, &train)?;
    trace!("no_loops: {}x{} distances", test.nrows(), train.nrows());

    // (num_test, 1) so it broadcasts across columns
    let test_sq = (&test * &test).sum_axis(Axis(1)).insert_axis(Axis(1));
    // (num_train,) broadcasts across rows
    let train_sq = (&train * &train).sum_axis(Axis(1));

    let mut dists = test.dot(&train.t()) * -2.0;
    dists += &test_sq;
    dists += &train_sq;
    // also maps -0.0 to 0.0 so ties against the other forms stay exact
    dists.mapv_inplace(|d| if d <= 0.0 { 0.0 } else { d.sqrt() });
    Ok(dists)
}

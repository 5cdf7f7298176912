//! Majority vote over the k closest training points of each query row.

use std::collections::BTreeMap;
use std::fmt::Debug;

use log::trace;
use ndarray::{Array1, ArrayView1, ArrayView2};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};

/// A class label. Votes are counted in an ordered map keyed by the label, so
/// any totally ordered type works, not only small non-negative integers.
pub trait Label: Ord + Clone + Send + Sync + Debug {}

impl<T: Ord + Clone + Send + Sync + Debug> Label for T {}

/// Predicts one label per row of `dists`, a `(num_test, num_train)` distance
/// matrix whose columns line up with `labels`.
///
/// Neighbors at equal distance are taken in training order, and a tied vote
/// goes to the smallest label.
///
/// # Errors
///
/// `InvalidArgument` if `dists` has a column count different from
/// `labels.len()`, or if `k` is not in `[1, labels.len()]`.
pub fn predict_labels<L: Label>(
    dists: ArrayView2<f64>,
    labels: ArrayView1<L>,
    k: usize,
) -> Result<Array1<L>> {
    let num_train = labels.len();
    if dists.ncols() != num_train {
        return Err(Error::invalid_argument(format!(
            "distance matrix has {} columns but there are {} training labels",
            dists.ncols(),
            num_train
        )));
    }
    if k == 0 || k > num_train {
        return Err(Error::invalid_argument(format!(
            "k = {} is outside [1, {}]",
            k, num_train
        )));
    }

    #[cfg(feature = "parallel")]
    let predictions = (0..dists.nrows())
        .into_par_iter()
        .map(|i| vote_row(dists.row(i), labels, k))
        .collect::<Result<Vec<L>>>()?;

    #[cfg(not(feature = "parallel"))]
    let predictions = dists
        .outer_iter()
        .map(|row| vote_row(row, labels, k))
        .collect::<Result<Vec<L>>>()?;

    Ok(Array1::from(predictions))
}

fn vote_row<L: Label>(row: ArrayView1<f64>, labels: ArrayView1<L>, k: usize) -> Result<L> {
    let neighbors = k_nearest_indices(row, k);
    trace!("neighbors {:?}", neighbors);
    majority_vote(neighbors.iter().map(|&j| &labels[j]))
        .ok_or_else(|| Error::invalid_argument("cannot vote with no neighbors"))
}

/// Indices of the `k` smallest entries of `row`, nearest first.
///
/// Equal distances keep their training order, so the result matches the first
/// `k` entries of a stable argsort. NaN distances sort after everything else.
pub fn k_nearest_indices(row: ArrayView1<f64>, k: usize) -> Vec<usize> {
    if k == 0 {
        return Vec::new();
    }
    let by_distance = |a: &usize, b: &usize| row[*a].total_cmp(&row[*b]).then(a.cmp(b));

    let mut order: Vec<usize> = (0..row.len()).collect();
    if k < order.len() {
        // The index tie-break makes the ordering total, so an unstable
        // selection still picks the same k as a stable sort would.
        order.select_nth_unstable_by(k - 1, by_distance);
        order.truncate(k);
    }
    order.sort_unstable_by(by_distance);
    order
}

/// Most frequent label, with ties going to the smallest label.
/// Returns `None` for an empty input.
pub fn majority_vote<'a, L, I>(labels: I) -> Option<L>
where
    L: Label + 'a,
    I: IntoIterator<Item = &'a L>,
{
    let mut counts = BTreeMap::<&L, usize>::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    // max_by_key keeps the last maximum; walking labels in descending order
    // makes that the smallest tied label.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_label, count)| *count)
        .map(|(label, _count)| label.clone())
}

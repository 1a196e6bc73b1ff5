//! Discrete weighted sampling.
//!
//! Every stochastic choice in the simulator (driver selection, passenger
//! count, entry and exit lane, velocity jitter) goes through a
//! `WeightedSampler`.  A sampler is immutable once built; drawing from it
//! consumes exactly one uniform `f64` from the caller's generator.
//!
//! Two lookups are offered:
//!
//! - [`WeightedSampler::choose`] scans the cumulative table linearly and
//!   returns the index together with the label.
//! - [`WeightedSampler::choose_fast`] first narrows the scan to one quarter
//!   of the table using three precomputed breakpoints.  Both return the same
//!   outcome for the same uniform sample.

use std::hash::Hash;
use std::ops::Add;

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::error::{FwError, FwResult};

/// Tolerance on the weight total.
pub const EPSILON: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct WeightedSampler<T> {
    weights:    Vec<f64>,
    cumulative: Vec<f64>,
    labels:     Vec<T>,
    /// Label → index, built on request by [`WeightedSampler::with_lookup`].
    lookup:     Option<FxHashMap<T, usize>>,
    /// Quartile breakpoints: `n/4`, `n/2`, `3n/4`, `n-1`.
    quartiles:  [usize; 4],
}

impl<T> WeightedSampler<T> {
    /// Build from weights that already sum to 1 (within [`EPSILON`]).
    pub fn new(weights: Vec<f64>, labels: Vec<T>) -> FwResult<Self> {
        if weights.is_empty() {
            return Err(FwError::EmptyDistribution);
        }
        if labels.len() != weights.len() {
            return Err(FwError::LabelCountMismatch {
                weights: weights.len(),
                labels:  labels.len(),
            });
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for (index, &weight) in weights.iter().enumerate() {
            if !(weight >= 0.0) {
                return Err(FwError::NegativeWeight { index, weight });
            }
            total += weight;
            cumulative.push(total);
        }
        if (total - 1.0).abs() >= EPSILON {
            return Err(FwError::NotNormalized { sum: total, epsilon: EPSILON });
        }

        let n = weights.len();
        Ok(Self {
            weights,
            cumulative,
            labels,
            lookup: None,
            quartiles: [n / 4, n / 2, n * 3 / 4, n - 1],
        })
    }

    /// Build from arbitrary non-negative weights, scaling them to sum to 1.
    pub fn normalize(weights: Vec<f64>, labels: Vec<T>) -> FwResult<Self> {
        if weights.is_empty() {
            return Err(FwError::EmptyDistribution);
        }
        let total: f64 = weights.iter().sum();
        if total == 0.0 {
            return Err(FwError::ZeroTotalWeight);
        }
        let scaled = weights.into_iter().map(|w| w / total).collect();
        Self::new(scaled, labels)
    }

    /// Discretized Gaussian over `start, start+step, …, finish`.
    ///
    /// The first bin takes all the mass below `start + step`, the last bin
    /// all the mass above `finish`, and every bin `x` in between the mass of
    /// `[x, x + step)`.  `extract` maps a label to the real line.
    pub fn normal<E>(mean: f64, deviation: f64, start: T, step: T, finish: T, extract: E) -> FwResult<Self>
    where
        T: Copy + Add<Output = T> + PartialOrd,
        E: Fn(T) -> f64,
    {
        let step_len = extract(step);
        if !(deviation > 0.0) || !(step_len > 0.0) {
            return Err(FwError::InvalidNormal { deviation, step: step_len });
        }

        let cdf = |x: f64| normal_cdf(x, mean, deviation);

        let mut last = cdf(extract(start + step));
        let mut weights = vec![last];
        let mut labels = vec![start];

        let mut bin = start + step;
        while bin < finish {
            let next = cdf(extract(bin + step));
            weights.push(next - last);
            labels.push(bin);
            last = next;
            bin = bin + step;
        }

        weights.push(1.0 - last);
        labels.push(finish);

        Self::new(weights, labels)
    }

    /// Draw an outcome with a linear scan.  Returns `(index, label)`.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, &T) {
        let rv: f64 = rng.r#gen();
        let index = self
            .cumulative
            .iter()
            .position(|&c| rv <= c)
            .unwrap_or(self.quartiles[3]);
        (index, &self.labels[index])
    }

    /// Draw an outcome, narrowing the scan with the quartile breakpoints.
    pub fn choose_fast<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let rv: f64 = rng.r#gen();
        &self.labels[self.fast_index(rv)]
    }

    /// Index selected by `choose_fast` for the uniform sample `rv`.
    fn fast_index(&self, rv: f64) -> usize {
        let [first, second, third, last] = self.quartiles;
        let c = &self.cumulative;

        let (lo, hi) = if rv <= c[second] {
            if rv <= c[first] { (0, first) } else { (first, second) }
        } else if rv <= c[third] {
            (second, third)
        } else {
            (third, last)
        };

        (lo..=hi).find(|&i| rv <= c[i]).unwrap_or(last)
    }

    /// Weight of the outcome at `index`.
    pub fn probability(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`: construction rejects empty weight lists.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn labels(&self) -> &[T] {
        &self.labels
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }
}

impl WeightedSampler<usize> {
    /// Sampler whose labels are the outcome indices themselves.
    pub fn unlabeled(weights: Vec<f64>) -> FwResult<Self> {
        let labels = (0..weights.len()).collect();
        Self::new(weights, labels)
    }
}

impl<T: Eq + Hash + Clone> WeightedSampler<T> {
    /// Build the label → index map used by [`WeightedSampler::probability_of`].
    /// The first occurrence of a repeated label wins.
    pub fn with_lookup(mut self) -> Self {
        let mut map = FxHashMap::default();
        for (i, label) in self.labels.iter().enumerate() {
            map.entry(label.clone()).or_insert(i);
        }
        self.lookup = Some(map);
        self
    }

    pub fn index_of(&self, label: &T) -> Option<usize> {
        match &self.lookup {
            Some(map) => map.get(label).copied(),
            None => self.labels.iter().position(|l| l == label),
        }
    }

    /// Weight of the outcome labelled `label`, or 0 for an unknown label.
    pub fn probability_of(&self, label: &T) -> f64 {
        self.index_of(label)
            .and_then(|i| self.probability(i))
            .unwrap_or(0.0)
    }
}

/// Gaussian cumulative distribution function.
pub fn normal_cdf(x: f64, mean: f64, deviation: f64) -> f64 {
    0.5 * (1.0 + libm::erf((x - mean) / (deviation * std::f64::consts::SQRT_2)))
}

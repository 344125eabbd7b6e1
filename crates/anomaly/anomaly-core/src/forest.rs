//! Isolation forest ensemble and its builder.

use std::fmt;

use anomaly_api::{ForestConfig, SamplePolicy};
use anomaly_spi::{AnomalyError, AttributeSet, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::correction::c_factor;
use crate::sampling::sample_indices;
use crate::tree::SplitNode;

/// A built isolation forest.
///
/// The ensemble is immutable: scoring never mutates it, so it can be shared
/// across threads and queried concurrently. Build a new one to change any
/// parameter.
///
/// # Example
///
/// ```rust
/// use anomaly_core::IsolationForest;
/// use anomaly_spi::AttributeSet;
///
/// let mut items: Vec<f64> = (0..50).map(|i| (i % 5) as f64 * 0.1).collect();
/// items.push(40.0);
///
/// let attributes = AttributeSet::new().with("value", |v: &f64| *v);
/// let forest = IsolationForest::builder(&items, attributes)
///     .n_trees(50)
///     .sample_size(32)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert!(forest.anomaly_score(&40.0) > forest.anomaly_score(&0.2));
/// ```
pub struct IsolationForest<T> {
    trees: Vec<SplitNode>,
    attributes: AttributeSet<T>,
    sample_size: usize,
    height_limit: usize,
    normalizer: f64,
    parallel: bool,
}

impl<T> IsolationForest<T> {
    /// Start configuring a forest over `items`.
    pub fn builder(items: &[T], attributes: AttributeSet<T>) -> IsolationForestBuilder<'_, T> {
        IsolationForestBuilder::new(items, attributes)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Subsample size each tree was grown from.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn height_limit(&self) -> usize {
        self.height_limit
    }

    /// Score normalizer `c(sample_size)`, or 1.0 when that is zero.
    pub fn normalizer(&self) -> f64 {
        self.normalizer
    }

    pub fn trees(&self) -> &[SplitNode] {
        &self.trees
    }

    pub fn attributes(&self) -> &AttributeSet<T> {
        &self.attributes
    }

    /// Path length of `item` in the tree at `tree`, using the forest's height limit.
    pub fn path_length(&self, item: &T, tree: usize) -> Option<f64> {
        self.trees
            .get(tree)
            .map(|t| t.path_length(item, &self.attributes, self.height_limit))
    }

    /// Mean path length of `item` over all trees.
    pub fn average_path_length(&self, item: &T) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|t| t.path_length(item, &self.attributes, self.height_limit))
            .sum();
        total / self.trees.len() as f64
    }

    /// Anomaly score `2^(-E[h(x)] / c(psi))` in `(0, 1]`.
    ///
    /// Close to 1 for items isolated after very few splits, around 0.5 for
    /// typical items, and well below 0.5 inside dense regions.
    pub fn anomaly_score(&self, item: &T) -> f64 {
        2f64.powf(-self.average_path_length(item) / self.normalizer)
    }

    /// Share of internal nodes splitting on each attribute, summing to 1.
    ///
    /// All zeros when no tree has an internal node.
    pub fn attribute_usage(&self) -> Vec<f64> {
        let mut counts = vec![0usize; self.attributes.len()];
        for tree in &self.trees {
            tree.count_splits(&mut counts);
        }
        let total: usize = counts.iter().sum();
        if total == 0 {
            return vec![0.0; counts.len()];
        }
        counts
            .into_iter()
            .map(|c| c as f64 / total as f64)
            .collect()
    }
}

impl<T: Sync> IsolationForest<T> {
    /// Scores for every item, in item order.
    pub fn score_all(&self, items: &[T]) -> Vec<f64> {
        if self.parallel {
            items.par_iter().map(|item| self.anomaly_score(item)).collect()
        } else {
            items.iter().map(|item| self.anomaly_score(item)).collect()
        }
    }
}

impl<T> fmt::Debug for IsolationForest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IsolationForest")
            .field("n_trees", &self.trees.len())
            .field("sample_size", &self.sample_size)
            .field("height_limit", &self.height_limit)
            .field("normalizer", &self.normalizer)
            .field("attributes", &self.attributes)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Configuration surface for [`IsolationForest`].
///
/// Holds the population and attribute set together with a [`ForestConfig`].
/// Nothing is validated until [`IsolationForestBuilder::build`].
pub struct IsolationForestBuilder<'a, T> {
    items: &'a [T],
    attributes: AttributeSet<T>,
    config: ForestConfig,
}

impl<'a, T> IsolationForestBuilder<'a, T> {
    pub fn new(items: &'a [T], attributes: AttributeSet<T>) -> Self {
        Self {
            items,
            attributes,
            config: ForestConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ForestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.config.n_trees = n_trees;
        self
    }

    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.config.sample_size = sample_size;
        self
    }

    pub fn height_limit(mut self, height_limit: usize) -> Self {
        self.config.height_limit = Some(height_limit);
        self
    }

    /// Shrink the subsample to the population instead of failing.
    pub fn clamp_to_population(mut self) -> Self {
        self.config.sample_policy = SamplePolicy::ClampToPopulation;
        self
    }

    pub fn round_to_power_of_two(mut self, enabled: bool) -> Self {
        self.config.round_to_power_of_two = enabled;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }
}

impl<'a, T: Sync> IsolationForestBuilder<'a, T> {
    /// Validate the configuration and grow every tree.
    ///
    /// Each tree gets its own generator seeded from the master generator, so
    /// a fixed seed yields the same forest whether trees are grown in
    /// parallel or not.
    pub fn build(self) -> Result<IsolationForest<T>> {
        if self.attributes.is_empty() {
            return Err(AnomalyError::invalid_configuration(
                "attributes",
                "must not be empty",
            ));
        }
        let population = self.items.len();
        let sample_size = self.config.resolve_sample_size(population)?;
        let height_limit = self.config.resolve_height_limit(sample_size);
        let n_trees = self.config.n_trees;

        tracing::debug!(
            n_trees,
            sample_size,
            height_limit,
            population,
            attributes = self.attributes.len(),
            parallel = self.config.parallel,
            "building isolation forest"
        );

        let mut master = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let seeds: Vec<u64> = (0..n_trees).map(|_| master.gen()).collect();

        let items = self.items;
        let attributes = &self.attributes;
        let grow = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let sample: Vec<&T> = sample_indices(&mut rng, population, sample_size)
                .into_iter()
                .map(|i| &items[i])
                .collect();
            let tree = SplitNode::grow(&sample, attributes, &mut rng);
            tracing::trace!(seed, depth = tree.depth(), leaves = tree.leaf_sizes().len(), "grew tree");
            tree
        };

        let trees: Vec<SplitNode> = if self.config.parallel {
            seeds.into_par_iter().map(grow).collect()
        } else {
            seeds.into_iter().map(grow).collect()
        };

        if tracing::enabled!(tracing::Level::DEBUG) {
            let mean_depth =
                trees.iter().map(|t| t.depth() as f64).sum::<f64>() / trees.len() as f64;
            tracing::debug!(mean_depth, "isolation forest built");
        }

        let c = c_factor(sample_size);
        Ok(IsolationForest {
            trees,
            attributes: self.attributes,
            sample_size,
            height_limit,
            normalizer: if c > 0.0 { c } else { 1.0 },
            parallel: self.config.parallel,
        })
    }
}

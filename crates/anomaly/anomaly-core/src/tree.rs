//! Isolation tree nodes: recursive random partitioning and path length.

use anomaly_spi::AttributeSet;
use rand::Rng;

use crate::correction::c_factor;

/// A node of an isolation tree.
///
/// Internal nodes route items with `attribute(item) < threshold` to the left
/// child and everything else to the right. External nodes remember how many
/// sampled items ended up in them.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitNode {
    Internal {
        /// Position of the split attribute in the forest's attribute set.
        attribute: usize,
        threshold: f64,
        left: Box<SplitNode>,
        right: Box<SplitNode>,
    },
    External {
        size: usize,
    },
}

/// Uniform threshold in `[min, max]` for finite `min < max`.
///
/// Spans wider than half of `f64::MAX` overflow the uniform sampler, so they
/// are interpolated from a unit draw instead.
fn draw_threshold<R: Rng + ?Sized>(min: f64, max: f64, rng: &mut R) -> f64 {
    let span = max - min;
    if span.is_finite() && span < f64::MAX / 2.0 {
        rng.gen_range(min..=max)
    } else {
        let u: f64 = rng.gen();
        (min * (1.0 - u) + max * u).clamp(min, max)
    }
}

impl SplitNode {
    /// Grow a tree by recursive random partitioning of `items`.
    ///
    /// Each node picks a random attribute and a threshold drawn uniformly
    /// between the attribute's minimum and maximum over the node's items. A
    /// node becomes external when that range is empty (constant or
    /// non-finite values) or when the threshold leaves one side empty.
    ///
    /// # Panics
    ///
    /// Panics if `attributes` is empty.
    pub fn grow<T, R>(items: &[&T], attributes: &AttributeSet<T>, rng: &mut R) -> SplitNode
    where
        T: ?Sized,
        R: Rng + ?Sized,
    {
        let attribute = rng.gen_range(0..attributes.len());
        let values: Vec<f64> = items
            .iter()
            .map(|item| attributes.evaluate(attribute, item))
            .collect();

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !(min < max && min.is_finite() && max.is_finite()) {
            return SplitNode::External { size: items.len() };
        }

        let threshold = draw_threshold(min, max, rng);
        let mut left = Vec::with_capacity(items.len());
        let mut right = Vec::with_capacity(items.len());
        for (&item, &value) in items.iter().zip(&values) {
            if value < threshold {
                left.push(item);
            } else {
                right.push(item);
            }
        }
        if left.is_empty() || right.is_empty() {
            return SplitNode::External { size: items.len() };
        }

        SplitNode::Internal {
            attribute,
            threshold,
            left: Box::new(SplitNode::grow(&left, attributes, rng)),
            right: Box::new(SplitNode::grow(&right, attributes, rng)),
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, SplitNode::External { .. })
    }

    /// Path length of `item`, explored at most `height_limit` edges deep.
    ///
    /// Reaching an external node at depth `e` yields `e + c(size)`. Stopping
    /// at an internal node because of the height limit yields `e`.
    pub fn path_length<T>(&self, item: &T, attributes: &AttributeSet<T>, height_limit: usize) -> f64
    where
        T: ?Sized,
    {
        let mut node = self;
        let mut depth = 0usize;
        loop {
            match node {
                SplitNode::External { size } => return depth as f64 + c_factor(*size),
                SplitNode::Internal { .. } if depth >= height_limit => return depth as f64,
                SplitNode::Internal {
                    attribute,
                    threshold,
                    left,
                    right,
                } => {
                    node = if attributes.evaluate(*attribute, item) < *threshold {
                        &**left
                    } else {
                        &**right
                    };
                    depth += 1;
                }
            }
        }
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            SplitNode::External { .. } => 0,
            SplitNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            SplitNode::External { .. } => 1,
            SplitNode::Internal { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Sizes of the external nodes, left to right.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        self.collect_leaf_sizes(&mut sizes);
        sizes
    }

    fn collect_leaf_sizes(&self, sizes: &mut Vec<usize>) {
        match self {
            SplitNode::External { size } => sizes.push(*size),
            SplitNode::Internal { left, right, .. } => {
                left.collect_leaf_sizes(sizes);
                right.collect_leaf_sizes(sizes);
            }
        }
    }

    /// Add the number of internal nodes splitting on each attribute to `counts`.
    pub(crate) fn count_splits(&self, counts: &mut [usize]) {
        if let SplitNode::Internal {
            attribute,
            left,
            right,
            ..
        } = self
        {
            counts[*attribute] += 1;
            left.count_splits(counts);
            right.count_splits(counts);
        }
    }
}

//! Gradient boosted tree ensemble inference.
//!
//! Trees are stored in a structure-of-arrays layout for cache-friendly
//! traversal: per-node parallel arrays of split feature, threshold,
//! children, missing-value direction, and leaf values. Child indices are
//! local to each tree (0 = root).
//!
//! Only numeric splits exist — categorical application fields are one-hot
//! encoded upstream, so the ensemble sees a purely numeric matrix. The
//! forest accumulates leaf values into a margin and squashes it through a
//! sigmoid for the binary eligibility probability.

use super::sigmoid;
use crate::error::ModelInferenceError;
use crate::features::TransformedFeatures;

/// Structural validation errors for ensemble trees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestValidationError {
    #[error("forest has no trees")]
    EmptyForest,

    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },

    #[error("tree {tree}: array `{array}` has {actual} entries, expected {expected}")]
    ArrayLenMismatch {
        tree: usize,
        array: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("tree {tree}: node {node} references out-of-bounds child {child}")]
    ChildOutOfBounds { tree: usize, node: u32, child: u32 },

    #[error("tree {tree}: node {node} references itself as a child")]
    SelfLoop { tree: usize, node: u32 },

    #[error("tree {tree}: cycle detected at node {node}")]
    CycleDetected { tree: usize, node: u32 },

    #[error("tree {tree}: node {node} is reachable by more than one path")]
    DuplicateVisit { tree: usize, node: u32 },

    #[error("tree {tree}: node {node} is unreachable from the root")]
    UnreachableNode { tree: usize, node: u32 },

    #[error("tree {tree}: split node {node} references feature {feature}, model has {n_features}")]
    SplitFeatureOutOfRange {
        tree: usize,
        node: u32,
        feature: u32,
        n_features: usize,
    },
}

/// One decision tree in structure-of-arrays layout.
#[derive(Debug, Clone)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f32]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f32]>,
}

impl Tree {
    /// Create a tree from parallel per-node arrays.
    ///
    /// All arrays must have the same length; call [`validate`](Self::validate)
    /// (directly or through [`Forest::new`]) before traversing untrusted
    /// input.
    pub fn new(
        split_indices: Vec<u32>,
        split_thresholds: Vec<f32>,
        left_children: Vec<u32>,
        right_children: Vec<u32>,
        default_left: Vec<bool>,
        is_leaf: Vec<bool>,
        leaf_values: Vec<f32>,
    ) -> Self {
        Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            default_left: default_left.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Traverse from the root to a leaf for one feature row.
    ///
    /// Missing values (NaN) follow the node's default direction; numeric
    /// splits send `value < threshold` left.
    #[inline]
    pub fn traverse_to_leaf(&self, features: &[f32]) -> u32 {
        let mut node = 0u32;

        while !self.is_leaf[node as usize] {
            let feat_idx = self.split_indices[node as usize] as usize;
            let fvalue = features[feat_idx];

            node = if fvalue.is_nan() {
                if self.default_left[node as usize] {
                    self.left_children[node as usize]
                } else {
                    self.right_children[node as usize]
                }
            } else if fvalue < self.split_thresholds[node as usize] {
                self.left_children[node as usize]
            } else {
                self.right_children[node as usize]
            };
        }

        node
    }

    /// Leaf value at a node.
    #[inline]
    pub fn leaf_value(&self, node: u32) -> f32 {
        self.leaf_values[node as usize]
    }

    /// Validate structural invariants against a feature width.
    ///
    /// Checks array lengths, child bounds, self-loops, cycles,
    /// reachability, and split feature indices. `tree` is the index used
    /// in error reports.
    pub fn validate(&self, tree: usize, n_features: usize) -> Result<(), ForestValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(ForestValidationError::EmptyTree { tree });
        }

        let arrays: [(&'static str, usize); 6] = [
            ("split_indices", self.split_indices.len()),
            ("split_thresholds", self.split_thresholds.len()),
            ("left_children", self.left_children.len()),
            ("right_children", self.right_children.len()),
            ("default_left", self.default_left.len()),
            ("leaf_values", self.leaf_values.len()),
        ];
        for (array, len) in arrays {
            if len != n_nodes {
                return Err(ForestValidationError::ArrayLenMismatch {
                    tree,
                    array,
                    expected: n_nodes,
                    actual: len,
                });
            }
        }

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(u32, u8)> = vec![(0, 0)];

        while let Some((node, phase)) = stack.pop() {
            let node_usize = node as usize;

            match phase {
                0 => {
                    match color[node_usize] {
                        0 => {}
                        1 => return Err(ForestValidationError::CycleDetected { tree, node }),
                        _ => return Err(ForestValidationError::DuplicateVisit { tree, node }),
                    }

                    color[node_usize] = 1;
                    stack.push((node, 1));

                    if !self.is_leaf[node_usize] {
                        let feature = self.split_indices[node_usize];
                        if feature as usize >= n_features {
                            return Err(ForestValidationError::SplitFeatureOutOfRange {
                                tree,
                                node,
                                feature,
                                n_features,
                            });
                        }

                        let left = self.left_children[node_usize];
                        let right = self.right_children[node_usize];

                        if left == node || right == node {
                            return Err(ForestValidationError::SelfLoop { tree, node });
                        }
                        for child in [left, right] {
                            if child as usize >= n_nodes {
                                return Err(ForestValidationError::ChildOutOfBounds {
                                    tree,
                                    node,
                                    child,
                                });
                            }
                        }

                        stack.push((right, 0));
                        stack.push((left, 0));
                    }
                }
                _ => {
                    color[node_usize] = 2;
                }
            }
        }

        for (i, &c) in color.iter().enumerate() {
            if c == 0 {
                return Err(ForestValidationError::UnreachableNode {
                    tree,
                    node: i as u32,
                });
            }
        }

        Ok(())
    }
}

/// Fitted gradient boosted ensemble for binary eligibility.
#[derive(Debug, Clone)]
pub struct Forest {
    trees: Vec<Tree>,
    base_score: f32,
    n_features: usize,
}

impl Forest {
    /// Build a forest, validating every tree against the feature width.
    pub fn new(
        trees: Vec<Tree>,
        base_score: f32,
        n_features: usize,
    ) -> Result<Self, ForestValidationError> {
        if trees.is_empty() {
            return Err(ForestValidationError::EmptyForest);
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(i, n_features)?;
        }
        Ok(Self {
            trees,
            base_score,
            n_features,
        })
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature width the ensemble was fitted on.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Base score added to the accumulated margin.
    #[inline]
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    /// Raw margin for one feature row: base score plus leaf values.
    pub fn margin(&self, features: &[f32]) -> f32 {
        let mut output = self.base_score;
        for tree in &self.trees {
            let leaf = tree.traverse_to_leaf(features);
            output += tree.leaf_value(leaf);
        }
        output
    }

    /// Ensemble probability for one transformed feature vector.
    ///
    /// The ensemble's native probability output — no further calibration
    /// is applied to it.
    pub fn probability(
        &self,
        features: &TransformedFeatures,
    ) -> Result<f32, ModelInferenceError> {
        if features.len() != self.n_features {
            return Err(ModelInferenceError::DimensionMismatch {
                model: "tree ensemble",
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let p = sigmoid(self.margin(features.as_slice()));
        if !p.is_finite() {
            return Err(ModelInferenceError::NonFiniteProbability {
                model: "tree ensemble",
            });
        }
        Ok(p)
    }
}

//! Per-forward-pass activation record.
//!
//! Every tensor the backward pass needs is held in a named field rather
//! than a positional tuple, one record per stage. The cache lives for one
//! forward/backward pair and is discarded once gradients exist.

use crate::layers::PoolIndices;
use crate::math::Tensor3;

/// One Conv → ReLU → MaxPool stage.
#[derive(Debug, Clone)]
pub struct ConvStage {
    /// Pre-activation feature map (conv output before ReLU).
    pub pre: Tensor3,
    /// Post-ReLU feature map (the pooling input).
    pub post: Tensor3,
    /// Pooled feature map.
    pub pooled: Tensor3,
    /// Argmax offsets recorded by the pooling layer.
    pub indices: PoolIndices,
}

/// The hidden dense layer's pre- and post-activation vectors.
#[derive(Debug, Clone)]
pub struct DenseStage {
    pub pre: Vec<f64>,
    pub post: Vec<f64>,
}

/// Everything the backward pass consumes from one forward pass.
#[derive(Debug, Clone)]
pub struct ActivationCache {
    pub stage1: ConvStage,
    pub stage2: ConvStage,
    pub stage3: ConvStage,
    /// Final pooled volume flattened in (H, W, C) order; the dense input.
    pub flat: Vec<f64>,
    pub hidden: DenseStage,
    /// Output-layer logits (pre-softmax).
    pub logits: Vec<f64>,
    /// Softmax probabilities.
    pub probs: Vec<f64>,
}

//! Forward propagation through the fixed layer stack.

use crate::activation::{relu, softmax};
use crate::layers::{conv2d_forward, dense_forward, max_pool_forward};
use crate::math::Tensor3;
use crate::network::cache::{ActivationCache, ConvStage, DenseStage};
use crate::network::params::ParameterSet;

/// Runs one image through the network.
///
/// Returns the 7-class probability vector together with the full
/// `ActivationCache` (pre/post activations and pooling argmaxes) required
/// by `backward`. `input` must be a preprocessed 48×48×3 tensor in [0, 1].
pub fn forward(params: &ParameterSet, input: &Tensor3) -> (Vec<f64>, ActivationCache) {
    let stage1 = conv_stage(input, params, 1);
    let stage2 = conv_stage(&stage1.pooled, params, 2);
    let stage3 = conv_stage(&stage2.pooled, params, 3);

    // Flat storage is already (H, W, C) row-major, the order the dense
    // weights were initialized against.
    let flat = stage3.pooled.data.clone();

    let hidden_pre = dense_forward(&flat, &params.w4, &params.b4);
    let hidden_post: Vec<f64> = hidden_pre.iter().map(|&z| relu(z)).collect();

    let logits = dense_forward(&hidden_post, &params.w5, &params.b5);
    let probs = softmax(&logits);

    let cache = ActivationCache {
        stage1,
        stage2,
        stage3,
        flat,
        hidden: DenseStage {
            pre: hidden_pre,
            post: hidden_post,
        },
        logits,
        probs: probs.clone(),
    };

    (probs, cache)
}

fn conv_stage(input: &Tensor3, params: &ParameterSet, stage: usize) -> ConvStage {
    let (weights, biases) = match stage {
        1 => (&params.w1, &params.b1),
        2 => (&params.w2, &params.b2),
        _ => (&params.w3, &params.b3),
    };

    let pre = conv2d_forward(input, weights, biases);
    let post = pre.map(relu);
    let (pooled, indices) = max_pool_forward(&post);

    ConvStage {
        pre,
        post,
        pooled,
        indices,
    }
}

//! Analytic backpropagation through the fixed layer stack.
//!
//! Reverse traversal of the forward pass: the combined softmax +
//! cross-entropy delta at the output, dense chain rule through the hidden
//! layer, then per stage an unpool scatter, a ReLU mask on the cached
//! pre-activation and the convolution gradient kernels. Every path here is
//! validated against finite differences in `tests/test_gradient_checking.rs`.

use crate::activation::relu_mask;
use crate::layers::{conv2d_backward, dense_backward, max_pool_backward};
use crate::loss::CrossEntropyLoss;
use crate::math::{Tensor3, Tensor4};
use crate::network::cache::{ActivationCache, ConvStage};
use crate::network::params::{GradientSet, ParameterSet};

/// Derives gradients for all ten parameter tensors.
///
/// `input` is the image the cache was produced from and `target` its one-hot
/// label. The returned `GradientSet` mirrors the parameter shapes exactly;
/// there are no side effects beyond its allocation.
pub fn backward(
    params: &ParameterSet,
    input: &Tensor3,
    cache: &ActivationCache,
    target: &[f64],
) -> GradientSet {
    let mut grads = GradientSet::zeros();

    // Output layer: combined softmax + cross-entropy delta.
    let delta5 = CrossEntropyLoss::derivative(&cache.probs, target);
    let (w5_grad, b5_grad, hidden_post_grad) =
        dense_backward(&cache.hidden.post, &delta5, &params.w5);
    grads.w5 = w5_grad;
    grads.b5 = b5_grad;

    // Hidden dense layer: mask by the cached pre-activation sign.
    let delta4: Vec<f64> = hidden_post_grad
        .iter()
        .zip(cache.hidden.pre.iter())
        .map(|(g, &z)| g * relu_mask(z))
        .collect();
    let (w4_grad, b4_grad, flat_grad) = dense_backward(&cache.flat, &delta4, &params.w4);
    grads.w4 = w4_grad;
    grads.b4 = b4_grad;

    // Reshape the flat gradient back onto the final pooled volume.
    let [ph, pw, pc] = cache.stage3.pooled.shape();
    let mut pooled_grad = Tensor3::from_vec(ph, pw, pc, flat_grad);

    // Conv stages in reverse; each returns the gradient w.r.t. its input,
    // which is the previous stage's pooled output.
    pooled_grad = conv_stage_backward(
        &cache.stage3,
        &cache.stage2.pooled,
        &params.w3,
        &pooled_grad,
        &mut grads.w3,
        &mut grads.b3,
    );
    pooled_grad = conv_stage_backward(
        &cache.stage2,
        &cache.stage1.pooled,
        &params.w2,
        &pooled_grad,
        &mut grads.w2,
        &mut grads.b2,
    );
    conv_stage_backward(
        &cache.stage1,
        input,
        &params.w1,
        &pooled_grad,
        &mut grads.w1,
        &mut grads.b1,
    );

    grads
}

/// Backward through one Conv → ReLU → MaxPool stage.
///
/// `pooled_grad` is ∂L/∂(stage output). Unpooling routes it to the argmax
/// positions, the ReLU mask zeroes entries whose pre-activation was not
/// positive, and the convolution kernels produce the weight/bias gradients
/// plus the gradient flowing to `stage_input`.
fn conv_stage_backward(
    stage: &ConvStage,
    stage_input: &Tensor3,
    weights: &Tensor4,
    pooled_grad: &Tensor3,
    weight_grad: &mut Tensor4,
    bias_grad: &mut Vec<f64>,
) -> Tensor3 {
    let post_grad = max_pool_backward(pooled_grad, &stage.indices, stage.post.h, stage.post.w);

    let mut pre_grad = post_grad;
    for (g, &z) in pre_grad.data.iter_mut().zip(stage.pre.data.iter()) {
        *g *= relu_mask(z);
    }

    let (w_grad, b_grad, input_grad) = conv2d_backward(stage_input, weights, &pre_grad);
    *weight_grad = w_grad;
    *bias_grad = b_grad;

    input_grad
}

//! Activation functions for the fixed Conv/ReLU/Softmax stack.
//!
//! The engine's topology never changes, so activations are plain functions
//! rather than a dispatching enum: ReLU after every convolution and the
//! hidden dense layer, softmax on the output logits.

/// Element-wise max(0, x).
pub fn relu(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

/// Derivative of ReLU as a 0/1 mask on the pre-activation.
pub fn relu_mask(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Full-vector softmax over the output logits.
///
/// Uses the max-subtraction form: subtracting the largest logit before
/// exponentiating leaves the result unchanged mathematically but keeps
/// `exp` in range for arbitrarily large logits.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

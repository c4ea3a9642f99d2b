//! Fully-connected layer, forward and backward, as pure functions.
//!
//! Inputs and deltas are row vectors; weights are (fan_in × fan_out), so the
//! forward product is `x · W + b`.

use crate::math::Matrix;

/// Linear transform `z = x · W + b` (pre-activation).
pub fn dense_forward(input: &[f64], weights: &Matrix, biases: &[f64]) -> Vec<f64> {
    assert_eq!(input.len(), weights.rows, "input length must match fan-in");
    assert_eq!(biases.len(), weights.cols, "one bias per output unit");

    let z = Matrix::from_data(vec![input.to_vec()]) * weights.clone();
    z.data[0]
        .iter()
        .zip(biases.iter())
        .map(|(zi, bi)| zi + bi)
        .collect()
}

/// Gradients of the linear transform given `delta` = ∂L/∂z.
///
/// - weight grad: outer product of the layer input and the delta
/// - bias grad: the delta itself
/// - input grad: delta propagated through the transposed weights
///
/// Returns `(weight_grad, bias_grad, input_grad)`.
pub fn dense_backward(
    input: &[f64],
    delta: &[f64],
    weights: &Matrix,
) -> (Matrix, Vec<f64>, Vec<f64>) {
    let delta_row = Matrix::from_data(vec![delta.to_vec()]);

    let weight_grad = Matrix::from_data(vec![input.to_vec()]).transpose() * delta_row.clone();
    let bias_grad = delta.to_vec();
    let mut back = delta_row * weights.transpose();
    let input_grad = back.data.remove(0);

    (weight_grad, bias_grad, input_grad)
}

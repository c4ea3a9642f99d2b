//! Valid 2-D convolution, forward and backward, as pure functions.
//!
//! Kernels are (kh, kw, cin, cout); feature maps are (H, W, C). Stride is 1
//! and there is no padding, so a k×k kernel shrinks each spatial dimension
//! by k − 1.

use crate::math::{Tensor3, Tensor4};

/// Forward convolution.
///
/// `out(i, j, o) = b[o] + Σ_{u,v,c} in(i+u, j+v, c) · w(u, v, c, o)`
///
/// Output spatial size is `(h − kh + 1) × (w − kw + 1)`.
pub fn conv2d_forward(input: &Tensor3, weights: &Tensor4, biases: &[f64]) -> Tensor3 {
    assert_eq!(input.c, weights.cin, "input channels must match kernel cin");
    assert_eq!(biases.len(), weights.cout, "one bias per output channel");

    let oh = input.h - weights.kh + 1;
    let ow = input.w - weights.kw + 1;
    let mut output = Tensor3::zeros(oh, ow, weights.cout);

    for i in 0..oh {
        for j in 0..ow {
            for o in 0..weights.cout {
                let mut sum = biases[o];
                for u in 0..weights.kh {
                    for v in 0..weights.kw {
                        for c in 0..weights.cin {
                            sum += input.at(i + u, j + v, c) * weights.at(u, v, c, o);
                        }
                    }
                }
                *output.at_mut(i, j, o) = sum;
            }
        }
    }

    output
}

/// Gradients of a valid convolution with respect to weights, biases and the
/// layer input. `delta` is ∂L/∂out with the forward output's shape.
///
/// - weight grad: cross-correlation of the input with the delta map,
///   `dW(u, v, c, o) = Σ_{i,j} in(i+u, j+v, c) · δ(i, j, o)`
/// - bias grad: spatial sum of the delta per output channel
/// - input grad: correlation of the delta with the flipped kernel,
///   `dX(x, y, c) = Σ_{o,u,v} δ(x−u, y−v, o) · w(u, v, c, o)`
///   where only in-range (x−u, y−v) positions contribute
///
/// Returns `(weight_grad, bias_grad, input_grad)`.
pub fn conv2d_backward(
    input: &Tensor3,
    weights: &Tensor4,
    delta: &Tensor3,
) -> (Tensor4, Vec<f64>, Tensor3) {
    let oh = delta.h;
    let ow = delta.w;
    assert_eq!(oh, input.h - weights.kh + 1, "delta height mismatch");
    assert_eq!(ow, input.w - weights.kw + 1, "delta width mismatch");
    assert_eq!(delta.c, weights.cout, "delta channels must match kernel cout");

    let mut weight_grad = Tensor4::zeros(weights.kh, weights.kw, weights.cin, weights.cout);
    let mut bias_grad = vec![0.0; weights.cout];
    let mut input_grad = Tensor3::zeros(input.h, input.w, input.c);

    for i in 0..oh {
        for j in 0..ow {
            for o in 0..weights.cout {
                let d = delta.at(i, j, o);
                if d == 0.0 {
                    continue;
                }
                bias_grad[o] += d;
                for u in 0..weights.kh {
                    for v in 0..weights.kw {
                        for c in 0..weights.cin {
                            *weight_grad.at_mut(u, v, c, o) += input.at(i + u, j + v, c) * d;
                            *input_grad.at_mut(i + u, j + v, c) += weights.at(u, v, c, o) * d;
                        }
                    }
                }
            }
        }
    }

    (weight_grad, bias_grad, input_grad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_output_shape_shrinks_by_kernel_minus_one() {
        let input = Tensor3::zeros(48, 48, 3);
        let weights = Tensor4::zeros(3, 3, 3, 16);
        let biases = vec![0.0; 16];
        let out = conv2d_forward(&input, &weights, &biases);
        assert_eq!(out.shape(), [46, 46, 16]);
    }

    #[test]
    fn forward_matches_hand_computed_receptive_field() {
        // 3x3 single-channel input, 2x2 kernel of ones, bias 0.5:
        // each output cell is the sum of its 2x2 window plus the bias.
        let input = Tensor3::from_vec(
            3,
            3,
            1,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        );
        let weights = Tensor4::from_vec(2, 2, 1, 1, vec![1.0; 4]);
        let out = conv2d_forward(&input, &weights, &[0.5]);
        assert_eq!(out.shape(), [2, 2, 1]);
        assert_eq!(out.at(0, 0, 0), 1.0 + 2.0 + 4.0 + 5.0 + 0.5);
        assert_eq!(out.at(1, 1, 0), 5.0 + 6.0 + 8.0 + 9.0 + 0.5);
    }
}

//! Plain stochastic gradient descent.

use crate::error::CnnError;
use crate::network::params::{GradientSet, ParameterSet};

/// Fixed-step SGD: `parameter ← parameter − learning_rate × gradient`.
/// No momentum, weight decay or adaptive scaling.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to every parameter tensor.
    ///
    /// Every parameter/gradient pair is shape-checked first; a disagreement
    /// (e.g. gradients produced against a different checkpoint) fails fast
    /// with `ShapeMismatch` before any tensor has been touched.
    pub fn step(&self, params: &mut ParameterSet, grads: &GradientSet) -> Result<(), CnnError> {
        check4("W1", &params.w1.shape(), &grads.w1.shape())?;
        check4("W2", &params.w2.shape(), &grads.w2.shape())?;
        check4("W3", &params.w3.shape(), &grads.w3.shape())?;
        check2("W4", &params.w4.shape(), &grads.w4.shape())?;
        check2("W5", &params.w5.shape(), &grads.w5.shape())?;
        check1("b1", params.b1.len(), grads.b1.len())?;
        check1("b2", params.b2.len(), grads.b2.len())?;
        check1("b3", params.b3.len(), grads.b3.len())?;
        check1("b4", params.b4.len(), grads.b4.len())?;
        check1("b5", params.b5.len(), grads.b5.len())?;

        let lr = self.learning_rate;
        params.w1 = params.w1.clone() - grads.w1.map(|g| g * lr);
        params.w2 = params.w2.clone() - grads.w2.map(|g| g * lr);
        params.w3 = params.w3.clone() - grads.w3.map(|g| g * lr);
        params.w4 = params.w4.clone() - grads.w4.map(|g| g * lr);
        params.w5 = params.w5.clone() - grads.w5.map(|g| g * lr);
        step_vec(&mut params.b1, &grads.b1, lr);
        step_vec(&mut params.b2, &grads.b2, lr);
        step_vec(&mut params.b3, &grads.b3, lr);
        step_vec(&mut params.b4, &grads.b4, lr);
        step_vec(&mut params.b5, &grads.b5, lr);

        Ok(())
    }
}

fn step_vec(params: &mut [f64], grads: &[f64], lr: f64) {
    for (p, g) in params.iter_mut().zip(grads.iter()) {
        *p -= lr * g;
    }
}

fn check4(name: &'static str, expected: &[usize; 4], actual: &[usize; 4]) -> Result<(), CnnError> {
    if expected != actual {
        return Err(CnnError::ShapeMismatch {
            name,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

fn check2(name: &'static str, expected: &[usize; 2], actual: &[usize; 2]) -> Result<(), CnnError> {
    if expected != actual {
        return Err(CnnError::ShapeMismatch {
            name,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

fn check1(name: &'static str, expected: usize, actual: usize) -> Result<(), CnnError> {
    if expected != actual {
        return Err(CnnError::ShapeMismatch {
            name,
            expected: vec![expected],
            actual: vec![actual],
        });
    }
    Ok(())
}

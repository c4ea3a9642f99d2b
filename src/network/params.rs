//! The ten trainable tensors of the fixed emotion-recognition topology.
//!
//! ```text
//! input  48×48×3
//! conv1  3×3×3×16   -> 46×46×16, relu, pool -> 23×23×16
//! conv2  3×3×16×32  -> 21×21×32, relu, pool -> 10×10×32
//! conv3  3×3×32×64  ->  8×8×64,  relu, pool ->  4×4×64
//! flatten (H,W,C)   -> 1024
//! dense4 1024×128, relu
//! dense5  128×7,   softmax
//! ```
//!
//! Shapes are fixed at construction and never change afterwards.

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::{Matrix, Tensor4};

/// Number of emotion classes the output layer distinguishes.
pub const NUM_CLASSES: usize = 7;

/// Input images are resized to this square extent before entering the stack.
pub const INPUT_SIZE: usize = 48;

/// Input channel count (RGB).
pub const INPUT_CHANNELS: usize = 3;

/// Flattened length of the final pooled volume (4 · 4 · 64).
pub const FLAT_SIZE: usize = 4 * 4 * 64;

/// Hidden dense layer width.
pub const HIDDEN_SIZE: usize = 128;

/// The complete set of trainable parameters.
///
/// Owned exclusively by the training or inference session that created or
/// loaded it; training mutates its own copy, inference shares an immutable
/// one behind `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    pub w1: Tensor4,
    pub b1: Vec<f64>,
    pub w2: Tensor4,
    pub b2: Vec<f64>,
    pub w3: Tensor4,
    pub b3: Vec<f64>,
    pub w4: Matrix,
    pub b4: Vec<f64>,
    pub w5: Matrix,
    pub b5: Vec<f64>,
}

impl ParameterSet {
    /// Fresh parameters: He initialization for the ReLU-feeding weights,
    /// Xavier for the softmax layer, zero biases.
    pub fn init<R: Rng>(rng: &mut R) -> ParameterSet {
        ParameterSet {
            w1: Tensor4::he(3, 3, INPUT_CHANNELS, 16, rng),
            b1: vec![0.0; 16],
            w2: Tensor4::he(3, 3, 16, 32, rng),
            b2: vec![0.0; 32],
            w3: Tensor4::he(3, 3, 32, 64, rng),
            b3: vec![0.0; 64],
            w4: Matrix::he(FLAT_SIZE, HIDDEN_SIZE, rng),
            b4: vec![0.0; HIDDEN_SIZE],
            w5: Matrix::xavier(HIDDEN_SIZE, NUM_CLASSES, rng),
            b5: vec![0.0; NUM_CLASSES],
        }
    }
}

/// Gradients for every tensor in a `ParameterSet`, same shapes throughout.
/// Produced fresh by each backward pass and consumed by the optimizer.
#[derive(Debug, Clone)]
pub struct GradientSet {
    pub w1: Tensor4,
    pub b1: Vec<f64>,
    pub w2: Tensor4,
    pub b2: Vec<f64>,
    pub w3: Tensor4,
    pub b3: Vec<f64>,
    pub w4: Matrix,
    pub b4: Vec<f64>,
    pub w5: Matrix,
    pub b5: Vec<f64>,
}

impl GradientSet {
    /// Zero gradients, used as the accumulator seed for a mini-batch.
    pub fn zeros() -> GradientSet {
        GradientSet {
            w1: Tensor4::zeros(3, 3, INPUT_CHANNELS, 16),
            b1: vec![0.0; 16],
            w2: Tensor4::zeros(3, 3, 16, 32),
            b2: vec![0.0; 32],
            w3: Tensor4::zeros(3, 3, 32, 64),
            b3: vec![0.0; 64],
            w4: Matrix::zeros(FLAT_SIZE, HIDDEN_SIZE),
            b4: vec![0.0; HIDDEN_SIZE],
            w5: Matrix::zeros(HIDDEN_SIZE, NUM_CLASSES),
            b5: vec![0.0; NUM_CLASSES],
        }
    }

    /// Element-wise accumulation of another gradient set into this one.
    pub fn accumulate(&mut self, other: &GradientSet) {
        self.w1 = self.w1.clone() + other.w1.clone();
        self.w2 = self.w2.clone() + other.w2.clone();
        self.w3 = self.w3.clone() + other.w3.clone();
        self.w4 = self.w4.clone() + other.w4.clone();
        self.w5 = self.w5.clone() + other.w5.clone();
        add_assign(&mut self.b1, &other.b1);
        add_assign(&mut self.b2, &other.b2);
        add_assign(&mut self.b3, &other.b3);
        add_assign(&mut self.b4, &other.b4);
        add_assign(&mut self.b5, &other.b5);
    }

    /// Scales every gradient entry, e.g. by 1/batch_size after accumulation.
    pub fn scale(&mut self, factor: f64) {
        self.w1 = self.w1.map(|x| x * factor);
        self.w2 = self.w2.map(|x| x * factor);
        self.w3 = self.w3.map(|x| x * factor);
        self.w4 = self.w4.map(|x| x * factor);
        self.w5 = self.w5.map(|x| x * factor);
        for b in [&mut self.b1, &mut self.b2, &mut self.b3, &mut self.b4, &mut self.b5] {
            for value in b.iter_mut() {
                *value *= factor;
            }
        }
    }
}

fn add_assign(dst: &mut [f64], src: &[f64]) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d += s;
    }
}

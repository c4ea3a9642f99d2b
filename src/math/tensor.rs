use rand::Rng;
use serde::{Serialize, Deserialize};
use std::ops::{Add, Sub};

use crate::math::matrix::Matrix;

/// Rank-3 tensor in (height, width, channels) layout, flat row-major storage.
///
/// Index order is `data[(i * w + j) * c + k]`, so flattening a Tensor3 by
/// taking `data` as-is preserves the (H, W, C) ordering the dense layers
/// were initialized against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor3 {
    pub h: usize,
    pub w: usize,
    pub c: usize,
    pub data: Vec<f64>,
}

impl Tensor3 {
    pub fn zeros(h: usize, w: usize, c: usize) -> Tensor3 {
        Tensor3 {
            h,
            w,
            c,
            data: vec![0.0; h * w * c],
        }
    }

    /// Wraps an existing flat buffer. The buffer length must equal `h*w*c`.
    pub fn from_vec(h: usize, w: usize, c: usize, data: Vec<f64>) -> Tensor3 {
        assert_eq!(data.len(), h * w * c, "Tensor3 buffer length mismatch");
        Tensor3 { h, w, c, data }
    }

    #[inline]
    fn idx(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.w + j) * self.c + k
    }

    #[inline]
    pub fn at(&self, i: usize, j: usize, k: usize) -> f64 {
        self.data[self.idx(i, j, k)]
    }

    #[inline]
    pub fn at_mut(&mut self, i: usize, j: usize, k: usize) -> &mut f64 {
        let idx = self.idx(i, j, k);
        &mut self.data[idx]
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.h, self.w, self.c]
    }

    pub fn map<F>(&self, functor: F) -> Tensor3
    where
        F: Fn(f64) -> f64,
    {
        Tensor3 {
            h: self.h,
            w: self.w,
            c: self.c,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }
}

/// Rank-4 convolution kernel tensor in (kh, kw, in-channels, out-channels)
/// layout, flat row-major storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor4 {
    pub kh: usize,
    pub kw: usize,
    pub cin: usize,
    pub cout: usize,
    pub data: Vec<f64>,
}

impl Tensor4 {
    pub fn zeros(kh: usize, kw: usize, cin: usize, cout: usize) -> Tensor4 {
        Tensor4 {
            kh,
            kw,
            cin,
            cout,
            data: vec![0.0; kh * kw * cin * cout],
        }
    }

    pub fn from_vec(kh: usize, kw: usize, cin: usize, cout: usize, data: Vec<f64>) -> Tensor4 {
        assert_eq!(
            data.len(),
            kh * kw * cin * cout,
            "Tensor4 buffer length mismatch"
        );
        Tensor4 {
            kh,
            kw,
            cin,
            cout,
            data,
        }
    }

    /// He initialization over the kernel's fan-in (kh * kw * cin).
    pub fn he<R: Rng>(kh: usize, kw: usize, cin: usize, cout: usize, rng: &mut R) -> Tensor4 {
        let std_dev = (2.0 / (kh * kw * cin) as f64).sqrt();
        let mut res = Tensor4::zeros(kh, kw, cin, cout);
        for value in res.data.iter_mut() {
            *value = Matrix::sample_standard_normal(rng) * std_dev;
        }
        res
    }

    #[inline]
    fn idx(&self, u: usize, v: usize, c: usize, o: usize) -> usize {
        ((u * self.kw + v) * self.cin + c) * self.cout + o
    }

    #[inline]
    pub fn at(&self, u: usize, v: usize, c: usize, o: usize) -> f64 {
        self.data[self.idx(u, v, c, o)]
    }

    #[inline]
    pub fn at_mut(&mut self, u: usize, v: usize, c: usize, o: usize) -> &mut f64 {
        let idx = self.idx(u, v, c, o);
        &mut self.data[idx]
    }

    pub fn shape(&self) -> [usize; 4] {
        [self.kh, self.kw, self.cin, self.cout]
    }

    pub fn map<F>(&self, functor: F) -> Tensor4
    where
        F: Fn(f64) -> f64,
    {
        Tensor4 {
            kh: self.kh,
            kw: self.kw,
            cin: self.cin,
            cout: self.cout,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }
}

impl Add for Tensor4 {
    type Output = Tensor4;

    fn add(self, rhs: Self) -> Self::Output {
        if self.shape() != rhs.shape() {
            panic!("Tensors are of incorrect sizes")
        }
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(a, b)| a + b)
            .collect();
        Tensor4 { data, ..self }
    }
}

impl Sub for Tensor4 {
    type Output = Tensor4;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.shape() != rhs.shape() {
            panic!("Tensors are of incorrect sizes")
        }
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(a, b)| a - b)
            .collect();
        Tensor4 { data, ..self }
    }
}

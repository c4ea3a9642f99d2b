//! 2×2 stride-2 max-pooling with argmax bookkeeping.
//!
//! The forward pass records, for every pooled cell and channel, the
//! (row, col) offset inside its window that held the maximum. The backward
//! pass scatters each pooled gradient back to exactly that location; every
//! other position in the window receives zero gradient.

use crate::math::Tensor3;

pub const POOL: usize = 2;

/// Per-cell argmax offsets recorded by `max_pool_forward`.
///
/// `at(i, j, ch)` is the (row, col) offset within the 2×2 window of pooled
/// cell (i, j) on channel `ch`. Ties resolve to the first occurrence in
/// row-major scan order.
#[derive(Debug, Clone)]
pub struct PoolIndices {
    pub h: usize,
    pub w: usize,
    pub c: usize,
    offsets: Vec<(usize, usize)>,
}

impl PoolIndices {
    fn zeros(h: usize, w: usize, c: usize) -> PoolIndices {
        PoolIndices {
            h,
            w,
            c,
            offsets: vec![(0, 0); h * w * c],
        }
    }

    #[inline]
    fn idx(&self, i: usize, j: usize, ch: usize) -> usize {
        (i * self.w + j) * self.c + ch
    }

    #[inline]
    pub fn at(&self, i: usize, j: usize, ch: usize) -> (usize, usize) {
        self.offsets[self.idx(i, j, ch)]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, ch: usize, offset: (usize, usize)) {
        let idx = self.idx(i, j, ch);
        self.offsets[idx] = offset;
    }
}

/// Non-overlapping 2×2 max-pool. Odd trailing rows/columns are dropped
/// (floor division), matching the valid-convolution arithmetic of the stack.
pub fn max_pool_forward(input: &Tensor3) -> (Tensor3, PoolIndices) {
    let oh = input.h / POOL;
    let ow = input.w / POOL;
    let mut output = Tensor3::zeros(oh, ow, input.c);
    let mut indices = PoolIndices::zeros(oh, ow, input.c);

    for i in 0..oh {
        for j in 0..ow {
            for ch in 0..input.c {
                let mut best = f64::NEG_INFINITY;
                let mut best_offset = (0, 0);
                for r in 0..POOL {
                    for s in 0..POOL {
                        let value = input.at(i * POOL + r, j * POOL + s, ch);
                        // Strict comparison keeps the first occurrence on ties.
                        if value > best {
                            best = value;
                            best_offset = (r, s);
                        }
                    }
                }
                *output.at_mut(i, j, ch) = best;
                indices.set(i, j, ch, best_offset);
            }
        }
    }

    (output, indices)
}

/// Scatters pooled gradients back to the recorded argmax positions.
///
/// `input_h`/`input_w` are the pre-pool spatial dimensions; positions in a
/// dropped trailing row/column (odd extents) get zero gradient.
pub fn max_pool_backward(
    delta: &Tensor3,
    indices: &PoolIndices,
    input_h: usize,
    input_w: usize,
) -> Tensor3 {
    let mut input_grad = Tensor3::zeros(input_h, input_w, delta.c);

    for i in 0..delta.h {
        for j in 0..delta.w {
            for ch in 0..delta.c {
                let (r, s) = indices.at(i, j, ch);
                *input_grad.at_mut(i * POOL + r, j * POOL + s, ch) += delta.at(i, j, ch);
            }
        }
    }

    input_grad
}

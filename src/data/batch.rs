//! Mini-batch construction.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::math::Tensor3;
use crate::network::params::NUM_CLASSES;

/// One mini-batch: N images paired with N one-hot targets.
#[derive(Debug, Clone)]
pub struct Batch {
    pub images: Vec<Tensor3>,
    pub targets: Vec<Vec<f64>>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// One-hot target vector: 1.0 at `label`, 0.0 elsewhere.
pub fn one_hot(label: usize, num_classes: usize) -> Vec<f64> {
    let mut target = vec![0.0; num_classes];
    target[label] = 1.0;
    target
}

/// Partitions the dataset into shuffled mini-batches.
///
/// A pseudo-random permutation of indices is drawn first (seeded via
/// `StdRng` when `seed` is given, from the thread RNG otherwise), then
/// sliced into `floor(N / batch_size)` full batches plus one trailing batch
/// of `N mod batch_size` items when the division is not exact. Images and
/// labels stay paired through the permutation.
///
/// # Panics
/// Panics if `batch_size == 0` or the slices differ in length.
pub fn create_batches(
    images: &[Tensor3],
    labels: &[usize],
    batch_size: usize,
    seed: Option<u64>,
) -> Vec<Batch> {
    assert!(batch_size > 0, "batch_size must be at least 1");
    assert_eq!(
        images.len(),
        labels.len(),
        "images and labels must have equal length"
    );

    let mut indices: Vec<usize> = (0..images.len()).collect();
    match seed {
        Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => indices.shuffle(&mut rand::thread_rng()),
    }

    indices
        .chunks(batch_size)
        .map(|chunk| Batch {
            images: chunk.iter().map(|&i| images[i].clone()).collect(),
            targets: chunk
                .iter()
                .map(|&i| one_hot(labels[i], NUM_CLASSES))
                .collect(),
        })
        .collect()
}

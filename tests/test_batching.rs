// Batch partitioning: sizes, pairing and exact coverage.

use ferrite_cnn::math::Tensor3;
use ferrite_cnn::{create_batches, one_hot};

// One-pixel images whose value encodes their dataset index, so identity
// survives the shuffle.
fn indexed_dataset(n: usize) -> (Vec<Tensor3>, Vec<usize>) {
    let images = (0..n)
        .map(|i| Tensor3::from_vec(1, 1, 1, vec![i as f64]))
        .collect();
    let labels = (0..n).map(|i| i % 7).collect();
    (images, labels)
}

fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .map(|(i, _)| i)
        .unwrap()
}

#[test]
fn hundred_items_in_batches_of_thirty() {
    let (images, labels) = indexed_dataset(100);
    let batches = create_batches(&images, &labels, 30, Some(12345));

    let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![30, 30, 30, 10]);

    // Every original pair appears exactly once, still correctly paired.
    let mut seen = vec![false; 100];
    for batch in &batches {
        assert_eq!(batch.images.len(), batch.targets.len());
        for (image, target) in batch.images.iter().zip(batch.targets.iter()) {
            let index = image.data[0] as usize;
            assert!(!seen[index], "item {} appeared twice", index);
            seen[index] = true;
            assert_eq!(argmax(target), index % 7, "label detached from item {}", index);
        }
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn exact_division_has_no_trailing_batch() {
    let (images, labels) = indexed_dataset(90);
    let batches = create_batches(&images, &labels, 30, None);
    let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![30, 30, 30]);
}

#[test]
fn same_seed_reproduces_the_same_order() {
    let (images, labels) = indexed_dataset(50);
    let a = create_batches(&images, &labels, 16, Some(7));
    let b = create_batches(&images, &labels, 16, Some(7));

    let order = |batches: &[ferrite_cnn::Batch]| -> Vec<f64> {
        batches
            .iter()
            .flat_map(|batch| batch.images.iter().map(|img| img.data[0]))
            .collect()
    };
    assert_eq!(order(&a), order(&b));
}

#[test]
fn one_hot_places_a_single_one() {
    let target = one_hot(3, 7);
    assert_eq!(target, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
}

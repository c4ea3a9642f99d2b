// Forward-pass invariants: softmax normalization (including logits large
// enough to overflow a naive exponentiation), max-pool argmax bookkeeping,
// layer output shapes and an end-to-end sanity pass.

use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_cnn::activation::softmax;
use ferrite_cnn::layers::max_pool_forward;
use ferrite_cnn::math::Tensor3;
use ferrite_cnn::network::{forward, ParameterSet};

#[test]
fn softmax_sums_to_one() {
    let probs = softmax(&[0.1, -2.0, 3.5, 0.0, 1.2, -0.7, 2.2]);
    let sum: f64 = probs.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(probs.iter().all(|&p| p > 0.0 && p < 1.0));
}

#[test]
fn softmax_survives_large_magnitude_logits() {
    // A naive exp() overflows to infinity near z = 710; the max-subtracted
    // form must stay finite and normalized.
    let probs = softmax(&[1000.0, -1000.0, 500.0, 0.0, 999.0, -500.0, 250.0]);
    let sum: f64 = probs.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(probs.iter().all(|p| p.is_finite()));
    // The largest logit dominates.
    assert!(probs[0] > 0.7);
}

#[test]
fn max_pool_finds_each_quadrant_maximum() {
    // 4x4 single-channel input with a known maximum in each 2x2 quadrant,
    // placed at a different window offset each time.
    #[rustfmt::skip]
    let values = vec![
        9.0, 1.0,   2.0, 8.0,
        0.0, 3.0,   1.0, 2.0,

        1.0, 0.0,   2.0, 1.0,
        7.0, 2.0,   3.0, 6.0,
    ];
    let input = Tensor3::from_vec(4, 4, 1, values);
    let (pooled, indices) = max_pool_forward(&input);

    assert_eq!(pooled.shape(), [2, 2, 1]);
    assert_eq!(pooled.at(0, 0, 0), 9.0);
    assert_eq!(pooled.at(0, 1, 0), 8.0);
    assert_eq!(pooled.at(1, 0, 0), 7.0);
    assert_eq!(pooled.at(1, 1, 0), 6.0);

    assert_eq!(indices.at(0, 0, 0), (0, 0));
    assert_eq!(indices.at(0, 1, 0), (0, 1));
    assert_eq!(indices.at(1, 0, 0), (1, 0));
    assert_eq!(indices.at(1, 1, 0), (1, 1));
}

#[test]
fn max_pool_ties_resolve_to_first_in_row_major_order() {
    // All four window entries equal: the recorded argmax must be (0, 0).
    let input = Tensor3::from_vec(2, 2, 1, vec![5.0; 4]);
    let (pooled, indices) = max_pool_forward(&input);
    assert_eq!(pooled.at(0, 0, 0), 5.0);
    assert_eq!(indices.at(0, 0, 0), (0, 0));

    // Tie between (0, 1) and (1, 0): row-major scan hits (0, 1) first.
    let input = Tensor3::from_vec(2, 2, 1, vec![1.0, 5.0, 5.0, 0.0]);
    let (_, indices) = max_pool_forward(&input);
    assert_eq!(indices.at(0, 0, 0), (0, 1));
}

#[test]
fn forward_cache_has_the_documented_stage_shapes() {
    let mut rng = StdRng::seed_from_u64(1);
    let params = ParameterSet::init(&mut rng);
    let input = Tensor3::zeros(48, 48, 3);

    let (probs, cache) = forward(&params, &input);

    assert_eq!(cache.stage1.pre.shape(), [46, 46, 16]);
    assert_eq!(cache.stage1.pooled.shape(), [23, 23, 16]);
    assert_eq!(cache.stage2.pre.shape(), [21, 21, 32]);
    assert_eq!(cache.stage2.pooled.shape(), [10, 10, 32]);
    assert_eq!(cache.stage3.pre.shape(), [8, 8, 64]);
    assert_eq!(cache.stage3.pooled.shape(), [4, 4, 64]);
    assert_eq!(cache.flat.len(), 1024);
    assert_eq!(cache.hidden.pre.len(), 128);
    assert_eq!(cache.logits.len(), 7);
    assert_eq!(probs.len(), 7);
}

#[test]
fn all_zero_image_yields_a_clean_distribution() {
    let mut rng = StdRng::seed_from_u64(99);
    let params = ParameterSet::init(&mut rng);
    let input = Tensor3::zeros(48, 48, 3);

    let (probs, _) = forward(&params, &input);

    assert_eq!(probs.len(), 7);
    let sum: f64 = probs.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(probs.iter().all(|p| p.is_finite()));
}

// SGD update semantics and the fail-fast shape check.

use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_cnn::math::Matrix;
use ferrite_cnn::network::{GradientSet, ParameterSet};
use ferrite_cnn::{CnnError, Sgd};

#[test]
fn step_moves_parameters_against_the_gradient() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut params = ParameterSet::init(&mut rng);
    let before = params.w5.data[0][0];

    let mut grads = GradientSet::zeros();
    grads.w5.data[0][0] = 2.0;

    let optimizer = Sgd::new(0.1);
    optimizer.step(&mut params, &grads).unwrap();

    assert!((params.w5.data[0][0] - (before - 0.2)).abs() < 1e-12);
    // Untouched entries stay put under zero gradient.
    assert_eq!(params.b4, vec![0.0; 128]);
}

#[test]
fn mismatched_gradient_shapes_fail_fast() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut params = ParameterSet::init(&mut rng);
    let before = params.clone();

    let mut grads = GradientSet::zeros();
    grads.w5 = Matrix::zeros(10, 7);

    let optimizer = Sgd::new(0.1);
    match optimizer.step(&mut params, &grads) {
        Err(CnnError::ShapeMismatch { name, .. }) => assert_eq!(name, "W5"),
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }

    // Fail-fast: no tensor was updated.
    assert_eq!(params.w1.data, before.w1.data);
    assert_eq!(params.w4.data, before.w4.data);
}

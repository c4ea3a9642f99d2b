//! Epoch loop over an image-folder dataset.

use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::checkpoint;
use crate::data::batch::{create_batches, one_hot, Batch};
use crate::data::dataset::load_image_folder;
use crate::error::CnnError;
use crate::loss::CrossEntropyLoss;
use crate::math::Tensor3;
use crate::network::backward::backward;
use crate::network::forward::forward;
use crate::network::params::{GradientSet, ParameterSet, NUM_CLASSES};
use crate::optim::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains a fresh `ParameterSet` on the image-folder dataset at
/// `dataset_path` and returns it.
///
/// The dataset layout is one subdirectory per class (label index = lexical
/// order of subdirectory names). A `val_ratio` fraction is held out for
/// validation; when `config.checkpoint_path` is set, a checkpoint is written
/// every time validation accuracy improves.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Panics
/// Panics if `config.batch_size == 0`.
pub fn train(
    dataset_path: &Path,
    config: &TrainConfig,
    optimizer: &Sgd,
) -> Result<ParameterSet, CnnError> {
    assert!(config.batch_size > 0, "batch_size must be at least 1");

    let folder = load_image_folder(dataset_path)?;

    let mut rng: StdRng = match config.shuffle_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Hold out the validation split before any epoch shuffling.
    let mut indices: Vec<usize> = (0..folder.len()).collect();
    indices.shuffle(&mut rng);
    let val_len = (folder.len() as f64 * config.val_ratio) as usize;
    let (val_idx, train_idx) = indices.split_at(val_len);

    assert!(
        !train_idx.is_empty(),
        "training split must not be empty; lower val_ratio"
    );

    let train_images: Vec<Tensor3> = train_idx.iter().map(|&i| folder.images[i].clone()).collect();
    let train_labels: Vec<usize> = train_idx.iter().map(|&i| folder.labels[i]).collect();
    let val_images: Vec<Tensor3> = val_idx.iter().map(|&i| folder.images[i].clone()).collect();
    let val_targets: Vec<Vec<f64>> = val_idx
        .iter()
        .map(|&i| one_hot(folder.labels[i], NUM_CLASSES))
        .collect();

    let mut params = ParameterSet::init(&mut rng);
    let mut best_val_accuracy = 0.0;

    for epoch in 1..=config.epochs {
        // Check stop flag at the top of each epoch.
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }

        let t_start = Instant::now();

        let epoch_seed = config
            .shuffle_seed
            .map(|seed| seed.wrapping_add(epoch as u64));
        let batches = create_batches(
            &train_images,
            &train_labels,
            config.batch_size,
            epoch_seed,
        );

        let train_loss = run_one_epoch(&mut params, &batches, optimizer)? / train_images.len() as f64;

        // ── Validation ────────────────────────────────────────────────────
        let (val_loss, val_accuracy) = if val_images.is_empty() {
            (None, None)
        } else {
            let (loss, accuracy) = evaluate(&params, &val_images, &val_targets);
            (Some(loss), Some(accuracy))
        };

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        log::info!(
            "epoch {}/{}: train loss {:.6}, val loss {:?}, val acc {:?}, {} ms",
            epoch,
            config.epochs,
            train_loss,
            val_loss,
            val_accuracy,
            elapsed_ms
        );

        // ── Best-model checkpoint ─────────────────────────────────────────
        if let (Some(accuracy), Some(path)) = (val_accuracy, config.checkpoint_path.as_ref()) {
            if accuracy > best_val_accuracy {
                best_val_accuracy = accuracy;
                checkpoint::save(path, &params)?;
                log::info!(
                    "validation accuracy improved to {:.4}, checkpoint updated",
                    accuracy
                );
            }
        }

        // ── Emit progress ─────────────────────────────────────────────────
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            val_loss,
            val_accuracy,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }

        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }
    }

    Ok(params)
}

/// Mean loss and argmax accuracy of `params` over an evaluation set.
pub fn evaluate(params: &ParameterSet, images: &[Tensor3], targets: &[Vec<f64>]) -> (f64, f64) {
    let n = images.len();
    if n == 0 {
        return (0.0, 0.0);
    }

    let mut total_loss = 0.0;
    let mut correct = 0usize;

    for (image, target) in images.iter().zip(targets.iter()) {
        let (probs, _) = forward(params, image);
        total_loss += CrossEntropyLoss::loss(&probs, target);
        if argmax(&probs) == argmax(target) {
            correct += 1;
        }
    }

    (total_loss / n as f64, correct as f64 / n as f64)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs mini-batch SGD over one epoch's batches. Gradients are accumulated
/// per sample, averaged over the batch and applied in a single step.
/// Returns the summed (not yet averaged) loss over all samples.
fn run_one_epoch(
    params: &mut ParameterSet,
    batches: &[Batch],
    optimizer: &Sgd,
) -> Result<f64, CnnError> {
    let mut total_loss = 0.0;

    for batch in batches {
        let mut acc_grads = GradientSet::zeros();

        for (image, target) in batch.images.iter().zip(batch.targets.iter()) {
            let (probs, cache) = forward(params, image);
            total_loss += CrossEntropyLoss::loss(&probs, target);

            let grads = backward(params, image, &cache, target);
            acc_grads.accumulate(&grads);
        }

        acc_grads.scale(1.0 / batch.len() as f64);
        optimizer.step(params, &acc_grads)?;
    }

    Ok(total_loss)
}

/// Index of the maximum element in a slice.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

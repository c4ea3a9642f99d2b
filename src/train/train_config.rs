use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train` run.
///
/// # Fields
/// - `epochs`          — total number of full passes over the training data
/// - `batch_size`      — samples per mini-batch; use `1` for online SGD
/// - `val_ratio`       — fraction of the dataset held out for validation
/// - `shuffle_seed`    — seed for the split, init and per-epoch shuffles;
///                       `None` draws from the thread RNG
/// - `checkpoint_path` — when set, a checkpoint is written every time
///                       validation accuracy improves
/// - `progress_tx`     — optional channel sender; one `EpochStats` is sent
///                       per completed epoch. If the receiver is dropped the
///                       loop terminates early (clean shutdown).
/// - `stop_flag`       — optional atomic flag; when set to `true` from
///                       another thread the loop terminates after the
///                       current epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub val_ratio: f64,
    pub shuffle_seed: Option<u64>,
    pub checkpoint_path: Option<PathBuf>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig`: a 10% validation split, no
    /// checkpointing, no progress channel and no stop flag.
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            val_ratio: 0.1,
            shuffle_seed: None,
            checkpoint_path: None,
            progress_tx: None,
            stop_flag: None,
        }
    }
}

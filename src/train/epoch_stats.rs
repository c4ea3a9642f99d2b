use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch so
/// callers can drive progress displays without polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean cross-entropy loss over all training samples in this epoch.
    pub train_loss: f64,
    /// Mean validation loss, if a validation split was held out.
    pub val_loss: Option<f64>,
    /// Validation accuracy as a fraction in [0, 1], if a validation split
    /// was held out.
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the CNN engine.
///
/// Every fallible public operation (preprocessing, checkpoint I/O, dataset
/// loading, optimizer step) surfaces one of these variants to the caller.
/// The engine performs no retries of its own; recovery policy belongs to
/// whatever layer sits on top of it.
#[derive(Error, Debug)]
pub enum CnnError {
    /// The image source could not be decoded or converted to RGB.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// No checkpoint file exists at the given path.
    #[error("checkpoint not found: {}", .0.display())]
    CheckpointNotFound(PathBuf),

    /// The checkpoint file exists but is unreadable, is missing one of the
    /// ten named tensors, or carries a tensor with the wrong rank or shape.
    #[error("corrupt checkpoint: {0}")]
    CheckpointCorrupt(String),

    /// A parameter tensor and its gradient (or a loaded tensor and its
    /// expected shape) disagree.
    #[error("shape mismatch for {name}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A dataset directory contained no decodable class images.
    #[error("no images found in the dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

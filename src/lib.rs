pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optim;
pub mod checkpoint;
pub mod data;
pub mod train;
pub mod classify;
pub mod error;

// Convenience re-exports
pub use math::{Matrix, Tensor3, Tensor4};
pub use network::{ParameterSet, GradientSet, forward, backward, NUM_CLASSES};
pub use loss::CrossEntropyLoss;
pub use optim::Sgd;
pub use checkpoint::ModelCache;
pub use data::{create_batches, one_hot, Batch};
pub use train::{train, evaluate, TrainConfig, EpochStats};
pub use classify::{EmotionClassifier, CnnClassifier, EMOTION_CLASSES};
pub use error::CnnError;

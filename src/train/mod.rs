pub mod trainer;
pub mod epoch_stats;
pub mod train_config;

pub use trainer::{train, evaluate};
pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;

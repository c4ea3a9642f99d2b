pub mod params;
pub mod cache;
pub mod forward;
pub mod backward;

pub use params::{ParameterSet, GradientSet, NUM_CLASSES, INPUT_SIZE, INPUT_CHANNELS};
pub use cache::ActivationCache;
pub use forward::forward;
pub use backward::backward;

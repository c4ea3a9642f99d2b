pub mod conv;
pub mod pool;
pub mod dense;

pub use conv::{conv2d_forward, conv2d_backward};
pub use pool::{max_pool_forward, max_pool_backward, PoolIndices};
pub use dense::{dense_forward, dense_backward};

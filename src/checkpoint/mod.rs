pub mod store;
pub mod cache;

pub use store::{save, load};
pub use cache::ModelCache;

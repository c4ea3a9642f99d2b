pub mod image;
pub mod batch;
pub mod dataset;

pub use image::{tensor_from_path, tensor_from_bytes, tensor_from_image};
pub use batch::{create_batches, one_hot, Batch};
pub use dataset::{load_image_folder, ImageFolder};

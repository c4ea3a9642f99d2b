//! Image preprocessing for the emotion classifier.
//!
//! Every source (file path, raw encoded bytes, decoded image) ends up as a
//! 48×48×3 tensor: decoded, converted to RGB, resized with bilinear
//! interpolation and normalized from [0, 255] to [0, 1].

use std::path::Path;

use image::DynamicImage;

use crate::error::CnnError;
use crate::math::Tensor3;
use crate::network::params::{INPUT_CHANNELS, INPUT_SIZE};

/// Decodes an image file and preprocesses it.
///
/// Fails with `InvalidImage` when the file cannot be opened or decoded.
pub fn tensor_from_path(path: &Path) -> Result<Tensor3, CnnError> {
    let img = image::open(path)
        .map_err(|e| CnnError::InvalidImage(format!("{}: {}", path.display(), e)))?;
    Ok(tensor_from_image(&img))
}

/// Decodes in-memory image bytes (PNG/JPEG/BMP/GIF) and preprocesses them.
pub fn tensor_from_bytes(bytes: &[u8]) -> Result<Tensor3, CnnError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CnnError::InvalidImage(e.to_string()))?;
    Ok(tensor_from_image(&img))
}

/// Preprocesses an already-decoded image: RGB conversion, 48×48 bilinear
/// resize, [0, 1] normalization, (H, W, C) layout.
pub fn tensor_from_image(img: &DynamicImage) -> Tensor3 {
    let side = INPUT_SIZE as u32;
    let resized = img.resize_exact(side, side, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();

    // Pixels iterate row-major with channels innermost, which is exactly
    // the (H, W, C) flat layout of Tensor3.
    let data: Vec<f64> = rgb
        .pixels()
        .flat_map(|p| p.0.iter().map(|&ch| ch as f64 / 255.0))
        .collect();

    Tensor3::from_vec(INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS, data)
}

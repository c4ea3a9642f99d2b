//! The inference-facing classifier service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;

use crate::checkpoint::ModelCache;
use crate::data::image::{tensor_from_bytes, tensor_from_image, tensor_from_path};
use crate::error::CnnError;
use crate::math::Tensor3;
use crate::network::forward::forward;
use crate::network::params::{ParameterSet, INPUT_CHANNELS, INPUT_SIZE};

/// Output class order of the probability vector.
pub const EMOTION_CLASSES: [&str; 7] = [
    "angry", "disgust", "fear", "happy", "neutral", "sad", "surprise",
];

/// Anything that maps a preprocessed face image to a 7-class emotion
/// distribution.
///
/// Classifier backends (this from-scratch engine, a framework-backed model,
/// …) implement the same capability so ensembling and fallback layers can
/// treat them uniformly, soft-voting over their outputs without
/// backend-specific branching.
pub trait EmotionClassifier {
    /// Returns probabilities in `EMOTION_CLASSES` order, summing to ≈1.
    fn classify(&self, image: &Tensor3) -> Result<Vec<f64>, CnnError>;
}

/// The from-scratch CNN backend.
///
/// Owns its checkpoint path and a process-lifetime parameter cache: the
/// first classification loads the weights from disk, later ones reuse the
/// in-memory copy. The cache is explicit state of this service, with
/// `invalidate`/`reload` instead of hidden global mutation.
pub struct CnnClassifier {
    checkpoint_path: PathBuf,
    cache: ModelCache,
}

impl CnnClassifier {
    pub fn new(checkpoint_path: impl Into<PathBuf>) -> CnnClassifier {
        CnnClassifier {
            checkpoint_path: checkpoint_path.into(),
            cache: ModelCache::new(),
        }
    }

    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }

    /// Classifies an image file.
    pub fn classify_path(&self, path: &Path) -> Result<Vec<f64>, CnnError> {
        let tensor = tensor_from_path(path)?;
        self.classify(&tensor)
    }

    /// Classifies in-memory encoded image bytes.
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<Vec<f64>, CnnError> {
        let tensor = tensor_from_bytes(bytes)?;
        self.classify(&tensor)
    }

    /// Classifies an already-decoded image.
    pub fn classify_image(&self, img: &DynamicImage) -> Result<Vec<f64>, CnnError> {
        let tensor = tensor_from_image(img);
        self.classify(&tensor)
    }

    /// Drops the cached parameters; the next call re-reads the checkpoint.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    /// Forces a fresh checkpoint read (e.g. after training overwrote it).
    pub fn reload(&self) -> Result<(), CnnError> {
        self.cache.reload(&self.checkpoint_path)?;
        Ok(())
    }

    fn params(&self) -> Result<Arc<ParameterSet>, CnnError> {
        self.cache.load(&self.checkpoint_path)
    }
}

impl EmotionClassifier for CnnClassifier {
    fn classify(&self, image: &Tensor3) -> Result<Vec<f64>, CnnError> {
        let expected = [INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS];
        if image.shape() != expected {
            return Err(CnnError::ShapeMismatch {
                name: "input image",
                expected: expected.to_vec(),
                actual: image.shape().to_vec(),
            });
        }

        let params = self.params()?;
        let (probs, _) = forward(&params, image);
        Ok(probs)
    }
}

/// The most likely class and its probability.
pub fn top_emotion(probs: &[f64]) -> (&'static str, f64) {
    let (index, &p) = probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0, &0.0));
    (EMOTION_CLASSES[index], p)
}

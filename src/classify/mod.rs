pub mod classifier;

pub use classifier::{EmotionClassifier, CnnClassifier, top_emotion, EMOTION_CLASSES};

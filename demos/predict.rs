/// Single-image emotion inference demo for ferrite-cnn.
///
/// Run with:
///   cargo run --example predict --release -- <checkpoint.json> <image>

use std::path::PathBuf;

use ferrite_cnn::classify::top_emotion;
use ferrite_cnn::{CnnClassifier, EMOTION_CLASSES};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (checkpoint, image) = match (args.next(), args.next()) {
        (Some(c), Some(i)) => (PathBuf::from(c), PathBuf::from(i)),
        _ => {
            eprintln!("usage: predict <checkpoint.json> <image>");
            std::process::exit(2);
        }
    };

    let classifier = CnnClassifier::new(checkpoint);

    match classifier.classify_path(&image) {
        Ok(probs) => {
            println!("{:>10}  {:>10}", "Class", "Prob");
            println!("{}", "-".repeat(22));
            for (name, p) in EMOTION_CLASSES.iter().zip(probs.iter()) {
                println!("{:>10}  {:>9.2}%", name, p * 100.0);
            }
            let (emotion, p) = top_emotion(&probs);
            println!("\nPredicted: {} ({:.2}%)", emotion, p * 100.0);
        }
        Err(e) => {
            eprintln!("prediction failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Emotion-recognition training demo for ferrite-cnn.
///
/// Dataset layout: one subdirectory per class under the dataset root
/// (angry/, disgust/, fear/, happy/, neutral/, sad/, surprise/), each
/// holding face images. Labels follow the lexical order of the
/// subdirectory names.
///
/// Run with:
///   cargo run --example train --release -- <dataset_dir> <checkpoint.json>

use std::path::PathBuf;
use std::sync::mpsc;

use ferrite_cnn::{train, EpochStats, Sgd, TrainConfig};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let dataset_dir = PathBuf::from(args.next().unwrap_or_else(|| {
        eprintln!("usage: train <dataset_dir> <checkpoint.json>");
        std::process::exit(2);
    }));
    let checkpoint = PathBuf::from(args.next().unwrap_or_else(|| String::from("emotion_cnn.json")));

    let epochs = 10;
    let batch_size = 32;
    let learning_rate = 1e-3;

    println!("Training on {} for {} epochs", dataset_dir.display(), epochs);
    println!("  batch size {}, lr {}, best checkpoint -> {}", batch_size, learning_rate, checkpoint.display());
    println!();
    println!("{:>6}  {:>12}  {:>12}  {:>10}  {:>8}", "Epoch", "Train Loss", "Val Loss", "Val Acc", "Time");
    println!("{}", "-".repeat(58));

    // Print each epoch's stats as they arrive on the progress channel.
    let (tx, rx) = mpsc::channel::<EpochStats>();
    let printer = std::thread::spawn(move || {
        for stats in rx {
            println!(
                "{:>6}  {:>12.6}  {:>12}  {:>10}  {:>6}ms",
                stats.epoch,
                stats.train_loss,
                stats
                    .val_loss
                    .map(|l| format!("{:.6}", l))
                    .unwrap_or_else(|| "-".into()),
                stats
                    .val_accuracy
                    .map(|a| format!("{:.2}%", a * 100.0))
                    .unwrap_or_else(|| "-".into()),
                stats.elapsed_ms,
            );
        }
    });

    let mut config = TrainConfig::new(epochs, batch_size);
    config.checkpoint_path = Some(checkpoint.clone());
    config.progress_tx = Some(tx);

    let optimizer = Sgd::new(learning_rate);

    let result = train(&dataset_dir, &config, &optimizer);
    // Drop the config (and with it the progress sender) so the printer
    // thread sees the channel close.
    drop(config);
    printer.join().ok();

    match result {
        Ok(_) => {
            println!("\nTraining complete. Best checkpoint at {}", checkpoint.display());
        }
        Err(e) => {
            eprintln!("training failed: {}", e);
            std::process::exit(1);
        }
    }
}

// This binary crate is intentionally minimal.
// All engine logic lives in the library (src/lib.rs and its modules).
// Run demos with:
//   cargo run --example train -- <dataset_dir> <checkpoint.json>
//   cargo run --example predict -- <checkpoint.json> <image>
fn main() {
    println!("ferrite-cnn: a from-scratch convolutional network engine for emotion recognition.");
    println!("Run `cargo run --example train` or `cargo run --example predict` to see it in action.");
}

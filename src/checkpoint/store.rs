//! Durable parameter checkpoints.
//!
//! A checkpoint is a single JSON document holding exactly ten named tensor
//! records (`W1, b1, … W5, b5`), each a `{shape, data}` pair with the values
//! flattened row-major. The loader rejects files missing any name or
//! carrying a tensor with the wrong rank or shape.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::CnnError;
use crate::math::{Matrix, Tensor4};
use crate::network::params::{
    ParameterSet, FLAT_SIZE, HIDDEN_SIZE, INPUT_CHANNELS, NUM_CLASSES,
};

/// One named tensor as stored on disk.
#[derive(Debug, Serialize, Deserialize)]
struct TensorRecord {
    shape: Vec<usize>,
    data: Vec<f64>,
}

/// On-disk layout. Serde rejects a document missing any field, which is
/// exactly the corrupt-checkpoint contract.
#[derive(Debug, Serialize, Deserialize)]
#[allow(non_snake_case)]
struct CheckpointFile {
    W1: TensorRecord,
    b1: TensorRecord,
    W2: TensorRecord,
    b2: TensorRecord,
    W3: TensorRecord,
    b3: TensorRecord,
    W4: TensorRecord,
    b4: TensorRecord,
    W5: TensorRecord,
    b5: TensorRecord,
}

/// Writes all ten parameter tensors to `path`, replacing any existing file.
pub fn save(path: &Path, params: &ParameterSet) -> Result<(), CnnError> {
    let file = CheckpointFile {
        W1: tensor4_record(&params.w1),
        b1: vec_record(&params.b1),
        W2: tensor4_record(&params.w2),
        b2: vec_record(&params.b2),
        W3: tensor4_record(&params.w3),
        b3: vec_record(&params.b3),
        W4: matrix_record(&params.w4),
        b4: vec_record(&params.b4),
        W5: matrix_record(&params.w5),
        b5: vec_record(&params.b5),
    };

    let out = File::create(path)?;
    let writer = BufWriter::new(out);
    serde_json::to_writer(writer, &file)
        .map_err(|e| CnnError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    log::info!("checkpoint saved to {}", path.display());
    Ok(())
}

/// Reads a checkpoint back into a `ParameterSet`.
///
/// Fails with `CheckpointNotFound` when `path` does not exist and
/// `CheckpointCorrupt` when the document is unreadable, incomplete, or any
/// tensor disagrees with the fixed architecture shapes.
pub fn load(path: &Path) -> Result<ParameterSet, CnnError> {
    if !path.exists() {
        return Err(CnnError::CheckpointNotFound(path.to_owned()));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let doc: CheckpointFile = serde_json::from_reader(reader)
        .map_err(|e| CnnError::CheckpointCorrupt(e.to_string()))?;

    let params = ParameterSet {
        w1: tensor4_from(doc.W1, "W1", [3, 3, INPUT_CHANNELS, 16])?,
        b1: vec_from(doc.b1, "b1", 16)?,
        w2: tensor4_from(doc.W2, "W2", [3, 3, 16, 32])?,
        b2: vec_from(doc.b2, "b2", 32)?,
        w3: tensor4_from(doc.W3, "W3", [3, 3, 32, 64])?,
        b3: vec_from(doc.b3, "b3", 64)?,
        w4: matrix_from(doc.W4, "W4", [FLAT_SIZE, HIDDEN_SIZE])?,
        b4: vec_from(doc.b4, "b4", HIDDEN_SIZE)?,
        w5: matrix_from(doc.W5, "W5", [HIDDEN_SIZE, NUM_CLASSES])?,
        b5: vec_from(doc.b5, "b5", NUM_CLASSES)?,
    };
    log::info!("checkpoint loaded from {}", path.display());
    Ok(params)
}

fn tensor4_record(t: &Tensor4) -> TensorRecord {
    TensorRecord {
        shape: t.shape().to_vec(),
        data: t.data.clone(),
    }
}

fn matrix_record(m: &Matrix) -> TensorRecord {
    TensorRecord {
        shape: m.shape().to_vec(),
        data: m.data.iter().flatten().copied().collect(),
    }
}

fn vec_record(v: &[f64]) -> TensorRecord {
    TensorRecord {
        shape: vec![v.len()],
        data: v.to_vec(),
    }
}

fn corrupt(name: &str, expected: &[usize], record: &TensorRecord) -> CnnError {
    CnnError::CheckpointCorrupt(format!(
        "tensor {} has shape {:?}, expected {:?}",
        name, record.shape, expected
    ))
}

fn tensor4_from(
    record: TensorRecord,
    name: &str,
    expected: [usize; 4],
) -> Result<Tensor4, CnnError> {
    if record.shape != expected || record.data.len() != expected.iter().product::<usize>() {
        return Err(corrupt(name, &expected, &record));
    }
    Ok(Tensor4::from_vec(
        expected[0], expected[1], expected[2], expected[3], record.data,
    ))
}

fn matrix_from(record: TensorRecord, name: &str, expected: [usize; 2]) -> Result<Matrix, CnnError> {
    if record.shape != expected || record.data.len() != expected[0] * expected[1] {
        return Err(corrupt(name, &expected, &record));
    }
    let data = record
        .data
        .chunks(expected[1])
        .map(|row| row.to_vec())
        .collect();
    Ok(Matrix::from_data(data))
}

fn vec_from(record: TensorRecord, name: &str, expected: usize) -> Result<Vec<f64>, CnnError> {
    if record.shape != [expected] || record.data.len() != expected {
        return Err(corrupt(name, &[expected], &record));
    }
    Ok(record.data)
}

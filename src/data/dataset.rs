//! Image-folder datasets.
//!
//! The dataset root contains one subdirectory per class; the class name is
//! the subdirectory name and the label index is its position in lexical
//! order, so labels are stable across filesystems.

use std::path::Path;

use crate::data::image::tensor_from_path;
use crate::error::CnnError;
use crate::math::Tensor3;

const VALID_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// A fully-loaded, preprocessed dataset.
#[derive(Debug)]
pub struct ImageFolder {
    pub images: Vec<Tensor3>,
    pub labels: Vec<usize>,
    /// Class names in lexical order; `labels` index into this list.
    pub classes: Vec<String>,
}

impl ImageFolder {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Scans `root` for class subdirectories and loads every image with a
/// recognized extension.
///
/// Decode failures surface as `InvalidImage`; a root with no decodable
/// images at all is `EmptyDataset`.
pub fn load_image_folder(root: &Path) -> Result<ImageFolder, CnnError> {
    let mut class_dirs: Vec<(String, std::path::PathBuf)> = std::fs::read_dir(root)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| (name.to_owned(), entry.path()))
        })
        .collect();

    // read_dir order is filesystem-dependent; lexical sort pins the
    // class-name to label-index mapping.
    class_dirs.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut images = Vec::new();
    let mut labels = Vec::new();
    let mut classes = Vec::new();

    for (label, (class_name, dir)) in class_dirs.into_iter().enumerate() {
        let mut files: Vec<std::path::PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| has_valid_extension(path))
            .collect();
        files.sort_unstable();

        for file in files {
            images.push(tensor_from_path(&file)?);
            labels.push(label);
        }

        classes.push(class_name);
    }

    if images.is_empty() {
        return Err(CnnError::EmptyDataset);
    }

    log::info!(
        "loaded {} images across {} classes from {}",
        images.len(),
        classes.len(),
        root.display()
    );

    Ok(ImageFolder {
        images,
        labels,
        classes,
    })
}

fn has_valid_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VALID_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

//! Process-lifetime parameter cache.
//!
//! Inference callers hit the same checkpoint path on every request; the
//! cache keeps the most recently loaded `ParameterSet` in memory behind an
//! `Arc` so repeated calls avoid redundant disk reads. The slot is guarded
//! by a mutex: two concurrent first-calls serialize on the load instead of
//! racing, and readers afterwards share the immutable set lock-free through
//! their `Arc` clones.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::checkpoint::store;
use crate::error::CnnError;
use crate::network::params::ParameterSet;

#[derive(Debug, Default)]
pub struct ModelCache {
    slot: Mutex<Option<(PathBuf, Arc<ParameterSet>)>>,
}

impl ModelCache {
    pub fn new() -> ModelCache {
        ModelCache {
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached parameters for `path`, loading them from disk on
    /// the first call (or after the cached entry was for a different path).
    pub fn load(&self, path: &Path) -> Result<Arc<ParameterSet>, CnnError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((cached_path, params)) = slot.as_ref() {
            if cached_path == path {
                log::debug!("parameter cache hit for {}", path.display());
                return Ok(Arc::clone(params));
            }
        }

        let params = Arc::new(store::load(path)?);
        *slot = Some((path.to_owned(), Arc::clone(&params)));
        Ok(params)
    }

    /// Drops the cached entry; the next `load` reads from disk again.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// Forces a fresh read of `path`, replacing whatever was cached.
    pub fn reload(&self, path: &Path) -> Result<Arc<ParameterSet>, CnnError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let params = Arc::new(store::load(path)?);
        *slot = Some((path.to_owned(), Arc::clone(&params)));
        Ok(params)
    }
}

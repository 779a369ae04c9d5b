use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::device::RenderError;

use super::backend::ShaderCompiler;

/// Path-keyed cache of compiled shader modules.
///
/// A path is read and compiled at most once for the lifetime of the cache; later
/// lookups return a clone of the stored handle without touching the filesystem.
/// There is no invalidation: edits to a file after its first load are not picked up.
///
/// The map is mutex-guarded and the lock is held across read + compile, so
/// concurrent loaders of the same path cannot insert two modules.
pub struct ShaderCache<M> {
    modules: Mutex<HashMap<PathBuf, M>>,
}

impl<M: Clone> ShaderCache<M> {
    pub fn new() -> Self {
        Self {
            modules: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the module for `path`, compiling it with `compiler` on first use.
    ///
    /// Failed reads and rejected sources are not cached.
    pub fn get_or_load<C>(&self, compiler: &C, path: impl AsRef<Path>) -> Result<M, RenderError>
    where
        C: ShaderCompiler<Module = M> + ?Sized,
    {
        let path = path.as_ref();

        let mut modules = self.lock();

        if let Some(module) = modules.get(path) {
            log::trace!("shader cache hit: {}", path.display());
            return Ok(module.clone());
        }

        let source = std::fs::read_to_string(path).map_err(|source| RenderError::ShaderSource {
            path: path.to_path_buf(),
            source,
        })?;

        let module = compiler.compile_shader(path, &source)?;
        log::debug!("compiled shader {}", path.display());

        modules.insert(path.to_path_buf(), module.clone());
        Ok(module)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.lock().contains_key(path.as_ref())
    }

    /// Number of distinct paths loaded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M> ShaderCache<M> {
    // A poisoned lock only means a loader panicked; inserts happen after a
    // successful compile, so the map itself is intact.
    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, M>> {
        self.modules.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl<M: Clone> Default for ShaderCache<M> {
    fn default() -> Self {
        Self::new()
    }
}

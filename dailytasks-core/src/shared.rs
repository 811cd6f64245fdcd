//! Shared access to one controller from several consumers.
//!
//! Pass a [`SharedController`] to whatever needs the data (UI, notification
//! handler). When a host cannot thread a handle through (background callbacks
//! invoked by the platform), [`init_global`] sets up a single process-wide
//! instance that lives until the process exits.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::OnceCell;

use crate::controller::TaskDataController;
use crate::error::{CoreError, Result};

/// Cloneable handle; the lock is held across each whole read-modify-persist call.
#[derive(Debug, Clone)]
pub struct SharedController {
    inner: Arc<Mutex<TaskDataController>>,
}

impl SharedController {
    pub fn new(controller: TaskDataController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(TaskDataController::open(path)?))
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, TaskDataController>> {
        self.inner.lock().map_err(|_| CoreError::LockPoisoned)
    }

    /// Runs `f` with exclusive access.
    pub fn with<T>(&self, f: impl FnOnce(&mut TaskDataController) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        f(&mut guard)
    }
}

static GLOBAL: OnceCell<SharedController> = OnceCell::new();

/// Opens the process-wide controller on first call; later calls return the
/// existing instance and ignore `path`.
pub fn init_global(path: impl Into<PathBuf>) -> Result<&'static SharedController> {
    GLOBAL.get_or_try_init(|| {
        let path = path.into();
        tracing::debug!(path = %path.display(), "initializing process-wide task data");
        SharedController::open(path)
    })
}

/// The process-wide controller, if [`init_global`] has run.
pub fn global() -> Option<&'static SharedController> {
    GLOBAL.get()
}

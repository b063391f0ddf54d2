//! Registry through which co-located code finds the active application.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::{ApplicationDetail, InstanceId};

/// Cloneable handle to the currently active application instance.
///
/// Controllers publish themselves on construction and withdraw in `stop`.
/// Collaborators hold a clone of the handle instead of reaching for a
/// process-wide global.
#[derive(Clone, Debug, Default)]
pub struct ApplicationRegistry {
    current: Arc<Mutex<Option<ApplicationDetail>>>,
}

impl ApplicationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ApplicationDetail>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish `detail` as the current instance, replacing any previous one.
    pub fn register(&self, detail: ApplicationDetail) {
        *self.lock() = Some(detail);
    }

    /// Snapshot of the current instance, if any.
    pub fn current(&self) -> Option<ApplicationDetail> {
        self.lock().clone()
    }

    /// Check whether `id` is the current instance.
    pub fn is_current(&self, id: InstanceId) -> bool {
        self.lock().as_ref().is_some_and(|detail| detail.id == id)
    }

    /// Apply `update` to the current instance if it is `id`.
    pub fn update(&self, id: InstanceId, update: impl FnOnce(&mut ApplicationDetail)) -> bool {
        let mut current = self.lock();
        match current.as_mut() {
            Some(detail) if detail.id == id => {
                update(detail);
                true
            }
            _ => false,
        }
    }

    /// Withdraw `id`. A newer instance registered in the meantime is left alone.
    pub fn unregister(&self, id: InstanceId) -> bool {
        let mut current = self.lock();
        if current.as_ref().is_some_and(|detail| detail.id == id) {
            *current = None;
            true
        } else {
            false
        }
    }
}

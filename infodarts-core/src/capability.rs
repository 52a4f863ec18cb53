use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Error)]
#[error("capability `{name}` failed to load: {reason}")]
pub struct CapabilityError {
    pub name: &'static str,
    pub reason: String,
}

enum Slot<T> {
    Unloaded,
    Ready(Arc<T>),
    Failed(CapabilityError),
}

/// Marks a load in flight; lowered on drop so a panicking or cancelled load
/// does not stay `Loading`.
struct LoadingFlag<'a>(&'a AtomicBool);

impl<'a> LoadingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A resource that is loaded the first time someone needs it.
///
/// Concurrent callers of [`Capability::ensure_ready`] wait for the same load
/// instead of starting their own. Once ready, the value is handed out without
/// loading again. A failed load is remembered until the next `ensure_ready`
/// call, which tries again.
pub struct Capability<T> {
    name: &'static str,
    slot: Mutex<Slot<T>>,
    loading: AtomicBool,
}

impl<T> Capability<T> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Mutex::new(Slot::Unloaded),
            loading: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn status(&self) -> Status {
        if self.loading.load(Ordering::Acquire) {
            return Status::Loading;
        }

        match self.slot.try_lock() {
            Ok(slot) => match *slot {
                Slot::Unloaded => Status::Unloaded,
                Slot::Ready(_) => Status::Ready,
                Slot::Failed(_) => Status::Failed,
            },
            Err(_) => Status::Loading,
        }
    }

    /// The error of the last load, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<CapabilityError> {
        match &*self.slot.try_lock().ok()? {
            Slot::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    pub async fn ensure_ready<F, Fut, E>(&self, load: F) -> Result<Arc<T>, CapabilityError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut slot = self.slot.lock().await;

        if let Slot::Ready(value) = &*slot {
            return Ok(Arc::clone(value));
        }

        debug!("Loading capability `{}`", self.name);
        let loaded = {
            let _loading = LoadingFlag::raise(&self.loading);
            load().await
        };

        match loaded {
            Ok(value) => {
                let value = Arc::new(value);
                *slot = Slot::Ready(Arc::clone(&value));
                debug!("Capability `{}` is ready", self.name);
                Ok(value)
            }
            Err(err) => {
                let err = CapabilityError {
                    name: self.name,
                    reason: err.to_string(),
                };
                error!("{err}");
                *slot = Slot::Failed(err.clone());
                Err(err)
            }
        }
    }
}

impl<T> std::fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("status", &self.status())
            .finish()
    }
}

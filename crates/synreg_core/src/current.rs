//! Atomic publication of registries.
//!
//! Readers take an `Arc<Registry>` and keep using it for the whole call, so a
//! swap never changes the table under an in-flight encode/decode. Swaps
//! replace the whole registry; nothing is patched in place.

use crate::errors::EvolutionError;
use crate::registry::Registry;
use arc_swap::{ArcSwap, ArcSwapOption};
use std::sync::Arc;
use tracing::info;

/// Hot-reloadable registry reference.
#[derive(Debug)]
pub struct RegistryHandle {
    inner: ArcSwap<Registry>,
}

impl RegistryHandle {
    pub fn new(registry: Registry) -> Self {
        Self { inner: ArcSwap::from_pointee(registry) }
    }

    /// Registry to use for one operation.
    #[inline]
    pub fn load(&self) -> Arc<Registry> {
        self.inner.load_full()
    }

    /// Swap in `next` if it only appends to the current registry. Returns the
    /// registry it replaced.
    pub fn reload(&self, next: Registry) -> Result<Arc<Registry>, EvolutionError> {
        let next = Arc::new(next);
        loop {
            let cur = self.inner.load_full();
            next.check_evolution(&cur)?;
            let prev = self.inner.compare_and_swap(&cur, Arc::clone(&next));
            if Arc::ptr_eq(&*prev, &cur) {
                info!(
                    kinds = next.len(),
                    checksum = format_args!("{:016x}", next.checksum()),
                    "registry reloaded"
                );
                return Ok(cur);
            }
        }
    }

    /// Swap without the append-only check, for a deliberate major bump.
    pub fn replace(&self, next: Registry) -> Arc<Registry> {
        info!(kinds = next.len(), "registry replaced");
        self.inner.swap(Arc::new(next))
    }
}

static CURRENT: ArcSwapOption<Registry> = ArcSwapOption::const_empty();

/// Install the process-wide registry, returning whatever was there.
pub fn install(registry: Arc<Registry>) -> Option<Arc<Registry>> {
    info!(
        kinds = registry.len(),
        checksum = format_args!("{:016x}", registry.checksum()),
        "registry installed"
    );
    CURRENT.swap(Some(registry))
}

/// The process-wide registry, if one is installed.
pub fn get() -> Option<Arc<Registry>> {
    CURRENT.load_full()
}

pub fn teardown() -> Option<Arc<Registry>> {
    CURRENT.swap(None)
}

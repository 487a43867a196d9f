//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Error returned by the scripted dependency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("dependency unavailable")]
pub struct Unavailable;

/// A dependency whose health can be flipped and whose invocations are counted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDependency {
    failing: Arc<AtomicBool>,
    invocations: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedDependency {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let dep = Self::default();
        dep.set_failing(true);
        dep
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Invoke the dependency once.
    pub fn invoke(&self) -> Result<(), Unavailable> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(Unavailable)
        } else {
            Ok(())
        }
    }
}

//! Mode State
//!
//! The process-wide security posture, shared by every request.
//!
//! Reads are a single atomic load and a switch is a single atomic swap.
//! There is no barrier between the two: a request already in flight may or
//! may not see a switch, but every request that starts afterwards does.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::domain::value_object::security_mode::SecurityMode;

/// Atomically swappable handle on the current [`SecurityMode`].
///
/// Cloning shares the same cell; inject one instance into the router state.
#[derive(Debug, Clone, Default)]
pub struct ModeState {
    inner: Arc<AtomicU8>,
}

impl ModeState {
    pub fn new(initial: SecurityMode) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(initial.as_u8())),
        }
    }

    #[inline]
    pub fn get(&self) -> SecurityMode {
        SecurityMode::from_u8(self.inner.load(Ordering::Acquire))
    }

    /// Switch to the mode named by `candidate` (case-insensitive).
    ///
    /// Returns `false` and leaves the current mode untouched for any other
    /// literal.
    pub fn set(&self, candidate: &str) -> bool {
        match candidate.parse::<SecurityMode>() {
            Ok(mode) => {
                self.set_mode(mode);
                true
            }
            Err(_) => false,
        }
    }

    /// Store `mode` and return the previous one.
    #[inline]
    pub fn set_mode(&self, mode: SecurityMode) -> SecurityMode {
        SecurityMode::from_u8(self.inner.swap(mode.as_u8(), Ordering::AcqRel))
    }
}

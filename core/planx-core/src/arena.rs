//! Allocation context for plan expressions.
//!
//! Every expression the front-end or a rewrite rule creates is charged
//! against an [`Arena`]. An arena may be bounded, in which case exhausting
//! it surfaces as [`PlanxError::OutOfMemory`]. Callers that do not supply an
//! arena get [`Arena::global`], created on first use and never torn down.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::error::{PlanxError, PlanxResult};
use crate::expressions::{ExprPtr, Expression};

/// Snapshot of arena bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Number of successful allocations
    pub allocations: usize,
    /// Bytes charged so far
    pub bytes: usize,
}

/// 할당 컨텍스트: thread-safe, shareable across unrelated queries
#[derive(Debug, Default)]
pub struct Arena {
    limit: Option<usize>,
    used: AtomicUsize,
    allocations: AtomicUsize,
}

impl Arena {
    /// Unbounded arena.
    pub const fn new() -> Self {
        Self {
            limit: None,
            used: AtomicUsize::new(0),
            allocations: AtomicUsize::new(0),
        }
    }

    /// Arena that refuses allocations once `limit` bytes are in use.
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            used: AtomicUsize::new(0),
            allocations: AtomicUsize::new(0),
        }
    }

    /// Process-wide default arena.
    pub fn global() -> &'static Arena {
        static GLOBAL: OnceLock<Arena> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            tracing::debug!("initializing process-wide default arena");
            Arena::new()
        })
    }

    /// Caller-supplied arena, or the process-wide default.
    pub fn resolve(arena: Option<&Arena>) -> &Arena {
        match arena {
            Some(arena) => arena,
            None => Arena::global(),
        }
    }

    /// Charge `expr` against this arena and hand out a shared handle to it.
    pub fn alloc(&self, expr: Expression) -> PlanxResult<ExprPtr> {
        self.reserve(expr.footprint())?;
        Ok(Arc::new(expr))
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            allocations: self.allocations.load(Ordering::Relaxed),
            bytes: self.used.load(Ordering::Relaxed),
        }
    }

    fn reserve(&self, bytes: usize) -> PlanxResult<()> {
        match self.limit {
            None => {
                self.used.fetch_add(bytes, Ordering::Relaxed);
            }
            Some(limit) => {
                self.used
                    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |used| {
                        used.checked_add(bytes).filter(|total| *total <= limit)
                    })
                    .map_err(|used| {
                        tracing::warn!(requested = bytes, used, limit, "arena exhausted");
                        PlanxError::OutOfMemory {
                            requested: bytes,
                            used,
                            limit,
                        }
                    })?;
            }
        }
        self.allocations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

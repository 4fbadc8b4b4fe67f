//! In-memory dispatch sink for testing.
//!
//! Synchronous and deterministic; records every trigger for assertions.
//! Not for production use: lock poisoning panics.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::foundation::{AnalysisId, DomainError, ErrorCode};
use crate::ports::DispatchSink;

/// In-memory dispatch sink for tests and local wiring.
#[derive(Default)]
pub struct InMemoryDispatchSink {
    triggered: Mutex<Vec<AnalysisId>>,
    failing: Mutex<HashSet<AnalysisId>>,
}

impl InMemoryDispatchSink {
    /// Creates a sink that accepts every trigger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs the sink to fail for `id`.
    pub fn fail_for(&self, id: AnalysisId) {
        self.failing
            .lock()
            .expect("InMemoryDispatchSink: failing lock poisoned")
            .insert(id);
    }

    /// Returns all successfully triggered ids, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn triggered(&self) -> Vec<AnalysisId> {
        self.triggered
            .lock()
            .expect("InMemoryDispatchSink: triggered lock poisoned")
            .clone()
    }
}

#[async_trait]
impl DispatchSink for InMemoryDispatchSink {
    async fn trigger(&self, id: AnalysisId) -> Result<(), DomainError> {
        if self
            .failing
            .lock()
            .expect("InMemoryDispatchSink: failing lock poisoned")
            .contains(&id)
        {
            return Err(DomainError::new(
                ErrorCode::DispatchFailed,
                "Programmed trigger failure",
            ));
        }
        self.triggered
            .lock()
            .expect("InMemoryDispatchSink: triggered lock poisoned")
            .push(id);
        Ok(())
    }
}

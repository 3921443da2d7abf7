//! Circuit breaker guarding the backend
//!
//! Opens after `failure_threshold` consecutive transient failures. While open
//! every call fails fast; once `reset_timeout_secs` has elapsed calls are let
//! through again (half-open) and `success_threshold` successes close it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use core_kernel::CircuitBreakerConfig;

#[derive(Debug)]
pub(crate) struct CircuitBreaker {
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    opened_at: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    pub(crate) fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            opened_at: RwLock::new(None),
        }
    }

    pub(crate) async fn is_available(&self) -> bool {
        if !self.is_open.load(Ordering::Relaxed) {
            return true;
        }

        let opened_at = self.opened_at.read().await;
        match *opened_at {
            // Half-open
            Some(time) => time.elapsed() >= Duration::from_secs(self.config.reset_timeout_secs),
            None => false,
        }
    }

    pub(crate) fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        if !self.is_open.load(Ordering::Relaxed) {
            return;
        }
        let successes = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= u64::from(self.config.success_threshold) {
            self.is_open.store(false, Ordering::Relaxed);
            self.success_count.store(0, Ordering::Relaxed);
            tracing::info!("circuit breaker closed");
        }
    }

    pub(crate) async fn record_failure(&self) {
        self.success_count.store(0, Ordering::Relaxed);
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= u64::from(self.config.failure_threshold) {
            let was_open = self.is_open.swap(true, Ordering::Relaxed);
            *self.opened_at.write().await = Some(Instant::now());
            if !was_open {
                tracing::warn!(failures, "circuit breaker opened");
            }
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.is_open.load(Ordering::Relaxed)
    }
}

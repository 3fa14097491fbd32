//! Per-provider error accounting.
//!
//! Each provider in a fallback chain carries a [`ProviderHealth`]. Consecutive
//! failures increment the counter; once it reaches `max_errors` the provider is
//! reported unavailable and skipped until a success or an explicit reset.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use serde::Serialize;

/// Consecutive failures before a provider is skipped.
pub const DEFAULT_MAX_ERRORS: u32 = 3;

#[derive(Debug)]
pub struct ProviderHealth {
    name: String,
    max_errors: u32,
    error_count: AtomicU32,
    last_error: Mutex<Option<String>>,
}

/// Snapshot of a provider's health for status endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderStatus {
    pub name: String,
    pub available: bool,
    pub error_count: u32,
    pub max_errors: u32,
    pub last_error: Option<String>,
}

impl ProviderHealth {
    pub fn new(name: impl Into<String>, max_errors: u32) -> Self {
        Self {
            name: name.into(),
            max_errors: max_errors.max(1),
            error_count: AtomicU32::new(0),
            last_error: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_available(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) < self.max_errors
    }

    pub fn record_success(&self) {
        self.error_count.store(0, Ordering::Relaxed);
    }

    /// Returns the updated consecutive error count.
    pub fn record_failure(&self, error: &str) -> u32 {
        if let Ok(mut last) = self.last_error.lock() {
            *last = Some(error.to_string());
        }
        self.error_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn reset(&self) {
        self.error_count.store(0, Ordering::Relaxed);
        if let Ok(mut last) = self.last_error.lock() {
            *last = None;
        }
    }

    pub fn status(&self) -> ProviderStatus {
        let error_count = self.error_count.load(Ordering::Relaxed);
        ProviderStatus {
            name: self.name.clone(),
            available: error_count < self.max_errors,
            error_count,
            max_errors: self.max_errors,
            last_error: self.last_error.lock().ok().and_then(|l| l.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_disabled_after_max_errors() {
        let health = ProviderHealth::new("tavily", 2);
        assert!(health.is_available());

        health.record_failure("timeout");
        assert!(health.is_available());

        assert_eq!(health.record_failure("HTTP 500"), 2);
        assert!(!health.is_available());

        let status = health.status();
        assert!(!status.available);
        assert_eq!(status.last_error.as_deref(), Some("HTTP 500"));
    }

    #[test]
    fn success_clears_consecutive_errors() {
        let health = ProviderHealth::new("openai", 3);
        health.record_failure("boom");
        health.record_failure("boom");
        health.record_success();

        assert_eq!(health.status().error_count, 0);
    }

    #[test]
    fn reset_restores_availability_and_clears_last_error() {
        let health = ProviderHealth::new("serper", 1);
        health.record_failure("quota");
        assert!(!health.is_available());

        health.reset();
        let status = health.status();
        assert!(status.available);
        assert_eq!(status.last_error, None);
    }

    #[test]
    fn zero_threshold_is_clamped_to_one() {
        let health = ProviderHealth::new("anthropic", 0);
        assert!(health.is_available());
        health.record_failure("x");
        assert!(!health.is_available());
    }
}

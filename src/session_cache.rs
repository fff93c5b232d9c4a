//! Per-browser key-value cache used to hand state from one page to the next.

use std::cell::RefCell;
use std::collections::HashMap;

use actix_session::Session;

use crate::models::PendingRegistration;

/// Pending registration reference, set by registration and consumed by the survey.
pub const PENDING_KEY: &str = "pending_registration";
/// Registration id whose survey earned a coupon that has not been claimed yet.
pub const ENTITLEMENT_KEY: &str = "coupon_entitlement";
/// Code already shown to this browser, so a reload redisplays instead of claiming again.
pub const COUPON_CODE_KEY: &str = "coupon_code";
pub const STAGE_KEY: &str = "flow_stage";

pub trait SessionCache {
    fn fetch(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: String) -> Result<(), String>;
    fn evict(&self, key: &str);
}

impl SessionCache for Session {
    fn fetch(&self, key: &str) -> Option<String> {
        self.get::<String>(key).unwrap_or_else(|e| {
            log::warn!("Session read of '{key}' failed: {e}");
            None
        })
    }

    fn put(&self, key: &str, value: String) -> Result<(), String> {
        self.insert(key, value)
            .map_err(|e| format!("Session write of '{key}' failed: {e}"))
    }

    fn evict(&self, key: &str) {
        self.remove(key);
    }
}

/// Cache held in memory; one instance stands in for one browser tab.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionCache for MemoryCache {
    fn fetch(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn put(&self, key: &str, value: String) -> Result<(), String> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn evict(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Read the pending registration. A corrupt entry is dropped and treated as absent.
pub fn pending_registration(cache: &impl SessionCache) -> Option<PendingRegistration> {
    let raw = cache.fetch(PENDING_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(pending) => Some(pending),
        Err(e) => {
            log::warn!("Discarding unreadable pending registration: {e}");
            cache.evict(PENDING_KEY);
            None
        }
    }
}

pub fn store_pending(cache: &impl SessionCache, pending: &PendingRegistration) -> Result<(), String> {
    let json = serde_json::to_string(pending).map_err(|e| e.to_string())?;
    cache.put(PENDING_KEY, json)
}

pub fn clear_pending(cache: &impl SessionCache) {
    cache.evict(PENDING_KEY);
}

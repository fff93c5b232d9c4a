use std::time::Duration;

use super::FlowError;
use crate::models::coupon::generate_code;
use crate::models::CouponMode;
use crate::session_cache::{SessionCache, COUPON_CODE_KEY, ENTITLEMENT_KEY};
use crate::store::{with_timeout, DataStore};

/// Remaining-coupon line under the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Remaining(i64),
    /// The count lookup failed.
    Unknown,
    /// Demo mode has no real pool.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponView {
    Code { code: String, availability: Availability },
    SoldOut,
    /// Surveyed, but this browser holds neither a claim nor an entitlement.
    NotEntitled,
    Unavailable(FlowError),
}

pub struct CouponPresenter<'a> {
    store: &'a dyn DataStore,
    mode: CouponMode,
    timeout: Duration,
}

impl<'a> CouponPresenter<'a> {
    pub fn new(store: &'a dyn DataStore, mode: CouponMode, timeout: Duration) -> Self {
        Self { store, mode, timeout }
    }

    /// Show this browser's coupon, claiming one first if the survey earned it.
    /// A code already shown is redisplayed, never claimed again.
    pub async fn present(&self, cache: &impl SessionCache) -> CouponView {
        if let Some(code) = cache.fetch(COUPON_CODE_KEY) {
            return CouponView::Code { code, availability: self.availability().await };
        }

        let Some(raw) = cache.fetch(ENTITLEMENT_KEY) else {
            return CouponView::NotEntitled;
        };
        let registration_id = raw.parse::<i64>().ok();

        let code = match self.mode {
            CouponMode::Demo => generate_code(),
            CouponMode::Transactional => {
                match with_timeout(self.timeout, self.store.claim_coupon(registration_id)).await {
                    Ok(Some(coupon)) => {
                        log::info!("Coupon #{} claimed by registration {raw}", coupon.id);
                        coupon.code
                    }
                    Ok(None) => {
                        log::warn!("Coupon pool exhausted for registration {raw}");
                        cache.evict(ENTITLEMENT_KEY);
                        return CouponView::SoldOut;
                    }
                    Err(e) => {
                        // Entitlement kept so a reload can retry.
                        log::error!("Coupon claim for registration {raw} failed: {e}");
                        return CouponView::Unavailable(FlowError::RemoteWriteFailed);
                    }
                }
            }
        };

        cache.evict(ENTITLEMENT_KEY);
        if let Err(e) = cache.put(COUPON_CODE_KEY, code.clone()) {
            log::error!("Failed to remember coupon code: {e}");
        }
        CouponView::Code { code, availability: self.availability().await }
    }

    pub async fn availability(&self) -> Availability {
        if self.mode == CouponMode::Demo {
            return Availability::Placeholder;
        }
        match with_timeout(self.timeout, self.store.count_unused_coupons()).await {
            Ok(count) => Availability::Remaining(count),
            Err(e) => {
                log::warn!("Counting unused coupons failed: {e}");
                Availability::Unknown
            }
        }
    }
}

use std::fmt;
use std::str::FromStr;

use crate::session_cache::{
    clear_pending, SessionCache, COUPON_CODE_KEY, ENTITLEMENT_KEY, STAGE_KEY,
};

/// How far this browser has progressed through the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Fresh,
    Registered,
    Surveyed,
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStage::Fresh => write!(f, "fresh"),
            FlowStage::Registered => write!(f, "registered"),
            FlowStage::Surveyed => write!(f, "surveyed"),
        }
    }
}

impl FromStr for FlowStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fresh" => Ok(FlowStage::Fresh),
            "registered" => Ok(FlowStage::Registered),
            "surveyed" => Ok(FlowStage::Surveyed),
            other => Err(format!("unknown flow stage '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Registration,
    Survey,
    Coupon,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Registration => "/",
            Page::Survey => "/survey",
            Page::Coupon => "/coupon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(Page),
}

/// Back-navigation policy: once a step is submitted, earlier pages re-assert the
/// page the browser belongs on.
pub fn guard(page: Page, stage: FlowStage) -> GuardDecision {
    use FlowStage::*;
    use GuardDecision::*;

    match (page, stage) {
        (Page::Registration, Registered) => Redirect(Page::Survey),
        (Page::Registration | Page::Survey, Surveyed) => Redirect(Page::Coupon),
        (Page::Coupon, Fresh) => Redirect(Page::Registration),
        (Page::Coupon, Registered) => Redirect(Page::Survey),
        _ => Render,
    }
}

pub fn current_stage(cache: &impl SessionCache) -> FlowStage {
    cache
        .fetch(STAGE_KEY)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(FlowStage::Fresh)
}

pub fn set_stage(cache: &impl SessionCache, stage: FlowStage) {
    if let Err(e) = cache.put(STAGE_KEY, stage.to_string()) {
        log::error!("Failed to record flow stage {stage}: {e}");
    }
}

/// Forget every flow key so the browser can start a new registration.
pub fn reset(cache: &impl SessionCache) {
    clear_pending(cache);
    cache.evict(ENTITLEMENT_KEY);
    cache.evict(COUPON_CODE_KEY);
    cache.evict(STAGE_KEY);
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

pub const DEMO_CODE_LEN: usize = 8;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub claimed_by: Option<i64>,
}

/// How the coupon page obtains a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponMode {
    /// Claim a pre-seeded coupon from the pool; each code is issued once.
    Transactional,
    /// Generate a display-only code with no persisted claim.
    Demo,
}

impl fmt::Display for CouponMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CouponMode::Transactional => write!(f, "transactional"),
            CouponMode::Demo => write!(f, "demo"),
        }
    }
}

impl FromStr for CouponMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactional" => Ok(CouponMode::Transactional),
            "demo" => Ok(CouponMode::Demo),
            other => Err(format!("unknown coupon mode '{other}'")),
        }
    }
}

/// Random uppercase alphanumeric code of `DEMO_CODE_LEN` characters.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..DEMO_CODE_LEN)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

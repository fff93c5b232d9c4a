use askama::Template;

use super::PageContext;
use crate::workflow::{Availability, CouponView};

#[derive(Template)]
#[template(path = "coupon.html")]
pub struct CouponTemplate {
    pub ctx: PageContext,
    pub code: Option<String>,
    pub availability: String,
    pub sold_out: bool,
    pub banner: Option<String>,
}

impl CouponTemplate {
    pub fn new(ctx: PageContext, view: CouponView) -> Self {
        let mut tmpl = CouponTemplate {
            ctx,
            code: None,
            availability: String::new(),
            sold_out: false,
            banner: None,
        };
        match view {
            CouponView::Code { code, availability } => {
                tmpl.code = Some(code);
                tmpl.availability = match availability {
                    Availability::Remaining(n) => format!("Coupons available: {n}"),
                    Availability::Unknown => "Coupon availability is unavailable right now".to_string(),
                    Availability::Placeholder => "Limited availability".to_string(),
                };
            }
            CouponView::SoldOut => tmpl.sold_out = true,
            CouponView::NotEntitled => {
                tmpl.banner = Some("The coupon for this registration has already been issued.".to_string());
            }
            CouponView::Unavailable(reason) => tmpl.banner = Some(reason.to_string()),
        }
        tmpl
    }
}

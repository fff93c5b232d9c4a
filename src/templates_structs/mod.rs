// Template context structures for Askama templates, one module per page.

use actix_session::Session;

use crate::config::AppConfig;
use crate::csrf;

/// Common context shared by all pages.
/// Templates access these as `ctx.app_name`, `ctx.csrf_token`.
pub struct PageContext {
    pub app_name: String,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session, config: &AppConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            csrf_token: csrf::get_or_create_token(session),
        }
    }
}

mod coupon;
mod registration;
mod survey;

pub use self::coupon::CouponTemplate;
pub use self::registration::{FormErrors, RegistrationTemplate, SelectOption};
pub use self::survey::{ChoiceOption, QuestionRow, SurveyTemplate};

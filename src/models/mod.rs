pub mod coupon;
pub mod registration;
pub mod survey;

pub use coupon::{Coupon, CouponMode};
pub use registration::{NewRegistration, Origin, PendingRegistration, Registration, RegistrationInput};
pub use survey::{NewSurveyResponse, SurveyInput, SurveyResponse};

//! The registration → survey → coupon flow, independent of HTTP.
//!
//! Each page handler constructs the workflow it needs, feeds it the submitted
//! input plus the browser's [`SessionCache`](crate::session_cache::SessionCache),
//! and renders whatever state comes back. No remote fault escapes a workflow:
//! every store error is logged here and mapped to a [`FlowError`].

pub mod coupon;
pub mod guard;
pub mod inflight;
pub mod registration;
pub mod survey;
pub mod validator;

pub use coupon::{Availability, CouponPresenter, CouponView};
pub use guard::{FlowStage, GuardDecision, Page};
pub use inflight::InFlightTickets;
pub use registration::{Field, RegistrationState, RegistrationWorkflow};
pub use survey::{SurveyOutcome, SurveyPage, SurveyWorkflow};
pub use validator::{TicketCheck, TicketStatus, TicketValidator};

/// User-facing failure categories. `Display` is the banner text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// Duplicate or invalid input; the user can correct it.
    #[error("{0}")]
    ValidationBlocked(String),

    /// A lookup could not complete. Blocks submission.
    #[error("We could not verify your ticket right now. Reload the page and try again.")]
    RemoteCheckFailed,

    /// A write could not complete. Safe to resubmit.
    #[error("Something went wrong while saving. Please try again.")]
    RemoteWriteFailed,

    /// The survey was reached without a registration in this session.
    #[error("No registration found for this session. Redirecting to registration...")]
    MissingPrecondition,
}

use crate::config::AppConfig;
use crate::store::SharedStore;
use crate::workflow::{
    CouponPresenter, InFlightTickets, RegistrationWorkflow, SurveyWorkflow, TicketValidator,
};

/// Shared by every worker via `web::Data`.
pub struct AppState {
    pub store: SharedStore,
    pub inflight: InFlightTickets,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: SharedStore, config: AppConfig) -> Self {
        Self { store, inflight: InFlightTickets::new(), config }
    }

    pub fn validator(&self) -> TicketValidator<'_> {
        TicketValidator::new(self.store.as_ref(), self.config.remote_timeout)
    }

    pub fn registration(&self) -> RegistrationWorkflow<'_> {
        RegistrationWorkflow::new(
            self.store.as_ref(),
            &self.inflight,
            self.config.origin,
            self.config.remote_timeout,
        )
    }

    pub fn survey(&self) -> SurveyWorkflow<'_> {
        SurveyWorkflow::new(self.store.as_ref(), self.config.remote_timeout)
    }

    pub fn coupons(&self) -> CouponPresenter<'_> {
        CouponPresenter::new(self.store.as_ref(), self.config.coupon_mode, self.config.remote_timeout)
    }
}

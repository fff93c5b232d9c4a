//! Ticket validation and the registration workflow against the in-memory store.

mod common;

use std::time::Duration;

use ticket_survey::models::registration::NOT_PROVIDED;
use ticket_survey::models::Origin;
use ticket_survey::session_cache::{pending_registration, MemoryCache};
use ticket_survey::store::{DataStore, MemoryStore};
use ticket_survey::workflow::guard::current_stage;
use ticket_survey::workflow::validator::advise;
use ticket_survey::workflow::{
    Field, FlowError, FlowStage, InFlightTickets, RegistrationState, RegistrationWorkflow,
    TicketStatus, TicketValidator,
};
use common::*;

const TIMEOUT: Duration = Duration::from_secs(2);

fn workflow<'a>(store: &'a dyn DataStore, inflight: &'a InFlightTickets) -> RegistrationWorkflow<'a> {
    RegistrationWorkflow::new(store, inflight, Origin::Local, TIMEOUT)
}

#[tokio::test]
async fn test_unregistered_ticket_is_valid() {
    let store = MemoryStore::new();
    let validator = TicketValidator::new(&store, TIMEOUT);

    for ticket in ["T-1", "T-2", "ABC_99"] {
        let check = validator.validate(ticket).await;
        assert_eq!(check.status, TicketStatus::Valid);
        assert!(check.existing.is_none());
    }
}

#[tokio::test]
async fn test_blank_ticket_is_valid_without_lookup() {
    let store = MemoryStore::new();
    store.set_offline(true);
    let validator = TicketValidator::new(&store, TIMEOUT);

    // An offline store would fail any lookup, so Valid proves none happened.
    assert_eq!(validator.validate("   ").await.status, TicketStatus::Valid);
}

#[tokio::test]
async fn test_registered_ticket_is_already_used() {
    let store = MemoryStore::new();
    let inflight = InFlightTickets::new();
    let cache = MemoryCache::new();
    workflow(&store, &inflight).submit(&registration_input(TICKET), &cache).await;

    let check = TicketValidator::new(&store, TIMEOUT).validate(TICKET).await;
    assert_eq!(check.status, TicketStatus::AlreadyUsed);
    assert!(check.message.contains(TICKET));
    assert!(check.message.contains("already registered on"));
    assert_eq!(check.existing.map(|r| r.ticket_id), Some(TICKET.to_string()));
}

#[tokio::test]
async fn test_validate_is_idempotent() {
    let store = MemoryStore::new();
    let validator = TicketValidator::new(&store, TIMEOUT);

    let first = validator.validate(TICKET).await;
    let second = validator.validate(TICKET).await;
    assert_eq!(first.status, second.status);

    let inflight = InFlightTickets::new();
    workflow(&store, &inflight).submit(&registration_input(TICKET), &MemoryCache::new()).await;

    let first = validator.validate(TICKET).await;
    let second = validator.validate(TICKET).await;
    assert_eq!(first.status, TicketStatus::AlreadyUsed);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_lookup_failure_fails_closed() {
    let store = MemoryStore::new();
    store.set_offline(true);

    let check = TicketValidator::new(&store, TIMEOUT).validate(TICKET).await;
    assert_eq!(check.status, TicketStatus::CheckFailed);
    assert!(check.existing.is_none());
    assert!(check.status.blocks_submission());

    let inflight = InFlightTickets::new();
    let cache = MemoryCache::new();
    let state = workflow(&store, &inflight).submit(&registration_input(TICKET), &cache).await;
    assert_eq!(
        state,
        RegistrationState::Blocked { field: Field::TicketId, reason: FlowError::RemoteCheckFailed }
    );
    assert!(pending_registration(&cache).is_none());
}

#[tokio::test]
async fn test_hung_lookup_times_out_as_check_failed() {
    let store = SlowStore::new(Duration::from_millis(500));
    let check = TicketValidator::new(&store, SHORT_TIMEOUT).validate(TICKET).await;
    assert_eq!(check.status, TicketStatus::CheckFailed);
}

#[tokio::test]
async fn test_successful_registration_caches_pending_reference() {
    let store = MemoryStore::new();
    let inflight = InFlightTickets::new();
    let cache = MemoryCache::new();

    let state = workflow(&store, &inflight)
        .submit(&registration_input("  T-1001  "), &cache)
        .await;

    let pending = match state {
        RegistrationState::Submitted(pending) => pending,
        other => panic!("expected submitted, got {other:?}"),
    };
    assert_eq!(pending.ticket_id, TICKET);
    assert_eq!(pending_registration(&cache), Some(pending.clone()));
    assert_eq!(current_stage(&cache), FlowStage::Registered);

    let stored = store.registrations();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, pending.registration_id);
    assert_eq!(stored[0].phone, NOT_PROVIDED);
    assert_eq!(stored[0].referral_source, "friend");
    assert_eq!(stored[0].origin, Origin::Local);
    assert!(!inflight.is_in_flight(TICKET));
}

#[tokio::test]
async fn test_resubmitting_same_ticket_is_blocked() {
    let store = MemoryStore::new();
    let inflight = InFlightTickets::new();
    let wf = workflow(&store, &inflight);

    let first = wf.submit(&registration_input(TICKET), &MemoryCache::new()).await;
    assert!(matches!(first, RegistrationState::Submitted(_)));

    // Back-navigation in the same tab and a brand new tab behave the same.
    let cache = MemoryCache::new();
    let second = wf.submit(&registration_input(TICKET), &cache).await;
    match second {
        RegistrationState::Blocked { field, reason } => {
            assert_eq!(field, Field::TicketId);
            assert!(reason.to_string().contains(TICKET));
        }
        other => panic!("expected blocked, got {other:?}"),
    }
    assert_eq!(store.registrations().len(), 1);
    assert!(pending_registration(&cache).is_none());
}

#[tokio::test]
async fn test_blank_ticket_rejected_at_submit() {
    let store = MemoryStore::new();
    let inflight = InFlightTickets::new();

    let state = workflow(&store, &inflight)
        .submit(&registration_input("   "), &MemoryCache::new())
        .await;
    assert_eq!(
        state,
        RegistrationState::Blocked {
            field: Field::TicketId,
            reason: FlowError::ValidationBlocked("Ticket number is required".to_string()),
        }
    );
    assert!(store.registrations().is_empty());
}

#[tokio::test]
async fn test_invalid_email_blocks_before_lookup() {
    let store = MemoryStore::new();
    store.set_offline(true);
    let inflight = InFlightTickets::new();
    let mut input = registration_input(TICKET);
    input.email = "not-an-email".to_string();

    let state = workflow(&store, &inflight).submit(&input, &MemoryCache::new()).await;
    assert!(matches!(state, RegistrationState::Blocked { field: Field::Email, .. }));
}

#[tokio::test]
async fn test_insert_failure_is_retryable() {
    let store = FlakyWriteStore::new();
    store.fail_writes(true);
    let inflight = InFlightTickets::new();
    let cache = MemoryCache::new();
    let wf = workflow(&store, &inflight);

    let state = wf.submit(&registration_input(TICKET), &cache).await;
    assert_eq!(state, RegistrationState::Failed(FlowError::RemoteWriteFailed));
    assert!(state.submit_enabled());
    assert!(pending_registration(&cache).is_none());
    assert!(!inflight.is_in_flight(TICKET));

    store.fail_writes(false);
    let state = wf.submit(&registration_input(TICKET), &cache).await;
    assert!(matches!(state, RegistrationState::Submitted(_)));
    assert!(pending_registration(&cache).is_some());
}

#[tokio::test]
async fn test_hung_store_leaves_form_editable() {
    // Every store call outlives the limit.
    let store = SlowStore::new(Duration::from_millis(60));
    let inflight = InFlightTickets::new();
    let cache = MemoryCache::new();
    let wf = RegistrationWorkflow::new(&store, &inflight, Origin::Local, SHORT_TIMEOUT);

    let state = wf.submit(&registration_input(TICKET), &cache).await;
    assert!(state.submit_enabled());
    assert!(!matches!(state, RegistrationState::Submitted(_)));
    assert!(pending_registration(&cache).is_none());
}

#[tokio::test]
async fn test_store_uniqueness_violation_reads_as_already_used() {
    // Both sessions pass the lookup; only the store's constraint stops the second.
    let store = StaleReadStore::new();
    let inflight = InFlightTickets::new();
    let wf = workflow(&store, &inflight);

    let first = wf.submit(&registration_input(TICKET), &MemoryCache::new()).await;
    assert!(matches!(first, RegistrationState::Submitted(_)));

    let second = wf.submit(&registration_input(TICKET), &MemoryCache::new()).await;
    match second {
        RegistrationState::Blocked { field, reason } => {
            assert_eq!(field, Field::TicketId);
            assert_eq!(reason.to_string(), format!("Ticket {TICKET} was already registered"));
        }
        other => panic!("expected blocked, got {other:?}"),
    }
    assert_eq!(store.inner.registrations().len(), 1);
}

#[tokio::test]
async fn test_concurrent_submissions_create_one_registration() {
    let store = SlowStore::new(Duration::from_millis(20));
    let inflight = InFlightTickets::new();
    let wf = workflow(&store, &inflight);
    let (cache_a, cache_b) = (MemoryCache::new(), MemoryCache::new());

    let input = registration_input(TICKET);

    let (a, b) = tokio::join!(wf.submit(&input, &cache_a), wf.submit(&input, &cache_b));

    let submitted = [&a, &b]
        .iter()
        .filter(|s| matches!(s, RegistrationState::Submitted(_)))
        .count();
    assert_eq!(submitted, 1, "a={a:?} b={b:?}");
    assert_eq!(store.inner.registrations().len(), 1);
}

#[tokio::test]
async fn test_advisory_toggles_submit() {
    let store = MemoryStore::new();
    let inflight = InFlightTickets::new();
    workflow(&store, &inflight).submit(&registration_input(TICKET), &MemoryCache::new()).await;
    let validator = TicketValidator::new(&store, TIMEOUT);

    let blank = advise(&validator, "").await;
    assert!(blank.submit_enabled);
    assert!(blank.message.is_none());

    let fresh = advise(&validator, "T-2002").await;
    assert!(fresh.submit_enabled);
    assert_eq!(fresh.status, Some(TicketStatus::Valid));

    let taken = advise(&validator, TICKET).await;
    assert!(!taken.submit_enabled);
    assert_eq!(taken.status, Some(TicketStatus::AlreadyUsed));

    let malformed = advise(&validator, "T 1").await;
    assert!(!malformed.submit_enabled);
    assert_eq!(malformed.status, None);
    assert_eq!(
        malformed.message.as_deref(),
        Some("Ticket number may only contain letters, numbers, '-' and '_'")
    );
}

//! Participation engine tests over the in-memory store

mod helpers;

use assert_matches::assert_matches;
use futures::future::join_all;

use community_events::database::MemoryFault;
use community_events::models::{ParticipationStatus, PaymentStatus, UpdateEventRequest};
use community_events::ParticipationError;
use helpers::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_signups_never_exceed_capacity() {
    let (services, _store) = memory_services();
    let capacity = 5;
    let event = create_event(&services, capacity, 0).await;

    let attempts = (1..=(capacity as i64 + 5)).map(|person_id| {
        let services = services.clone();
        let event_id = event.id;
        tokio::spawn(async move { services.signups.volunteer_sign_up(person_id, event_id).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("signup task panicked"))
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let full = results
        .iter()
        .filter(|r| matches!(r, Err(ParticipationError::EventFull { .. })))
        .count();
    assert_eq!(succeeded, capacity as usize);
    assert_eq!(full, 5);

    assert_eq!(services.capacity.volunteer_spots_left(event.id).await.unwrap(), 0);
    assert!(services.capacity.is_volunteer_full(event.id).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_participation_is_rejected() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 3, 0).await;

    services.signups.volunteer_sign_up(7, event.id).await.unwrap();
    assert_matches!(
        services.signups.volunteer_sign_up(7, event.id).await,
        Err(ParticipationError::AlreadySignedUp { person_id: 7, .. })
    );

    // The auto-derived RSVP counts as an RSVP
    assert_matches!(
        services.signups.event_rsvp(7, event.id).await,
        Err(ParticipationError::AlreadyRsvped { person_id: 7, .. })
    );

    services.signups.event_rsvp(8, event.id).await.unwrap();
    assert_matches!(
        services.signups.event_rsvp(8, event.id).await,
        Err(ParticipationError::AlreadyRsvped { person_id: 8, .. })
    );

    let volunteers = services.reports.event_volunteers(event.id).await.unwrap();
    assert_eq!(volunteers.len(), 1);
    let roster = services.reports.event_rsvps(event.id).await.unwrap();
    assert_eq!(roster.len(), 2);
}

#[tokio::test]
async fn test_volunteering_auto_creates_free_rsvp_for_priced_event() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 2, 1000).await;

    let outcome = services.signups.volunteer_sign_up(1, event.id).await.unwrap();

    assert!(outcome.rsvp_auto_created);
    assert!(outcome.rsvp.auto_derived);
    assert_eq!(outcome.rsvp.status, ParticipationStatus::Confirmed);
    assert_eq!(outcome.rsvp.payment_status, PaymentStatus::Free);
    assert_eq!(outcome.rsvp.amount_paid_cents, 0);
    assert_eq!(outcome.signup.status, ParticipationStatus::Confirmed);
    assert_eq!(outcome.volunteer_spots_left, 1);
    assert!(outcome.message.contains("automatically added"));
}

#[tokio::test]
async fn test_volunteering_keeps_existing_rsvp() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 2, 1500).await;

    let rsvp = services.signups.event_rsvp(4, event.id).await.unwrap();
    assert!(rsvp.payment_required);
    assert_eq!(rsvp.rsvp.payment_status, PaymentStatus::Pending);
    assert_eq!(rsvp.amount_due_cents, 1500);
    assert!(rsvp.message.contains("$15.00"));

    let outcome = services.signups.volunteer_sign_up(4, event.id).await.unwrap();
    assert!(!outcome.rsvp_auto_created);
    assert_eq!(outcome.rsvp.id, rsvp.rsvp.id);
    assert_eq!(outcome.rsvp.payment_status, PaymentStatus::Pending);
    assert!(!outcome.rsvp.auto_derived);
}

#[tokio::test]
async fn test_cancel_rsvp_cascades_to_volunteer_signup() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 2, 0).await;
    services.signups.volunteer_sign_up(3, event.id).await.unwrap();

    let outcome = services.cancellations.cancel_rsvp(3, event.id).await.unwrap();

    assert!(outcome.volunteer_signup_cancelled);
    assert_eq!(outcome.rsvp.unwrap().status, ParticipationStatus::Cancelled);
    let signup = outcome.signup.unwrap();
    assert_eq!(signup.status, ParticipationStatus::Cancelled);
    assert!(signup.cancelled_at.is_some());
    assert!(outcome.message.contains("cannot volunteer"));

    let signups = services.reports.person_signups(3).await.unwrap();
    assert!(signups.iter().all(|s| s.status == ParticipationStatus::Cancelled));
    let rsvps = services.reports.person_rsvps(3).await.unwrap();
    assert!(rsvps.iter().all(|r| r.status == ParticipationStatus::Cancelled));

    assert_eq!(services.capacity.volunteer_spots_left(event.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_cancel_rsvp_without_signup_does_not_cascade() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 2, 0).await;
    services.signups.event_rsvp(5, event.id).await.unwrap();

    let outcome = services.cancellations.cancel_rsvp(5, event.id).await.unwrap();
    assert!(!outcome.volunteer_signup_cancelled);
    assert!(outcome.signup.is_none());
    assert!(outcome.message.contains("future events"));
}

#[tokio::test]
async fn test_cancel_volunteer_signup_keeps_rsvp() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 2, 0).await;
    services.signups.volunteer_sign_up(6, event.id).await.unwrap();

    let outcome = services.cancellations.cancel_volunteer_signup(6, event.id).await.unwrap();

    assert_eq!(outcome.signup.unwrap().status, ParticipationStatus::Cancelled);
    assert_eq!(outcome.rsvp.unwrap().status, ParticipationStatus::Confirmed);
    assert!(outcome.message.contains("remain registered"));

    let roster = services.reports.event_rsvps(event.id).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert!(roster[0].rsvp.is_confirmed());
    assert!(!roster[0].is_volunteer);
}

#[tokio::test]
async fn test_cancellations_without_records_are_domain_errors() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 2, 0).await;

    assert_matches!(
        services.cancellations.cancel_volunteer_signup(9, event.id).await,
        Err(ParticipationError::SignupNotFound { person_id: 9, .. })
    );
    assert_matches!(
        services.cancellations.cancel_rsvp(9, event.id).await,
        Err(ParticipationError::RsvpNotFound { person_id: 9, .. })
    );

    // A second cancel finds nothing left to cancel
    services.signups.event_rsvp(9, event.id).await.unwrap();
    services.cancellations.cancel_rsvp(9, event.id).await.unwrap();
    assert_matches!(
        services.cancellations.cancel_rsvp(9, event.id).await,
        Err(ParticipationError::RsvpNotFound { .. })
    );
}

#[tokio::test]
async fn test_cancelled_signup_frees_exactly_one_spot() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 2, 0).await;
    services.signups.volunteer_sign_up(1, event.id).await.unwrap();
    services.signups.volunteer_sign_up(2, event.id).await.unwrap();
    assert_matches!(
        services.signups.volunteer_sign_up(3, event.id).await,
        Err(ParticipationError::EventFull { capacity: 2, .. })
    );

    services.cancellations.cancel_volunteer_signup(1, event.id).await.unwrap();
    assert_eq!(services.capacity.volunteer_spots_left(event.id).await.unwrap(), 1);

    services.signups.volunteer_sign_up(3, event.id).await.unwrap();
    assert_matches!(
        services.signups.volunteer_sign_up(4, event.id).await,
        Err(ParticipationError::EventFull { .. })
    );
}

#[tokio::test]
async fn test_person_can_volunteer_again_after_cancelling() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 1, 0).await;

    services.signups.volunteer_sign_up(1, event.id).await.unwrap();
    services.cancellations.cancel_volunteer_signup(1, event.id).await.unwrap();
    let outcome = services.signups.volunteer_sign_up(1, event.id).await.unwrap();

    // The RSVP survived the volunteer cancellation
    assert!(!outcome.rsvp_auto_created);
    let history = services.reports.person_signups(1).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_spots_left_reads_are_idempotent() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 4, 0).await;
    services.signups.volunteer_sign_up(1, event.id).await.unwrap();

    let first = services.capacity.volunteer_capacity(event.id).await.unwrap();
    let second = services.capacity.volunteer_capacity(event.id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.spots_left, 3);
}

#[tokio::test]
async fn test_event_without_volunteer_capacity_rejects_volunteers() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 0, 0).await;

    assert_matches!(
        services.signups.volunteer_sign_up(1, event.id).await,
        Err(ParticipationError::EventNotAcceptingVolunteers { .. })
    );
    assert!(!services.capacity.is_volunteer_full(event.id).await.unwrap());

    // Attending is still possible
    let rsvp = services.signups.event_rsvp(1, event.id).await.unwrap();
    assert!(!rsvp.payment_required);
    assert_eq!(rsvp.rsvp.payment_status, PaymentStatus::Free);
}

#[tokio::test]
async fn test_missing_and_cancelled_events_are_not_found() {
    let (services, _store) = memory_services();
    assert_matches!(
        services.signups.volunteer_sign_up(1, 404).await,
        Err(ParticipationError::EventNotFound { event_id: 404 })
    );
    assert_matches!(
        services.signups.event_rsvp(1, 404).await,
        Err(ParticipationError::EventNotFound { .. })
    );

    let event = create_event(&services, 3, 0).await;
    services.signups.volunteer_sign_up(1, event.id).await.unwrap();
    services.events.cancel_event(event.id).await.unwrap();

    assert_matches!(
        services.signups.volunteer_sign_up(2, event.id).await,
        Err(ParticipationError::EventNotFound { .. })
    );
    assert_matches!(
        services.capacity.volunteer_spots_left(event.id).await,
        Err(ParticipationError::EventNotFound { .. })
    );
    assert!(services.reports.event_summaries().await.unwrap().is_empty());

    // People can still withdraw from a cancelled event
    let outcome = services.cancellations.cancel_rsvp(1, event.id).await.unwrap();
    assert!(outcome.volunteer_signup_cancelled);
}

#[tokio::test]
async fn test_example_scenario() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 1, 1000).await;
    let (a, b) = (100, 200);

    let signup = services.signups.volunteer_sign_up(a, event.id).await.unwrap();
    assert!(signup.rsvp.auto_derived);
    assert_eq!(signup.rsvp.payment_status, PaymentStatus::Free);

    assert_matches!(
        services.signups.volunteer_sign_up(b, event.id).await,
        Err(ParticipationError::EventFull { .. })
    );

    let rsvp = services.signups.event_rsvp(b, event.id).await.unwrap();
    assert_eq!(rsvp.rsvp.payment_status, PaymentStatus::Pending);

    let cancelled = services.cancellations.cancel_rsvp(a, event.id).await.unwrap();
    assert!(cancelled.volunteer_signup_cancelled);
    assert_eq!(services.capacity.volunteer_spots_left(event.id).await.unwrap(), 1);

    let signup = services.signups.volunteer_sign_up(b, event.id).await.unwrap();
    assert!(!signup.rsvp_auto_created);
    assert_eq!(signup.rsvp.id, rsvp.rsvp.id);
}

#[tokio::test]
async fn test_failed_rsvp_insert_leaves_no_signup_behind() {
    let (services, store) = memory_services();
    let event = create_event(&services, 2, 0).await;

    store.inject_fault(MemoryFault::InsertRsvp);
    let result = services.signups.volunteer_sign_up(1, event.id).await;
    assert_matches!(result, Err(ParticipationError::StorageUnavailable(_)));

    assert!(services.reports.person_signups(1).await.unwrap().is_empty());
    assert!(services.reports.person_rsvps(1).await.unwrap().is_empty());
    assert_eq!(services.capacity.volunteer_spots_left(event.id).await.unwrap(), 2);

    // Nothing stale blocks a retry
    services.signups.volunteer_sign_up(1, event.id).await.unwrap();
}

#[tokio::test]
async fn test_unavailable_store_is_surfaced_for_caller_retry() {
    let (services, store) = memory_services();
    let event = create_event(&services, 2, 0).await;

    store.inject_fault(MemoryFault::Unavailable);
    let err = services.signups.event_rsvp(1, event.id).await.unwrap_err();
    assert!(err.is_recoverable());
    assert!(!err.is_domain());

    services.signups.event_rsvp(1, event.id).await.unwrap();
}

#[tokio::test]
async fn test_transaction_conflict_is_retried() {
    let (services, store) = memory_services();
    let event = create_event(&services, 2, 0).await;

    store.inject_fault(MemoryFault::CommitConflict);
    let outcome = services.signups.volunteer_sign_up(1, event.id).await.unwrap();
    assert!(outcome.rsvp_auto_created);
    assert_eq!(services.reports.event_volunteers(event.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_persistent_conflict_surfaces_transaction_conflict() {
    let (services, store) = memory_services();
    let event = create_event(&services, 2, 0).await;

    // One attempt plus three retries
    for _ in 0..4 {
        store.inject_fault(MemoryFault::CommitConflict);
    }
    assert_matches!(
        services.signups.event_rsvp(1, event.id).await,
        Err(ParticipationError::TransactionConflict(msg)) if msg.contains("after 4 attempts")
    );
    assert!(services.reports.person_rsvps(1).await.unwrap().is_empty());

    services.signups.event_rsvp(1, event.id).await.unwrap();
}

#[tokio::test]
async fn test_payment_side_channel_transitions() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 2, 2500).await;

    let pending = services.signups.event_rsvp(1, event.id).await.unwrap().rsvp;
    let paid = services.payments.complete_payment(pending.id, 2500).await.unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Completed);
    assert_eq!(paid.amount_paid_cents, 2500);
    assert!(paid.payment_updated_at.is_some());
    assert_matches!(
        services.payments.fail_payment(pending.id).await,
        Err(ParticipationError::InvalidPaymentTransition {
            from: PaymentStatus::Completed,
            to: PaymentStatus::Failed,
            ..
        })
    );

    let other = services.signups.event_rsvp(2, event.id).await.unwrap().rsvp;
    let failed = services.payments.fail_payment(other.id).await.unwrap();
    assert_eq!(failed.payment_status, PaymentStatus::Failed);
    assert!(failed.is_confirmed());

    // Volunteers never owe anything
    let volunteer = services.signups.volunteer_sign_up(3, event.id).await.unwrap().rsvp;
    assert_matches!(
        services.payments.complete_payment(volunteer.id, 2500).await,
        Err(ParticipationError::InvalidPaymentTransition { from: PaymentStatus::Free, .. })
    );

    assert_matches!(
        services.payments.complete_payment(9999, 100).await,
        Err(ParticipationError::RsvpRecordNotFound { rsvp_id: 9999 })
    );
    assert_matches!(
        services.payments.complete_payment(other.id, -1).await,
        Err(ParticipationError::InvalidInput(_))
    );

    let stats = services.reports.stats().await.unwrap();
    assert_eq!(stats.collected_cents, 2500);
    assert_eq!(stats.pending_payments, 0);
}

#[tokio::test]
async fn test_failed_payment_can_be_completed_later() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 1, 1500).await;
    services.signups.volunteer_sign_up(7, event.id).await.unwrap();

    let guest = services.signups.event_rsvp(8, event.id).await.unwrap().rsvp;
    let declined = services.payments.fail_payment(guest.id).await.unwrap();
    assert_eq!(declined.payment_status, PaymentStatus::Failed);
    assert_matches!(
        services.payments.fail_payment(guest.id).await,
        Err(ParticipationError::InvalidPaymentTransition { from: PaymentStatus::Failed, .. })
    );

    let paid = services.payments.complete_payment(guest.id, 1500).await.unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Completed);
    assert_eq!(paid.amount_paid_cents, 1500);
    assert!(paid.is_confirmed());

    // The retry touches neither the RSVP status nor anyone's volunteer signup
    assert_eq!(services.reports.event_volunteers(event.id).await.unwrap().len(), 1);
    assert_eq!(services.capacity.volunteer_spots_left(event.id).await.unwrap(), 0);
    assert_eq!(services.reports.stats().await.unwrap().collected_cents, 1500);
}

#[tokio::test]
async fn test_admin_capacity_cannot_drop_below_confirmed_volunteers() {
    let (services, _store) = memory_services();
    let event = create_event(&services, 3, 0).await;
    services.signups.volunteer_sign_up(1, event.id).await.unwrap();
    services.signups.volunteer_sign_up(2, event.id).await.unwrap();

    let shrink = UpdateEventRequest {
        volunteer_capacity: Some(1),
        ..Default::default()
    };
    assert_matches!(
        services.events.update_event(event.id, shrink).await,
        Err(ParticipationError::InvalidInput(_))
    );

    let shrink = UpdateEventRequest {
        volunteer_capacity: Some(2),
        ..Default::default()
    };
    let updated = services.events.update_event(event.id, shrink).await.unwrap();
    assert_eq!(updated.volunteer_capacity, 2);
    assert!(services.capacity.is_volunteer_full(event.id).await.unwrap());
}

#[tokio::test]
async fn test_reporting_summaries_and_stats() {
    let (services, _store) = memory_services();
    let dinner = create_event(&services, 3, 0).await;
    let gala = create_event(&services, 1, 5000).await;

    services.signups.volunteer_sign_up(1, dinner.id).await.unwrap();
    services.signups.volunteer_sign_up(1, gala.id).await.unwrap();
    services.signups.volunteer_sign_up(2, dinner.id).await.unwrap();
    services.signups.event_rsvp(3, gala.id).await.unwrap();

    let summaries = services.reports.event_summaries().await.unwrap();
    assert_eq!(summaries.len(), 2);
    let dinner_summary = summaries.iter().find(|s| s.event.id == dinner.id).unwrap();
    assert_eq!(dinner_summary.confirmed_volunteers, 2);
    assert_eq!(dinner_summary.confirmed_rsvps, 2);
    assert_eq!(dinner_summary.volunteer_spots_left, 1);

    let roster = services.reports.event_rsvps(gala.id).await.unwrap();
    let volunteer_flags: Vec<(i64, bool)> = roster.iter().map(|r| (r.rsvp.person_id, r.is_volunteer)).collect();
    assert!(volunteer_flags.contains(&(1, true)));
    assert!(volunteer_flags.contains(&(3, false)));

    let stats = services.reports.stats().await.unwrap();
    assert_eq!(stats.active_events, 2);
    assert_eq!(stats.active_volunteers, 2);
    assert_eq!(stats.confirmed_signups, 3);
    assert_eq!(stats.confirmed_rsvps, 4);
    assert_eq!(stats.pending_payments, 1);
    assert_eq!(stats.collected_cents, 0);

    assert_matches!(
        services.reports.event_volunteers(404).await,
        Err(ParticipationError::EventNotFound { .. })
    );
}

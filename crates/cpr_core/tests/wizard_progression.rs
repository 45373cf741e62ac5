use std::sync::Arc;

use cpr_core::domain::{ListField, ScalarField};
use cpr_core::error::codes;
use cpr_core::validate::FixedClock;
use cpr_core::wizard::{Action, GenerationOutcome, GenerationState, Session, Step};
use cpr_core::fallback::fallback_report;
use time::macros::datetime;

fn session() -> Session {
    Session::new(Arc::new(FixedClock(datetime!(2024-06-01 12:00 UTC))))
}

fn fill_to_review(s: &mut Session) -> Vec<Action> {
    s.set_field(ScalarField::Date, "2024-01-15");
    s.set_field(ScalarField::Time, "14:30");
    assert!(s.advance().is_empty());
    s.set_field(ScalarField::Narrative, "A".repeat(20));
    assert!(s.advance().is_empty());
    s.toggle_array_item(ListField::Parties, "Co-parent");
    assert!(s.advance().is_empty());
    s.set_field(ScalarField::Jurisdiction, "Ontario, Canada");
    s.advance()
}

fn ticket_id(actions: &[Action]) -> u64 {
    match actions {
        [Action::Generate(t)] => t.id,
        other => panic!("expected one generate action, got {other:?}"),
    }
}

#[test]
fn advance_is_gated_per_step() {
    let mut s = session();
    assert_eq!(s.step(), Step::DateTime);

    s.set_field(ScalarField::Date, "2024-01-15");
    assert!(!s.can_advance());
    s.advance();
    assert_eq!(s.step(), Step::DateTime);

    s.set_field(ScalarField::Time, "14:30");
    assert!(s.can_advance());
    s.set_field(ScalarField::Time, "");
    assert!(!s.can_advance(), "clearing a satisfied field must close the gate again");
    s.set_field(ScalarField::Time, "14:30");
    s.advance();
    assert_eq!(s.step(), Step::Narrative);

    s.set_field(ScalarField::Narrative, "   short    ");
    assert!(!s.can_advance());
    s.set_field(ScalarField::Narrative, "exactly 11c");
    assert!(s.can_advance());
    s.advance();
    assert_eq!(s.step(), Step::Parties);

    assert!(!s.can_advance());
    s.toggle_array_item(ListField::Parties, "Ex-spouse");
    assert!(s.can_advance());
    s.toggle_array_item(ListField::Parties, "Ex-spouse");
    assert!(!s.can_advance());
    s.toggle_array_item(ListField::Parties, "Ex-spouse");
    s.advance();
    assert_eq!(s.step(), Step::Location);

    assert!(!s.can_advance());
    s.set_field(ScalarField::Jurisdiction, "Alberta, Canada");
    assert!(s.can_advance());
}

#[test]
fn future_date_blocks_first_step_with_message() {
    let mut s = session();
    s.set_field(ScalarField::Date, "2099-01-01");
    s.set_field(ScalarField::Time, "10:00");
    assert!(!s.can_advance());
    assert_eq!(
        s.validation_message(),
        "The incident date and time cannot be in the future."
    );
    assert!(s.advance().is_empty());
    assert_eq!(s.step(), Step::DateTime);
}

#[test]
fn entering_review_twice_generates_once() {
    let mut s = session();
    let actions = fill_to_review(&mut s);
    assert_eq!(s.step(), Step::Review);
    let id = ticket_id(&actions);
    assert_eq!(s.generation(), GenerationState::InFlight { ticket: id });

    // Back and forward again while the first request is still pending.
    s.retreat();
    assert!(s.advance().is_empty());

    let report = fallback_report(s.data());
    assert!(s.complete_generation(id, GenerationOutcome::Succeeded(report)));

    s.retreat();
    assert!(s.advance().is_empty(), "a report already exists");
    assert_eq!(s.step(), Step::Review);
}

#[test]
fn advance_at_review_is_noop() {
    let mut s = session();
    let id = ticket_id(&fill_to_review(&mut s));
    s.complete_generation(id, GenerationOutcome::Succeeded(fallback_report(s.data())));
    assert!(s.advance().is_empty());
    assert_eq!(s.step(), Step::Review);
}

#[test]
fn regenerate_is_rejected_while_in_flight() {
    let mut s = session();
    let first = ticket_id(&fill_to_review(&mut s));

    let err = s.regenerate().expect_err("in flight");
    assert_eq!(err.code, codes::GENERATION_IN_FLIGHT);

    s.complete_generation(first, GenerationOutcome::Succeeded(fallback_report(s.data())));
    let second = ticket_id(&s.regenerate().expect("idle again"));
    assert!(second > first);
    assert_eq!(s.generation(), GenerationState::InFlight { ticket: second });
    assert!(s.report().is_some(), "previous report stays until the new one lands");
}

#[test]
fn regenerate_outside_review_is_rejected() {
    let mut s = session();
    let err = s.regenerate().expect_err("step 1");
    assert_eq!(err.code, codes::WIZARD_NOT_ON_REVIEW);
}

#[test]
fn retreat_keeps_report_and_stops_at_first_step() {
    let mut s = session();
    let id = ticket_id(&fill_to_review(&mut s));
    s.complete_generation(id, GenerationOutcome::Succeeded(fallback_report(s.data())));

    for _ in 0..10 {
        s.retreat();
    }
    assert_eq!(s.step(), Step::DateTime);
    assert!(s.report().is_some());
}

#[test]
fn restart_clears_everything_and_orphans_pending_generation() {
    let mut s = session();
    let id = ticket_id(&fill_to_review(&mut s));
    s.set_custom_buffer(ListField::Children, "Sam");

    s.restart();
    assert_eq!(s.step(), Step::DateTime);
    assert_eq!(s.data(), &cpr_core::domain::IncidentData::default());
    assert!(s.report().is_none());
    assert_eq!(s.generation(), GenerationState::Idle);
    assert_eq!(s.custom_buffer(ListField::Children), "");

    let late = GenerationOutcome::Succeeded(fallback_report(&Default::default()));
    assert!(!s.complete_generation(id, late));
    assert!(s.report().is_none());
}

#[test]
fn failed_generation_is_recorded_as_substituted() {
    let mut s = session();
    let actions = fill_to_review(&mut s);
    let Action::Generate(ticket) = &actions[0];
    let outcome = GenerationOutcome::from_result(
        &ticket.data,
        Err(cpr_core::error::AppError::new(codes::AI_REQUEST_FAILED, "boom")),
    );
    assert!(s.complete_generation(ticket.id, outcome));
    assert_eq!(s.generation(), GenerationState::FailedAndSubstituted);
    assert_eq!(s.report(), Some(&fallback_report(&ticket.data)));
}

#[test]
fn ticket_snapshot_is_frozen() {
    let mut s = session();
    let actions = fill_to_review(&mut s);
    let Action::Generate(ticket) = &actions[0];
    s.set_field(ScalarField::Narrative, "changed after the request was issued");
    assert_eq!(ticket.data.narrative, "A".repeat(20));
}

#[test]
fn status_reflects_gates() {
    let mut s = session();
    let status = s.status();
    assert_eq!(status.step, Step::DateTime);
    assert_eq!(status.step_title, "Date & Time");
    assert!(!status.can_advance);
    assert!(!status.export_enabled);

    let id = ticket_id(&fill_to_review(&mut s));
    let status = s.status();
    assert_eq!(status.step_title, "Review & Export");
    assert!(!status.regenerate_enabled);
    assert!(!status.export_enabled);

    s.complete_generation(id, GenerationOutcome::Succeeded(fallback_report(s.data())));
    let status = s.status();
    assert!(status.regenerate_enabled);
    assert!(status.export_enabled);
    assert!(status.has_report);
}

#[test]
fn forward_label_changes_on_location_step() {
    assert_eq!(Step::Narrative.forward_label(), "Continue");
    assert_eq!(Step::Location.forward_label(), "Analyze Incident");
}

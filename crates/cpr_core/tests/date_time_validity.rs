use cpr_core::domain::IncidentData;
use cpr_core::validate::{can_advance, date_time_validity, validation_message, DateTimeValidity, InvalidReason};
use cpr_core::wizard::Step;
use time::macros::datetime;
use time::OffsetDateTime;

const NOW: OffsetDateTime = datetime!(2024-06-01 12:00 +02:00);

#[test]
fn far_future_is_rejected_with_future_reason() {
    let v = date_time_validity("2099-01-01", "10:00", NOW);
    assert_eq!(v, DateTimeValidity::Invalid(InvalidReason::InFuture));
    assert_eq!(InvalidReason::InFuture.as_str(), "cannot be in the future");
}

#[test]
fn unset_time_is_valid_regardless_of_date() {
    for date in ["2099-01-01", "garbage", ""] {
        assert_eq!(date_time_validity(date, "", NOW), DateTimeValidity::Valid);
    }
}

#[test]
fn wall_time_is_read_in_the_clock_offset() {
    // 12:30 local is later than 12:00 local even though it is earlier in UTC than 12:00 UTC.
    assert_eq!(
        date_time_validity("2024-06-01", "12:30", NOW),
        DateTimeValidity::Invalid(InvalidReason::InFuture)
    );
    assert!(date_time_validity("2024-06-01", "11:59", NOW).is_valid());
}

#[test]
fn invalid_reason_surfaces_as_message() {
    let data = IncidentData {
        date: "2024-13-01".to_string(),
        time: "10:00".to_string(),
        ..Default::default()
    };
    assert_eq!(validation_message(&data, NOW), "Please enter a valid date and time.");
    assert!(!can_advance(Step::DateTime, &data, NOW));
}

#[test]
fn review_step_always_advances() {
    assert!(can_advance(Step::Review, &IncidentData::default(), NOW));
}

#[test]
fn validity_serializes_as_tagged_status() {
    let v = serde_json::to_value(DateTimeValidity::Invalid(InvalidReason::InFuture)).expect("json");
    assert_eq!(v, serde_json::json!({"status": "invalid", "reason": "in_future"}));
    let v = serde_json::to_value(DateTimeValidity::Valid).expect("json");
    assert_eq!(v, serde_json::json!({"status": "valid"}));
}

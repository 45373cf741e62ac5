use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::domain::IncidentData;
use crate::wizard::Step;

/// Source of "now" for the future-date rule and evidence capture timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in the local offset, or UTC when the local offset cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    Unparseable,
    InFuture,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::Unparseable => "invalid date/time",
            InvalidReason::InFuture => "cannot be in the future",
        }
    }

    /// Message shown under the date/time pickers.
    pub fn user_message(&self) -> &'static str {
        match self {
            InvalidReason::Unparseable => "Please enter a valid date and time.",
            InvalidReason::InFuture => "The incident date and time cannot be in the future.",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DateTimeValidity {
    Valid,
    Invalid(InvalidReason),
}

impl DateTimeValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, DateTimeValidity::Valid)
    }
}

pub(crate) fn parse_date(date: &str) -> Option<Date> {
    Date::parse(date, format_description!("[year]-[month]-[day]")).ok()
}

fn parse_time(time: &str) -> Option<Time> {
    Time::parse(time, format_description!("[hour]:[minute]"))
        .or_else(|_| Time::parse(time, format_description!("[hour]:[minute]:[second]")))
        .ok()
}

/// Combine `date` (`YYYY-MM-DD`) and `time` (`HH:MM`, 24h) in the offset of `now`.
pub fn combine_date_time(date: &str, time: &str, now: OffsetDateTime) -> Option<OffsetDateTime> {
    let d = parse_date(date)?;
    let t = parse_time(time)?;
    Some(PrimitiveDateTime::new(d, t).assume_offset(now.offset()))
}

/// The "not in the future" rule. Unset values make no claim yet and are valid.
pub fn date_time_validity(date: &str, time: &str, now: OffsetDateTime) -> DateTimeValidity {
    if date.is_empty() || time.is_empty() {
        return DateTimeValidity::Valid;
    }
    match combine_date_time(date, time, now) {
        None => DateTimeValidity::Invalid(InvalidReason::Unparseable),
        Some(at) if at > now => DateTimeValidity::Invalid(InvalidReason::InFuture),
        Some(_) => DateTimeValidity::Valid,
    }
}

/// Message for the date/time step; empty when there is nothing to report.
pub fn validation_message(data: &IncidentData, now: OffsetDateTime) -> &'static str {
    match date_time_validity(&data.date, &data.time, now) {
        DateTimeValidity::Valid => "",
        DateTimeValidity::Invalid(reason) => reason.user_message(),
    }
}

pub const MIN_NARRATIVE_CHARS: usize = 10;

/// Whether the wizard may leave `step` going forward with the given data.
pub fn can_advance(step: Step, data: &IncidentData, now: OffsetDateTime) -> bool {
    match step {
        Step::DateTime => {
            !data.date.is_empty()
                && !data.time.is_empty()
                && date_time_validity(&data.date, &data.time, now).is_valid()
        }
        Step::Narrative => data.narrative.trim().chars().count() > MIN_NARRATIVE_CHARS,
        Step::Parties => !data.parties.is_empty(),
        Step::Location => !data.jurisdiction.is_empty(),
        Step::Review => true,
    }
}

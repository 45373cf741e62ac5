#![allow(dead_code)]

use std::sync::Arc;

use coparentreport_lib::{GenerationMode, ReportSessionController, SharedGenerator, SharedWriter};
use cpr_core::domain::{Category, ListField, ReportData, ScalarField, Severity};
use cpr_core::layout::PageLayout;
use cpr_core::validate::FixedClock;
use time::macros::datetime;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn controller(
    generator: SharedGenerator,
    writer: SharedWriter,
    mode: GenerationMode,
) -> ReportSessionController {
    init_logging();
    ReportSessionController::new(
        Arc::new(FixedClock(datetime!(2024-06-01 12:00 UTC))),
        generator,
        writer,
        PageLayout::default(),
        mode,
    )
    .expect("controller")
}

/// Fill steps 1 through 4 and advance onto the review step.
pub fn fill_to_review(c: &ReportSessionController) {
    c.set_field(ScalarField::Date, "2024-01-15".to_string())
        .expect("date");
    c.set_field(ScalarField::Time, "14:30".to_string())
        .expect("time");
    assert!(c.status().expect("status").can_advance);
    c.advance().expect("advance 1");

    c.set_field(ScalarField::Narrative, "A".repeat(20))
        .expect("narrative");
    assert!(c.status().expect("status").can_advance);
    c.advance().expect("advance 2");

    c.toggle_item(ListField::Parties, "Co-parent").expect("party");
    assert!(c.status().expect("status").can_advance);
    c.advance().expect("advance 3");

    c.set_field(ScalarField::Jurisdiction, "Ontario, Canada".to_string())
        .expect("jurisdiction");
    let status = c.status().expect("status");
    assert!(status.can_advance);
    assert_eq!(status.forward_label, "Analyze Incident");
    c.advance().expect("advance 4");
}

pub fn good_report() -> ReportData {
    ReportData {
        title: "Late pickup".to_string(),
        category: Category::ScheduleViolations,
        severity: Severity::Medium,
        severity_justification: "Repeated lateness.".to_string(),
        professional_summary: "The co-parent arrived two hours late.".to_string(),
        observed_impact: "The child waited at school.".to_string(),
        legal_insights: "Parenting schedules are enforceable.".to_string(),
        sources: vec!["ontario.ca".to_string(), "justice.gc.ca".to_string()],
        ai_notes: "Keep a log of pickup times.".to_string(),
    }
}

use std::sync::Arc;

use cpr_core::domain::{ListField, ScalarField, SelectedFile};
use cpr_core::validate::FixedClock;
use cpr_core::wizard::{Action, Session};
use time::macros::datetime;

fn session() -> Session {
    Session::new(Arc::new(FixedClock(datetime!(2024-06-01 12:00 UTC))))
}

fn files(n: usize) -> Vec<SelectedFile> {
    (0..n)
        .map(|i| SelectedFile {
            name: format!("file-{i}.jpg"),
            mime_type: "image/jpeg".to_string(),
            bytes: vec![i as u8; 8],
        })
        .collect()
}

#[test]
fn removing_evidence_releases_its_blob() {
    let mut s = session();
    s.add_evidence(files(3));
    let removed_id = s.data().evidence[1].content.id();
    assert_eq!(s.evidence_registry().live_count(), 3);

    s.remove_evidence(1);
    assert!(!s.evidence_registry().is_live(removed_id));
    assert_eq!(s.evidence_registry().live_count(), 2);
}

#[test]
fn restart_releases_all_blobs() {
    let mut s = session();
    s.add_evidence(files(4));
    s.restart();
    assert_eq!(s.evidence_registry().live_count(), 0);
}

#[test]
fn held_snapshot_delays_release_until_dropped() {
    let mut s = session();
    s.add_evidence(files(1));
    let snapshot = s.snapshot();
    let id = snapshot.evidence[0].content.id();

    s.restart();
    assert!(s.evidence_registry().is_live(id), "snapshot still references the blob");

    drop(snapshot);
    assert!(!s.evidence_registry().is_live(id));
    assert_eq!(s.evidence_registry().live_count(), 0);
}

#[test]
fn registry_records_content_digest() {
    let mut s = session();
    s.add_evidence(vec![SelectedFile {
        name: "note.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: b"abc".to_vec(),
    }]);
    let live = s.evidence_registry().live();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].len, 3);
    assert_eq!(
        live[0].sha256,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn pending_generation_ticket_does_not_hold_evidence() {
    let mut s = session();
    s.set_field(ScalarField::Date, "2024-01-15");
    s.set_field(ScalarField::Time, "14:30");
    s.advance();
    s.set_field(ScalarField::Narrative, "A detailed enough account.");
    s.advance();
    s.toggle_array_item(ListField::Parties, "Co-parent");
    s.advance();
    s.set_field(ScalarField::Jurisdiction, "Ontario, Canada");
    s.add_evidence(files(2));

    let actions = s.advance();
    let Action::Generate(ticket) = &actions[0];
    assert_eq!(ticket.evidence_count, 2);
    assert!(ticket.data.evidence.is_empty());
    assert_eq!(ticket.data.jurisdiction, "Ontario, Canada");

    s.restart();
    assert_eq!(s.evidence_registry().live_count(), 0);
}

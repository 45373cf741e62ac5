use cpr_ai::report::prompts::incident_report_prompt;
use cpr_ai::report::{ReportRequest, CHILDREN_PLACEHOLDER};
use cpr_core::domain::{EvidenceFile, IncidentData};
use cpr_core::evidence::EvidenceRegistry;
use pretty_assertions::assert_eq;

fn incident() -> IncidentData {
    IncidentData {
        date: "2024-01-15".to_string(),
        time: "14:30".to_string(),
        narrative: "Pickup was 2 hours late.\nNo message was sent.".to_string(),
        parties: vec!["Co-parent".to_string(), "Step-parent".to_string()],
        children: vec![],
        jurisdiction: "Ontario, Canada".to_string(),
        evidence: vec![],
    }
}

#[test]
fn request_joins_lists_and_uses_placeholder() {
    let req = ReportRequest::from_incident(&incident());
    assert_eq!(req.parties, "Co-parent, Step-parent");
    assert_eq!(req.children, CHILDREN_PLACEHOLDER);
    assert_eq!(req.children, "None specified");
    assert_eq!(req.evidence_count, 0);
    assert_eq!(req.narrative, "Pickup was 2 hours late.\nNo message was sent.");
}

#[test]
fn request_counts_evidence_without_contents() {
    let registry = EvidenceRegistry::new();
    let mut data = incident();
    data.children = vec!["Child 1".to_string(), "Child 2".to_string()];
    for name in ["a.jpg", "b.pdf"] {
        let content = registry.acquire(b"secret bytes".to_vec());
        data.evidence.push(EvidenceFile {
            name: name.to_string(),
            size: content.len(),
            mime_type: "application/octet-stream".to_string(),
            captured_at: "2024-01-15 15:00:00".to_string(),
            content,
        });
    }

    let req = ReportRequest::from_incident(&data);
    assert_eq!(req.children, "Child 1, Child 2");
    assert_eq!(req.evidence_count, 2);

    let prompt = incident_report_prompt(&req);
    assert!(prompt.contains("- Evidence Attached: 2 file(s)"));
    assert!(!prompt.contains("secret bytes"));
    assert!(!prompt.contains("a.jpg"));
}

#[test]
fn prompt_carries_incident_details_verbatim() {
    let prompt = incident_report_prompt(&ReportRequest::from_incident(&incident()));
    for expected in [
        "- Date: 2024-01-15",
        "- Time: 14:30",
        "- Jurisdiction: Ontario, Canada",
        "- Parties Involved: Co-parent, Step-parent",
        "- Children Present/Affected: None specified",
        "- Original Account: Pickup was 2 hours late.\nNo message was sent.",
        "family law in Ontario, Canada.",
    ] {
        assert!(prompt.contains(expected), "missing {expected:?}");
    }
}

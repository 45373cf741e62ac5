//! Fixed choice lists offered by the wizard.

pub const STEP_TITLES: [&str; 5] = [
    "Date & Time",
    "What Happened",
    "Who Was Involved",
    "Location & Evidence",
    "Review & Export",
];

pub const PREDEFINED_PARTIES: [&str; 5] = [
    "Ex-spouse",
    "Co-parent",
    "Their new partner",
    "Grandparent",
    "Other family member",
];

pub const PREDEFINED_CHILDREN: [&str; 3] = ["Child 1", "Child 2", "Child 3"];

pub const JURISDICTIONS: [&str; 6] = [
    "Ontario, Canada",
    "British Columbia, Canada",
    "Alberta, Canada",
    "Quebec, Canada",
    "Other Canadian Province",
    "US State - Please specify",
];

/// Advertised to the file chooser only; the core accepts any file.
pub const EVIDENCE_ACCEPT: &str = "image/*,.pdf,.doc,.docx";

use std::sync::Arc;

use crate::domain::{EvidenceFile, IncidentData, ListField, ScalarField};

/// Holds the form state for one incident session.
///
/// Readers take `snapshot()`; every mutation copies the aggregate when a snapshot is still held,
/// so a snapshot never changes after it was taken.
#[derive(Debug, Clone, Default)]
pub struct IncidentStore {
    data: Arc<IncidentData>,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &IncidentData {
        &self.data
    }

    pub fn snapshot(&self) -> Arc<IncidentData> {
        Arc::clone(&self.data)
    }

    fn edit(&mut self) -> &mut IncidentData {
        Arc::make_mut(&mut self.data)
    }

    pub fn set_field(&mut self, field: ScalarField, value: impl Into<String>) {
        *self.edit().scalar_mut(field) = value.into();
    }

    /// Adds `item` when absent, removes it when present.
    pub fn toggle_array_item(&mut self, field: ListField, item: &str) {
        let list = self.edit().list_mut(field);
        if let Some(pos) = list.iter().position(|x| x == item) {
            list.remove(pos);
        } else {
            list.push(item.to_string());
        }
    }

    /// Appends the trimmed value unless it is blank or already present (exact match).
    ///
    /// Returns whether the list changed.
    pub fn add_custom_item(&mut self, field: ListField, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.data.list(field).iter().any(|x| x == value) {
            return false;
        }
        self.edit().list_mut(field).push(value.to_string());
        true
    }

    pub fn add_evidence(&mut self, files: Vec<EvidenceFile>) {
        if files.is_empty() {
            return;
        }
        self.edit().evidence.extend(files);
    }

    /// Removes the entry at `index`. Returns `false` when the index is out of range.
    pub fn remove_evidence(&mut self, index: usize) -> bool {
        if index >= self.data.evidence.len() {
            return false;
        }
        self.edit().evidence.remove(index);
        true
    }

    pub fn reset(&mut self) {
        self.data = Arc::new(IncidentData::default());
    }
}

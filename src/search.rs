use serde::Serialize;

use crate::model::{MappingRecord, MappingStatus};

/// Free-text search across the identifying fields of a mapping plus an optional status gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickSearch {
    text: String,
    status: Option<MappingStatus>,
}

impl QuickSearch {
    pub fn new(text: &str, status: Option<MappingStatus>) -> Self {
        QuickSearch {
            text: text.trim().to_lowercase(),
            status,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.text.is_empty() && self.status.is_none()
    }

    pub fn matches(&self, record: &MappingRecord) -> bool {
        if let Some(status) = self.status
            && record.status != status
        {
            return false;
        }
        if self.text.is_empty() {
            return true;
        }
        let source = &record.source_column;
        let target = &record.target_column;
        [
            source.malcode.as_str(),
            source.table.as_str(),
            source.column.as_str(),
            target.malcode.as_str(),
            target.table.as_str(),
            target.column.as_str(),
            record.transformation.as_deref().unwrap_or(""),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&self.text))
    }

    /// Owned copies of the matching rows, in input order.
    pub fn apply(&self, records: &[MappingRecord]) -> Vec<MappingRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
    pub draft: usize,
}

impl StatusCounts {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a MappingRecord>) -> Self {
        let mut counts = StatusCounts::default();
        for record in records {
            match record.status {
                MappingStatus::Approved => counts.approved += 1,
                MappingStatus::Pending => counts.pending += 1,
                MappingStatus::Rejected => counts.rejected += 1,
                MappingStatus::Draft => counts.draft += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: MappingStatus) -> usize {
        match status {
            MappingStatus::Approved => self.approved,
            MappingStatus::Pending => self.pending,
            MappingStatus::Rejected => self.rejected,
            MappingStatus::Draft => self.draft,
        }
    }

    pub fn total(&self) -> usize {
        self.approved + self.pending + self.rejected + self.draft
    }
}

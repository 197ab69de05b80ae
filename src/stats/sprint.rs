//! Per-sprint story completion counts.

use crate::tracker::Issue;

/// One sprint's story totals. Sprints are reported in the order the board
/// listing returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintSummary {
    pub name: String,
    pub total_stories: usize,
    pub completed_stories: usize,
}

impl SprintSummary {
    pub fn empty(name: &str) -> Self {
        Self { name: name.to_string(), total_stories: 0, completed_stories: 0 }
    }
}

pub fn sprint_statistics(name: &str, issues: &[Issue], done_status: &str) -> SprintSummary {
    let completed = issues.iter().filter(|i| i.status == done_status).count();
    SprintSummary {
        name: name.to_string(),
        total_stories: issues.len(),
        completed_stories: completed,
    }
}

//! Per-epic story completion and project-wide epic totals.

use crate::config::EpicCompletionPolicy;
use crate::tracker::Issue;

/// One epic with its linked-story counts. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct EpicSummary {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub target_version: Option<String>,
    pub story_count: usize,
    pub completed_stories: usize,
}

impl EpicSummary {
    /// Share of linked stories that are done, 0.0 for an epic with no
    /// linked stories.
    pub fn completion_percentage(&self) -> f64 {
        if self.story_count == 0 {
            0.0
        } else {
            self.completed_stories as f64 / self.story_count as f64 * 100.0
        }
    }

    /// Display form, e.g. `"83.3%"`.
    pub fn completion_label(&self) -> String {
        format!("{:.1}%", self.completion_percentage())
    }
}

/// Epic totals plus the per-epic rows, in the order the epics were returned.
#[derive(Debug, Clone, PartialEq)]
pub struct EpicStats {
    pub total: usize,
    pub completed: usize,
    pub incomplete: usize,
    pub epics: Vec<EpicSummary>,
}

/// Join every epic against the project's stories by epic-link key.
///
/// This is a deliberate O(epics × stories) scan over the two lists already
/// in hand; no per-epic re-query happens. Which epics count as completed is
/// governed by the configured [`EpicCompletionPolicy`].
pub fn summarize_epics(
    epics: &[Issue],
    stories: &[Issue],
    done_status: &str,
    policy: EpicCompletionPolicy,
) -> EpicStats {
    let mut summaries = Vec::with_capacity(epics.len());
    let mut completed = 0usize;

    for epic in epics {
        let linked: Vec<&Issue> = stories
            .iter()
            .filter(|s| s.parent_epic_key.as_deref() == Some(epic.key.as_str()))
            .collect();
        let story_count = linked.len();
        let completed_stories = linked.iter().filter(|s| s.status == done_status).count();

        let summary = EpicSummary {
            key: epic.key.clone(),
            summary: epic.summary.clone(),
            status: epic.status.clone(),
            target_version: epic.target_version.clone(),
            story_count,
            completed_stories,
        };

        let is_completed = match policy {
            EpicCompletionPolicy::StoryCompletion => {
                story_count > 0 && completed_stories == story_count
            }
            EpicCompletionPolicy::EpicStatus => epic.status == done_status,
        };
        if is_completed {
            completed += 1;
        }
        summaries.push(summary);
    }

    EpicStats {
        total: epics.len(),
        completed,
        incomplete: epics.len() - completed,
        epics: summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::IssueType;

    fn epic(key: &str, status: &str) -> Issue {
        Issue {
            key: key.to_string(),
            issue_type: IssueType::Epic,
            summary: format!("epic {key}"),
            status: status.to_string(),
            labels: Vec::new(),
            parent_epic_key: None,
            sprint_id: None,
            target_version: Some("v1.0".to_string()),
        }
    }

    fn story(key: &str, status: &str, epic_key: Option<&str>) -> Issue {
        Issue {
            key: key.to_string(),
            issue_type: IssueType::Story,
            summary: String::new(),
            status: status.to_string(),
            labels: Vec::new(),
            parent_epic_key: epic_key.map(|k| k.to_string()),
            sprint_id: None,
            target_version: None,
        }
    }

    #[test]
    fn fully_done_epic_is_completed_with_percentage_label() {
        let epics = vec![epic("EPIC-1", "In Progress")];
        let stories: Vec<Issue> = (0..5)
            .map(|i| story(&format!("S-{i}"), "Done", Some("EPIC-1")))
            .collect();

        let stats = summarize_epics(&epics, &stories, "Done", EpicCompletionPolicy::StoryCompletion);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.incomplete, 0);
        assert_eq!(stats.epics[0].completion_label(), "100.0%");
    }

    #[test]
    fn completed_stories_never_exceed_story_count() {
        let epics = vec![epic("E-1", "Done"), epic("E-2", "To Do")];
        let stories = vec![
            story("S-1", "Done", Some("E-1")),
            story("S-2", "To Do", Some("E-1")),
            story("S-3", "Done", None),
        ];
        let stats = summarize_epics(&epics, &stories, "Done", EpicCompletionPolicy::StoryCompletion);
        for e in &stats.epics {
            assert!(e.completed_stories <= e.story_count);
        }
        assert!(stats.completed <= stats.total);
    }

    #[test]
    fn epic_with_no_linked_stories_has_zero_percentage() {
        let epics = vec![epic("E-1", "To Do")];
        let stats = summarize_epics(&epics, &[], "Done", EpicCompletionPolicy::StoryCompletion);
        assert_eq!(stats.epics[0].story_count, 0);
        assert_eq!(stats.epics[0].completion_percentage(), 0.0);
        assert_eq!(stats.epics[0].completion_label(), "0.0%");
        // Zero linked stories is not 100% complete.
        assert_eq!(stats.completed, 0);
    }

    #[test]
    fn story_completion_policy_ignores_epic_status() {
        let epics = vec![epic("E-1", "Done")];
        let stories = vec![story("S-1", "To Do", Some("E-1"))];
        let stats = summarize_epics(&epics, &stories, "Done", EpicCompletionPolicy::StoryCompletion);
        assert_eq!(stats.completed, 0);
    }

    #[test]
    fn epic_status_policy_uses_epic_status_only() {
        let epics = vec![epic("E-1", "Done"), epic("E-2", "In Progress")];
        let stories = vec![story("S-1", "Done", Some("E-2"))];
        let stats = summarize_epics(&epics, &stories, "Done", EpicCompletionPolicy::EpicStatus);
        // E-1 counted by its own status even with zero linked stories;
        // E-2 not counted despite 100% story completion.
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.incomplete, 1);
    }

    #[test]
    fn stories_are_attributed_to_their_own_epic() {
        let epics = vec![epic("E-1", "To Do"), epic("E-2", "To Do")];
        let stories = vec![
            story("S-1", "Done", Some("E-1")),
            story("S-2", "Done", Some("E-2")),
            story("S-3", "To Do", Some("E-2")),
        ];
        let stats = summarize_epics(&epics, &stories, "Done", EpicCompletionPolicy::StoryCompletion);
        assert_eq!(stats.epics[0].story_count, 1);
        assert_eq!(stats.epics[1].story_count, 2);
        assert_eq!(stats.epics[1].completed_stories, 1);
        assert_eq!(stats.epics[1].completion_label(), "50.0%");
    }

    #[test]
    fn totals_add_up() {
        let epics = vec![epic("E-1", "Done"), epic("E-2", "To Do"), epic("E-3", "To Do")];
        let stats = summarize_epics(&epics, &[], "Done", EpicCompletionPolicy::EpicStatus);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed + stats.incomplete, stats.total);
        assert_eq!(stats.epics.len(), 3);
    }

    #[test]
    fn summary_carries_epic_fields_through() {
        let epics = vec![epic("E-9", "In Progress")];
        let stats = summarize_epics(&epics, &[], "Done", EpicCompletionPolicy::StoryCompletion);
        let row = &stats.epics[0];
        assert_eq!(row.key, "E-9");
        assert_eq!(row.summary, "epic E-9");
        assert_eq!(row.status, "In Progress");
        assert_eq!(row.target_version.as_deref(), Some("v1.0"));
    }
}

//! Per-project story completion counts.

use crate::tracker::Issue;

/// Done/not-done split across all stories in a project.
///
/// `done + not_done == total` holds by construction: `not_done` is derived by
/// subtraction, never re-counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryStats {
    pub total: usize,
    pub done: usize,
    pub not_done: usize,
}

pub fn story_statistics(issues: &[Issue], done_status: &str) -> StoryStats {
    let total = issues.len();
    let done = issues.iter().filter(|i| i.status == done_status).count();
    StoryStats { total, done, not_done: total - done }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::IssueType;

    fn story(key: &str, status: &str) -> Issue {
        Issue {
            key: key.to_string(),
            issue_type: IssueType::Story,
            summary: String::new(),
            status: status.to_string(),
            labels: Vec::new(),
            parent_epic_key: None,
            sprint_id: None,
            target_version: None,
        }
    }

    #[test]
    fn ten_stories_six_done() {
        let mut issues = Vec::new();
        for i in 0..6 {
            issues.push(story(&format!("X-{i}"), "Done"));
        }
        for i in 6..10 {
            issues.push(story(&format!("X-{i}"), "In Progress"));
        }
        let stats = story_statistics(&issues, "Done");
        assert_eq!(stats, StoryStats { total: 10, done: 6, not_done: 4 });
    }

    #[test]
    fn done_plus_not_done_equals_total() {
        let issues: Vec<Issue> = (0..7)
            .map(|i| story(&format!("X-{i}"), if i % 3 == 0 { "Done" } else { "To Do" }))
            .collect();
        let stats = story_statistics(&issues, "Done");
        assert_eq!(stats.done + stats.not_done, stats.total);
    }

    #[test]
    fn empty_project_yields_all_zeros() {
        let stats = story_statistics(&[], "Done");
        assert_eq!(stats, StoryStats { total: 0, done: 0, not_done: 0 });
    }

    #[test]
    fn done_status_comparison_is_exact() {
        let issues = vec![story("X-1", "done"), story("X-2", "Done")];
        let stats = story_statistics(&issues, "Done");
        assert_eq!(stats.done, 1);
    }
}

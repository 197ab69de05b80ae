//! Derived report statistics.
//!
//! Pure computation lives in the submodules ([`story`], [`epic`], [`sprint`],
//! [`label`]); the [`Aggregator`] owns query orchestration through the
//! [`QueryCache`]. Failure policy follows the report contract: the top-level
//! story and epic queries propagate their errors, while board resolution and
//! per-sprint lookups are best-effort — a failure there is logged and shows
//! up as an empty category, so one bad sub-query cannot abort the report.

pub mod epic;
pub mod label;
pub mod sprint;
pub mod story;

use std::sync::Arc;

pub use epic::{EpicStats, EpicSummary};
pub use label::LabelSummary;
pub use sprint::SprintSummary;
pub use story::StoryStats;

use crate::cache::QueryCache;
use crate::config::ReportConfig;
use crate::errors::FetchError;
use crate::tracker::{self, TrackerClient};

/// Everything one `/project_stats` page needs, derived for a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectReport {
    pub project_name: String,
    pub stories: StoryStats,
    pub epics: EpicStats,
    pub sprints: Vec<SprintSummary>,
    pub labels: Vec<LabelSummary>,
}

pub struct Aggregator {
    tracker: Arc<dyn TrackerClient>,
    cache: Arc<QueryCache>,
    report: ReportConfig,
}

impl Aggregator {
    pub fn new(tracker: Arc<dyn TrackerClient>, cache: Arc<QueryCache>, report: ReportConfig) -> Self {
        Self { tracker, cache, report }
    }

    /// Done/not-done counts across the project's stories.
    pub async fn story_stats(&self, project: &str) -> Result<StoryStats, FetchError> {
        let stories = self
            .cache
            .get_or_fetch(&*self.tracker, &tracker::stories_in_project(project))
            .await?;
        Ok(story::story_statistics(&stories, &self.report.done_status))
    }

    /// Per-epic rows and completion totals across the project's epics.
    pub async fn epic_stats(&self, project: &str) -> Result<EpicStats, FetchError> {
        let epics = self
            .cache
            .get_or_fetch(&*self.tracker, &tracker::epics_in_project(project))
            .await?;
        let stories = self
            .cache
            .get_or_fetch(&*self.tracker, &tracker::stories_in_project(project))
            .await?;
        Ok(epic::summarize_epics(
            &epics,
            &stories,
            &self.report.done_status,
            self.report.epic_completion,
        ))
    }

    /// Per-sprint story totals for the project's board. Best-effort: any
    /// failure along the way yields an empty (or zeroed) result.
    pub async fn sprint_stats(&self, project: &str) -> Vec<SprintSummary> {
        let boards = match self.tracker.list_boards().await {
            Ok(boards) => boards,
            Err(err) => {
                tracing::warn!(project, error = %err, "board listing failed, skipping sprint stats");
                return Vec::new();
            }
        };

        let filter = self.report.board_filter.as_deref().unwrap_or(project);
        let needle = filter.to_lowercase();
        let Some(board) = boards
            .into_iter()
            .find(|b| b.name.to_lowercase().contains(&needle))
        else {
            tracing::warn!(project, filter, "no board matches filter, skipping sprint stats");
            return Vec::new();
        };

        let sprints = match self.tracker.list_sprints(board.id).await {
            Ok(sprints) => sprints,
            Err(err) => {
                tracing::warn!(board = board.id, error = %err, "sprint listing failed");
                return Vec::new();
            }
        };

        let mut summaries = Vec::with_capacity(sprints.len());
        for sprint in sprints {
            let jql = tracker::stories_in_sprint(project, sprint.id);
            match self.cache.get_or_fetch(&*self.tracker, &jql).await {
                Ok(issues) => summaries.push(sprint::sprint_statistics(
                    &sprint.name,
                    &issues,
                    &self.report.done_status,
                )),
                Err(err) => {
                    tracing::warn!(sprint = %sprint.name, error = %err, "sprint story query failed");
                    summaries.push(SprintSummary::empty(&sprint.name));
                }
            }
        }
        summaries
    }

    /// Run the full pipeline for one project. The story and epic queries are
    /// load-bearing and propagate failure; everything downstream of them is
    /// derived locally or best-effort.
    pub async fn project_report(&self, project: &str) -> Result<ProjectReport, FetchError> {
        let stories = self
            .cache
            .get_or_fetch(&*self.tracker, &tracker::stories_in_project(project))
            .await?;
        let epics = self
            .cache
            .get_or_fetch(&*self.tracker, &tracker::epics_in_project(project))
            .await?;

        let story_stats = story::story_statistics(&stories, &self.report.done_status);
        let epic_stats = epic::summarize_epics(
            &epics,
            &stories,
            &self.report.done_status,
            self.report.epic_completion,
        );
        let labels = label::delivery_by_label(&epics, &self.report.done_status);
        let sprints = self.sprint_stats(project).await;

        Ok(ProjectReport {
            project_name: project.to_string(),
            stories: story_stats,
            epics: epic_stats,
            sprints,
            labels,
        })
    }
}
